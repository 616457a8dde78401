//! Offenders and their burgle-or-move decision

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{Cell, OffenderId};

/// What an offender intends to do at commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Burgle,
    Relocate,
}

/// Decision for a given draw; burgle iff `draw < burgle_probability`
#[inline]
pub fn decide(burgle_probability: f64, draw: f64) -> Decision {
    if draw < burgle_probability {
        Decision::Burgle
    } else {
        Decision::Relocate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offender {
    pub id: OffenderId,
    pub cell: Cell,
    /// Decision made in the most recent tick's compute phase
    pub pending: Option<Decision>,
}

impl Offender {
    pub fn new(id: OffenderId, cell: Cell) -> Self {
        Self {
            id,
            cell,
            pending: None,
        }
    }

    /// One uniform draw against the occupied house's probability
    pub fn choose<R: Rng + ?Sized>(&self, burgle_probability: f64, rng: &mut R) -> Decision {
        decide(burgle_probability, rng.gen::<f64>())
    }
}

/// Roulette-wheel selection over `(cell, attractiveness)` candidates
///
/// Weights are normalized by their sum, sorted ascending and accumulated; the
/// first entry whose cumulative weight is strictly greater than `draw` wins.
/// Returns `None` when there are no candidates, the total is not a positive
/// finite number, or rounding leaves the last cumulative weight at or below
/// `draw`. Callers treat `None` as "stay put".
pub fn roulette_select(candidates: &[(Cell, f64)], draw: f64) -> Option<Cell> {
    let total: f64 = candidates.iter().map(|&(_, a)| a).sum();
    if candidates.is_empty() || !(total.is_finite() && total > 0.0) {
        return None;
    }

    let mut weighted: Vec<(Cell, f64)> = candidates
        .iter()
        .map(|&(cell, a)| (cell, a / total))
        .collect();
    weighted.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut cumulative = 0.0;
    for (cell, weight) in weighted {
        cumulative += weight;
        if draw < cumulative {
            return Some(cell);
        }
    }
    None
}
