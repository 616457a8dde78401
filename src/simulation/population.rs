//! Offender population and the spawn process
//!
//! Offenders are kept in id order so iteration (and therefore the order of
//! random draws) is stable across runs. Every offender is mirrored in the
//! occupancy index; the two are only ever changed together.

use ahash::AHashSet;
use rand::Rng;

use crate::core::config::SimulationConfig;
use crate::core::types::{Cell, OffenderId};
use crate::entity::offender::{Decision, Offender};
use crate::spatial::{Lattice, OccupancyIndex};

#[derive(Debug, Clone)]
pub struct Population {
    offenders: Vec<Offender>,
    index: OccupancyIndex,
    next_id: u64,
}

impl Population {
    pub fn new(lattice: Lattice) -> Self {
        Self {
            offenders: Vec::new(),
            index: OccupancyIndex::new(lattice),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.offenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offenders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Offender> {
        self.offenders.iter()
    }

    pub fn get(&self, id: OffenderId) -> Option<&Offender> {
        self.offenders
            .binary_search_by_key(&id, |o| o.id)
            .ok()
            .map(|i| &self.offenders[i])
    }

    fn get_mut(&mut self, id: OffenderId) -> Option<&mut Offender> {
        match self.offenders.binary_search_by_key(&id, |o| o.id) {
            Ok(i) => Some(&mut self.offenders[i]),
            Err(_) => None,
        }
    }

    pub fn occupants(&self, cell: Cell) -> &[OffenderId] {
        self.index.occupants(cell)
    }

    /// Add a new offender. Returns `None` if `cell` is off the lattice.
    pub fn spawn_at(&mut self, cell: Cell) -> Option<OffenderId> {
        let id = OffenderId::new(self.next_id);
        if !self.index.place(id, cell) {
            return None;
        }
        self.next_id += 1;
        self.offenders.push(Offender::new(id, cell));
        Some(id)
    }

    /// Move an offender to `to`; unknown ids and off-lattice targets are ignored
    pub fn relocate(&mut self, id: OffenderId, to: Cell) -> bool {
        let Some(from) = self.get(id).map(|o| o.cell) else {
            return false;
        };
        if !self.index.move_offender(id, from, to) {
            return false;
        }
        if let Some(offender) = self.get_mut(id) {
            offender.cell = to;
        }
        true
    }

    pub(crate) fn set_pending(&mut self, id: OffenderId, decision: Decision) {
        if let Some(offender) = self.get_mut(id) {
            offender.pending = Some(decision);
        }
    }

    /// Remove a batch of offenders in one pass
    ///
    /// Ids that are absent (already removed, never existed, listed twice) are
    /// skipped. Returns how many offenders were actually removed.
    pub fn remove_batch(&mut self, ids: &[OffenderId]) -> usize {
        let doomed: AHashSet<OffenderId> = ids
            .iter()
            .copied()
            .filter(|&id| self.index.remove(id).is_some())
            .collect();

        let before = self.offenders.len();
        self.offenders.retain(|o| !doomed.contains(&o.id));
        before - self.offenders.len()
    }
}

/// Uniformly random cell
pub fn random_cell<R: Rng + ?Sized>(lattice: &Lattice, rng: &mut R) -> Cell {
    Cell::new(rng.gen_range(0..lattice.width), rng.gen_range(0..lattice.height))
}

/// Run the birth process for one tick
///
/// Every cell is an independent Bernoulli trial with success probability
/// `1 - exp(-gamma * delta)`; each success places one offender on a uniformly
/// random cell. Returns the number spawned.
pub fn spawn_offenders<R: Rng + ?Sized>(
    population: &mut Population,
    lattice: &Lattice,
    config: &SimulationConfig,
    rng: &mut R,
) -> usize {
    let p = config.spawn_probability();
    let mut spawned = 0;

    for _ in 0..lattice.cell_count() {
        let roll: f64 = rng.gen();
        if roll >= p {
            continue;
        }
        let cell = random_cell(lattice, rng);
        if population.spawn_at(cell).is_some() {
            spawned += 1;
        }
    }

    spawned
}
