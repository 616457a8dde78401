//! Tick system - advances the simulation one step
//!
//! Every tick has two phases separated by a barrier:
//! 1. Compute (read-only): each house derives its next state from the snapshot
//!    committed last tick, and each offender decides from last tick's
//!    burglary probabilities
//! 2. Commit (single writer): install house states, resolve decisions,
//!    batch-remove burglars, then spawn new offenders
//!
//! Uses rayon for the house computation on large lattices.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{Cell, OffenderId, Tick};
use crate::entity::house::{House, HouseUpdate};
use crate::entity::offender::{roulette_select, Decision};
use crate::simulation::population::{spawn_offenders, Population};
use crate::simulation::state::SimulationState;
use crate::spatial::Lattice;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number after the commit (the first tick reports 1)
    pub tick: Tick,
    pub population_before: usize,
    pub burglaries: usize,
    pub relocations: usize,
    /// Relocating offenders that had nowhere to go
    pub stationary: usize,
    pub removed: usize,
    pub spawned: usize,
    pub population_after: usize,
}

impl TickReport {
    /// `after == before - removed + spawned`
    pub fn is_conserved(&self) -> bool {
        self.population_before + self.spawned == self.population_after + self.removed
    }
}

/// Next state for the house at row-major index `idx`, reading only `houses`
///
/// Panics if `idx` is not a valid house index.
pub fn compute_house_update(
    lattice: &Lattice,
    houses: &[House],
    config: &SimulationConfig,
    idx: usize,
) -> HouseUpdate {
    let cell = Cell::new(idx % lattice.width, idx / lattice.width);
    let neighbors = lattice.neighbors(cell);
    let neighbor_excitation: f64 = neighbors
        .iter()
        .filter_map(|&n| lattice.index(n))
        .map(|i| houses[i].excitation)
        .sum();

    houses[idx].next_state(neighbor_excitation, neighbors.len(), config)
}

/// Compute phase for houses
///
/// Each update depends only on the snapshot, so the parallel and sequential
/// paths give identical results.
pub fn compute_house_updates(
    lattice: &Lattice,
    houses: &[House],
    config: &SimulationConfig,
) -> Vec<HouseUpdate> {
    if houses.len() >= config.parallel_threshold {
        (0..houses.len())
            .into_par_iter()
            .map(|i| compute_house_update(lattice, houses, config, i))
            .collect()
    } else {
        (0..houses.len())
            .map(|i| compute_house_update(lattice, houses, config, i))
            .collect()
    }
}

/// Compute phase for offenders: one draw each, in population order
pub fn decide_offenders<R: Rng + ?Sized>(
    population: &Population,
    lattice: &Lattice,
    houses: &[House],
    rng: &mut R,
) -> Vec<(OffenderId, Decision)> {
    population
        .iter()
        .map(|offender| {
            let p = lattice
                .index(offender.cell)
                .and_then(|i| houses.get(i))
                .map(|h| h.burgle_probability)
                .unwrap_or(0.0);
            (offender.id, offender.choose(p, rng))
        })
        .collect()
}

impl SimulationState {
    /// Advance one tick using the state's own seeded streams
    pub fn tick(&mut self) -> TickReport {
        let SimulationState {
            config,
            lattice,
            current_tick,
            houses,
            population,
            rng,
        } = self;
        advance(
            config,
            lattice,
            current_tick,
            houses,
            population,
            &mut rng.agents,
            &mut rng.spawns,
        )
    }

    /// Advance one tick drawing from caller-supplied random sources
    ///
    /// `agent_rng` feeds decisions and movement; `spawn_rng` feeds the birth
    /// process only.
    pub fn tick_with_rng<A, S>(&mut self, agent_rng: &mut A, spawn_rng: &mut S) -> TickReport
    where
        A: Rng + ?Sized,
        S: Rng + ?Sized,
    {
        advance(
            &self.config,
            &self.lattice,
            &mut self.current_tick,
            &mut self.houses,
            &mut self.population,
            agent_rng,
            spawn_rng,
        )
    }
}

/// One compute/commit cycle over split borrows of the state
fn advance<A, S>(
    config: &SimulationConfig,
    lattice: &Lattice,
    current_tick: &mut Tick,
    houses: &mut [House],
    population: &mut Population,
    agent_rng: &mut A,
    spawn_rng: &mut S,
) -> TickReport
where
    A: Rng + ?Sized,
    S: Rng + ?Sized,
{
    let population_before = population.len();

    // === COMPUTE ===
    let updates = compute_house_updates(lattice, houses, config);
    let decisions = decide_offenders(population, lattice, houses, agent_rng);

    // === COMMIT ===
    for (house, update) in houses.iter_mut().zip(updates) {
        house.commit(update);
    }

    let mut burglars = Vec::new();
    let mut relocations = 0;
    let mut stationary = 0;

    for (id, decision) in decisions {
        population.set_pending(id, decision);
        let Some(cell) = population.get(id).map(|o| o.cell) else {
            continue;
        };

        match decision {
            Decision::Burgle => {
                if let Some(idx) = lattice.index(cell) {
                    houses[idx].record_burglary();
                }
                burglars.push(id);
                tracing::trace!(%id, %cell, "burglary");
            }
            Decision::Relocate => {
                let draw: f64 = agent_rng.gen();
                let moved = match choose_destination(lattice, houses, cell, draw) {
                    Some(to) => population.relocate(id, to),
                    None => false,
                };
                if moved {
                    relocations += 1;
                } else {
                    stationary += 1;
                    tracing::trace!(%id, %cell, "no eligible neighbor, staying");
                }
            }
        }
    }

    // Removal strictly after every decision is resolved, spawning strictly after removal
    let removed = population.remove_batch(&burglars);
    let spawned = spawn_offenders(population, lattice, config, spawn_rng);

    *current_tick += 1;

    let report = TickReport {
        tick: *current_tick,
        population_before,
        burglaries: burglars.len(),
        relocations,
        stationary,
        removed,
        spawned,
        population_after: population.len(),
    };

    tracing::debug!(
        tick = report.tick,
        burglaries = report.burglaries,
        relocations = report.relocations,
        stationary = report.stationary,
        spawned = report.spawned,
        population = report.population_after,
        "tick committed"
    );

    report
}

/// Roulette draw over the neighbors' committed attractiveness
fn choose_destination(lattice: &Lattice, houses: &[House], cell: Cell, draw: f64) -> Option<Cell> {
    let candidates: Vec<(Cell, f64)> = lattice
        .neighbors(cell)
        .iter()
        .filter_map(|&n| {
            let house = houses.get(lattice.index(n)?)?;
            Some((n, house.combined_attractiveness))
        })
        .collect();
    roulette_select(&candidates, draw)
}
