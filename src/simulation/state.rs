//! Simulation state: lattice, houses, offenders and the random streams
//!
//! Houses live in a row-major `Vec` indexed by [`Lattice::index`]; offenders live
//! in a [`Population`]. The two are never mixed in one per-cell container.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{BurglaryError, Result};
use crate::core::types::{Cell, OffenderId, Tick};
use crate::entity::house::House;
use crate::entity::offender::Offender;
use crate::simulation::population::{random_cell, Population};
use crate::spatial::Lattice;

/// ChaCha stream id used for spawning and initial placement
const SPAWN_STREAM: u64 = 1;

/// Independent random streams derived from one seed
///
/// Decisions and movement draw from `agents`; the birth process and initial
/// placement draw from `spawns`, so changing the spawn rate never shifts an
/// offender's decision draws.
#[derive(Debug, Clone)]
pub struct SimulationRng {
    pub agents: ChaCha8Rng,
    pub spawns: ChaCha8Rng,
}

impl SimulationRng {
    pub fn from_seed(seed: u64) -> Self {
        let agents = ChaCha8Rng::seed_from_u64(seed);
        let mut spawns = ChaCha8Rng::seed_from_u64(seed);
        spawns.set_stream(SPAWN_STREAM);
        Self { agents, spawns }
    }
}

pub struct SimulationState {
    pub config: SimulationConfig,
    pub lattice: Lattice,
    pub current_tick: Tick,
    pub(crate) houses: Vec<House>,
    pub(crate) population: Population,
    pub(crate) rng: SimulationRng,
}

impl SimulationState {
    /// Validate the config, build one house per cell and scatter the initial offenders
    pub fn initialize(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let lattice = Lattice::new(config.width, config.height, config.boundary);
        let houses = vec![House::new(config.base_attractiveness, config.delta); lattice.cell_count()];
        let mut rng = SimulationRng::from_seed(config.seed);

        let mut population = Population::new(lattice);
        for _ in 0..config.initial_offenders {
            let cell = random_cell(&lattice, &mut rng.spawns);
            population.spawn_at(cell);
        }

        tracing::info!(
            width = config.width,
            height = config.height,
            offenders = population.len(),
            boundary = ?config.boundary,
            laplacian = ?config.laplacian,
            seed = config.seed,
            "simulation initialized"
        );

        Ok(Self {
            config,
            lattice,
            current_tick: 0,
            houses,
            population,
            rng,
        })
    }

    /// Place an offender on a specific cell
    pub fn spawn_offender_at(&mut self, cell: Cell) -> Result<OffenderId> {
        self.population
            .spawn_at(cell)
            .ok_or(BurglaryError::CellOutOfBounds {
                cell,
                width: self.lattice.width,
                height: self.lattice.height,
            })
    }

    // === PER-CELL ACCESSORS ===

    pub fn house(&self, cell: Cell) -> Option<&House> {
        self.lattice.index(cell).and_then(|i| self.houses.get(i))
    }

    #[cfg(test)]
    pub(crate) fn house_mut(&mut self, cell: Cell) -> Option<&mut House> {
        let idx = self.lattice.index(cell)?;
        self.houses.get_mut(idx)
    }

    /// All houses in row-major order
    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    pub fn attractiveness(&self, cell: Cell) -> Option<f64> {
        self.house(cell).map(|h| h.combined_attractiveness)
    }

    pub fn excitation(&self, cell: Cell) -> Option<f64> {
        self.house(cell).map(|h| h.excitation)
    }

    pub fn burgle_probability(&self, cell: Cell) -> Option<f64> {
        self.house(cell).map(|h| h.burgle_probability)
    }

    pub fn crime_count(&self, cell: Cell) -> Option<u32> {
        self.house(cell).map(|h| h.crime_count)
    }

    /// Combined attractiveness of every house, row-major
    pub fn attractiveness_map(&self) -> Vec<f64> {
        self.houses.iter().map(|h| h.combined_attractiveness).collect()
    }

    // === OFFENDERS ===

    pub fn offender_count(&self) -> usize {
        self.population.len()
    }

    pub fn offenders(&self) -> impl Iterator<Item = &Offender> {
        self.population.iter()
    }

    pub fn offender(&self, id: OffenderId) -> Option<&Offender> {
        self.population.get(id)
    }

    pub fn offender_positions(&self) -> Vec<(OffenderId, Cell)> {
        self.population.iter().map(|o| (o.id, o.cell)).collect()
    }

    pub fn occupants(&self, cell: Cell) -> &[OffenderId] {
        self.population.occupants(cell)
    }

    // === REDUCERS ===

    pub fn mean_attractiveness(&self) -> f64 {
        let sum: f64 = self.houses.iter().map(|h| h.combined_attractiveness).sum();
        sum / self.houses.len() as f64
    }

    pub fn min_attractiveness(&self) -> f64 {
        self.houses
            .iter()
            .map(|h| h.combined_attractiveness)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_attractiveness(&self) -> f64 {
        self.houses
            .iter()
            .map(|h| h.combined_attractiveness)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean_excitation(&self) -> f64 {
        let sum: f64 = self.houses.iter().map(|h| h.excitation).sum();
        sum / self.houses.len() as f64
    }

    pub fn min_excitation(&self) -> f64 {
        self.houses
            .iter()
            .map(|h| h.excitation)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_excitation(&self) -> f64 {
        self.houses
            .iter()
            .map(|h| h.excitation)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Burglaries resolved in the most recent tick
    pub fn total_crimes(&self) -> u64 {
        self.houses.iter().map(|h| u64::from(h.crime_count)).sum()
    }

    /// Cell of the most attractive house; ties go to the first in row-major order
    pub fn max_attractiveness_cell(&self) -> Cell {
        let mut best = 0;
        for (i, house) in self.houses.iter().enumerate() {
            if house.combined_attractiveness > self.houses[best].combined_attractiveness {
                best = i;
            }
        }
        self.lattice.cell_at(best).unwrap_or(Cell::new(0, 0))
    }
}
