//! Houses: one per lattice cell, carrying the excitation field
//!
//! A house's attractiveness is a static base plus a dynamic excitation term.
//! Excitation diffuses to neighbors, decays toward zero, and jumps by `theta`
//! for every burglary. Updates are double-buffered: [`House::next_state`] only
//! reads, [`House::commit`] only writes.

use serde::{Deserialize, Serialize};

use crate::core::config::{LaplacianDegree, SimulationConfig};

/// First-arrival probability of a Poisson process with rate `attractiveness`
/// over a window of length `delta`
#[inline]
pub fn burgle_probability(attractiveness: f64, delta: f64) -> f64 {
    1.0 - (-attractiveness * delta).exp()
}

/// A house's state for the next tick, computed from the current snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseUpdate {
    pub excitation: f64,
    pub combined_attractiveness: f64,
    pub burgle_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub base_attractiveness: f64,
    pub excitation: f64,
    /// `base_attractiveness + excitation`
    pub combined_attractiveness: f64,
    pub burgle_probability: f64,
    /// Burglaries resolved during the current tick's commit
    pub crime_count: u32,
    /// Burglaries over the whole run
    pub total_crimes: u64,
}

impl House {
    pub fn new(base_attractiveness: f64, delta: f64) -> Self {
        Self {
            base_attractiveness,
            excitation: 0.0,
            combined_attractiveness: base_attractiveness,
            burgle_probability: burgle_probability(base_attractiveness, delta),
            crime_count: 0,
            total_crimes: 0,
        }
    }

    /// Explicit-Euler step of the diffusion/decay/impulse equation
    ///
    /// `neighbor_excitation` is the sum over the `degree` actual neighbors.
    /// With [`LaplacianDegree::Fixed`] the stencil always assumes four
    /// neighbors, so a border cell on a bounded lattice loses excitation
    /// through its missing sides.
    pub fn next_state(
        &self,
        neighbor_excitation: f64,
        degree: usize,
        config: &SimulationConfig,
    ) -> HouseUpdate {
        let diffusion = match config.laplacian {
            LaplacianDegree::Fixed => {
                let laplacian = neighbor_excitation - 4.0 * self.excitation;
                (config.mu / 4.0) * laplacian
            }
            LaplacianDegree::Actual if degree == 0 => 0.0,
            LaplacianDegree::Actual => {
                let k = degree as f64;
                let laplacian = neighbor_excitation - k * self.excitation;
                (config.mu / k) * laplacian
            }
        };

        let excitation = (self.excitation + diffusion) * config.decay_factor()
            + config.theta * f64::from(self.crime_count);
        let combined_attractiveness = excitation + self.base_attractiveness;

        HouseUpdate {
            excitation,
            combined_attractiveness,
            burgle_probability: burgle_probability(combined_attractiveness, config.delta),
        }
    }

    /// Install the next state and clear this tick's crime counter
    pub fn commit(&mut self, update: HouseUpdate) {
        self.excitation = update.excitation;
        self.combined_attractiveness = update.combined_attractiveness;
        self.burgle_probability = update.burgle_probability;
        self.crime_count = 0;
    }

    pub fn record_burglary(&mut self) {
        self.crime_count += 1;
        self.total_crimes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimulationConfig {
        SimulationConfig {
            delta: 0.1,
            omega: 0.1,
            theta: 5.0,
            mu: 0.2,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_house_starts_unexcited() {
        let house = House::new(0.2, 0.1);
        assert_eq!(house.excitation, 0.0);
        assert!((house.combined_attractiveness - 0.2).abs() < 1e-12);
        assert!((house.burgle_probability - (1.0 - (-0.02f64).exp())).abs() < 1e-12);
        assert_eq!(house.crime_count, 0);
    }

    #[test]
    fn test_probability_bounds() {
        for a in [0.0, 1e-9, 0.2, 1.0, 50.0, 500.0] {
            let p = burgle_probability(a, 0.01);
            assert!((0.0..1.0).contains(&p), "p({}) = {}", a, p);
        }
        assert_eq!(burgle_probability(0.0, 0.5), 0.0);
    }

    #[test]
    fn test_burglary_boost() {
        let config = config();
        let mut house = House::new(0.2, config.delta);
        house.record_burglary();
        house.record_burglary();

        let next = house.next_state(0.0, 4, &config);
        assert!((next.excitation - 10.0).abs() < 1e-12);
        assert!((next.combined_attractiveness - 10.2).abs() < 1e-12);
    }

    #[test]
    fn test_diffusion_pulls_toward_neighbors() {
        let config = SimulationConfig {
            omega: 0.0,
            theta: 0.0,
            mu: 0.2,
            ..config()
        };
        let mut house = House::new(0.2, config.delta);
        house.excitation = 1.0;

        // Four neighbors at 0: laplacian = -4, step = 0.05 * -4
        let next = house.next_state(0.0, 4, &config);
        assert!((next.excitation - 0.8).abs() < 1e-12);

        // Neighbors at the same level: no change
        let next = house.next_state(4.0, 4, &config);
        assert!((next.excitation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_degree_drains_edges() {
        let config = SimulationConfig {
            omega: 0.0,
            theta: 0.0,
            mu: 0.2,
            ..config()
        };
        let mut house = House::new(0.0, config.delta);
        house.excitation = 1.0;

        // Corner cell with two neighbors at the same level still decays under Fixed
        let fixed = house.next_state(2.0, 2, &config);
        assert!(fixed.excitation < 1.0);

        let actual_config = SimulationConfig {
            laplacian: LaplacianDegree::Actual,
            ..config
        };
        let actual = house.next_state(2.0, 2, &actual_config);
        assert!((actual.excitation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_actual_degree_without_neighbors_only_decays() {
        let config = SimulationConfig {
            laplacian: LaplacianDegree::Actual,
            theta: 0.0,
            ..config()
        };
        let mut house = House::new(0.0, config.delta);
        house.excitation = 2.0;
        let next = house.next_state(0.0, 0, &config);
        assert!((next.excitation - 2.0 * config.decay_factor()).abs() < 1e-12);
    }

    #[test]
    fn test_commit_resets_crime_count_only() {
        let config = config();
        let mut house = House::new(0.2, config.delta);
        house.record_burglary();
        let next = house.next_state(0.0, 4, &config);
        house.commit(next);

        assert_eq!(house.crime_count, 0);
        assert_eq!(house.total_crimes, 1);
        assert_eq!(house.excitation, next.excitation);
        assert_eq!(house.burgle_probability, next.burgle_probability);
    }
}
