//! Simulation configuration with documented constants
//!
//! The model parameters follow the usual discrete burglary-hotspot formulation:
//! `delta` is the time step, `omega` the decay rate of excitation, `theta` the
//! excitation injected per burglary, `mu` the neighborhood coupling and `gamma`
//! the per-cell offender birth rate.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{BurglaryError, Result};

/// What happens at the lattice edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Hard edge: border cells have 2 or 3 neighbors
    #[default]
    Bounded,
    /// Both axes wrap around
    Toroidal,
}

/// Degree used by the discrete Laplacian
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaplacianDegree {
    /// Always 4, even for border cells of a bounded lattice.
    ///
    /// Border houses then see phantom zero-excitation neighbors, which drains
    /// excitation out through the edge.
    #[default]
    Fixed,
    /// The cell's real neighbor count, in both the Laplacian and the `mu / k` coupling.
    Actual,
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === LATTICE ===
    pub width: usize,
    pub height: usize,
    pub boundary: BoundaryPolicy,
    pub laplacian: LaplacianDegree,

    // === POPULATION ===
    /// Offenders placed uniformly at random by `initialize`
    pub initial_offenders: usize,

    // === MODEL PARAMETERS ===
    /// Time step. Must be positive.
    pub delta: f64,
    /// Excitation decay rate. `omega * delta` may not exceed 1.
    pub omega: f64,
    /// Excitation added per burglary
    pub theta: f64,
    /// Neighborhood coupling, at most 1
    pub mu: f64,
    /// Offender birth rate per cell
    pub gamma: f64,
    /// Static attractiveness shared by every house
    pub base_attractiveness: f64,

    // === RUNTIME ===
    pub seed: u64,

    /// Minimum house count before the compute phase runs on rayon
    ///
    /// Below this, thread overhead exceeds the per-house arithmetic.
    pub parallel_threshold: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            boundary: BoundaryPolicy::Bounded,
            laplacian: LaplacianDegree::Fixed,

            initial_offenders: 0,

            delta: 0.01,
            omega: 0.06,
            theta: 5.6,
            mu: 0.1,
            gamma: 0.019,
            base_attractiveness: 0.2,

            seed: 12345,
            parallel_threshold: 4096,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration. Nothing is clamped; the first problem found is returned.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BurglaryError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(BurglaryError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }

        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(BurglaryError::NonPositiveDelta(self.delta));
        }

        if !(self.base_attractiveness.is_finite() && self.base_attractiveness >= 0.0) {
            return Err(BurglaryError::NegativeAttractiveness(
                self.base_attractiveness,
            ));
        }

        for (name, value) in [
            ("omega", self.omega),
            ("theta", self.theta),
            ("mu", self.mu),
            ("gamma", self.gamma),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(BurglaryError::InvalidParameter { name, value });
            }
        }

        // Either bound exceeded lets the Euler step drive excitation negative
        if self.mu > 1.0 {
            return Err(BurglaryError::InvalidParameter {
                name: "mu",
                value: self.mu,
            });
        }
        if self.omega * self.delta > 1.0 {
            return Err(BurglaryError::InvalidParameter {
                name: "omega",
                value: self.omega,
            });
        }

        Ok(())
    }

    /// Total number of houses (one per cell)
    pub fn house_count(&self) -> usize {
        self.width * self.height
    }

    /// Multiplicative excitation decay applied each tick
    pub fn decay_factor(&self) -> f64 {
        1.0 - self.omega * self.delta
    }

    /// Probability that a single cell spawns an offender in one tick
    pub fn spawn_probability(&self) -> f64 {
        1.0 - (-self.gamma * self.delta).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = SimulationConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BurglaryError::EmptyGrid { width: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_delta() {
        for delta in [0.0, -0.5, f64::NAN] {
            let config = SimulationConfig {
                delta,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(BurglaryError::NonPositiveDelta(_))
            ));
        }
    }

    #[test]
    fn test_rejects_negative_attractiveness() {
        let config = SimulationConfig {
            base_attractiveness: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BurglaryError::NegativeAttractiveness(_))
        ));
    }

    #[test]
    fn test_rejects_negative_gamma() {
        let config = SimulationConfig {
            gamma: -1.0,
            ..Default::default()
        };
        match config.validate() {
            Err(BurglaryError::InvalidParameter { name, .. }) => assert_eq!(name, "gamma"),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_coupling_above_one() {
        let config = SimulationConfig {
            mu: 3.0,
            ..Default::default()
        };
        match config.validate() {
            Err(BurglaryError::InvalidParameter { name, value }) => {
                assert_eq!(name, "mu");
                assert_eq!(value, 3.0);
            }
            other => panic!("expected InvalidParameter, got {:?}", other),
        }

        let config = SimulationConfig {
            mu: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_decay_factor() {
        let config = SimulationConfig {
            delta: 0.5,
            omega: 3.0,
            ..Default::default()
        };
        assert!(config.decay_factor() < 0.0);
        match config.validate() {
            Err(BurglaryError::InvalidParameter { name, .. }) => assert_eq!(name, "omega"),
            other => panic!("expected InvalidParameter, got {:?}", other),
        }

        // Full decay in one step is still allowed
        let config = SimulationConfig {
            delta: 0.5,
            omega: 2.0,
            ..Default::default()
        };
        assert_eq!(config.decay_factor(), 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_attractiveness_is_allowed() {
        let config = SimulationConfig {
            base_attractiveness: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = SimulationConfig::from_toml_str(
            r#"
            width = 16
            height = 8
            boundary = "toroidal"
            theta = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.width, 16);
        assert_eq!(config.height, 8);
        assert_eq!(config.boundary, BoundaryPolicy::Toroidal);
        assert!((config.theta - 0.5).abs() < 1e-12);
        // Untouched keys keep their defaults
        assert!((config.delta - 0.01).abs() < 1e-12);
        assert_eq!(config.laplacian, LaplacianDegree::Fixed);
    }

    #[test]
    fn test_from_toml_validates() {
        let result = SimulationConfig::from_toml_str("delta = -1.0");
        assert!(matches!(result, Err(BurglaryError::NonPositiveDelta(_))));
    }

    #[test]
    fn test_from_toml_syntax_error() {
        let result = SimulationConfig::from_toml_str("width = = 3");
        assert!(matches!(result, Err(BurglaryError::ConfigError(_))));
    }

    #[test]
    fn test_spawn_probability() {
        let config = SimulationConfig {
            gamma: 0.0,
            ..Default::default()
        };
        assert_eq!(config.spawn_probability(), 0.0);

        let config = SimulationConfig {
            gamma: 2.0,
            delta: 0.5,
            ..Default::default()
        };
        assert!((config.spawn_probability() - (1.0 - (-1.0f64).exp())).abs() < 1e-12);
    }
}
