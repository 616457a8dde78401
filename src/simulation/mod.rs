//! Burglary simulation engine
//!
//! [`initialize`] builds the lattice, houses and starting offenders;
//! [`SimulationState::tick`] advances one two-phase step; [`simulate`] runs a
//! whole experiment and returns the collected metrics.

pub mod metrics;
pub mod output;
pub mod population;
pub mod state;
pub mod tick;

use std::time::Instant;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;

pub use metrics::{AttractivenessMap, MetricsCollector, TickMetrics};
pub use output::{SimulationOutput, SimulationStats, StateSnapshot};
pub use population::{spawn_offenders, Population};
pub use state::{SimulationRng, SimulationState};
pub use tick::{compute_house_update, compute_house_updates, decide_offenders, TickReport};

/// Validate `config` and build the starting state
pub fn initialize(config: SimulationConfig) -> Result<SimulationState> {
    SimulationState::initialize(config)
}

/// Advance `state` by one tick and hand it back
pub fn tick(state: &mut SimulationState) -> &mut SimulationState {
    state.tick();
    state
}

/// Run `ticks` steps collecting aggregate metrics only
pub fn simulate(config: SimulationConfig, ticks: u64) -> Result<SimulationOutput> {
    simulate_with(config, ticks, MetricsCollector::new())
}

/// Run `ticks` steps with a caller-configured collector
pub fn simulate_with(
    config: SimulationConfig,
    ticks: u64,
    mut metrics: MetricsCollector,
) -> Result<SimulationOutput> {
    let start = Instant::now();

    let mut state = initialize(config)?;
    metrics.record_initial(&state);

    for _ in 0..ticks {
        let report = state.tick();
        metrics.record(&state, &report);
    }

    let elapsed = start.elapsed();
    tracing::info!(
        ticks,
        elapsed_ms = elapsed.as_millis() as u64,
        offenders = state.offender_count(),
        crimes = metrics.total_crimes(),
        "simulation finished"
    );

    Ok(SimulationOutput::new(&state, metrics, ticks, elapsed))
}
