//! Simulation output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{Cell, OffenderId, Tick};
use crate::simulation::metrics::{AttractivenessMap, MetricsCollector, TickMetrics};
use crate::simulation::state::SimulationState;

/// Complete run output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub final_state: StateSnapshot,
    pub history: Vec<TickMetrics>,
    pub attractiveness_maps: Vec<AttractivenessMap>,
    pub statistics: SimulationStats,
}

/// Serializable snapshot of the committed state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub tick: Tick,
    pub width: usize,
    pub height: usize,
    /// Row-major combined attractiveness
    pub attractiveness: Vec<f64>,
    /// Row-major excitation
    pub excitation: Vec<f64>,
    /// Row-major lifetime burglary counts
    pub crime_totals: Vec<u64>,
    pub offenders: Vec<(OffenderId, Cell)>,
}

impl StateSnapshot {
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            tick: state.current_tick,
            width: state.lattice.width,
            height: state.lattice.height,
            attractiveness: state.attractiveness_map(),
            excitation: state.houses().iter().map(|h| h.excitation).collect(),
            crime_totals: state.houses().iter().map(|h| h.total_crimes).collect(),
            offenders: state.offender_positions(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationStats {
    pub ticks_simulated: u64,
    pub simulation_time_ms: u64,
    pub total_burglaries: u64,
    pub total_spawned: u64,
    pub offenders_at_start: usize,
    pub offenders_at_end: usize,
    pub peak_offenders: usize,
    pub hottest_cell: Cell,
    pub peak_attractiveness: f64,
}

impl SimulationOutput {
    pub fn new(
        state: &SimulationState,
        metrics: MetricsCollector,
        ticks: u64,
        elapsed: Duration,
    ) -> Self {
        let offenders_at_start = metrics.history().first().map_or(0, |m| m.offenders);
        let total_burglaries = metrics
            .history()
            .iter()
            .filter(|m| m.tick > 0)
            .map(|m| m.crimes)
            .sum();
        let total_spawned = metrics.total_spawned();
        let peak_offenders = metrics.peak_offenders().max(state.offender_count());
        let (history, attractiveness_maps) = metrics.into_parts();

        Self {
            final_state: StateSnapshot::capture(state),
            history,
            attractiveness_maps,
            statistics: SimulationStats {
                ticks_simulated: ticks,
                simulation_time_ms: elapsed.as_millis() as u64,
                total_burglaries,
                total_spawned,
                offenders_at_start,
                offenders_at_end: state.offender_count(),
                peak_offenders,
                hottest_cell: state.max_attractiveness_cell(),
                peak_attractiveness: state.max_attractiveness(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        let s = &self.statistics;
        format!(
            "Simulated {} ticks in {}ms\n{} burglaries, {} offenders spawned, {} -> {} offenders (peak {})\nHottest house {} at attractiveness {:.3}",
            s.ticks_simulated,
            s.simulation_time_ms,
            s.total_burglaries,
            s.total_spawned,
            s.offenders_at_start,
            s.offenders_at_end,
            s.peak_offenders,
            s.hottest_cell,
            s.peak_attractiveness,
        )
    }
}
