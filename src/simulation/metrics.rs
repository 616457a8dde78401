//! Metrics collection over committed state
//!
//! One [`TickMetrics`] row per tick, plus an optional row-major attractiveness
//! map every `map_interval` ticks for heatmap consumers.

use serde::{Deserialize, Serialize};

use crate::core::types::{Cell, Tick};
use crate::simulation::state::SimulationState;
use crate::simulation::tick::TickReport;

/// Aggregate statistics sampled after a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickMetrics {
    pub tick: Tick,
    pub mean_attractiveness: f64,
    pub min_attractiveness: f64,
    pub max_attractiveness: f64,
    pub mean_excitation: f64,
    pub min_excitation: f64,
    pub max_excitation: f64,
    /// Burglaries resolved this tick
    pub crimes: u64,
    pub offenders: usize,
    pub spawned: usize,
    pub removed: usize,
    /// Most attractive house, first in row-major order on ties
    pub max_position: Cell,
}

impl TickMetrics {
    /// Sample the committed state; `report` is `None` for the pre-run snapshot
    pub fn sample(state: &SimulationState, report: Option<&TickReport>) -> Self {
        Self {
            tick: state.current_tick,
            mean_attractiveness: state.mean_attractiveness(),
            min_attractiveness: state.min_attractiveness(),
            max_attractiveness: state.max_attractiveness(),
            mean_excitation: state.mean_excitation(),
            min_excitation: state.min_excitation(),
            max_excitation: state.max_excitation(),
            crimes: state.total_crimes(),
            offenders: state.offender_count(),
            spawned: report.map_or(0, |r| r.spawned),
            removed: report.map_or(0, |r| r.removed),
            max_position: state.max_attractiveness_cell(),
        }
    }
}

/// Per-house combined attractiveness at one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractivenessMap {
    pub tick: Tick,
    pub width: usize,
    pub height: usize,
    /// Row-major, `values[y * width + x]`
    pub values: Vec<f64>,
}

impl AttractivenessMap {
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            tick: state.current_tick,
            width: state.lattice.width,
            height: state.lattice.height,
            values: state.attractiveness_map(),
        }
    }

    pub fn get(&self, cell: Cell) -> Option<f64> {
        if cell.x < self.width && cell.y < self.height {
            self.values.get(cell.y * self.width + cell.x).copied()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    map_interval: Option<u64>,
    history: Vec<TickMetrics>,
    maps: Vec<AttractivenessMap>,
}

impl MetricsCollector {
    /// Collector that records aggregate rows only
    pub fn new() -> Self {
        Self::default()
    }

    /// Also capture an attractiveness map every `interval` ticks (0 disables)
    pub fn with_map_interval(interval: u64) -> Self {
        Self {
            map_interval: (interval > 0).then_some(interval),
            ..Self::default()
        }
    }

    /// Record the state before the first tick
    pub fn record_initial(&mut self, state: &SimulationState) {
        self.history.push(TickMetrics::sample(state, None));
        if self.map_interval.is_some() {
            self.maps.push(AttractivenessMap::capture(state));
        }
    }

    /// Record the state right after a tick's commit
    pub fn record(&mut self, state: &SimulationState, report: &TickReport) -> &TickMetrics {
        if let Some(interval) = self.map_interval {
            if state.current_tick % interval == 0 {
                self.maps.push(AttractivenessMap::capture(state));
            }
        }
        self.history.push(TickMetrics::sample(state, Some(report)));
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[TickMetrics] {
        &self.history
    }

    pub fn maps(&self) -> &[AttractivenessMap] {
        &self.maps
    }

    pub fn latest(&self) -> Option<&TickMetrics> {
        self.history.last()
    }

    pub fn total_crimes(&self) -> u64 {
        self.history.iter().map(|m| m.crimes).sum()
    }

    pub fn total_spawned(&self) -> u64 {
        self.history.iter().map(|m| m.spawned as u64).sum()
    }

    pub fn peak_offenders(&self) -> usize {
        self.history.iter().map(|m| m.offenders).max().unwrap_or(0)
    }

    pub fn into_parts(self) -> (Vec<TickMetrics>, Vec<AttractivenessMap>) {
        (self.history, self.maps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use rand::rngs::mock::StepRng;

    fn state() -> SimulationState {
        SimulationState::initialize(SimulationConfig {
            width: 3,
            height: 3,
            delta: 0.1,
            omega: 0.1,
            theta: 5.0,
            mu: 0.2,
            gamma: 0.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_sample_reflects_committed_crimes() {
        let mut state = state();
        state.spawn_offender_at(Cell::new(1, 1)).unwrap();
        let mut collector = MetricsCollector::new();
        collector.record_initial(&state);

        let report = state.tick_with_rng(&mut StepRng::new(0, 0), &mut StepRng::new(u64::MAX, 0));
        let row = collector.record(&state, &report).clone();

        assert_eq!(row.tick, 1);
        assert_eq!(row.crimes, 1);
        assert_eq!(row.offenders, 0);
        assert_eq!(row.removed, 1);
        assert_eq!(collector.history().len(), 2);
        assert_eq!(collector.history()[0].offenders, 1);
        assert_eq!(collector.total_crimes(), 1);
        assert_eq!(collector.peak_offenders(), 1);
    }

    #[test]
    fn test_max_position_follows_hotspot() {
        let mut state = state();
        state.spawn_offender_at(Cell::new(2, 1)).unwrap();
        let mut collector = MetricsCollector::new();

        let mut zeros = StepRng::new(0, 0);
        let mut agent_ones = StepRng::new(u64::MAX, 0);
        let mut spawn_ones = StepRng::new(u64::MAX, 0);
        let report = state.tick_with_rng(&mut zeros, &mut spawn_ones);
        collector.record(&state, &report);
        let report = state.tick_with_rng(&mut agent_ones, &mut spawn_ones);
        let row = collector.record(&state, &report).clone();

        assert_eq!(collector.latest(), Some(&row));
        assert_eq!(row.max_position, Cell::new(2, 1));
        assert!(row.max_attractiveness > row.mean_attractiveness);
        assert!((row.min_attractiveness - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_map_interval() {
        let mut state = state();
        let mut collector = MetricsCollector::with_map_interval(2);
        collector.record_initial(&state);
        for _ in 0..5 {
            let report = state.tick();
            collector.record(&state, &report);
        }

        let ticks: Vec<_> = collector.maps().iter().map(|m| m.tick).collect();
        assert_eq!(ticks, vec![0, 2, 4]);
        let map = &collector.maps()[0];
        assert_eq!(map.values.len(), 9);
        assert_eq!(map.get(Cell::new(2, 2)), Some(0.2));
        assert_eq!(map.get(Cell::new(3, 0)), None);
    }

    #[test]
    fn test_zero_interval_disables_maps() {
        let mut state = state();
        let mut collector = MetricsCollector::with_map_interval(0);
        collector.record_initial(&state);
        let report = state.tick();
        collector.record(&state, &report);
        assert!(collector.maps().is_empty());
    }
}
