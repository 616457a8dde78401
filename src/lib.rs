//! Burglary Sim - self-exciting residential burglary on a lattice

pub mod core;
pub mod entity;
pub mod simulation;
pub mod spatial;

pub use crate::core::{BoundaryPolicy, BurglaryError, Cell, LaplacianDegree, OffenderId, Result, SimulationConfig};
pub use simulation::{initialize, simulate, SimulationOutput, SimulationState, TickReport};
