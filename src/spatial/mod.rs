pub mod grid;
pub mod occupancy;

pub use grid::{Lattice, Neighbors};
pub use occupancy::OccupancyIndex;
