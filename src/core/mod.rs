pub mod config;
pub mod error;
pub mod types;

pub use config::{BoundaryPolicy, LaplacianDegree, SimulationConfig};
pub use error::{BurglaryError, Result};
pub use types::{Cell, OffenderId, Tick};
