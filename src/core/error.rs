use thiserror::Error;

use crate::core::types::Cell;

#[derive(Error, Debug)]
pub enum BurglaryError {
    #[error("Grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("Grid dimensions {width}x{height} overflow the cell count")]
    GridTooLarge { width: usize, height: usize },

    #[error("delta must be positive and finite, got {0}")]
    NonPositiveDelta(f64),

    #[error("base_attractiveness must be non-negative and finite, got {0}")]
    NegativeAttractiveness(f64),

    #[error("{name} is out of range, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Cell {cell} is outside the {width}x{height} lattice")]
    CellOutOfBounds {
        cell: Cell,
        width: usize,
        height: usize,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BurglaryError>;
