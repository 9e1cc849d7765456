//! Error types for heat parsing, palettes and sheet rendering

use thiserror::Error;

/// Failures of the heat color mapper's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeatError {
    #[error("invalid heat value: {0:?}")]
    InvalidHeatValue(String),

    #[error("palette color {name} is not a #RRGGBB hex color: {value:?}")]
    InvalidPaletteColor { name: String, value: String },

    #[error("palette property {0} is not defined")]
    MissingPaletteProperty(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Heat(#[from] HeatError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
