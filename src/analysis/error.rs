use crate::types::error::DataModelError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("Field '{field}' has no time axis. Found axes: {axes:?}")]
    CoordinateNotFound { field: String, axes: Vec<String> },

    #[error("Field '{0}' lost its time axis and cannot be smoothed along time")]
    MissingTimeAxis(String),

    #[error("Latitude {0} lies outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Latitude axis is empty")]
    EmptyAxis,

    #[error("Area weights have a zero or non-finite mean")]
    DegenerateWeights,

    #[error("Running mean window must be at least 1, got {0}")]
    InvalidWindow(usize),

    #[error("Axis index {axis} is out of range for a field with {ndim} dimensions")]
    AxisOutOfRange { axis: usize, ndim: usize },

    #[error(transparent)]
    DataModel(#[from] DataModelError),
}
