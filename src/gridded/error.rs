use crate::types::error::DataModelError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GriddedDataError {
    #[error("Gridded file '{0}' is missing or unreadable")]
    FileUnavailable(PathBuf, #[source] std::io::Error),

    #[error("Variable '{variable}' not found in '{path}'")]
    MissingVariable { path: PathBuf, variable: String },

    #[error("NetCDF error in '{path}': {reason}")]
    Netcdf { path: PathBuf, reason: String },

    #[error("Cannot read '{0}': this build has no NetCDF support (enable the `netcdf` feature)")]
    Unsupported(PathBuf),

    #[error("Unrecognised time units '{0}'")]
    InvalidTimeUnits(String),

    #[error(transparent)]
    DataModel(#[from] DataModelError),
}
