use crate::types::error::DataModelError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationDataError {
    #[error("Station file '{0}' is missing or unreadable")]
    FileUnavailable(PathBuf, #[source] std::io::Error),

    #[error("Failed to read CSV data from '{0}'")]
    Csv(PathBuf, #[source] PolarsError),

    #[error("No {field} column in '{path}'. Expected one of {candidates:?}, found {found:?}")]
    MissingColumn {
        path: PathBuf,
        field: &'static str,
        candidates: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to read column '{column}' from '{path}'")]
    ColumnRead {
        path: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error(transparent)]
    DataModel(#[from] DataModelError),
}
