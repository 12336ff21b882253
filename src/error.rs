use crate::analysis::error::AnalysisError;
use crate::gridded::error::GriddedDataError;
use crate::station_data::error::StationDataError;
use crate::types::error::DataModelError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimastatError {
    #[error(transparent)]
    DataModel(#[from] DataModelError),

    #[error(transparent)]
    StationData(#[from] StationDataError),

    #[error(transparent)]
    GriddedData(#[from] GriddedDataError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to build a data frame")]
    Frame(#[from] PolarsError),

    #[error("Failed to serialize the report")]
    Json(#[from] serde_json::Error),
}
