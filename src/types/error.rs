use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DataModelError {
    #[error("Timestamps must be strictly increasing; sample {index} is not after its predecessor")]
    NonIncreasingTime { index: usize },

    #[error("Duplicate date {0} in station series")]
    DuplicateDate(NaiveDate),

    #[error("Time axis has {times} entries but {values} values were supplied")]
    LengthMismatch { times: usize, values: usize },

    #[error("Field '{field}' has {axes} axes but its data has {ndim} dimensions")]
    AxisCountMismatch {
        field: String,
        axes: usize,
        ndim: usize,
    },

    #[error("Axis '{axis}' has {values} coordinate values but the data extent is {extent}")]
    AxisLengthMismatch {
        axis: String,
        values: usize,
        extent: usize,
    },

    #[error("Could not resolve '{0}' to a calendar date")]
    UnresolvableDate(String),

    #[error("Reference period start {start} lies after its end {end}")]
    InvalidReferencePeriod { start: NaiveDate, end: NaiveDate },
}
