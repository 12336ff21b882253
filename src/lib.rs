//! Climate statistics from station and gridded temperature data: reference-period
//! climatologies, seasonal anomalies, extreme-day counts, area-weighted global means,
//! running means and threshold crossings.

mod analysis;
mod error;
mod frame;
mod gridded;
mod pipeline;
#[cfg(feature = "plotting")]
mod plotting;
mod station_data;
mod types;
mod utils;

pub use error::ClimastatError;

pub use types::daily_record::{Channel, DailyRecord, StationSeries};
pub use types::error::DataModelError;
pub use types::gridded_field::{Axis, GriddedField};
pub use types::period::{AnyDate, Month, ReferencePeriod, StartEndDate, Year};
pub use types::series::{Sample, TimeSeries};
pub use types::yearly::{TemperatureStats, YearlyAggregate};

pub use analysis::climatology::*;
pub use analysis::coordinates::*;
pub use analysis::crossing::*;
pub use analysis::error::AnalysisError;
pub use analysis::extremes::*;
pub use analysis::monthly_stats::*;
pub use analysis::smoothing::*;
pub use analysis::spatial::{
    area_weights, broadcast_weights, global_mean, global_mean_with, spatial_mean, time_mean,
    GlobalMean,
};

pub use station_data::column_mapping::{ColumnMapping, StationField};
pub use station_data::data_loader::StationDataLoader;
pub use station_data::error::StationDataError;

pub use gridded::error::GriddedDataError;
#[cfg(feature = "netcdf")]
pub use gridded::netcdf_source::NetcdfSource;
pub use gridded::packing::{is_coordinate_variable, Packing};
pub use gridded::source::{
    default_source, GriddedDataset, GriddedSource, LoadedVariable, UnsupportedSource,
};
pub use gridded::time_units::{TimeUnit, TimeUnits};

pub use pipeline::gridded::*;
pub use pipeline::station::*;

pub use frame::*;
#[cfg(feature = "plotting")]
pub use plotting::*;
