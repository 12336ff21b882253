pub mod error;
#[cfg(feature = "netcdf")]
pub mod netcdf_source;
pub mod packing;
pub mod source;
pub mod time_units;
