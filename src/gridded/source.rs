//! Loading gridded datasets.

use crate::gridded::error::GriddedDataError;
use crate::types::gridded_field::GriddedField;
use std::path::{Path, PathBuf};

/// One data variable of a dataset. A variable that failed to load carries its error so the
/// rest of the file can still be processed.
#[derive(Debug)]
pub struct LoadedVariable {
    pub name: String,
    pub field: Result<GriddedField, GriddedDataError>,
}

/// Every data variable found in one file. Coordinate variables are not listed.
#[derive(Debug)]
pub struct GriddedDataset {
    pub path: PathBuf,
    pub variables: Vec<LoadedVariable>,
}

impl GriddedDataset {
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }
}

/// Opens a gridded file. Failing to open the file at all is an error; failing to read an
/// individual variable is reported inside the returned dataset.
pub trait GriddedSource {
    fn open(&self, path: &Path) -> Result<GriddedDataset, GriddedDataError>;
}

/// Used when the crate is built without NetCDF support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSource;

impl GriddedSource for UnsupportedSource {
    fn open(&self, path: &Path) -> Result<GriddedDataset, GriddedDataError> {
        std::fs::metadata(path)
            .map_err(|e| GriddedDataError::FileUnavailable(path.to_path_buf(), e))?;
        Err(GriddedDataError::Unsupported(path.to_path_buf()))
    }
}

/// The reader for this build: NetCDF when the `netcdf` feature is on.
pub fn default_source() -> Box<dyn GriddedSource> {
    #[cfg(feature = "netcdf")]
    {
        Box::new(crate::gridded::netcdf_source::NetcdfSource)
    }
    #[cfg(not(feature = "netcdf"))]
    {
        Box::new(UnsupportedSource)
    }
}
