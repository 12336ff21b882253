use crate::gridded::error::GriddedDataError;
use crate::gridded::packing::{is_coordinate_variable, Packing};
use crate::gridded::source::{GriddedDataset, GriddedSource, LoadedVariable};
use crate::types::gridded_field::{Axis, GriddedField};
use log::{debug, info, warn};
use ndarray::{ArrayD, IxDyn};
use netcdf::AttributeValue;
use std::path::Path;

/// Reads every data variable of a NetCDF file into a [`GriddedField`].
///
/// Axis coordinates come from the variable named after each dimension; dimensions without
/// one are indexed `0..len`. `_FillValue`, `missing_value` and non-finite cells become `None`, and
/// `scale_factor`/`add_offset` are applied to the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfSource;

impl GriddedSource for NetcdfSource {
    fn open(&self, path: &Path) -> Result<GriddedDataset, GriddedDataError> {
        std::fs::metadata(path)
            .map_err(|e| GriddedDataError::FileUnavailable(path.to_path_buf(), e))?;
        let file = netcdf::open(path).map_err(|e| netcdf_error(path, e))?;

        let variables: Vec<LoadedVariable> = file
            .variables()
            .filter(|var| {
                let dimensions: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
                !is_coordinate_variable(&var.name(), &dimensions)
            })
            .map(|var| {
                let name = var.name();
                debug!("Reading variable '{}' from {:?}", name, path);
                LoadedVariable {
                    field: read_field(&file, &var, path),
                    name,
                }
            })
            .collect();

        info!(
            "Opened {:?} with {} data variable(s)",
            path,
            variables.len()
        );
        Ok(GriddedDataset {
            path: path.to_path_buf(),
            variables,
        })
    }
}

fn netcdf_error(path: &Path, e: netcdf::Error) -> GriddedDataError {
    GriddedDataError::Netcdf {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn read_field(
    file: &netcdf::File,
    var: &netcdf::Variable,
    path: &Path,
) -> Result<GriddedField, GriddedDataError> {
    let axes: Vec<Axis> = var
        .dimensions()
        .iter()
        .map(|dim| read_axis(file, &dim.name(), dim.len(), path))
        .collect::<Result<_, _>>()?;
    let shape: Vec<usize> = axes.iter().map(Axis::len).collect();

    let raw = var
        .get_values::<f64, _>(..)
        .map_err(|e| netcdf_error(path, e))?;
    let packing = Packing {
        fill_values: ["_FillValue", "missing_value"]
            .iter()
            .filter_map(|attr| numeric_attribute(var, attr))
            .collect(),
        scale: numeric_attribute(var, "scale_factor").unwrap_or(1.0),
        offset: numeric_attribute(var, "add_offset").unwrap_or(0.0),
    };
    let values = packing.decode_all(&raw);
    let missing = values.iter().filter(|v| v.is_none()).count();
    if missing > 0 {
        debug!("'{}' has {} missing cell(s)", var.name(), missing);
    }

    let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
        GriddedDataError::Netcdf {
            path: path.to_path_buf(),
            reason: format!("'{}' does not match its dimensions: {e}", var.name()),
        }
    })?;
    Ok(GriddedField::new(var.name(), axes, data)?)
}

fn read_axis(
    file: &netcdf::File,
    name: &str,
    len: usize,
    path: &Path,
) -> Result<Axis, GriddedDataError> {
    let Some(coordinate) = file.variable(name) else {
        return Ok(Axis::indexed(name, len));
    };
    let values = match coordinate.get_values::<f64, _>(..) {
        Ok(values) if values.len() == len => values,
        Ok(values) => {
            warn!(
                "Coordinate '{}' in {:?} has {} values for a dimension of {}; using indices",
                name,
                path,
                values.len(),
                len
            );
            return Ok(Axis::indexed(name, len));
        }
        Err(e) => return Err(netcdf_error(path, e)),
    };

    let axis = Axis::new(name, values);
    Ok(match string_attribute(&coordinate, "units") {
        Some(units) => axis.with_units(units),
        None => axis,
    })
}

fn numeric_attribute(var: &netcdf::Variable, name: &str) -> Option<f64> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|f| f64::from(*f)),
        _ => None,
    }
}

fn string_attribute(var: &netcdf::Variable, name: &str) -> Option<String> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
