//! Latitude-weighted spatial averaging of gridded fields.

use crate::analysis::coordinates::{resolve_axes, CoordinateResolver, ResolvedAxes, SubstringResolver};
use crate::analysis::error::AnalysisError;
use crate::types::gridded_field::{Axis, GriddedField};
use crate::types::series::TimeSeries;
use log::{debug, warn};
use ndarray::{ArrayD, Dimension, IxDyn, Zip};

/// Result of [`global_mean`].
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalMean {
    /// Area-weighted mean over latitude and longitude of a `(time, lat, lon)` field.
    Series(TimeSeries<f64>),
    /// Area-weighted mean over latitude and longitude, with the remaining axes (time plus
    /// any others) kept in place.
    Field(GriddedField),
    /// The field has no latitude or longitude axis, so it was averaged over time instead
    /// and no spatial averaging took place.
    TimeMean(GriddedField),
}

/// Cosine-of-latitude weights normalised so that their mean is exactly 1.
///
/// # Errors
///
/// - [`AnalysisError::EmptyAxis`] when `latitudes` is empty.
/// - [`AnalysisError::LatitudeOutOfRange`] for values outside [-90, 90].
/// - [`AnalysisError::DegenerateWeights`] when the raw weights sum to zero. A pole-only
///   axis still has tiny positive cosines, so it gets uniform weights of 1.
pub fn area_weights(latitudes: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    if latitudes.is_empty() {
        return Err(AnalysisError::EmptyAxis);
    }
    if let Some(&bad) = latitudes.iter().find(|lat| !(-90.0..=90.0).contains(*lat)) {
        return Err(AnalysisError::LatitudeOutOfRange(bad));
    }

    let weights: Vec<f64> = latitudes.iter().map(|lat| lat.to_radians().cos()).collect();
    let mean = weights.iter().sum::<f64>() / weights.len() as f64;
    if mean == 0.0 || !mean.is_finite() {
        return Err(AnalysisError::DegenerateWeights);
    }
    Ok(weights.into_iter().map(|w| w / mean).collect())
}

/// Expands latitude weights to the full `shape`, varying only along `lat_axis`.
pub fn broadcast_weights(
    weights: &[f64],
    shape: &[usize],
    lat_axis: usize,
) -> Result<ArrayD<f64>, AnalysisError> {
    if lat_axis >= shape.len() {
        return Err(AnalysisError::AxisOutOfRange {
            axis: lat_axis,
            ndim: shape.len(),
        });
    }
    let mut column_shape = vec![1; shape.len()];
    column_shape[lat_axis] = weights.len();
    let column = ArrayD::from_shape_vec(IxDyn(&column_shape), weights.to_vec()).map_err(|_| {
        AnalysisError::AxisOutOfRange {
            axis: lat_axis,
            ndim: shape.len(),
        }
    })?;
    let broadcast = column
        .broadcast(IxDyn(shape))
        .ok_or(AnalysisError::AxisOutOfRange {
            axis: lat_axis,
            ndim: shape.len(),
        })?;
    Ok(broadcast.to_owned())
}

/// Mean of `data` (optionally multiplied by `weights`) over the `reduced` axes.
///
/// Missing cells are skipped: each output cell is Σ(x·w) divided by the number of present
/// cells that contributed. Output cells with no present input are `None`.
fn reduce_mean(
    data: &ArrayD<Option<f64>>,
    weights: Option<&ArrayD<f64>>,
    reduced: &[usize],
) -> ArrayD<Option<f64>> {
    let out_shape: Vec<usize> = data
        .shape()
        .iter()
        .enumerate()
        .filter(|(axis, _)| !reduced.contains(axis))
        .map(|(_, &extent)| extent)
        .collect();
    let mut sums = ArrayD::<f64>::zeros(IxDyn(&out_shape));
    let mut counts = ArrayD::<usize>::zeros(IxDyn(&out_shape));

    let mut out_index = vec![0usize; out_shape.len()];
    for (index, value) in data.indexed_iter() {
        let Some(value) = value else {
            continue;
        };
        let weight = weights.map_or(1.0, |w| w[index.clone()]);
        let mut k = 0;
        for axis in 0..index.ndim() {
            if !reduced.contains(&axis) {
                out_index[k] = index[axis];
                k += 1;
            }
        }
        sums[IxDyn(&out_index)] += value * weight;
        counts[IxDyn(&out_index)] += 1;
    }

    Zip::from(&sums)
        .and(&counts)
        .map_collect(|&sum, &count| (count > 0).then(|| sum / count as f64))
}

fn kept_axes(field: &GriddedField, reduced: &[usize]) -> Vec<Axis> {
    field
        .axes()
        .iter()
        .enumerate()
        .filter(|(i, _)| !reduced.contains(i))
        .map(|(_, axis)| axis.clone())
        .collect()
}

/// Unweighted mean over the time axis.
pub fn time_mean(field: &GriddedField, time_axis: usize) -> Result<GriddedField, AnalysisError> {
    if time_axis >= field.ndim() {
        return Err(AnalysisError::AxisOutOfRange {
            axis: time_axis,
            ndim: field.ndim(),
        });
    }
    let data = reduce_mean(field.data(), None, &[time_axis]);
    Ok(GriddedField::new(
        field.name(),
        kept_axes(field, &[time_axis]),
        data,
    )?)
}

/// Latitude-weighted mean over the latitude and longitude axes. All other axes are kept.
pub fn spatial_mean(
    field: &GriddedField,
    lat_axis: usize,
    lon_axis: usize,
) -> Result<GriddedField, AnalysisError> {
    let latitudes = field
        .axis(lat_axis)
        .ok_or(AnalysisError::AxisOutOfRange {
            axis: lat_axis,
            ndim: field.ndim(),
        })?;
    if lon_axis >= field.ndim() {
        return Err(AnalysisError::AxisOutOfRange {
            axis: lon_axis,
            ndim: field.ndim(),
        });
    }
    let weights = area_weights(&latitudes.values)?;
    let broadcast = broadcast_weights(&weights, field.data().shape(), lat_axis)?;

    let reduced = [lat_axis, lon_axis];
    let data = reduce_mean(field.data(), Some(&broadcast), &reduced);
    Ok(GriddedField::new(field.name(), kept_axes(field, &reduced), data)?)
}

/// Area-weighted global mean using the default substring axis detection.
pub fn global_mean(field: &GriddedField) -> Result<GlobalMean, AnalysisError> {
    global_mean_with(field, &SubstringResolver)
}

/// Area-weighted global mean with a caller-supplied axis resolver.
///
/// # Errors
///
/// [`AnalysisError::CoordinateNotFound`] if the field has no time axis, plus any error from
/// [`area_weights`].
pub fn global_mean_with(
    field: &GriddedField,
    resolver: &(impl CoordinateResolver + ?Sized),
) -> Result<GlobalMean, AnalysisError> {
    let axes = resolve_axes(field, resolver)?;
    global_mean_for_axes(field, &axes)
}

pub(crate) fn global_mean_for_axes(
    field: &GriddedField,
    axes: &ResolvedAxes,
) -> Result<GlobalMean, AnalysisError> {
    let Some((lat_axis, lon_axis)) = axes.horizontal() else {
        warn!(
            "'{}' has no latitude/longitude axes; averaging over time instead",
            field.name()
        );
        return Ok(GlobalMean::TimeMean(time_mean(field, axes.time)?));
    };

    let reduced = spatial_mean(field, lat_axis, lon_axis)?;
    if reduced.ndim() != 1 {
        debug!(
            "'{}' keeps {} axes after spatial averaging: {:?}",
            field.name(),
            reduced.ndim(),
            reduced.axis_names()
        );
        return Ok(GlobalMean::Field(reduced));
    }

    let time = &field.axes()[axes.time];
    let values: Vec<Option<f64>> = reduced.data().iter().copied().collect();
    Ok(GlobalMean::Series(TimeSeries::from_parts(
        &time.values,
        &values,
    )?))
}
