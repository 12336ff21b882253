//! Centered running means with partial windows at the series edges.
//!
//! For a window `w`, the output at index `i` averages the present input values in
//! `[i - floor((w-1)/2), i + ceil((w-1)/2)]`, clamped to the valid index range. Near the
//! edges fewer samples are available and the mean is taken over those alone (a minimum of
//! one period), so edge values are less smoothed than interior ones.

use crate::analysis::error::AnalysisError;
use crate::types::gridded_field::GriddedField;
use crate::types::series::TimeSeries;
use ndarray::{ArrayD, Axis as ArrayAxis};
use std::ops::Range;

/// A time series produced by [`running_mean`]. Threshold crossings are only ever searched
/// on smoothed data, so [`crate::first_crossing`] takes this type rather than a raw series.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSeries<T> {
    series: TimeSeries<T>,
    window: usize,
}

impl<T> SmoothedSeries<T> {
    pub fn series(&self) -> &TimeSeries<T> {
        &self.series
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn into_series(self) -> TimeSeries<T> {
        self.series
    }

    /// Wraps a series unchanged, as a running mean with a window of 1 would.
    pub fn identity(series: TimeSeries<T>) -> Self {
        Self { series, window: 1 }
    }
}

/// The clamped index range averaged for output index `index`.
pub fn centered_window_bounds(index: usize, len: usize, window: usize) -> Range<usize> {
    let span = window.saturating_sub(1);
    let before = span / 2;
    let after = span - before;
    let start = index.saturating_sub(before);
    let end = (index + after + 1).min(len);
    start..end
}

/// Centered rolling mean over an ordered buffer. Missing values are skipped; a window with
/// no present value yields `None`.
pub fn centered_rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window <= 1 {
        return values.to_vec();
    }

    (0..values.len())
        .map(|i| {
            let (sum, count) = values[centered_window_bounds(i, values.len(), window)]
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            (count > 0).then(|| sum / count as f64)
        })
        .collect()
}

/// Smooths `series` with a centered running mean of `window` samples.
///
/// # Errors
///
/// [`AnalysisError::InvalidWindow`] when `window` is 0. A window of 1 returns the series
/// unchanged.
pub fn running_mean<T: Copy + PartialOrd>(
    series: &TimeSeries<T>,
    window: usize,
) -> Result<SmoothedSeries<T>, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::InvalidWindow(window));
    }
    let smoothed = centered_rolling_mean(&series.values(), window);
    Ok(SmoothedSeries {
        series: series.with_values(smoothed),
        window,
    })
}

/// Applies the same running mean to every lane of `field` along `time_axis`.
pub fn running_mean_along(
    field: &GriddedField,
    time_axis: usize,
    window: usize,
) -> Result<GriddedField, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::InvalidWindow(window));
    }
    if time_axis >= field.ndim() {
        return Err(AnalysisError::AxisOutOfRange {
            axis: time_axis,
            ndim: field.ndim(),
        });
    }

    let mut data: ArrayD<Option<f64>> = field.data().clone();
    for mut lane in data.lanes_mut(ArrayAxis(time_axis)) {
        let values: Vec<Option<f64>> = lane.iter().copied().collect();
        for (slot, smoothed) in lane.iter_mut().zip(centered_rolling_mean(&values, window)) {
            *slot = smoothed;
        }
    }
    Ok(GriddedField::new(field.name(), field.axes().to_vec(), data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::gridded_field::Axis;
    use approx::assert_abs_diff_eq;
    use ndarray::IxDyn;

    fn series(values: &[f64]) -> TimeSeries<i32> {
        let times: Vec<i32> = (0..values.len() as i32).collect();
        let values: Vec<Option<f64>> = values.iter().map(|v| Some(*v)).collect();
        TimeSeries::from_parts(&times, &values).unwrap()
    }

    #[test]
    fn test_window_bounds() {
        // Odd window: symmetric.
        assert_eq!(centered_window_bounds(5, 20, 3), 4..7);
        // Even window: one extra sample after the centre.
        assert_eq!(centered_window_bounds(5, 20, 4), 4..8);
        assert_eq!(centered_window_bounds(5, 20, 10), 1..11);
        // Clamped at both ends.
        assert_eq!(centered_window_bounds(0, 3, 10), 0..3);
        assert_eq!(centered_window_bounds(2, 3, 10), 0..3);
        assert_eq!(centered_window_bounds(0, 5, 1), 0..1);
    }

    #[test]
    fn test_short_series_with_wide_window() -> Result<(), AnalysisError> {
        let smoothed = running_mean(&series(&[1.0, 2.0, 6.0]), 10)?;
        let values = smoothed.series().values();
        assert_eq!(values.len(), 3);
        for value in values {
            assert_abs_diff_eq!(value.unwrap(), 3.0);
        }
        Ok(())
    }

    #[test]
    fn test_edges_use_partial_windows() -> Result<(), AnalysisError> {
        let smoothed = running_mean(&series(&[0.0, 3.0, 6.0, 9.0, 12.0]), 3)?;
        let values: Vec<f64> = smoothed.series().values().into_iter().flatten().collect();
        assert_eq!(values, vec![1.5, 3.0, 6.0, 9.0, 10.5]);
        assert_eq!(smoothed.window(), 3);
        Ok(())
    }

    #[test]
    fn test_even_window_is_right_leaning() -> Result<(), AnalysisError> {
        let smoothed = running_mean(&series(&[0.0, 2.0, 4.0, 6.0]), 2)?;
        let values: Vec<f64> = smoothed.series().values().into_iter().flatten().collect();
        assert_eq!(values, vec![1.0, 3.0, 5.0, 6.0]);
        Ok(())
    }

    #[test]
    fn test_window_of_one_is_identity() -> Result<(), AnalysisError> {
        let input = series(&[5.0, -1.0, 3.0]);
        let smoothed = running_mean(&input, 1)?;
        assert_eq!(smoothed.series(), &input);
        assert_eq!(SmoothedSeries::identity(input.clone()).into_series(), input);
        Ok(())
    }

    #[test]
    fn test_zero_window_is_rejected() {
        assert_eq!(
            running_mean(&series(&[1.0]), 0),
            Err(AnalysisError::InvalidWindow(0))
        );
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let values = [Some(1.0), None, Some(3.0), None, None, None];
        let smoothed = centered_rolling_mean(&values, 3);
        assert_eq!(smoothed, vec![Some(1.0), Some(2.0), Some(3.0), Some(3.0), None, None]);
    }

    #[test]
    fn test_infinite_value_stays_in_its_windows() {
        let values = [Some(f64::INFINITY), Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let smoothed = centered_rolling_mean(&values, 3);
        assert_eq!(smoothed[0], Some(f64::INFINITY));
        assert_eq!(smoothed[1], Some(f64::INFINITY));
        assert_eq!(&smoothed[2..], &[Some(2.0), Some(3.0), Some(3.5)]);
    }

    #[test]
    fn test_timestamps_are_preserved() -> Result<(), AnalysisError> {
        let input = TimeSeries::from_parts(&[1850.5, 1851.5, 1852.5], &[Some(1.0), Some(2.0), Some(3.0)])?;
        let smoothed = running_mean(&input, 2)?;
        assert_eq!(smoothed.series().times(), input.times());
        Ok(())
    }

    #[test]
    fn test_running_mean_along_field_axis() -> Result<(), AnalysisError> {
        let data = ArrayD::from_shape_vec(
            IxDyn(&[3, 2]),
            vec![Some(0.0), Some(10.0), Some(3.0), Some(20.0), Some(6.0), Some(30.0)],
        )
        .unwrap();
        let field = GriddedField::new(
            "ta",
            vec![Axis::new("time", vec![0.0, 1.0, 2.0]), Axis::new("plev", vec![850.0, 500.0])],
            data,
        )?;
        let smoothed = running_mean_along(&field, 0, 3)?;
        assert_eq!(smoothed.data()[IxDyn(&[0, 0])], Some(1.5));
        assert_eq!(smoothed.data()[IxDyn(&[1, 1])], Some(20.0));
        assert_eq!(smoothed.data()[IxDyn(&[2, 1])], Some(25.0));
        assert!(running_mean_along(&field, 2, 3).is_err());
        Ok(())
    }
}
