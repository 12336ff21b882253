use crate::types::error::DataModelError;
use serde::Serialize;
use std::cmp::Ordering;

/// One time-stamped measurement. `value` is `None` when the measurement is missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample<T> {
    pub time: T,
    pub value: Option<f64>,
}

impl<T> Sample<T> {
    pub fn new(time: T, value: Option<f64>) -> Self {
        Self { time, value }
    }
}

/// An ordered sequence of [`Sample`]s of a single variable.
///
/// Timestamps are strictly increasing; construction fails otherwise. The timestamp type is
/// generic: station data uses `NaiveDate`, gridded data uses the raw numeric time coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries<T> {
    samples: Vec<Sample<T>>,
}

impl<T> TimeSeries<T> {
    /// Wraps samples whose order the caller already guarantees.
    pub(crate) fn from_ordered(samples: Vec<Sample<T>>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample<T>] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<T: Copy> TimeSeries<T> {
    pub fn times(&self) -> Vec<T> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

impl<T: Copy + PartialOrd> TimeSeries<T> {
    /// # Errors
    ///
    /// Returns [`DataModelError::NonIncreasingTime`] if a sample's time is not strictly
    /// greater than the previous one.
    pub fn new(samples: Vec<Sample<T>>) -> Result<Self, DataModelError> {
        if let Some(index) = samples
            .windows(2)
            .position(|pair| pair[0].time.partial_cmp(&pair[1].time) != Some(Ordering::Less))
        {
            return Err(DataModelError::NonIncreasingTime { index: index + 1 });
        }
        Ok(Self { samples })
    }

    /// Zips a time axis with its values.
    pub fn from_parts(times: &[T], values: &[Option<f64>]) -> Result<Self, DataModelError> {
        if times.len() != values.len() {
            return Err(DataModelError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        Self::new(
            times
                .iter()
                .zip(values)
                .map(|(&time, &value)| Sample::new(time, value))
                .collect(),
        )
    }

    /// Builds a series on the same time axis with replaced values.
    /// `values` must have exactly one entry per sample.
    pub(crate) fn with_values(&self, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(values.len(), self.samples.len());
        Self {
            samples: self
                .samples
                .iter()
                .zip(values)
                .map(|(s, value)| Sample::new(s.time, value))
                .collect(),
        }
    }
}
