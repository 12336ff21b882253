//! Cleaned daily station observations.

use crate::types::error::DataModelError;
use crate::types::period::{AnyDate, ReferencePeriod};
use crate::types::series::{Sample, TimeSeries};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// One day of station data. Rows with any missing temperature are dropped at load time,
/// so every field here is present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub tmax: f64,  // tlmax
    pub tmin: f64,  // tlmin
    pub tmean: f64, // tl_mittel
}

impl DailyRecord {
    pub fn new(date: NaiveDate, tmax: f64, tmin: f64, tmean: f64) -> Self {
        Self {
            date,
            tmax,
            tmin,
            tmean,
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Max => self.tmax,
            Channel::Min => self.tmin,
            Channel::Mean => self.tmean,
        }
    }
}

/// One of the three temperature channels carried by a station record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    Max,
    Min,
    Mean,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Max, Channel::Min, Channel::Mean];

    pub fn column_name(&self) -> &'static str {
        match self {
            Channel::Max => "tmax",
            Channel::Min => "tmin",
            Channel::Mean => "tmean",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Max => "Max Temperature",
            Channel::Min => "Min Temperature",
            Channel::Mean => "Mean Temperature",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Daily station records ordered by strictly increasing date.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StationSeries {
    records: Vec<DailyRecord>,
}

impl StationSeries {
    /// # Errors
    ///
    /// [`DataModelError::DuplicateDate`] or [`DataModelError::NonIncreasingTime`] if the
    /// records are not strictly increasing by date.
    pub fn new(records: Vec<DailyRecord>) -> Result<Self, DataModelError> {
        for (index, pair) in records.windows(2).enumerate() {
            if pair[0].date == pair[1].date {
                return Err(DataModelError::DuplicateDate(pair[1].date));
            }
            if pair[0].date > pair[1].date {
                return Err(DataModelError::NonIncreasingTime { index: index + 1 });
            }
        }
        Ok(Self { records })
    }

    /// Sorts the records by date before validating them. Duplicate dates are still rejected.
    pub fn from_unsorted(mut records: Vec<DailyRecord>) -> Result<Self, DataModelError> {
        records.sort_by_key(|r| r.date);
        Self::new(records)
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(DailyRecord::year).collect()
    }

    /// Returns a new series holding only the records inside `period`.
    pub fn within(&self, period: &ReferencePeriod) -> StationSeries {
        StationSeries {
            records: self
                .records
                .iter()
                .filter(|r| period.contains(r.date))
                .copied()
                .collect(),
        }
    }

    /// Returns the records between the start of `start` and the end of `end`, inclusive.
    /// For example `get_range(Year(2000), Year(2001))` keeps 2000-01-01 through 2001-12-31.
    pub fn get_range(
        &self,
        start: impl AnyDate + fmt::Debug + Clone,
        end: impl AnyDate + fmt::Debug + Clone,
    ) -> Result<StationSeries, DataModelError> {
        Ok(self.within(&ReferencePeriod::new(start, end)?))
    }

    /// Returns the records covered by a single period such as a `Year` or `Month`.
    pub fn get_for_period(
        &self,
        period: impl AnyDate + fmt::Debug + Clone,
    ) -> Result<StationSeries, DataModelError> {
        self.get_range(period.clone(), period)
    }

    /// Extracts a single channel as a plain [`TimeSeries`].
    pub fn channel(&self, channel: Channel) -> TimeSeries<NaiveDate> {
        // Dates are already validated as strictly increasing.
        TimeSeries::from_ordered(
            self.records
                .iter()
                .map(|r| Sample::new(r.date, Some(r.get(channel))))
                .collect(),
        )
    }
}
