use crate::types::daily_record::{DailyRecord, StationSeries};
use crate::types::yearly::YearlyAggregate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Daily maximum (°C) at or above which a day counts as a hot day.
pub const HOT_DAY_THRESHOLD: f64 = 30.0;
/// Daily minimum (°C) at or above which a night counts as a tropical night.
pub const TROPICAL_NIGHT_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtremeThresholds {
    pub hot_day: f64,
    pub tropical_night: f64,
}

impl Default for ExtremeThresholds {
    fn default() -> Self {
        Self {
            hot_day: HOT_DAY_THRESHOLD,
            tropical_night: TROPICAL_NIGHT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExtremeCounts {
    pub hot_days: u32,
    pub tropical_nights: u32,
}

impl AddAssign for ExtremeCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.hot_days += rhs.hot_days;
        self.tropical_nights += rhs.tropical_nights;
    }
}

/// Classifies a single day: each count is 1 when its threshold is met, otherwise 0.
pub fn classify(record: &DailyRecord, thresholds: &ExtremeThresholds) -> ExtremeCounts {
    ExtremeCounts {
        hot_days: u32::from(record.tmax >= thresholds.hot_day),
        tropical_nights: u32::from(record.tmin >= thresholds.tropical_night),
    }
}

/// Hot days and tropical nights per year, using the standard 30 °C / 20 °C thresholds.
pub fn compute_yearly_extremes(series: &StationSeries) -> YearlyAggregate<ExtremeCounts> {
    compute_yearly_extremes_with(series, &ExtremeThresholds::default())
}

/// Sums the daily classifications per year. Every year present in the series gets an
/// entry, including years with zero extreme days.
pub fn compute_yearly_extremes_with(
    series: &StationSeries,
    thresholds: &ExtremeThresholds,
) -> YearlyAggregate<ExtremeCounts> {
    let mut per_year: BTreeMap<i32, ExtremeCounts> = BTreeMap::new();
    for record in series.records() {
        *per_year.entry(record.year()).or_default() += classify(record, thresholds);
    }
    per_year.into_iter().collect()
}
