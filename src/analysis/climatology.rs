//! Reference-period climatologies and the anomalies derived from them.
//!
//! The climatology for a calendar month is the mean of every daily observation that falls
//! in that month inside the reference window. Anomalies are computed per `(year, month)`
//! from monthly means and then averaged over the months of a [`Season`] for each year.
//!
//! Missing data never raises: an empty month yields `None` in the climatology, an anomaly
//! against a missing climatology value is `None`, and years with no observations in the
//! season are omitted from the seasonal aggregate.

use crate::types::daily_record::{Channel, DailyRecord, StationSeries};
use crate::types::period::ReferencePeriod;
use crate::types::yearly::{TemperatureStats, YearlyAggregate};
use crate::utils::MeanAccumulator;
use log::debug;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-channel accumulators for tmax, tmin and tmean.
#[derive(Debug, Default, Clone, Copy)]
struct StatsAccumulator {
    tmax: MeanAccumulator,
    tmin: MeanAccumulator,
    tmean: MeanAccumulator,
}

impl StatsAccumulator {
    fn push_record(&mut self, record: &DailyRecord) {
        self.tmax.push(record.tmax);
        self.tmin.push(record.tmin);
        self.tmean.push(record.tmean);
    }

    fn push_stats(&mut self, stats: &TemperatureStats) {
        self.tmax.push_opt(stats.tmax);
        self.tmin.push_opt(stats.tmin);
        self.tmean.push_opt(stats.tmean);
    }

    fn finish(&self) -> TemperatureStats {
        TemperatureStats {
            tmax: self.tmax.mean(),
            tmin: self.tmin.mean(),
            tmean: self.tmean.mean(),
        }
    }
}

/// Mean tmax/tmin/tmean for each calendar month over a reference window.
///
/// Always holds exactly twelve entries; months without reference observations carry
/// `None` values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceClimatology {
    period: ReferencePeriod,
    months: [TemperatureStats; 12],
    observations: [usize; 12],
}

impl ReferenceClimatology {
    pub fn period(&self) -> &ReferencePeriod {
        &self.period
    }

    /// The climatology of calendar month `month` (1-12).
    pub fn get(&self, month: u32) -> Option<&TemperatureStats> {
        let index = month.checked_sub(1)? as usize;
        self.months.get(index)
    }

    /// Number of daily observations behind the given month's means.
    pub fn observations(&self, month: u32) -> usize {
        month
            .checked_sub(1)
            .and_then(|i| self.observations.get(i as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Iterates `(month, stats)` for months 1 through 12.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &TemperatureStats)> + '_ {
        self.months
            .iter()
            .enumerate()
            .map(|(i, stats)| (i as u32 + 1, stats))
    }
}

/// Mean of one `(year, month)` over the full record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyMean {
    pub year: i32,
    pub month: u32,
    pub stats: TemperatureStats,
    pub observations: usize,
}

/// Difference between a `(year, month)` mean and the matching calendar-month climatology.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyAnomaly {
    pub year: i32,
    pub month: u32,
    pub anomaly: TemperatureStats,
}

/// A named set of calendar months within one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Season {
    pub name: &'static str,
    pub months: &'static [u32],
}

impl Season {
    /// Boreal summer.
    pub const JJA: Season = Season::new("JJA", &[6, 7, 8]);
    pub const MAM: Season = Season::new("MAM", &[3, 4, 5]);
    pub const SON: Season = Season::new("SON", &[9, 10, 11]);

    pub const fn new(name: &'static str, months: &'static [u32]) -> Self {
        Self { name, months }
    }

    pub fn contains(&self, month: u32) -> bool {
        self.months.contains(&month)
    }
}

impl Default for Season {
    fn default() -> Self {
        Season::JJA
    }
}

/// Computes the per-calendar-month climatology of the records inside `period`.
pub fn compute_climatology(
    series: &StationSeries,
    period: &ReferencePeriod,
) -> ReferenceClimatology {
    let mut accumulators = [StatsAccumulator::default(); 12];
    for record in series.records().iter().filter(|r| period.contains(r.date)) {
        accumulators[record.month() as usize - 1].push_record(record);
    }

    let months = accumulators.map(|acc| acc.finish());
    let observations = accumulators.map(|acc| acc.tmax.count());
    for (i, count) in observations.iter().enumerate() {
        if *count == 0 {
            debug!("No reference observations for month {} in {}", i + 1, period);
        }
    }

    ReferenceClimatology {
        period: *period,
        months,
        observations,
    }
}

/// Computes the mean of every `(year, month)` present in the series, in chronological order.
pub fn compute_monthly_means(series: &StationSeries) -> Vec<MonthlyMean> {
    let mut grouped: BTreeMap<(i32, u32), StatsAccumulator> = BTreeMap::new();
    for record in series.records() {
        grouped
            .entry((record.year(), record.month()))
            .or_default()
            .push_record(record);
    }

    grouped
        .into_iter()
        .map(|((year, month), acc)| MonthlyMean {
            year,
            month,
            stats: acc.finish(),
            observations: acc.tmax.count(),
        })
        .collect()
}

fn subtract(value: Option<f64>, reference: Option<f64>) -> Option<f64> {
    Some(value? - reference?)
}

/// Computes the anomaly of every `(year, month)` in the series against `climatology`.
pub fn monthly_anomalies(
    series: &StationSeries,
    climatology: &ReferenceClimatology,
) -> Vec<MonthlyAnomaly> {
    compute_monthly_means(series)
        .into_iter()
        .map(|monthly| {
            let reference = climatology
                .get(monthly.month)
                .copied()
                .unwrap_or_default();
            MonthlyAnomaly {
                year: monthly.year,
                month: monthly.month,
                anomaly: TemperatureStats {
                    tmax: subtract(monthly.stats.tmax, reference.tmax),
                    tmin: subtract(monthly.stats.tmin, reference.tmin),
                    tmean: subtract(monthly.stats.tmean, reference.tmean),
                },
            }
        })
        .collect()
}

/// Averages the monthly anomalies of the months in `season`, per year.
///
/// Each year's value is the mean over the season months actually present that year, so a
/// summer with only June and August is averaged over those two. Years without any
/// observation in the season are omitted. A year whose season months all lack a
/// climatology value is kept, with `None` anomalies.
pub fn compute_seasonal_anomalies(
    series: &StationSeries,
    climatology: &ReferenceClimatology,
    season: &Season,
) -> YearlyAggregate<TemperatureStats> {
    let mut per_year: BTreeMap<i32, StatsAccumulator> = BTreeMap::new();
    for monthly in monthly_anomalies(series, climatology)
        .iter()
        .filter(|m| season.contains(m.month))
    {
        per_year
            .entry(monthly.year)
            .or_default()
            .push_stats(&monthly.anomaly);
    }

    per_year
        .into_iter()
        .map(|(year, acc)| (year, acc.finish()))
        .collect()
}

/// Summer (JJA) anomalies per year.
pub fn compute_anomalies(
    series: &StationSeries,
    climatology: &ReferenceClimatology,
) -> YearlyAggregate<TemperatureStats> {
    compute_seasonal_anomalies(series, climatology, &Season::JJA)
}

/// The `n` years with the largest anomaly for `channel`, largest first. Years without a
/// value for the channel are ignored; ties keep chronological order.
pub fn hottest_years(
    anomalies: &YearlyAggregate<TemperatureStats>,
    channel: Channel,
    n: usize,
) -> Vec<(i32, f64)> {
    let mut ranked: Vec<(i32, f64)> = anomalies
        .iter()
        .filter_map(|(year, stats)| stats.get(channel).map(|v| (year, v)))
        .collect();
    ranked.sort_by_key(|(_, v)| std::cmp::Reverse(OrderedFloat(*v)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32, tmax: f64, tmin: f64) -> DailyRecord {
        DailyRecord::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            tmax,
            tmin,
            (tmax + tmin) / 2.0,
        )
    }

    /// Reference years 1991-2020 with a flat summer of tmax=25, tmin=15, plus one hotter July.
    fn graz_like_series() -> StationSeries {
        let mut records = Vec::new();
        for year in 1991..=2020 {
            for month in 6..=8 {
                for d in 1..=3 {
                    records.push(day(year, month, d, 25.0, 15.0));
                }
            }
        }
        for month in 6..=8 {
            let tmax = if month == 7 { 28.0 } else { 25.0 };
            for d in 1..=3 {
                records.push(day(2021, month, d, tmax, 15.0));
            }
        }
        StationSeries::new(records).unwrap()
    }

    #[test]
    fn test_climatology_has_twelve_months() -> Result<(), Box<dyn std::error::Error>> {
        let series = graz_like_series();
        let clim = compute_climatology(&series, &ReferencePeriod::years(1991, 2020)?);
        assert_eq!(clim.iter().count(), 12);
        assert_eq!(clim.iter().map(|(m, _)| m).collect::<Vec<_>>(), (1..=12).collect::<Vec<_>>());

        // January was never observed.
        let january = clim.get(1).unwrap();
        assert!(january.is_empty());
        assert_eq!(clim.observations(1), 0);

        let july = clim.get(7).unwrap();
        assert_abs_diff_eq!(july.tmax.unwrap(), 25.0);
        assert_abs_diff_eq!(july.tmin.unwrap(), 15.0);
        assert_abs_diff_eq!(july.tmean.unwrap(), 20.0);
        assert_eq!(clim.observations(7), 90);
        assert!(clim.get(13).is_none());
        assert!(clim.get(0).is_none());
        Ok(())
    }

    #[test]
    fn test_climatology_ignores_records_outside_window() -> Result<(), Box<dyn std::error::Error>> {
        let series = StationSeries::new(vec![
            day(1990, 12, 31, 100.0, 100.0),
            day(1991, 1, 1, 2.0, 0.0),
            day(1991, 1, 2, 4.0, 0.0),
            day(1992, 1, 1, 100.0, 100.0),
        ])?;
        let clim = compute_climatology(&series, &ReferencePeriod::years(1991, 1991)?);
        assert_abs_diff_eq!(clim.get(1).unwrap().tmax.unwrap(), 3.0);
        assert!(clim.get(12).unwrap().tmax.is_none());
        Ok(())
    }

    #[test]
    fn test_empty_reference_window_yields_missing_values() -> Result<(), Box<dyn std::error::Error>> {
        let series = graz_like_series();
        let clim = compute_climatology(&series, &ReferencePeriod::years(1900, 1910)?);
        assert!(clim.iter().all(|(_, stats)| stats.is_empty()));

        let anomalies = compute_anomalies(&series, &clim);
        // Years are still present because they have summer observations.
        assert_eq!(anomalies.len(), 31);
        assert!(anomalies.get(2021).unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn test_end_to_end_positive_july_anomaly() -> Result<(), Box<dyn std::error::Error>> {
        let series = graz_like_series();
        let clim = compute_climatology(&series, &ReferencePeriod::years(1991, 2020)?);

        let monthly = monthly_anomalies(&series, &clim);
        let july_2021 = monthly
            .iter()
            .find(|m| m.year == 2021 && m.month == 7)
            .unwrap();
        assert_abs_diff_eq!(july_2021.anomaly.tmax.unwrap(), 3.0);

        let summer = compute_anomalies(&series, &clim);
        let y2021 = summer.get(2021).unwrap();
        assert_abs_diff_eq!(y2021.tmax.unwrap(), 1.0);
        assert_abs_diff_eq!(y2021.tmin.unwrap(), 0.0);
        assert_abs_diff_eq!(y2021.tmean.unwrap(), 0.5);

        let y2000 = summer.get(2000).unwrap();
        assert_abs_diff_eq!(y2000.tmax.unwrap(), 0.0);
        Ok(())
    }

    #[test]
    fn test_partial_summer_uses_present_months_only() -> Result<(), Box<dyn std::error::Error>> {
        let series = StationSeries::new(vec![
            day(2000, 6, 1, 20.0, 10.0),
            day(2000, 7, 1, 20.0, 10.0),
            day(2000, 8, 1, 20.0, 10.0),
            day(2001, 6, 1, 22.0, 10.0),
            day(2001, 8, 1, 26.0, 10.0),
        ])?;
        let clim = compute_climatology(&series, &ReferencePeriod::years(2000, 2000)?);
        let summer = compute_anomalies(&series, &clim);
        // (2 + 6) / 2, not (2 + 6) / 3.
        assert_abs_diff_eq!(summer.get(2001).unwrap().tmax.unwrap(), 4.0);
        Ok(())
    }

    #[test]
    fn test_years_without_summer_are_omitted() -> Result<(), Box<dyn std::error::Error>> {
        let series = StationSeries::new(vec![
            day(2000, 7, 1, 20.0, 10.0),
            day(2001, 1, 1, 0.0, -5.0),
            day(2001, 12, 1, 1.0, -4.0),
            day(2002, 8, 1, 21.0, 11.0),
        ])?;
        let clim = compute_climatology(&series, &ReferencePeriod::years(2000, 2002)?);
        let summer = compute_anomalies(&series, &clim);
        assert_eq!(summer.years().collect::<Vec<_>>(), vec![2000, 2002]);
        assert!(!summer.contains(2001));
        Ok(())
    }

    #[test]
    fn test_anomalies_are_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let series = graz_like_series();
        let clim = compute_climatology(&series, &ReferencePeriod::years(1991, 2020)?);
        assert_eq!(compute_anomalies(&series, &clim), compute_anomalies(&series, &clim));
        Ok(())
    }

    #[test]
    fn test_custom_season() -> Result<(), Box<dyn std::error::Error>> {
        let series = StationSeries::new(vec![
            day(2000, 3, 1, 10.0, 0.0),
            day(2001, 3, 1, 12.0, 0.0),
            day(2001, 7, 1, 30.0, 0.0),
        ])?;
        let clim = compute_climatology(&series, &ReferencePeriod::years(2000, 2000)?);
        let spring = compute_seasonal_anomalies(&series, &clim, &Season::MAM);
        assert_abs_diff_eq!(spring.get(2001).unwrap().tmax.unwrap(), 2.0);
        assert_eq!(spring.len(), 2);
        Ok(())
    }

    #[test]
    fn test_hottest_years_ranking() {
        let anomalies: YearlyAggregate<TemperatureStats> = [
            (2000, Some(0.5)),
            (2001, Some(2.0)),
            (2002, None),
            (2003, Some(1.0)),
            (2004, Some(2.0)),
        ]
        .into_iter()
        .map(|(year, tmax)| {
            (
                year,
                TemperatureStats {
                    tmax,
                    ..Default::default()
                },
            )
        })
        .collect();

        let top = hottest_years(&anomalies, Channel::Max, 3);
        assert_eq!(top, vec![(2001, 2.0), (2004, 2.0), (2003, 1.0)]);
        assert!(hottest_years(&anomalies, Channel::Min, 5).is_empty());
    }
}
