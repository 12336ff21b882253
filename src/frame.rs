//! Conversions of results into polars [`DataFrame`]s, for printing and plotting.

use crate::analysis::climatology::{MonthlyMean, ReferenceClimatology};
use crate::analysis::extremes::ExtremeCounts;
use crate::analysis::monthly_stats::MonthlyDistribution;
use crate::gridded::time_units::TimeUnits;
use crate::pipeline::station::ChannelSummary;
use crate::types::daily_record::StationSeries;
use crate::types::gridded_field::GriddedField;
use crate::types::series::TimeSeries;
use crate::types::yearly::{TemperatureStats, YearlyAggregate};
use polars::prelude::*;
use std::collections::BTreeMap;

/// `year`, `tmax`, `tmin`, `tmean`. Missing values are nulls.
pub fn temperature_stats_frame(
    aggregate: &YearlyAggregate<TemperatureStats>,
) -> PolarsResult<DataFrame> {
    let years: Vec<i32> = aggregate.years().collect();
    let column = |pick: fn(&TemperatureStats) -> Option<f64>| -> Vec<Option<f64>> {
        aggregate.iter().map(|(_, stats)| pick(stats)).collect()
    };
    df!(
        "year" => years,
        "tmax" => column(|s| s.tmax),
        "tmin" => column(|s| s.tmin),
        "tmean" => column(|s| s.tmean)
    )
}

/// `month`, `tmax`, `tmin`, `tmean`, `observations`; always twelve rows.
pub fn climatology_frame(climatology: &ReferenceClimatology) -> PolarsResult<DataFrame> {
    let rows: Vec<(u32, TemperatureStats)> = climatology.iter().map(|(m, s)| (m, *s)).collect();
    df!(
        "month" => rows.iter().map(|(m, _)| *m).collect::<Vec<u32>>(),
        "tmax" => rows.iter().map(|(_, s)| s.tmax).collect::<Vec<_>>(),
        "tmin" => rows.iter().map(|(_, s)| s.tmin).collect::<Vec<_>>(),
        "tmean" => rows.iter().map(|(_, s)| s.tmean).collect::<Vec<_>>(),
        "observations" => rows
            .iter()
            .map(|(m, _)| climatology.observations(*m) as u64)
            .collect::<Vec<u64>>()
    )
}

/// `year`, `hot_days`, `tropical_nights`.
pub fn extremes_frame(aggregate: &YearlyAggregate<ExtremeCounts>) -> PolarsResult<DataFrame> {
    let (hot_days, tropical_nights): (Vec<u32>, Vec<u32>) = aggregate
        .iter()
        .map(|(_, counts)| (counts.hot_days, counts.tropical_nights))
        .unzip();
    df!(
        "year" => aggregate.years().collect::<Vec<i32>>(),
        "hot_days" => hot_days,
        "tropical_nights" => tropical_nights
    )
}

/// `date`, `tmax`, `tmin`, `tmean`.
pub fn station_frame(series: &StationSeries) -> PolarsResult<DataFrame> {
    let records = series.records();
    df!(
        "date" => records.iter().map(|r| r.date).collect::<Vec<_>>(),
        "tmax" => records.iter().map(|r| r.tmax).collect::<Vec<_>>(),
        "tmin" => records.iter().map(|r| r.tmin).collect::<Vec<_>>(),
        "tmean" => records.iter().map(|r| r.tmean).collect::<Vec<_>>()
    )
}

/// `month` plus one `q<percent>` column per requested quantile, e.g. `q10` and `q50`.
pub fn monthly_distribution_frame(
    distributions: &[MonthlyDistribution],
) -> PolarsResult<DataFrame> {
    let months: Vec<u32> = distributions.iter().map(|d| d.month).collect();
    let mut columns = vec![Column::new("month".into(), months)];

    let levels: Vec<f64> = distributions
        .first()
        .map(|d| d.quantiles.iter().map(|(q, _)| *q).collect())
        .unwrap_or_default();
    for level in levels {
        let values: Vec<Option<f64>> = distributions.iter().map(|d| d.quantile(level)).collect();
        let name = format!("q{}", (level * 100.0).round() as i64);
        columns.push(Column::new(name.into(), values));
    }
    DataFrame::new(columns)
}

/// The monthly distribution of one channel (`month`, `q10` ...) with one extra column per
/// highlighted year, named after the year, holding that year's monthly means.
pub fn monthly_statistics_frame(
    summary: &ChannelSummary,
    highlighted: &BTreeMap<i32, Vec<MonthlyMean>>,
) -> PolarsResult<DataFrame> {
    let mut df = monthly_distribution_frame(&summary.monthly_distribution)?;
    for (year, profile) in highlighted {
        let values: Vec<Option<f64>> = summary
            .monthly_distribution
            .iter()
            .map(|dist| {
                profile
                    .iter()
                    .find(|m| m.month == dist.month)
                    .and_then(|m| m.stats.get(summary.channel))
            })
            .collect();
        df.with_column(Column::new(year.to_string().into(), values))?;
    }
    Ok(df)
}

/// `year`, `label`, `anomaly` and `ranking` for one channel's seasonal anomalies. `ranking`
/// is `"top <n>"` for the years ranked in `summary` and `"other"` for the rest.
pub fn seasonal_anomaly_frame(
    anomalies: &YearlyAggregate<TemperatureStats>,
    summary: &ChannelSummary,
) -> PolarsResult<DataFrame> {
    let top = format!("top {}", summary.hottest_years.len());
    let years: Vec<i32> = anomalies.years().collect();
    df!(
        "year" => years.clone(),
        "label" => years.iter().map(|y| y.to_string()).collect::<Vec<_>>(),
        "anomaly" => anomalies
            .iter()
            .map(|(_, stats)| stats.get(summary.channel))
            .collect::<Vec<_>>(),
        "ranking" => years
            .iter()
            .map(|&y| if summary.is_ranked(y) { top.as_str() } else { "other" })
            .collect::<Vec<_>>()
    )
}

/// `time` (raw coordinate), `label` and `value`. The label is the decoded date when
/// `units` is given, otherwise the raw coordinate.
pub fn series_frame(series: &TimeSeries<f64>, units: Option<&TimeUnits>) -> PolarsResult<DataFrame> {
    let times = series.times();
    let labels: Vec<String> = times
        .iter()
        .map(|&t| match units.and_then(|u| u.decode_date(t)) {
            Some(date) => date.to_string(),
            None => t.to_string(),
        })
        .collect();
    df!(
        "time" => times,
        "label" => labels,
        "value" => series.values()
    )
}

/// Long format of a 2-D field: one row per cell, one column per axis, and `value`.
pub fn field_frame(field: &GriddedField) -> PolarsResult<DataFrame> {
    if field.ndim() != 2 {
        return Err(PolarsError::ShapeMismatch(
            format!(
                "'{}' has {} dimensions; only 2-D fields convert to a frame",
                field.name(),
                field.ndim()
            )
            .into(),
        ));
    }
    let (rows, cols) = (&field.axes()[0], &field.axes()[1]);
    let mut row_values = Vec::with_capacity(field.data().len());
    let mut col_values = Vec::with_capacity(field.data().len());
    let mut values = Vec::with_capacity(field.data().len());
    for (index, value) in field.data().indexed_iter() {
        row_values.push(rows.values[index[0]]);
        col_values.push(cols.values[index[1]]);
        values.push(*value);
    }
    DataFrame::new(vec![
        Column::new(rows.name.as_str().into(), row_values),
        Column::new(cols.name.as_str().into(), col_values),
        Column::new("value".into(), values),
    ])
}
