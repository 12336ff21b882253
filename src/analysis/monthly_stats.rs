//! Distribution of daily values per calendar month over the full record.

use crate::analysis::climatology::{compute_monthly_means, MonthlyMean};
use crate::types::daily_record::{Channel, StationSeries};
use ordered_float::OrderedFloat;
use serde::Serialize;

/// 10th, 25th, 50th, 75th and 90th percentiles.
pub const DEFAULT_QUANTILES: [f64; 5] = [0.1, 0.25, 0.5, 0.75, 0.9];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyDistribution {
    pub month: u32,
    pub channel: Channel,
    /// `(quantile, value)` pairs in the order requested.
    pub quantiles: Vec<(f64, f64)>,
}

impl MonthlyDistribution {
    pub fn quantile(&self, q: f64) -> Option<f64> {
        self.quantiles
            .iter()
            .find(|(level, _)| (*level - q).abs() < f64::EPSILON)
            .map(|(_, v)| *v)
    }
}

/// Quantile of already sorted values with linear interpolation between the two closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Per calendar month, the requested quantiles of `channel` over every daily record.
/// Months without observations are left out.
pub fn monthly_distribution(
    series: &StationSeries,
    channel: Channel,
    quantiles: &[f64],
) -> Vec<MonthlyDistribution> {
    let mut by_month: [Vec<f64>; 12] = Default::default();
    for record in series.records() {
        by_month[record.month() as usize - 1].push(record.get(channel));
    }

    by_month
        .into_iter()
        .enumerate()
        .filter(|(_, values)| !values.is_empty())
        .map(|(i, mut values)| {
            values.sort_by_key(|v| OrderedFloat(*v));
            MonthlyDistribution {
                month: i as u32 + 1,
                channel,
                quantiles: quantiles
                    .iter()
                    .filter_map(|&q| quantile_sorted(&values, q).map(|v| (q, v)))
                    .collect(),
            }
        })
        .collect()
}

/// The monthly means of a single year, for overlaying on the distribution.
pub fn year_profile(series: &StationSeries, year: i32) -> Vec<MonthlyMean> {
    compute_monthly_means(series)
        .into_iter()
        .filter(|m| m.year == year)
        .collect()
}
