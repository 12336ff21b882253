//! The station path: daily records in, climatology, seasonal anomalies, extreme-day
//! counts and monthly distribution statistics out.

use crate::analysis::climatology::{
    compute_climatology, compute_seasonal_anomalies, hottest_years, MonthlyMean,
    ReferenceClimatology, Season,
};
use crate::analysis::extremes::{compute_yearly_extremes_with, ExtremeCounts, ExtremeThresholds};
use crate::analysis::monthly_stats::{
    monthly_distribution, year_profile, MonthlyDistribution, DEFAULT_QUANTILES,
};
use crate::error::ClimastatError;
use crate::station_data::data_loader::StationDataLoader;
use crate::types::daily_record::{Channel, StationSeries};
use crate::types::error::DataModelError;
use crate::types::period::ReferencePeriod;
use crate::types::yearly::{TemperatureStats, YearlyAggregate};
use bon::Builder;
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Mean, maximum and minimum temperature, in reporting order.
pub const DEFAULT_CHANNELS: [Channel; 3] = [Channel::Mean, Channel::Max, Channel::Min];

/// Settings for a station analysis run.
///
/// ```
/// use climastat::StationAnalysis;
///
/// let analysis = StationAnalysis::builder().ref_start(1961).ref_end(1990).top_n(3).build();
/// assert_eq!(analysis.top_n, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct StationAnalysis {
    /// First year of the reference window.
    #[builder(default = 1991)]
    pub ref_start: i32,
    /// Last year of the reference window, inclusive.
    #[builder(default = 2020)]
    pub ref_end: i32,
    #[builder(default)]
    pub thresholds: ExtremeThresholds,
    #[builder(default)]
    pub season: Season,
    /// How many of the warmest seasons to rank per channel.
    #[builder(default = 5)]
    pub top_n: usize,
    /// Channels that get a hottest-season ranking and a monthly distribution.
    #[builder(default = DEFAULT_CHANNELS.to_vec())]
    pub channels: Vec<Channel>,
    /// Years whose monthly profile is reported alongside the distribution.
    #[builder(default)]
    pub highlight_years: Vec<i32>,
    #[builder(default = DEFAULT_QUANTILES.to_vec())]
    pub quantiles: Vec<f64>,
}

impl Default for StationAnalysis {
    fn default() -> Self {
        StationAnalysis::builder().build()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedYear {
    pub year: i32,
    pub anomaly: f64,
}

/// The per-channel part of a [`StationReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub channel: Channel,
    /// Warmest seasons by this channel's anomaly, warmest first.
    pub hottest_years: Vec<RankedYear>,
    pub monthly_distribution: Vec<MonthlyDistribution>,
}

impl ChannelSummary {
    /// Whether `year` is among the ranked warmest seasons.
    pub fn is_ranked(&self, year: i32) -> bool {
        self.hottest_years.iter().any(|r| r.year == year)
    }
}

/// Everything the station path derives from one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub records: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub season: Season,
    pub climatology: ReferenceClimatology,
    pub seasonal_anomalies: YearlyAggregate<TemperatureStats>,
    pub extremes: YearlyAggregate<ExtremeCounts>,
    pub channels: Vec<ChannelSummary>,
    pub highlighted: BTreeMap<i32, Vec<MonthlyMean>>,
}

impl StationReport {
    pub fn channel(&self, channel: Channel) -> Option<&ChannelSummary> {
        self.channels.iter().find(|c| c.channel == channel)
    }
}

impl StationAnalysis {
    pub fn reference_period(&self) -> Result<ReferencePeriod, DataModelError> {
        ReferencePeriod::years(self.ref_start, self.ref_end)
    }

    /// Runs every station-path computation on an already loaded series.
    pub fn run(&self, series: &StationSeries) -> Result<StationReport, DataModelError> {
        let period = self.reference_period()?;
        let climatology = compute_climatology(series, &period);
        if (1..=12).all(|month| climatology.observations(month) == 0) {
            warn!(
                "No observations inside the reference period {}; anomalies will be empty",
                period
            );
        }

        let seasonal_anomalies = compute_seasonal_anomalies(series, &climatology, &self.season);
        let channels = self
            .channels
            .iter()
            .map(|&channel| ChannelSummary {
                channel,
                hottest_years: hottest_years(&seasonal_anomalies, channel, self.top_n)
                    .into_iter()
                    .map(|(year, anomaly)| RankedYear { year, anomaly })
                    .collect(),
                monthly_distribution: monthly_distribution(series, channel, &self.quantiles),
            })
            .collect();
        let extremes = compute_yearly_extremes_with(series, &self.thresholds);

        let highlighted = self
            .highlight_years
            .iter()
            .map(|&year| {
                let profile = year_profile(series, year);
                if profile.is_empty() {
                    warn!("Highlighted year {} has no observations", year);
                }
                (year, profile)
            })
            .collect();

        info!(
            "Station analysis: {} records, {} {} seasons, {} years with extreme counts",
            series.len(),
            seasonal_anomalies.len(),
            self.season.name,
            extremes.len()
        );

        Ok(StationReport {
            records: series.len(),
            first_date: series.records().first().map(|r| r.date),
            last_date: series.records().last().map(|r| r.date),
            season: self.season,
            climatology,
            seasonal_anomalies,
            extremes,
            channels,
            highlighted,
        })
    }

    /// Loads `path` and runs the analysis on it.
    pub fn run_file(
        &self,
        loader: &StationDataLoader,
        path: &Path,
    ) -> Result<StationReport, ClimastatError> {
        let series = loader.load(path)?;
        Ok(self.run(&series)?)
    }
}
