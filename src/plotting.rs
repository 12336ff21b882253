//! Charts rendered with `plotlars`; each function opens the chart in the browser.

use crate::analysis::climatology::MonthlyMean;
use crate::analysis::extremes::ExtremeCounts;
use crate::analysis::smoothing::SmoothedSeries;
use crate::frame::{field_frame, monthly_statistics_frame, seasonal_anomaly_frame, series_frame};
use crate::gridded::time_units::TimeUnits;
use crate::pipeline::station::ChannelSummary;
use crate::types::gridded_field::GriddedField;
use crate::types::series::TimeSeries;
use crate::types::yearly::{TemperatureStats, YearlyAggregate};
use log::warn;
use plotlars::{BarPlot, HeatMap, Legend, Line, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::collections::BTreeMap;

/// The raw and smoothed global mean of one variable.
pub fn plot_global_mean(
    name: &str,
    raw: &TimeSeries<f64>,
    smoothed: &SmoothedSeries<f64>,
    units: Option<&TimeUnits>,
) -> PolarsResult<()> {
    let mut data = series_frame(raw, units)?;
    data.rename("value", "global mean".into())?;
    data.with_column(Column::new(
        "running mean".into(),
        smoothed.series().values(),
    ))?;

    TimeSeriesPlot::builder()
        .data(&data)
        .x("label")
        .y("global mean")
        .additional_series(vec!["running mean"])
        .colors(vec![Rgb(150, 150, 150), Rgb(200, 30, 30)])
        .lines(vec![Line::Solid, Line::Solid])
        .plot_title(Text::from(format!("{name}: area-weighted global mean")).size(18))
        .legend(&Legend::new().x(0.05).y(0.95))
        .x_title("time")
        .y_title(format!("{name} ({}-step running mean)", smoothed.window()))
        .build()
        .plot();
    Ok(())
}

/// A 2-D field such as the last time step of a variable.
pub fn plot_map(field: &GriddedField, latitude: &str, longitude: &str) -> PolarsResult<()> {
    let data = field_frame(field)?;
    HeatMap::builder()
        .data(&data)
        .x(longitude)
        .y(latitude)
        .z("value")
        .plot_title(Text::from(format!("{}: last time step", field.name())).size(18))
        .x_title(longitude)
        .y_title(latitude)
        .build()
        .plot();
    Ok(())
}

/// Seasonal anomalies of one channel as bars per year, the ranked warmest seasons in
/// their own colour.
pub fn plot_seasonal_anomalies(
    anomalies: &YearlyAggregate<TemperatureStats>,
    summary: &ChannelSummary,
    season: &str,
) -> PolarsResult<()> {
    let data = seasonal_anomaly_frame(anomalies, summary)?;

    BarPlot::builder()
        .data(&data)
        .labels("label")
        .values("anomaly")
        .group("ranking")
        .colors(vec![Rgb(150, 150, 150), Rgb(200, 30, 30)])
        .plot_title(
            Text::from(format!("{season} {} anomaly", summary.channel.label())).size(18),
        )
        .legend(&Legend::new().x(0.05).y(0.95))
        .x_title("year")
        .y_title("anomaly (°C)")
        .build()
        .plot();
    Ok(())
}

/// Per-month percentile lines of one channel (10/90 dotted, 25/75 dashed, median solid)
/// with the monthly means of each highlighted year on top.
pub fn plot_monthly_statistics(
    summary: &ChannelSummary,
    highlighted: &BTreeMap<i32, Vec<MonthlyMean>>,
) -> PolarsResult<()> {
    let data = monthly_statistics_frame(summary, highlighted)?;
    let quantile_columns: Vec<String> = data
        .get_column_names_str()
        .into_iter()
        .filter(|name| name.starts_with('q') && *name != "q50")
        .map(str::to_string)
        .collect();
    let year_columns: Vec<String> = highlighted.keys().map(i32::to_string).collect();
    if !data.get_column_names_str().contains(&"q50") {
        warn!("No median for {}; skipping the monthly statistics chart", summary.channel);
        return Ok(());
    }

    let band_line = |name: &str| match name {
        "q25" | "q75" => Line::Dash,
        _ => Line::Dot,
    };
    let mut lines = vec![Line::Solid];
    let mut colors = vec![Rgb(40, 40, 40)];
    for name in &quantile_columns {
        lines.push(band_line(name));
        colors.push(Rgb(120, 120, 120));
    }
    for (i, _) in year_columns.iter().enumerate() {
        lines.push(Line::Solid);
        let (r, g, b) = HIGHLIGHT_COLORS[i % HIGHLIGHT_COLORS.len()];
        colors.push(Rgb(r, g, b));
    }
    let additional: Vec<&str> = quantile_columns
        .iter()
        .chain(&year_columns)
        .map(String::as_str)
        .collect();

    TimeSeriesPlot::builder()
        .data(&data)
        .x("month")
        .y("q50")
        .additional_series(additional)
        .colors(colors)
        .lines(lines)
        .plot_title(
            Text::from(format!("Monthly {} distribution", summary.channel.label())).size(18),
        )
        .legend(&Legend::new().x(0.05).y(0.95))
        .x_title("month")
        .y_title("°C")
        .build()
        .plot();
    Ok(())
}

const HIGHLIGHT_COLORS: [(u8, u8, u8); 4] = [
    (200, 30, 30),
    (235, 117, 0),
    (69, 157, 230),
    (60, 160, 60),
];

/// Hot days and tropical nights per year.
pub fn plot_extremes(extremes: &YearlyAggregate<ExtremeCounts>) -> PolarsResult<()> {
    let years: Vec<String> = extremes.years().map(|y| y.to_string()).collect();
    let hot_days: Vec<f64> = extremes.iter().map(|(_, c)| f64::from(c.hot_days)).collect();
    let nights: Vec<f64> = extremes
        .iter()
        .map(|(_, c)| f64::from(c.tropical_nights))
        .collect();
    let data = df!(
        "year" => years,
        "hot days" => hot_days,
        "tropical nights" => nights
    )?;

    TimeSeriesPlot::builder()
        .data(&data)
        .x("year")
        .y("hot days")
        .additional_series(vec!["tropical nights"])
        .colors(vec![Rgb(235, 117, 0), Rgb(69, 157, 230)])
        .lines(vec![Line::Solid, Line::Dash])
        .plot_title(Text::from("Extreme days per year").size(18))
        .legend(&Legend::new().x(0.05).y(0.95))
        .x_title("year")
        .y_title("days")
        .build()
        .plot();
    Ok(())
}
