use chrono::{Datelike, Duration, NaiveDate};
use climastat::{
    compute_anomalies, compute_climatology, compute_yearly_extremes, ReferencePeriod,
    StationAnalysis, StationDataError, StationDataLoader, Year,
};
use std::error::Error;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Every June-August day from 1991 to 2021 in the station export layout. Summers up to
/// 2020 are 25/15 °C; 2021 has a 28 °C July, five hot days and two tropical nights in
/// August, plus one row with a missing value.
fn write_station_csv() -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "station,time,tlmax,tlmin,tl_mittel")?;
    for year in 1991..=2021 {
        let mut day = NaiveDate::from_ymd_opt(year, 6, 1).ok_or("bad date")?;
        let end = NaiveDate::from_ymd_opt(year, 8, 31).ok_or("bad date")?;
        while day <= end {
            let (mut tmax, mut tmin) = (25.0, 15.0);
            if year == 2021 && day.month() == 7 {
                tmax = 28.0;
            }
            if year == 2021 && day.month() == 8 && day.day() <= 5 {
                tmax = 31.0;
            }
            if year == 2021 && day.month() == 8 && (10..=11).contains(&day.day()) {
                tmin = 21.0;
            }
            writeln!(
                file,
                "11035,{}T00:00:00,{tmax},{tmin},{}",
                day,
                (tmax + tmin) / 2.0
            )?;
            day += Duration::days(1);
        }
    }
    writeln!(file, "11035,2021-09-01T00:00:00,,12.0,16.0")?;
    file.flush()?;
    Ok(file)
}

#[test]
fn test_summer_anomaly_end_to_end() -> Result<(), Box<dyn Error>> {
    let file = write_station_csv()?;
    let series = StationDataLoader::default().load(file.path())?;
    assert_eq!(series.years().len(), 31);
    assert!(series.get_for_period(Year(2021))?.records().iter().all(|r| r.month() <= 8));

    let climatology = compute_climatology(&series, &ReferencePeriod::years(1991, 2020)?);
    for month in 6..=8 {
        let stats = climatology.get(month).ok_or("missing month")?;
        assert_eq!(stats.tmax, Some(25.0));
        assert_eq!(stats.tmin, Some(15.0));
    }
    assert_eq!(climatology.get(1).ok_or("missing month")?.tmax, None);

    let anomalies = compute_anomalies(&series, &climatology);
    let summer_2021 = anomalies.get(2021).ok_or("2021 missing")?;
    assert!(summer_2021.tmax.ok_or("no tmax anomaly")? > 0.0);
    assert_eq!(anomalies.get(2000).ok_or("2000 missing")?.tmax, Some(0.0));
    assert_eq!(compute_anomalies(&series, &climatology), anomalies);

    let extremes = compute_yearly_extremes(&series);
    let counts = extremes.get(2021).ok_or("2021 missing")?;
    assert_eq!((counts.hot_days, counts.tropical_nights), (5, 2));
    assert_eq!(extremes.get(1995).ok_or("1995 missing")?.hot_days, 0);
    Ok(())
}

#[test]
fn test_station_report_as_json() -> Result<(), Box<dyn Error>> {
    let file = write_station_csv()?;
    let report = StationAnalysis::builder()
        .top_n(1)
        .highlight_years(vec![2021])
        .build()
        .run_file(&StationDataLoader::default(), file.path())?;

    assert_eq!(report.channels.len(), 3);
    for summary in &report.channels {
        assert_eq!(summary.hottest_years.len(), 1);
        assert_eq!(summary.hottest_years[0].year, 2021);
    }

    let json: serde_json::Value = serde_json::to_value(&report)?;
    assert_eq!(json["extremes"]["2021"]["hot_days"], 5);
    assert_eq!(json["season"]["name"], "JJA");
    assert_eq!(json["highlighted"]["2021"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["channels"][1]["channel"], "Max");
    assert_eq!(json["channels"][1]["hottest_years"][0]["year"], 2021);
    Ok(())
}

#[test]
fn test_missing_station_file() {
    let result = StationAnalysis::default().run_file(
        &StationDataLoader::default(),
        Path::new("/no/such/station.csv"),
    );
    assert!(matches!(
        result,
        Err(climastat::ClimastatError::StationData(
            StationDataError::FileUnavailable(..)
        ))
    ));
}
