use crate::station_data::column_mapping::{ColumnMapping, StationField};
use crate::station_data::error::StationDataError;
use crate::types::daily_record::{Channel, DailyRecord, StationSeries};
use chrono::NaiveDate;
use log::{debug, info, warn};
use polars::prelude::*;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads daily station observations from CSV files.
#[derive(Debug, Clone, Default)]
pub struct StationDataLoader {
    mapping: ColumnMapping,
}

impl StationDataLoader {
    pub fn new(mapping: ColumnMapping) -> StationDataLoader {
        StationDataLoader { mapping }
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Loads and cleans a station CSV.
    ///
    /// Rows with a missing or unparsable date or temperature are dropped. When a date
    /// occurs more than once, the first row for it is kept.
    pub fn load(&self, path: &Path) -> Result<StationSeries, StationDataError> {
        let df = Self::read_frame(path)?;
        let (series, dropped) = self.parse_frame(&df, path)?;
        if dropped > 0 {
            warn!(
                "Dropped {} of {} rows from {:?} with missing or unparsable values",
                dropped,
                df.height(),
                path
            );
        }
        info!(
            "Loaded {} daily records from {:?} ({} years)",
            series.len(),
            path,
            series.years().len()
        );
        Ok(series)
    }

    /// Reads the raw CSV with every column as a string.
    pub fn read_frame(path: &Path) -> Result<DataFrame, StationDataError> {
        std::fs::metadata(path)
            .map_err(|e| StationDataError::FileUnavailable(path.to_path_buf(), e))?;

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| StationDataError::Csv(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| StationDataError::Csv(path.to_path_buf(), e))
    }

    fn parse_frame(
        &self,
        df: &DataFrame,
        path: &Path,
    ) -> Result<(StationSeries, usize), StationDataError> {
        let date = self.string_column(df, StationField::Date, path)?;
        let tmax = self.string_column(df, StationField::Temperature(Channel::Max), path)?;
        let tmin = self.string_column(df, StationField::Temperature(Channel::Min), path)?;
        let tmean = self.string_column(df, StationField::Temperature(Channel::Mean), path)?;

        let mut records: Vec<DailyRecord> = date
            .into_iter()
            .zip(tmax)
            .zip(tmin)
            .zip(tmean)
            .filter_map(|(((date, tmax), tmin), tmean)| {
                Some(DailyRecord::new(
                    parse_date(date?)?,
                    parse_temperature(tmax?)?,
                    parse_temperature(tmin?)?,
                    parse_temperature(tmean?)?,
                ))
            })
            .collect();
        let mut dropped = df.height() - records.len();

        records.sort_by_key(|r| r.date);
        let before_dedup = records.len();
        records.dedup_by_key(|r| r.date);
        if records.len() < before_dedup {
            debug!(
                "{:?} repeats {} dates; keeping the first row of each",
                path,
                before_dedup - records.len()
            );
            dropped += before_dedup - records.len();
        }

        Ok((StationSeries::new(records)?, dropped))
    }

    fn string_column<'a>(
        &self,
        df: &'a DataFrame,
        field: StationField,
        path: &Path,
    ) -> Result<&'a StringChunked, StationDataError> {
        let found: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        let name = self
            .mapping
            .resolve(field, &found)
            .ok_or_else(|| StationDataError::MissingColumn {
                path: path.to_path_buf(),
                field: field.name(),
                candidates: self.mapping.candidates(field).to_vec(),
                found: found.iter().map(|c| c.to_string()).collect(),
            })?;

        let column_error = |source: PolarsError| StationDataError::ColumnRead {
            path: PathBuf::from(path),
            column: name.to_string(),
            source,
        };
        df.column(name).map_err(column_error)?.str().map_err(column_error)
    }
}

/// Parses the leading `YYYY-MM-DD` of a timestamp such as `2003-08-01T00:00:00`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

fn parse_temperature(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
