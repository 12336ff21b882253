//! The gridded path: for every variable of every file, area-weighted global mean, running
//! mean along time, and the first time the smoothed mean reaches a threshold.
//!
//! Failures are contained. A file that cannot be opened and a variable that cannot be
//! averaged are both recorded as skipped and the batch moves on.

use crate::analysis::coordinates::{resolve_axes, CoordinateResolver, SubstringResolver};
use crate::analysis::crossing::{first_crossing, Crossing, DEFAULT_CROSSING_THRESHOLD};
use crate::analysis::error::AnalysisError;
use crate::analysis::smoothing::{running_mean, running_mean_along, SmoothedSeries};
use crate::analysis::spatial::{global_mean_for_axes, GlobalMean};
use crate::gridded::source::{GriddedDataset, GriddedSource};
use crate::gridded::time_units::TimeUnits;
use crate::types::gridded_field::GriddedField;
use bon::Builder;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Default running-mean window, in time steps.
pub const DEFAULT_WINDOW: usize = 10;

/// Settings for a gridded batch run.
#[derive(Builder)]
pub struct GriddedAnalysis {
    #[builder(default = DEFAULT_WINDOW)]
    pub window: usize,
    #[builder(default = DEFAULT_CROSSING_THRESHOLD)]
    pub threshold: f64,
    /// Keep the last time step of each field for map rendering.
    #[builder(default)]
    pub keep_last_step: bool,
    #[builder(default = default_resolver())]
    pub resolver: Box<dyn CoordinateResolver>,
}

fn default_resolver() -> Box<dyn CoordinateResolver> {
    Box::new(SubstringResolver)
}

impl Default for GriddedAnalysis {
    fn default() -> Self {
        GriddedAnalysis::builder().build()
    }
}

/// The smoothed global mean of one variable.
#[derive(Debug, Clone, PartialEq)]
pub enum SmoothedMean {
    Series(SmoothedSeries<f64>),
    /// The global mean kept axes besides time; each of their lanes is smoothed.
    Field(GriddedField),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableResult {
    pub name: String,
    pub global_mean: GlobalMean,
    /// `None` when the global mean has no time axis left to smooth along.
    pub smoothed: Option<SmoothedMean>,
    /// Only searched when the smoothed mean is a plain time series.
    pub crossing: Option<Crossing<f64>>,
    /// The crossing time decoded through the time axis' CF units, when it has any.
    pub crossing_time: Option<NaiveDateTime>,
    pub time_units: Option<TimeUnits>,
    /// Set when `keep_last_step` is on and the field has latitude and longitude axes.
    pub last_step: Option<GriddedField>,
    /// Names of the latitude and longitude axes, when the resolver found both.
    pub horizontal_axes: Option<(String, String)>,
}

#[derive(Debug)]
pub enum VariableOutcome {
    Processed(VariableResult),
    Skipped { name: String, reason: String },
}

#[derive(Debug)]
pub enum FileOutcome {
    Processed {
        path: PathBuf,
        variables: Vec<VariableOutcome>,
    },
    Skipped {
        path: PathBuf,
        reason: String,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Processed { path, .. } | FileOutcome::Skipped { path, .. } => path.as_path(),
        }
    }
}

/// How a batch went overall; maps onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// Every file and every variable was processed.
    Complete,
    /// At least one file or variable was skipped, but not every file.
    Partial,
    /// No file could be processed.
    Failed,
}

impl BatchStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            BatchStatus::Complete => 0,
            BatchStatus::Failed => 1,
            BatchStatus::Partial => 2,
        }
    }

    /// Accounts for variables whose results could not be rendered. A complete batch with
    /// failed renders becomes partial; a failed batch stays failed.
    pub fn with_render_failures(self, failures: usize) -> BatchStatus {
        match self {
            BatchStatus::Complete if failures > 0 => BatchStatus::Partial,
            status => status,
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn processed_variables(&self) -> impl Iterator<Item = (&Path, &VariableResult)> + '_ {
        self.files.iter().flat_map(|file| {
            let variables: &[VariableOutcome] = match file {
                FileOutcome::Processed { variables, .. } => variables,
                FileOutcome::Skipped { .. } => &[],
            };
            variables.iter().filter_map(move |v| match v {
                VariableOutcome::Processed(result) => Some((file.path(), result)),
                VariableOutcome::Skipped { .. } => None,
            })
        })
    }

    pub fn skipped_files(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f, FileOutcome::Skipped { .. }))
            .count()
    }

    pub fn skipped_variables(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f {
                FileOutcome::Processed { variables, .. } => variables
                    .iter()
                    .filter(|v| matches!(v, VariableOutcome::Skipped { .. }))
                    .count(),
                FileOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    pub fn status(&self) -> BatchStatus {
        if self.files.is_empty() || self.skipped_files() == self.files.len() {
            BatchStatus::Failed
        } else if self.skipped_files() > 0 || self.skipped_variables() > 0 {
            BatchStatus::Partial
        } else {
            BatchStatus::Complete
        }
    }
}

impl GriddedAnalysis {
    /// Processes `paths` one after another.
    pub fn run(&self, source: &dyn GriddedSource, paths: &[PathBuf]) -> BatchReport {
        let files = paths
            .iter()
            .map(|path| self.process_file(source, path))
            .collect();
        let report = BatchReport { files };
        info!(
            "Processed {} file(s): {} skipped file(s), {} skipped variable(s)",
            report.files.len(),
            report.skipped_files(),
            report.skipped_variables()
        );
        report
    }

    pub fn process_file(&self, source: &dyn GriddedSource, path: &Path) -> FileOutcome {
        info!("Processing {:?}", path);
        match source.open(path) {
            Ok(dataset) => self.process_dataset(dataset),
            Err(e) => {
                warn!("Skipping file {:?}: {}", path, e);
                FileOutcome::Skipped {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn process_dataset(&self, dataset: GriddedDataset) -> FileOutcome {
        let variables = dataset
            .variables
            .into_iter()
            .map(|variable| {
                let result = variable
                    .field
                    .map_err(|e| e.to_string())
                    .and_then(|field| self.process_variable(&field).map_err(|e| e.to_string()));
                match result {
                    Ok(result) => VariableOutcome::Processed(result),
                    Err(reason) => {
                        warn!("Skipping variable '{}': {}", variable.name, reason);
                        VariableOutcome::Skipped {
                            name: variable.name,
                            reason,
                        }
                    }
                }
            })
            .collect();
        FileOutcome::Processed {
            path: dataset.path,
            variables,
        }
    }

    /// Global mean, smoothing and crossing detection for one field.
    ///
    /// # Errors
    ///
    /// Fails when the axes cannot be resolved or the global mean cannot be computed.
    /// Smoothing failures are not errors: the unsmoothed mean is used instead, or
    /// smoothing is skipped when there is no time axis to smooth along.
    pub fn process_variable(&self, field: &GriddedField) -> Result<VariableResult, AnalysisError> {
        let axes = resolve_axes(field, self.resolver.as_ref())?;
        let time_axis = &field.axes()[axes.time];
        let time_units = time_axis
            .units
            .as_deref()
            .and_then(|units| match TimeUnits::parse(units) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    debug!("'{}': {}", field.name(), e);
                    None
                }
            });

        let global_mean = global_mean_for_axes(field, &axes)?;
        let smoothed = match self.smooth(&global_mean, &time_axis.name) {
            Ok(smoothed) => Some(smoothed),
            Err(e) => {
                warn!("Not smoothing '{}': {}", field.name(), e);
                None
            }
        };

        let crossing = match &smoothed {
            Some(SmoothedMean::Series(series)) => Some(first_crossing(series, self.threshold)),
            _ => None,
        };
        let crossing_time = crossing
            .and_then(|c| c.time())
            .zip(time_units)
            .and_then(|(time, units)| units.decode(time));

        let horizontal_axes = axes.horizontal().map(|(lat, lon)| {
            (field.axes()[lat].name.clone(), field.axes()[lon].name.clone())
        });
        let last_step = match horizontal_axes {
            Some(_) if self.keep_last_step => field.last_along(axes.time),
            _ => None,
        };

        Ok(VariableResult {
            name: field.name().to_string(),
            global_mean,
            smoothed,
            crossing,
            crossing_time,
            time_units,
            last_step,
            horizontal_axes,
        })
    }

    fn smooth(&self, mean: &GlobalMean, time_name: &str) -> Result<SmoothedMean, AnalysisError> {
        match mean {
            GlobalMean::Series(series) => Ok(SmoothedMean::Series(
                running_mean(series, self.window).unwrap_or_else(|e| {
                    warn!("Running mean failed ({}); using the unsmoothed series", e);
                    SmoothedSeries::identity(series.clone())
                }),
            )),
            GlobalMean::Field(field) => {
                let time_axis = field
                    .axes()
                    .iter()
                    .position(|a| a.name == time_name)
                    .ok_or_else(|| AnalysisError::MissingTimeAxis(field.name().to_string()))?;
                Ok(SmoothedMean::Field(
                    running_mean_along(field, time_axis, self.window).unwrap_or_else(|e| {
                        warn!("Running mean failed ({}); using the unsmoothed field", e);
                        field.clone()
                    }),
                ))
            }
            GlobalMean::TimeMean(field) => Err(AnalysisError::MissingTimeAxis(field.name().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::coordinates::AxisKind;
    use crate::gridded::error::GriddedDataError;
    use crate::gridded::source::LoadedVariable;
    use crate::types::gridded_field::Axis;
    use approx::assert_abs_diff_eq;
    use ndarray::{ArrayD, IxDyn};
    use std::collections::HashMap;

    /// Serves prepared variables by file name; unknown names are unavailable files.
    struct FakeSource {
        files: HashMap<PathBuf, Vec<Result<GriddedField, String>>>,
    }

    impl GriddedSource for FakeSource {
        fn open(&self, path: &Path) -> Result<GriddedDataset, GriddedDataError> {
            let variables = self.files.get(path).ok_or_else(|| {
                GriddedDataError::FileUnavailable(
                    path.to_path_buf(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                )
            })?;
            Ok(GriddedDataset {
                path: path.to_path_buf(),
                variables: variables
                    .iter()
                    .map(|v| match v {
                        Ok(field) => LoadedVariable {
                            name: field.name().to_string(),
                            field: Ok(field.clone()),
                        },
                        Err(name) => LoadedVariable {
                            name: name.clone(),
                            field: Err(GriddedDataError::MissingVariable {
                                path: path.to_path_buf(),
                                variable: name.clone(),
                            }),
                        },
                    })
                    .collect(),
            })
        }
    }

    /// A `(time, lat, lon)` field whose every cell at step `t` equals `values[t]`.
    fn warming_field(name: &str, values: &[f64]) -> GriddedField {
        let lats = vec![-45.0, 0.0, 45.0];
        let lons = vec![0.0, 180.0];
        let cells = lats.len() * lons.len();
        let data: Vec<Option<f64>> = values
            .iter()
            .flat_map(|v| std::iter::repeat(Some(*v)).take(cells))
            .collect();
        let time = Axis::new("time", (0..values.len()).map(|t| t as f64 * 365.0).collect())
            .with_units("days since 2000-01-01");
        GriddedField::new(
            name,
            vec![time, Axis::new("lat", lats.clone()), Axis::new("lon", lons.clone())],
            ArrayD::from_shape_vec(IxDyn(&[values.len(), lats.len(), lons.len()]), data).unwrap(),
        )
        .unwrap()
    }

    fn assert_values_close(actual: &[Option<f64>], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (actual, expected) in actual.iter().zip(expected) {
            let actual = actual.unwrap_or(f64::NAN);
            assert_abs_diff_eq!(actual, *expected, epsilon = 1e-9);
        }
    }

    fn values_of(result: &VariableResult) -> Vec<Option<f64>> {
        match &result.smoothed {
            Some(SmoothedMean::Series(series)) => series.series().values(),
            other => panic!("expected a smoothed series, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let analysis = GriddedAnalysis::default();
        assert_eq!(analysis.window, 10);
        assert_eq!(analysis.threshold, 1.5);
        assert!(!analysis.keep_last_step);
    }

    #[test]
    fn test_process_variable_finds_crossing() -> Result<(), AnalysisError> {
        let analysis = GriddedAnalysis::builder().window(1).keep_last_step(true).build();
        let result = analysis.process_variable(&warming_field("tas", &[0.3, 0.9, 1.6, 1.7]))?;

        assert_values_close(&values_of(&result), &[0.3, 0.9, 1.6, 1.7]);
        assert_eq!(result.crossing.and_then(|c| c.time()), Some(730.0));
        assert_eq!(
            result.crossing_time.map(|t| t.date()),
            chrono::NaiveDate::from_ymd_opt(2001, 12, 31)
        );
        let last = result.last_step.unwrap();
        assert_eq!(last.axis_names(), vec!["lat", "lon"]);
        assert_abs_diff_eq!(last.data()[IxDyn(&[0, 0])].unwrap_or(f64::NAN), 1.7, epsilon = 1e-12);
        assert_eq!(
            result.horizontal_axes,
            Some(("lat".to_string(), "lon".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_smoothing_delays_crossing() -> Result<(), AnalysisError> {
        let analysis = GriddedAnalysis::builder().window(3).build();
        let result = analysis.process_variable(&warming_field("tas", &[0.0, 0.0, 3.0, 0.0, 0.0]))?;
        assert_eq!(result.crossing, Some(Crossing::NotFound));
        assert!(result.last_step.is_none());
        Ok(())
    }

    #[test]
    fn test_zero_window_falls_back_to_unsmoothed() -> Result<(), AnalysisError> {
        let analysis = GriddedAnalysis::builder().window(0).build();
        let result = analysis.process_variable(&warming_field("tas", &[1.0, 2.0]))?;
        assert_values_close(&values_of(&result), &[1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn test_field_without_horizontal_axes_is_not_smoothed() -> Result<(), AnalysisError> {
        let field = GriddedField::new(
            "station_count",
            vec![Axis::indexed("time", 3), Axis::indexed("site", 2)],
            ArrayD::from_elem(IxDyn(&[3, 2]), Some(4.0)),
        )?;
        let result = GriddedAnalysis::default().process_variable(&field)?;
        assert!(matches!(result.global_mean, GlobalMean::TimeMean(_)));
        assert!(result.smoothed.is_none());
        assert!(result.horizontal_axes.is_none());
        assert!(result.crossing.is_none());
        Ok(())
    }

    #[test]
    fn test_custom_resolver() -> Result<(), AnalysisError> {
        let field = GriddedField::new(
            "t2m",
            vec![Axis::indexed("step", 2), Axis::new("y", vec![0.0]), Axis::new("x", vec![0.0])],
            ArrayD::from_elem(IxDyn(&[2, 1, 1]), Some(2.0)),
        )?;
        assert!(GriddedAnalysis::default().process_variable(&field).is_err());

        let resolver = |name: &str| match name {
            "step" => Some(AxisKind::Time),
            "y" => Some(AxisKind::Latitude),
            "x" => Some(AxisKind::Longitude),
            _ => None,
        };
        let analysis = GriddedAnalysis::builder().resolver(Box::new(resolver)).build();
        let result = analysis.process_variable(&field)?;
        assert_eq!(result.crossing.and_then(|c| c.time()), Some(0.0));
        assert_eq!(result.crossing_time, None);
        Ok(())
    }

    #[test]
    fn test_batch_contains_failures() {
        let no_time = GriddedField::new(
            "orography",
            vec![Axis::new("lat", vec![0.0]), Axis::new("lon", vec![0.0])],
            ArrayD::from_elem(IxDyn(&[1, 1]), Some(100.0)),
        )
        .unwrap();
        let source = FakeSource {
            files: HashMap::from([
                (
                    PathBuf::from("good.nc"),
                    vec![Ok(warming_field("tas", &[1.0, 2.0]))],
                ),
                (
                    PathBuf::from("mixed.nc"),
                    vec![
                        Ok(no_time),
                        Err("broken".to_string()),
                        Ok(warming_field("tos", &[0.5, 0.6])),
                    ],
                ),
            ]),
        };
        let analysis = GriddedAnalysis::default();

        let report = analysis.run(
            &source,
            &[
                PathBuf::from("good.nc"),
                PathBuf::from("missing.nc"),
                PathBuf::from("mixed.nc"),
            ],
        );
        assert_eq!(report.files.len(), 3);
        assert_eq!(report.skipped_files(), 1);
        assert_eq!(report.skipped_variables(), 2);
        let processed: Vec<&str> = report
            .processed_variables()
            .map(|(_, v)| v.name.as_str())
            .collect();
        assert_eq!(processed, vec!["tas", "tos"]);
        assert_eq!(report.status(), BatchStatus::Partial);
        assert_eq!(report.status().exit_code(), 2);

        let clean = analysis.run(&source, &[PathBuf::from("good.nc")]);
        assert_eq!(clean.status(), BatchStatus::Complete);
        assert_eq!(clean.status().with_render_failures(0), BatchStatus::Complete);
        assert_eq!(clean.status().with_render_failures(1), BatchStatus::Partial);
        assert_eq!(report.status().with_render_failures(1), BatchStatus::Partial);

        let failed = analysis.run(&source, &[PathBuf::from("missing.nc")]);
        assert_eq!(failed.status(), BatchStatus::Failed);
        assert_eq!(failed.status().exit_code(), 1);
        assert_eq!(failed.status().with_render_failures(3), BatchStatus::Failed);
    }
}
