use crate::analysis::smoothing::SmoothedSeries;
use serde::Serialize;

/// Default warming level, in degrees above the pre-industrial baseline.
pub const DEFAULT_CROSSING_THRESHOLD: f64 = 1.5;

/// Outcome of [`first_crossing`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Crossing<T> {
    Found { time: T, value: f64 },
    NotFound,
}

impl<T: Copy> Crossing<T> {
    pub fn time(&self) -> Option<T> {
        match self {
            Crossing::Found { time, .. } => Some(*time),
            Crossing::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Crossing::Found { .. })
    }
}

/// The first sample of a smoothed series whose value reaches `threshold` (`>=`).
/// Missing values never cross.
pub fn first_crossing<T: Copy>(smoothed: &SmoothedSeries<T>, threshold: f64) -> Crossing<T> {
    smoothed
        .series()
        .samples()
        .iter()
        .find_map(|sample| match sample.value {
            Some(value) if value >= threshold => Some(Crossing::Found {
                time: sample.time,
                value,
            }),
            _ => None,
        })
        .unwrap_or(Crossing::NotFound)
}
