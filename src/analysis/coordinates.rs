//! Locating the latitude, longitude and time axes of a [`GriddedField`].
//!
//! Axis naming varies between datasets, so detection goes through a [`CoordinateResolver`].
//! [`SubstringResolver`] implements the usual heuristic; [`ExplicitResolver`] and plain
//! closures let callers name the axes directly.

use crate::analysis::error::AnalysisError;
use crate::types::gridded_field::GriddedField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Latitude,
    Longitude,
    Time,
}

/// Decides which kind of coordinate, if any, an axis name denotes.
pub trait CoordinateResolver {
    fn classify(&self, axis_name: &str) -> Option<AxisKind>;
}

impl<F> CoordinateResolver for F
where
    F: Fn(&str) -> Option<AxisKind>,
{
    fn classify(&self, axis_name: &str) -> Option<AxisKind> {
        self(axis_name)
    }
}

/// Case-insensitive substring matching on `"lat"`, `"lon"` and `"time"`, tested in that
/// order, so `"latitude"` is latitude and `"longitude"` is longitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringResolver;

impl CoordinateResolver for SubstringResolver {
    fn classify(&self, axis_name: &str) -> Option<AxisKind> {
        let name = axis_name.to_lowercase();
        if name.contains("lat") {
            Some(AxisKind::Latitude)
        } else if name.contains("lon") {
            Some(AxisKind::Longitude)
        } else if name.contains("time") {
            Some(AxisKind::Time)
        } else {
            None
        }
    }
}

/// Exact axis names supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ExplicitResolver {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub time: Option<String>,
}

impl CoordinateResolver for ExplicitResolver {
    fn classify(&self, axis_name: &str) -> Option<AxisKind> {
        let is = |candidate: &Option<String>| candidate.as_deref() == Some(axis_name);
        if is(&self.latitude) {
            Some(AxisKind::Latitude)
        } else if is(&self.longitude) {
            Some(AxisKind::Longitude)
        } else if is(&self.time) {
            Some(AxisKind::Time)
        } else {
            None
        }
    }
}

/// Axis indices of a field. Time is mandatory; latitude and longitude may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAxes {
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
    pub time: usize,
}

impl ResolvedAxes {
    /// Both horizontal axes, if the field has them.
    pub fn horizontal(&self) -> Option<(usize, usize)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Classifies every axis of `field`. When several axes classify as the same kind, the
/// last one wins.
///
/// # Errors
///
/// [`AnalysisError::CoordinateNotFound`] when no axis is classified as time.
pub fn resolve_axes(
    field: &GriddedField,
    resolver: &(impl CoordinateResolver + ?Sized),
) -> Result<ResolvedAxes, AnalysisError> {
    let mut latitude = None;
    let mut longitude = None;
    let mut time = None;
    for (index, axis) in field.axes().iter().enumerate() {
        let slot = match resolver.classify(&axis.name) {
            Some(AxisKind::Latitude) => &mut latitude,
            Some(AxisKind::Longitude) => &mut longitude,
            Some(AxisKind::Time) => &mut time,
            None => continue,
        };
        *slot = Some(index);
    }

    let time = time.ok_or_else(|| AnalysisError::CoordinateNotFound {
        field: field.name().to_string(),
        axes: field.axes().iter().map(|a| a.name.clone()).collect(),
    })?;
    Ok(ResolvedAxes {
        latitude,
        longitude,
        time,
    })
}
