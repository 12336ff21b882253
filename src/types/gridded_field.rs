//! Multi-dimensional fields with named coordinate axes.

use crate::types::error::DataModelError;
use ndarray::{ArrayD, Axis as ArrayAxis};

/// A named coordinate axis. `values` holds one coordinate per index along the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub name: String,
    pub values: Vec<f64>,
    /// CF-style units, e.g. `"days since 1850-01-01"` or `"degrees_north"`.
    pub units: Option<String>,
}

impl Axis {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            units: None,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// An axis with no coordinate variable; its coordinates are the indices `0..len`.
    pub fn indexed(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, (0..len).map(|i| i as f64).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A gridded variable: an n-dimensional array with one [`Axis`] per dimension.
/// Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct GriddedField {
    name: String,
    axes: Vec<Axis>,
    data: ArrayD<Option<f64>>,
}

impl GriddedField {
    /// # Errors
    ///
    /// Fails if the number of axes differs from the array's dimensionality, or if any axis
    /// has a different number of coordinates than the array's extent along it.
    pub fn new(
        name: impl Into<String>,
        axes: Vec<Axis>,
        data: ArrayD<Option<f64>>,
    ) -> Result<Self, DataModelError> {
        let name = name.into();
        if axes.len() != data.ndim() {
            return Err(DataModelError::AxisCountMismatch {
                field: name,
                axes: axes.len(),
                ndim: data.ndim(),
            });
        }
        for (axis, &extent) in axes.iter().zip(data.shape()) {
            if axis.len() != extent {
                return Err(DataModelError::AxisLengthMismatch {
                    axis: axis.name.clone(),
                    values: axis.len(),
                    extent,
                });
            }
        }
        Ok(Self { name, axes, data })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axis(&self, index: usize) -> Option<&Axis> {
        self.axes.get(index)
    }

    pub fn axis_names(&self) -> Vec<&str> {
        self.axes.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn data(&self) -> &ArrayD<Option<f64>> {
        &self.data
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Selects the last index along `axis`, dropping that axis. Returns `None` when the
    /// axis does not exist or is empty.
    pub fn last_along(&self, axis: usize) -> Option<GriddedField> {
        let extent = *self.data.shape().get(axis)?;
        let last = extent.checked_sub(1)?;
        let data = self.data.index_axis(ArrayAxis(axis), last).to_owned();
        let axes = self
            .axes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != axis)
            .map(|(_, a)| a.clone())
            .collect();
        Some(GriddedField {
            name: self.name.clone(),
            axes,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn field() -> GriddedField {
        let data = ArrayD::from_shape_vec(
            IxDyn(&[2, 2, 3]),
            (0..12).map(|v| Some(v as f64)).collect(),
        )
        .unwrap();
        GriddedField::new(
            "tas",
            vec![
                Axis::new("time", vec![0.0, 1.0]),
                Axis::new("lat", vec![-45.0, 45.0]),
                Axis::new("lon", vec![0.0, 120.0, 240.0]),
            ],
            data,
        )
        .unwrap()
    }

    #[test]
    fn test_axis_count_must_match() {
        let data = ArrayD::from_elem(IxDyn(&[2, 2]), Some(0.0));
        let result = GriddedField::new("x", vec![Axis::indexed("time", 2)], data);
        assert!(matches!(
            result,
            Err(DataModelError::AxisCountMismatch { axes: 1, ndim: 2, .. })
        ));
    }

    #[test]
    fn test_axis_length_must_match() {
        let data = ArrayD::from_elem(IxDyn(&[2, 3]), None);
        let result = GriddedField::new(
            "x",
            vec![Axis::indexed("time", 2), Axis::indexed("lon", 4)],
            data,
        );
        assert!(matches!(
            result,
            Err(DataModelError::AxisLengthMismatch { extent: 3, values: 4, .. })
        ));
    }

    #[test]
    fn test_last_along_time() {
        let last = field().last_along(0).unwrap();
        assert_eq!(last.axis_names(), vec!["lat", "lon"]);
        assert_eq!(last.data().shape(), &[2, 3]);
        assert_eq!(last.data()[IxDyn(&[0, 0])], Some(6.0));
        assert_eq!(last.data()[IxDyn(&[1, 2])], Some(11.0));
    }

    #[test]
    fn test_last_along_missing_axis() {
        assert!(field().last_along(5).is_none());
    }
}
