//! CF packing conventions: fill values and `scale_factor`/`add_offset` unpacking.

/// How raw stored values map onto physical values.
#[derive(Debug, Clone, PartialEq)]
pub struct Packing {
    /// Raw values marking a missing cell (`_FillValue`, `missing_value`).
    pub fill_values: Vec<f64>,
    pub scale: f64,
    pub offset: f64,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            fill_values: Vec::new(),
            scale: 1.0,
            offset: 0.0,
        }
    }
}

impl Packing {
    /// Decodes one raw value. Fill values and non-finite values, raw or unpacked, are
    /// missing.
    pub fn decode(&self, raw: f64) -> Option<f64> {
        if !raw.is_finite() || self.fill_values.contains(&raw) {
            return None;
        }
        Some(raw * self.scale + self.offset).filter(|v| v.is_finite())
    }

    pub fn decode_all(&self, raw: &[f64]) -> Vec<Option<f64>> {
        raw.iter().map(|&v| self.decode(v)).collect()
    }
}

/// A coordinate variable has exactly one dimension, named like the variable itself.
pub fn is_coordinate_variable(name: &str, dimensions: &[String]) -> bool {
    matches!(dimensions, [only] if only == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_packing_keeps_values() {
        let packing = Packing::default();
        assert_eq!(packing.decode_all(&[1.5, -3.0]), vec![Some(1.5), Some(-3.0)]);
    }

    #[test]
    fn test_fill_and_nan_become_missing() {
        let packing = Packing {
            fill_values: vec![-9999.0, 1e20],
            ..Packing::default()
        };
        assert_eq!(
            packing.decode_all(&[280.0, -9999.0, f64::NAN, 1e20, 281.0]),
            vec![Some(280.0), None, None, None, Some(281.0)]
        );
    }

    #[test]
    fn test_infinite_values_become_missing() {
        let packing = Packing::default();
        assert_eq!(packing.decode(f64::INFINITY), None);
        assert_eq!(packing.decode(f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_scale_and_offset_are_applied_after_fill_check() {
        let packing = Packing {
            fill_values: vec![-32767.0],
            scale: 0.5,
            offset: 273.0,
        };
        assert_eq!(
            packing.decode_all(&[10.0, -32767.0, 0.0]),
            vec![Some(278.0), None, Some(273.0)]
        );
    }

    #[test]
    fn test_coordinate_variables() {
        assert!(is_coordinate_variable("lat", &["lat".to_string()]));
        assert!(!is_coordinate_variable("tas", &["time".to_string()]));
        assert!(!is_coordinate_variable(
            "lat",
            &["lat".to_string(), "lon".to_string()]
        ));
        assert!(!is_coordinate_variable("height", &[]));
    }
}
