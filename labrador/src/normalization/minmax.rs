use log::info;

use crate::error::{HicError, HicResult};
use crate::matrix::ContactField;
use crate::normalization::Normalizer;

/// Rescales the stored values linearly so that the minimum becomes `0.0` and
/// the maximum `1.0`.
///
/// Only stored entries take part: entries that are not stored stay implicit
/// zeros, even if zero lies outside the range of stored values.
#[derive(Debug, Copy, Clone, Default)]
pub struct MinMaxNormalizer;

impl Normalizer for MinMaxNormalizer {
    fn normalize(&self, field: &ContactField) -> HicResult<ContactField> {
        info!("Performing min-max normalization");

        let values = field.values();
        let min = values.fold(f64::INFINITY, |acc, &value| acc.min(value));
        let max = values.fold(f64::NEG_INFINITY, |acc, &value| acc.max(value));
        if field.is_empty() || max <= min {
            return Err(HicError::invalid_argument(
                "min-max normalization requires at least two distinct stored values",
            ));
        }

        let range = max - min;
        field.with_values(values.mapv(|value| (value - min) / range))
    }
}

#[cfg(test)]
mod tests {
    use crate::_internal_test_data::EXAMPLE_CHR1_MATRIX;
    use crate::matrix::{ContactField, RAW_COUNT_FIELD};
    use crate::normalization::minmax::MinMaxNormalizer;
    use crate::normalization::Normalizer;

    #[test]
    fn test_minmax_extremes() {
        let field = ContactField::new(
            vec![0, 0, 1, 2, 3],
            vec![0, 2, 1, 3, 3],
            vec![7.0, 3.5, 12.25, 100.0, 0.1],
        )
        .unwrap();

        let normalized = MinMaxNormalizer.normalize(&field).unwrap();
        let values = normalized.values();

        assert_eq!(values[3], 1.0);
        assert_eq!(values[4], 0.0);
        assert!(values.iter().all(|&value| (0.0..=1.0).contains(&value)));
    }

    #[test]
    fn test_minmax_keeps_implicit_zeros() {
        let mut matrix = EXAMPLE_CHR1_MATRIX.clone();

        matrix.normalize_by_name("MinMax", RAW_COUNT_FIELD).unwrap();
        let block = matrix.query(0, 2000, "MinMax", false).unwrap();

        // Stored 5, 2, 3 map to 1, 0, 1/3; the unstored (1, 0) entry stays 0
        assert_eq!(block[[0, 0]], 1.0);
        assert_eq!(block[[0, 1]], 0.0);
        assert_eq!(block[[1, 0]], 0.0);
        assert_eq!(block[[1, 1]], 1.0 / 3.0);
    }

    #[test]
    fn test_minmax_negative_values() {
        let field = ContactField::new(vec![0, 1], vec![1, 2], vec![-4.0, 4.0]).unwrap();

        let normalized = MinMaxNormalizer.normalize(&field).unwrap();

        assert_eq!(normalized.values().to_vec(), [0.0, 1.0]);
        assert!(normalized.shares_coords_with(&field));
    }

    #[test]
    fn test_minmax_constant_field() {
        let field = ContactField::new(vec![0, 1], vec![1, 2], vec![3.0, 3.0]).unwrap();

        assert!(MinMaxNormalizer.normalize(&field).is_err());
    }
}
