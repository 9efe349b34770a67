use std::sync::Arc;

use itertools::Itertools;
use ndarray::{Array1, ArrayView1};

use crate::error::{HicError, HicResult};

/// Bin index of a contact matrix row or column.
pub type BinIndex = usize;

/// A single value field of a contact matrix, stored as a coordinate list.
///
/// Row and column index buffers are reference counted: fields derived from
/// one another without changing the sparsity pattern (e.g. raw counts and
/// their normalized versions) point to the very same buffers. A field that
/// changes the pattern gets its own buffers through [`ContactField::new`].
#[derive(Debug, Clone)]
pub struct ContactField {
    rows: Arc<[BinIndex]>,
    cols: Arc<[BinIndex]>,
    values: Array1<f64>,
}

impl ContactField {
    /// Creates a new field with its own coordinate buffers.
    ///
    /// # Errors
    /// Returns [`HicError::InvalidArgument`] if the three arrays differ in
    /// length or a `(row, col)` pair is repeated.
    pub fn new(rows: Vec<BinIndex>, cols: Vec<BinIndex>, values: Vec<f64>) -> HicResult<Self> {
        check_lengths(rows.len(), cols.len(), values.len())?;
        if let Some((row, col)) = rows.iter().zip(cols.iter()).duplicates().next() {
            return Err(HicError::invalid_argument(format!(
                "duplicated entry at row {}, column {}",
                row, col
            )));
        }

        Ok(Self {
            rows: rows.into(),
            cols: cols.into(),
            values: Array1::from(values),
        })
    }

    pub(crate) fn with_shared_coords(
        rows: Arc<[BinIndex]>,
        cols: Arc<[BinIndex]>,
        values: Vec<f64>,
    ) -> HicResult<Self> {
        check_lengths(rows.len(), cols.len(), values.len())?;

        Ok(Self {
            rows,
            cols,
            values: Array1::from(values),
        })
    }

    /// Creates a field with the same sparsity pattern as this one, sharing
    /// its coordinate buffers.
    ///
    /// # Errors
    /// Returns [`HicError::InvalidArgument`] if the number of values differs
    /// from the number of stored entries.
    pub fn with_values(&self, values: Array1<f64>) -> HicResult<Self> {
        check_lengths(self.rows.len(), self.cols.len(), values.len())?;

        Ok(Self {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            values,
        })
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[BinIndex] {
        &self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> &[BinIndex] {
        &self.cols
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Number of stored entries.
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nnz() == 0
    }

    #[must_use]
    pub fn max_row(&self) -> Option<BinIndex> {
        self.rows.iter().copied().max()
    }

    #[must_use]
    pub fn max_col(&self) -> Option<BinIndex> {
        self.cols.iter().copied().max()
    }

    /// Whether both fields point to the same coordinate buffers.
    #[must_use]
    pub fn shares_coords_with(&self, other: &ContactField) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows) && Arc::ptr_eq(&self.cols, &other.cols)
    }

    /// Iterates over `(row, col, value)` triples in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (BinIndex, BinIndex, f64)> + '_ {
        self.rows
            .iter()
            .zip(self.cols.iter())
            .zip(self.values.iter())
            .map(|((&row, &col), &value)| (row, col, value))
    }
}

fn check_lengths(rows: usize, cols: usize, values: usize) -> HicResult<()> {
    if rows != cols || rows != values {
        return Err(HicError::invalid_argument(format!(
            "coordinate list arrays differ in length (rows: {}, cols: {}, values: {})",
            rows, cols, values
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use crate::error::HicError;
    use crate::matrix::field::ContactField;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let result = ContactField::new(vec![0, 1], vec![0], vec![1.0, 2.0]);

        assert!(result.is_err());
    }

    #[test]
    fn test_with_values_shares_coords() {
        let field = ContactField::new(vec![0, 1], vec![1, 2], vec![3.0, 4.0]).unwrap();
        let derived = field.with_values(array![0.5, 1.0]).unwrap();

        assert!(derived.shares_coords_with(&field));
        assert_eq!(derived.values(), array![0.5, 1.0]);
        assert_eq!(
            derived.iter().collect::<Vec<_>>(),
            [(0, 1, 0.5), (1, 2, 1.0)]
        );
    }

    #[test]
    fn test_with_values_rejects_length_mismatch() {
        let field = ContactField::new(vec![0, 1], vec![1, 2], vec![3.0, 4.0]).unwrap();

        assert!(matches!(
            field.with_values(array![1.0]),
            Err(HicError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_new_rejects_duplicated_entries() {
        let result = ContactField::new(vec![0, 2, 0], vec![1, 2, 1], vec![1.0, 2.0, 3.0]);

        assert!(matches!(result, Err(HicError::InvalidArgument(_))));
    }

    #[test]
    fn test_independent_fields_do_not_share() {
        let field_1 = ContactField::new(vec![0], vec![1], vec![3.0]).unwrap();
        let field_2 = ContactField::new(vec![0], vec![1], vec![3.0]).unwrap();

        assert!(!field_1.shares_coords_with(&field_2));
    }

    #[test]
    fn test_max_indices() {
        let field = ContactField::new(vec![3, 1], vec![4, 7], vec![1.0, 1.0]).unwrap();
        assert_eq!(field.max_row(), Some(3));
        assert_eq!(field.max_col(), Some(7));

        let empty = ContactField::new(vec![], vec![], vec![]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.max_row(), None);
    }
}
