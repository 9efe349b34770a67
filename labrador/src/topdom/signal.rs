use std::ops::Range;

use itertools::Itertools;

use crate::matrix::{BinIndex, ContactField};

/// Read-only, row-major view of a field, allowing fast retrieval of the
/// values stored in rectangular blocks of the matrix.
#[derive(Debug)]
pub(super) struct RowIndex {
    row_offsets: Vec<usize>,
    cols: Vec<BinIndex>,
    values: Vec<f64>,
}

impl RowIndex {
    #[must_use]
    pub fn new(field: &ContactField) -> Self {
        let num_rows = field.max_row().map_or(0, |max_row| max_row + 1);

        let mut row_offsets = vec![0; num_rows + 1];
        for &row in field.rows() {
            row_offsets[row + 1] += 1;
        }
        for row in 0..num_rows {
            row_offsets[row + 1] += row_offsets[row];
        }

        let order: Vec<usize> = (0..field.nnz())
            .sorted_by_key(|&entry| (field.rows()[entry], field.cols()[entry]))
            .collect();
        let cols = order.iter().map(|&entry| field.cols()[entry]).collect();
        let values = order.iter().map(|&entry| field.values()[entry]).collect();

        Self {
            row_offsets,
            cols,
            values,
        }
    }

    #[must_use]
    fn num_rows(&self) -> usize {
        self.row_offsets.len() - 1
    }

    /// Values stored in rows `rows` and columns `cols`.
    pub fn block_values(
        &self,
        rows: Range<BinIndex>,
        cols: Range<BinIndex>,
    ) -> impl Iterator<Item = f64> + '_ {
        let rows = rows.start.min(self.num_rows())..rows.end.min(self.num_rows());

        rows.flat_map(move |row| {
            let row_start = self.row_offsets[row];
            let row_cols = &self.cols[row_start..self.row_offsets[row + 1]];
            let first = row_start + row_cols.partition_point(|&col| col < cols.start);
            let last = row_start + row_cols.partition_point(|&col| col < cols.end);

            self.values[first..last].iter().copied()
        })
    }

    /// Sum of the contacts between the `window` bins upstream and the
    /// `window` bins downstream of `bin`, divided by `window²`.
    #[must_use]
    pub fn bin_signal(&self, bin: BinIndex, window: usize) -> f64 {
        let sum: f64 = self.within_values(bin, window).sum();
        sum / (window as f64).powi(2)
    }

    /// Values in the diamond spanning the upstream rows and downstream
    /// columns of `bin`.
    pub fn within_values(&self, bin: BinIndex, window: usize) -> impl Iterator<Item = f64> + '_ {
        self.block_values(upstream(bin, window), downstream(bin, window))
    }

    /// Values in the two triangles flanking the diamond of `bin`: contacts
    /// within its upstream bins and within its downstream bins.
    pub fn between_values(&self, bin: BinIndex, window: usize) -> impl Iterator<Item = f64> + '_ {
        self.block_values(upstream(bin, window), upstream(bin, window))
            .chain(self.block_values(downstream(bin, window), downstream(bin, window)))
    }
}

#[inline]
fn upstream(bin: BinIndex, window: usize) -> Range<BinIndex> {
    bin.saturating_sub(window)..bin
}

#[inline]
fn downstream(bin: BinIndex, window: usize) -> Range<BinIndex> {
    bin + 1..bin + window + 1
}
