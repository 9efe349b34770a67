//! Sparse per-chromosome contact matrices.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, warn};
use ndarray::Array2;

pub use crate::matrix::field::{BinIndex, ContactField};
pub use crate::matrix::stats::MatrixStats;
use crate::error::{HicError, HicResult};

mod field;
mod stats;

/// Name of the field holding raw contact counts.
pub const RAW_COUNT_FIELD: &str = "RawCount";

/// Contact data of a single chromosome, binned at a fixed resolution.
///
/// A matrix holds any number of named value fields. Fields are only ever
/// added (by the loader and by normalization), never modified or removed.
#[derive(Debug, Clone)]
pub struct SparseContactMatrix {
    chrom: String,
    resolution: u64,
    field_names: Vec<String>,
    fields: HashMap<String, ContactField>,
}

impl SparseContactMatrix {
    /// Constructs a new matrix with all the fields sharing the same row and
    /// column indices.
    ///
    /// # Errors
    /// Returns [`HicError::InvalidArgument`] if `resolution` is zero, any of
    /// the arrays differ in length, or a `(row, col)` pair is repeated.
    pub fn new<I, S>(
        rows: Vec<BinIndex>,
        cols: Vec<BinIndex>,
        values_by_field: I,
        chrom: &str,
        resolution: u64,
    ) -> HicResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        if resolution == 0 {
            return Err(HicError::invalid_argument("resolution must be positive"));
        }
        if let Some((row, col)) = rows.iter().zip(cols.iter()).duplicates().next() {
            return Err(HicError::invalid_argument(format!(
                "duplicated entry at row {}, column {} in chromosome {}",
                row, col, chrom
            )));
        }

        let rows: Arc<[BinIndex]> = rows.into();
        let cols: Arc<[BinIndex]> = cols.into();

        let mut matrix = Self {
            chrom: chrom.to_owned(),
            resolution,
            field_names: Vec::new(),
            fields: HashMap::new(),
        };
        for (name, values) in values_by_field {
            let field = ContactField::with_shared_coords(rows.clone(), cols.clone(), values)?;
            matrix.add_field(name, field)?;
        }
        debug!(
            "Created matrix for chromosome {} with {} entries",
            matrix.chrom,
            rows.len()
        );

        Ok(matrix)
    }

    #[must_use]
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    #[must_use]
    pub fn resolution(&self) -> u64 {
        self.resolution
    }

    /// Converts a genomic coordinate to the index of the bin containing it.
    #[inline]
    #[must_use]
    pub fn bin_of(&self, coordinate: u64) -> BinIndex {
        (coordinate / self.resolution) as BinIndex
    }

    /// Names of all the fields, in the order they were added.
    #[must_use]
    pub fn available_fields(&self) -> &[String] {
        &self.field_names
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// # Errors
    /// Returns [`HicError::FieldNotFound`] if there is no field with given
    /// name.
    pub fn field(&self, name: &str) -> HicResult<&ContactField> {
        self.fields
            .get(name)
            .ok_or_else(|| HicError::field_not_found(name, self.field_names.clone()))
    }

    /// Adds a new field to the matrix.
    ///
    /// # Errors
    /// Returns [`HicError::FieldExists`] if a field with given name already
    /// exists.
    pub fn add_field<S: Into<String>>(&mut self, name: S, field: ContactField) -> HicResult<()> {
        let name = name.into();
        if self.fields.contains_key(&name) {
            return Err(HicError::FieldExists(name));
        }

        self.field_names.push(name.clone());
        self.fields.insert(name, field);
        Ok(())
    }

    /// Number of records (entries of the first field).
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.field_names
            .first()
            .and_then(|name| self.fields.get(name))
            .map_or(0, ContactField::nnz)
    }

    /// Returns a dense square block of the matrix covering bins from
    /// `start / resolution` (inclusive) to `end / resolution` (exclusive).
    ///
    /// With `to_symmetric` set, the block is summed with its transpose. Note
    /// that this doubles the values lying on the diagonal.
    ///
    /// A range narrower than one bin gives a `0 x 0` block.
    ///
    /// # Errors
    /// Returns [`HicError::FieldNotFound`] if there is no such field, or
    /// [`HicError::InvalidArgument`] if `end` lies before `start`.
    pub fn query(
        &self,
        start: u64,
        end: u64,
        field: &str,
        to_symmetric: bool,
    ) -> HicResult<Array2<f64>> {
        let field = self.field(field)?;

        let start_bin = self.bin_of(start);
        let end_bin = self.bin_of(end);
        if end < start {
            return Err(HicError::invalid_argument(format!(
                "query range {}-{} ends before it starts",
                start, end
            )));
        }
        let bins = start_bin..end_bin;

        let side = end_bin - start_bin;
        let mut block = Array2::<f64>::zeros((side, side));
        let mut selected = 0;
        for (row, col, value) in field.iter() {
            if bins.contains(&row) && bins.contains(&col) {
                block[[row - start_bin, col - start_bin]] = value;
                selected += 1;
            }
        }

        if selected == 0 {
            warn!(
                "No entries in {}:{}-{}; returning an empty block",
                self.chrom, start, end
            );
        }

        if to_symmetric {
            block = &block + &block.t();
        }
        Ok(block)
    }

    /// # Errors
    /// Returns [`HicError::FieldNotFound`] if there is no such field, or
    /// [`HicError::InvalidArgument`] if it has no stored entries.
    pub fn stats(&self, field: &str) -> HicResult<MatrixStats> {
        MatrixStats::of_field(self.field(field)?)
    }
}

impl Display for SparseContactMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sparse matrix for chromosome {}:", self.chrom)?;
        writeln!(f, "Number of records: {}", self.nnz())?;
        writeln!(f, "Resolution: {}", self.resolution)?;
        writeln!(f, "Stats:")?;
        for name in &self.field_names {
            writeln!(f, "[{}]", name)?;
            match self.stats(name) {
                Ok(stats) => write!(f, "{}", stats)?,
                Err(_) => writeln!(f, "(empty)")?,
            }
        }

        Ok(())
    }
}
