//! Genome-wide collection of per-chromosome contact matrices.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use log::{debug, info, warn};
use ndarray::Array2;

use crate::error::{HicError, HicResult};
use crate::matrix::{BinIndex, ContactField, SparseContactMatrix};
use crate::normalization::NormalizationMethod;
use crate::topdom::{TadBoundary, TopDomParams};

/// Contact matrices of all the chromosomes of an experiment, binned at a
/// common resolution.
#[derive(Debug, Clone)]
pub struct HicExperiment {
    resolution: u64,
    matrices: BTreeMap<String, SparseContactMatrix>,
}

impl HicExperiment {
    #[must_use]
    pub fn resolution(&self) -> u64 {
        self.resolution
    }

    /// Names of the chromosomes with any contacts, sorted.
    #[must_use]
    pub fn avail_chroms(&self) -> Vec<String> {
        self.matrices.keys().cloned().collect()
    }

    pub fn matrices(&self) -> impl Iterator<Item = &SparseContactMatrix> {
        self.matrices.values()
    }

    /// # Errors
    /// Returns [`HicError::ChromNotFound`] if there is no such chromosome.
    pub fn matrix(&self, chrom: &str) -> HicResult<&SparseContactMatrix> {
        self.matrices
            .get(chrom)
            .ok_or_else(|| HicError::chrom_not_found(chrom, self.avail_chroms()))
    }

    fn matrix_mut(&mut self, chrom: &str) -> HicResult<&mut SparseContactMatrix> {
        let available = self.avail_chroms();
        self.matrices
            .get_mut(chrom)
            .ok_or_else(|| HicError::chrom_not_found(chrom, available))
    }

    /// See [`SparseContactMatrix::query`].
    ///
    /// # Errors
    /// Returns [`HicError::ChromNotFound`] if there is no such chromosome, or
    /// any error of [`SparseContactMatrix::query`].
    pub fn query(
        &self,
        chrom: &str,
        start: u64,
        end: u64,
        field: &str,
        to_symmetric: bool,
    ) -> HicResult<Array2<f64>> {
        self.matrix(chrom)?.query(start, end, field, to_symmetric)
    }

    /// Normalizes a single chromosome. See [`SparseContactMatrix::normalize`].
    ///
    /// # Errors
    /// Returns [`HicError::ChromNotFound`] if there is no such chromosome, or
    /// any error of [`SparseContactMatrix::normalize`].
    pub fn normalize(
        &mut self,
        chrom: &str,
        method: &NormalizationMethod,
        source_field: &str,
    ) -> HicResult<&ContactField> {
        self.matrix_mut(chrom)?.normalize(method, source_field)
    }

    /// Normalizes every chromosome separately, stopping at the first error.
    ///
    /// # Errors
    /// Returns any error of [`SparseContactMatrix::normalize`].
    pub fn normalize_all(
        &mut self,
        method: &NormalizationMethod,
        source_field: &str,
    ) -> HicResult<()> {
        for matrix in self.matrices.values_mut() {
            matrix.normalize(method, source_field)?;
        }

        Ok(())
    }

    /// Calls domain boundaries in a single chromosome. See
    /// [`SparseContactMatrix::call_topdom`].
    ///
    /// # Errors
    /// Returns [`HicError::ChromNotFound`] if there is no such chromosome, or
    /// any error of [`SparseContactMatrix::call_topdom`].
    pub fn call_topdom(
        &self,
        chrom: &str,
        field: &str,
        params: &TopDomParams,
    ) -> HicResult<Vec<TadBoundary>> {
        self.matrix(chrom)?.call_topdom(field, params)
    }
}

/// Values of a single chromosome being collected.
#[derive(Debug, Default)]
struct ChromContacts {
    rows: Vec<BinIndex>,
    cols: Vec<BinIndex>,
    values: Vec<Vec<f64>>,
    entries: HashMap<(BinIndex, BinIndex), usize>,
}

/// Collects contacts record by record, then builds one matrix per
/// chromosome.
///
/// Contacts falling into the same pair of bins are summed.
/// Inter-chromosomal contacts are skipped.
#[derive(Debug)]
pub struct HicExperimentBuilder {
    resolution: u64,
    field_names: Vec<String>,
    chroms: BTreeMap<String, ChromContacts>,
    trans_contacts: u64,
}

impl HicExperimentBuilder {
    /// # Errors
    /// Returns [`HicError::InvalidArgument`] if `resolution` is zero or
    /// `field_names` is empty, or [`HicError::FieldExists`] if a field name
    /// is repeated.
    pub fn new<I, S>(resolution: u64, field_names: I) -> HicResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if resolution == 0 {
            return Err(HicError::invalid_argument("resolution must be positive"));
        }
        let field_names: Vec<String> = field_names.into_iter().map(Into::into).collect();
        if field_names.is_empty() {
            return Err(HicError::invalid_argument(
                "at least one value field is required",
            ));
        }
        if let Some(name) = field_names.iter().duplicates().next() {
            return Err(HicError::FieldExists(name.clone()));
        }

        Ok(Self {
            resolution,
            field_names,
            chroms: BTreeMap::new(),
            trans_contacts: 0,
        })
    }

    #[must_use]
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Adds a contact between two genomic positions, with one value per
    /// field.
    ///
    /// # Errors
    /// Returns [`HicError::InvalidArgument`] if the number of values differs
    /// from the number of fields.
    pub fn add_contact(
        &mut self,
        chrom1: &str,
        pos1: u64,
        chrom2: &str,
        pos2: u64,
        values: &[f64],
    ) -> HicResult<&mut Self> {
        if values.len() != self.field_names.len() {
            return Err(HicError::invalid_argument(format!(
                "expected {} values per contact, got {}",
                self.field_names.len(),
                values.len()
            )));
        }
        if chrom1 != chrom2 {
            self.trans_contacts += 1;
            return Ok(self);
        }

        let row = (pos1 / self.resolution) as BinIndex;
        let col = (pos2 / self.resolution) as BinIndex;
        let num_fields = self.field_names.len();
        let contacts = self.chroms.entry(chrom1.to_owned()).or_insert_with(|| {
            ChromContacts {
                values: vec![Vec::new(); num_fields],
                ..ChromContacts::default()
            }
        });

        match contacts.entries.entry((row, col)) {
            Entry::Occupied(entry) => {
                let index = *entry.get();
                for (field_values, value) in contacts.values.iter_mut().zip(values) {
                    field_values[index] += value;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(contacts.rows.len());
                contacts.rows.push(row);
                contacts.cols.push(col);
                for (field_values, &value) in contacts.values.iter_mut().zip(values) {
                    field_values.push(value);
                }
            }
        }

        Ok(self)
    }

    /// # Errors
    /// Returns any error of [`SparseContactMatrix::new`].
    pub fn build(self) -> HicResult<HicExperiment> {
        if self.trans_contacts > 0 {
            warn!(
                "Skipped {} inter-chromosomal contacts",
                self.trans_contacts
            );
        }

        let mut matrices = BTreeMap::new();
        for (chrom, contacts) in self.chroms {
            let matrix = SparseContactMatrix::new(
                contacts.rows,
                contacts.cols,
                self.field_names.iter().cloned().zip(contacts.values),
                &chrom,
                self.resolution,
            )?;
            debug!("{}", matrix);
            matrices.insert(chrom, matrix);
        }
        info!(
            "Loaded {} chromosomes at resolution {}",
            matrices.len(),
            self.resolution
        );

        Ok(HicExperiment {
            resolution: self.resolution,
            matrices,
        })
    }
}
