//! Bias correction of contact matrices.
//!
//! Every method reads one field of a [`SparseContactMatrix`] and stores its
//! output as a new field named after the method.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::info;

pub use crate::normalization::ice::{IceNormalizer, IceNormalizerBuilder};
pub use crate::normalization::minmax::MinMaxNormalizer;
pub use crate::normalization::scn::{ScnNormalizer, ScnNormalizerBuilder};
use crate::error::{HicError, HicResult};
use crate::matrix::{ContactField, SparseContactMatrix};

mod ice;
mod minmax;
mod scn;

/// A normalization strategy: computes a new field out of an existing one.
pub trait Normalizer {
    /// # Errors
    /// Returns [`HicError::InvalidArgument`] if the field cannot be
    /// normalized with this method (e.g. it is empty).
    fn normalize(&self, field: &ContactField) -> HicResult<ContactField>;
}

/// Supported normalization methods, along with their parameters.
#[derive(Debug, Clone)]
pub enum NormalizationMethod {
    /// Iterative correction and eigenvector decomposition.
    Ice(IceNormalizer),
    /// Sequential component normalization.
    Scn(ScnNormalizer),
    /// Linear rescaling of stored values to `[0, 1]`.
    MinMax,
}

impl NormalizationMethod {
    /// Names of all the supported methods; these are also the names of the
    /// fields the methods produce.
    pub const NAMES: [&'static str; 3] = ["ICE", "SCN", "MinMax"];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            NormalizationMethod::Ice(_) => Self::NAMES[0],
            NormalizationMethod::Scn(_) => Self::NAMES[1],
            NormalizationMethod::MinMax => Self::NAMES[2],
        }
    }
}

impl Normalizer for NormalizationMethod {
    fn normalize(&self, field: &ContactField) -> HicResult<ContactField> {
        match self {
            NormalizationMethod::Ice(normalizer) => normalizer.normalize(field),
            NormalizationMethod::Scn(normalizer) => normalizer.normalize(field),
            NormalizationMethod::MinMax => MinMaxNormalizer.normalize(field),
        }
    }
}

impl FromStr for NormalizationMethod {
    type Err = HicError;

    /// Parses a method name (case-insensitive), using default parameters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ice" => Ok(NormalizationMethod::Ice(IceNormalizer::default())),
            "scn" => Ok(NormalizationMethod::Scn(ScnNormalizer::default())),
            "minmax" => Ok(NormalizationMethod::MinMax),
            _ => Err(HicError::UnsupportedMethod(s.to_owned())),
        }
    }
}

impl Display for NormalizationMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl SparseContactMatrix {
    /// Normalizes `source_field` with given method and stores the result as
    /// a new field named after the method.
    ///
    /// # Errors
    /// Returns [`HicError::FieldNotFound`] if the source field does not
    /// exist, [`HicError::FieldExists`] if the matrix has already been
    /// normalized with this method, or any error of the method itself.
    pub fn normalize(
        &mut self,
        method: &NormalizationMethod,
        source_field: &str,
    ) -> HicResult<&ContactField> {
        let target = method.name();
        if self.has_field(target) {
            return Err(HicError::FieldExists(target.to_owned()));
        }

        info!(
            "Normalizing field {} of chromosome {} with {}",
            source_field,
            self.chrom(),
            method
        );
        let normalized = method.normalize(self.field(source_field)?)?;
        self.add_field(target, normalized)?;

        self.field(target)
    }

    /// Like [`SparseContactMatrix::normalize`], but takes the method name.
    /// Default parameters of the method are used.
    ///
    /// # Errors
    /// Returns [`HicError::UnsupportedMethod`] if the name does not denote a
    /// supported method, or any error of [`SparseContactMatrix::normalize`].
    pub fn normalize_by_name(
        &mut self,
        method_name: &str,
        source_field: &str,
    ) -> HicResult<&ContactField> {
        let method: NormalizationMethod = method_name.parse()?;
        self.normalize(&method, source_field)
    }
}
