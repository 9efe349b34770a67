use std::fmt::{Display, Formatter};

use ndarray::Array1;
use serde::Serialize;

use crate::error::{HicError, HicResult};
use crate::matrix::field::ContactField;

/// Summary statistics of a single contact matrix field.
///
/// `min`, `mean` and `max` only take stored entries into account. `std` is
/// the standard deviation of the single-element sequence holding the number
/// of stored entries, hence it is always `0.0`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MatrixStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub std: f64,
    pub nnz: usize,
}

impl MatrixStats {
    pub(crate) fn of_field(field: &ContactField) -> HicResult<Self> {
        let values = field.values();
        let mean = values
            .mean()
            .ok_or_else(|| HicError::invalid_argument("cannot compute statistics of empty field"))?;
        let min = values.fold(f64::INFINITY, |acc, &value| acc.min(value));
        let max = values.fold(f64::NEG_INFINITY, |acc, &value| acc.max(value));

        let nnz = field.nnz();
        let std = Array1::from_elem(1, nnz as f64).std(0.0);

        Ok(Self {
            min,
            mean,
            max,
            std,
            nnz,
        })
    }
}

impl Display for MatrixStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "min: {:.3}", self.min)?;
        writeln!(f, "mean: {:.3}", self.mean)?;
        writeln!(f, "max: {:.3}", self.max)?;
        writeln!(f, "std: {:.3}", self.std)
    }
}
