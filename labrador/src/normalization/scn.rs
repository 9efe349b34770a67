use std::sync::Arc;

use log::{debug, info};
use ndarray::{Array1, ArrayView1, Zip};

use crate::error::{HicError, HicResult};
use crate::matrix::{BinIndex, ContactField};
use crate::normalization::Normalizer;
use crate::progress::{DummyProgressNotifier, ProgressNotifier};

/// Sequential component normalization (SCN).
///
/// Alternately scales every column, then every row, to unit Euclidean norm,
/// for a fixed number of iterations. Norms only take stored entries into
/// account. A column or row with zero norm is left as it is.
///
/// See Cournac et al., *Normalization of a chromosomal contact map*, BMC
/// Genomics 13 (2012).
#[derive(Debug, Clone)]
pub struct ScnNormalizer {
    iterations: usize,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl ScnNormalizer {
    pub fn builder() -> ScnNormalizerBuilder {
        ScnNormalizerBuilder::new()
    }

    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl Normalizer for ScnNormalizer {
    fn normalize(&self, field: &ContactField) -> HicResult<ContactField> {
        info!("Performing SCN normalization");

        let (max_row, max_col) = match (field.max_row(), field.max_col()) {
            (Some(max_row), Some(max_col)) => (max_row, max_col),
            _ => {
                return Err(HicError::invalid_argument(
                    "SCN normalization requires a non-empty field",
                ))
            }
        };
        let rows = ArrayView1::from(field.rows());
        let cols = ArrayView1::from(field.cols());

        let mut working = field.values().to_owned();
        self.progress_notifier.set_iter_num(self.iterations as u64);
        for iteration in 0..self.iterations {
            let col_norms = l2_norms(cols, &working, max_col + 1);
            divide_by_norms(&mut working, cols, &col_norms);

            let row_norms = l2_norms(rows, &working, max_row + 1);
            divide_by_norms(&mut working, rows, &row_norms);

            if iteration % 10 == 0 {
                debug!(
                    "Iteration {}: mean column sum = {}",
                    iteration,
                    working.sum() / (max_col + 1) as f64
                );
            }
            self.progress_notifier.inc_iter();
        }

        field.with_values(working)
    }
}

impl Default for ScnNormalizer {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Euclidean norm of the stored values of each bin of given axis; zero
/// norms are replaced with `1.0`.
#[must_use]
fn l2_norms(bins: ArrayView1<'_, BinIndex>, values: &Array1<f64>, num_bins: usize) -> Array1<f64> {
    let mut norms = Array1::<f64>::zeros(num_bins);
    Zip::from(bins)
        .and(values)
        .for_each(|&bin, &value| norms[bin] += value * value);

    norms.mapv_inplace(|squared| if squared == 0.0 { 1.0 } else { squared.sqrt() });
    norms
}

fn divide_by_norms(values: &mut Array1<f64>, bins: ArrayView1<'_, BinIndex>, norms: &Array1<f64>) {
    Zip::from(values)
        .and(bins)
        .for_each(|value, &bin| *value /= norms[bin]);
}

#[derive(Debug, Clone)]
pub struct ScnNormalizerBuilder {
    iterations: usize,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl ScnNormalizerBuilder {
    pub fn new() -> Self {
        Self {
            iterations: 10,
            progress_notifier: Arc::new(DummyProgressNotifier),
        }
    }

    /// Number of column-then-row scaling rounds.
    pub fn iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    pub fn progress_notifier(&mut self, progress_notifier: Arc<dyn ProgressNotifier>) -> &mut Self {
        self.progress_notifier = progress_notifier;
        self
    }

    pub fn build(&mut self) -> ScnNormalizer {
        ScnNormalizer {
            iterations: self.iterations,
            progress_notifier: self.progress_notifier.clone(),
        }
    }
}

impl Default for ScnNormalizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
