use std::sync::Arc;

use log::{debug, info};
use ndarray::{Array1, ArrayView1, Zip};

use crate::error::{HicError, HicResult};
use crate::matrix::{BinIndex, ContactField};
use crate::normalization::Normalizer;
use crate::progress::{DummyProgressNotifier, ProgressNotifier};

/// Iterative correction (ICE) of a contact matrix.
///
/// Estimates a per-bin bias vector by repeatedly dividing the matrix by the
/// normalized marginal coverage, until the bias stops changing. The output
/// is the source field divided by `bias[row] * bias[col]`.
///
/// See Imakaev et al., *Iterative correction of Hi-C data reveals hallmarks
/// of chromosome organization*, Nature Methods 9 (2012).
#[derive(Debug, Clone)]
pub struct IceNormalizer {
    max_iter: usize,
    threshold: f64,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl IceNormalizer {
    pub fn builder() -> IceNormalizerBuilder {
        IceNormalizerBuilder::new()
    }

    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Estimates the bias vector of given field. Returns the bias along with
    /// the number of iterations performed.
    fn estimate_bias(&self, field: &ContactField) -> HicResult<(Array1<f64>, usize)> {
        let (max_row, max_col) = match (field.max_row(), field.max_col()) {
            (Some(max_row), Some(max_col)) => (max_row, max_col),
            _ => {
                return Err(HicError::invalid_argument(
                    "ICE normalization requires a non-empty field",
                ))
            }
        };
        let num_bins = max_row.max(max_col) + 1;

        let rows = ArrayView1::from(field.rows());
        let cols = ArrayView1::from(field.cols());
        // The matrix is expected to be (close to) square; take the marginals
        // along the longer axis
        let coverage_bins = if max_row >= max_col { rows } else { cols };

        let mut bias = Array1::<f64>::ones(num_bins);
        let mut working = field.values().to_owned();

        self.progress_notifier.set_iter_num(self.max_iter as u64);
        let mut iterations = 0;
        for iteration in 1..=self.max_iter {
            iterations = iteration;

            let coverage = marginal_coverage(coverage_bins, &working, num_bins);
            let delta = match delta_bias(&coverage) {
                Some(delta) => delta,
                None => {
                    debug!("No bin has nonzero coverage; stopping");
                    break;
                }
            };

            Zip::from(&mut working)
                .and(rows)
                .and(cols)
                .for_each(|value, &row, &col| *value /= delta[row] * delta[col]);

            let new_bias = &bias * &delta;
            let diff = (&new_bias - &bias).mapv(f64::abs).sum();
            bias = new_bias;
            self.progress_notifier.inc_iter();

            if diff < self.threshold {
                info!(
                    "Reached convergence criteria after {} iterations (bias difference: {})",
                    iteration, diff
                );
                break;
            }
            if iteration % 10 == 0 {
                info!("Iteration {}: bias difference = {}", iteration, diff);
            }
        }

        Ok((bias, iterations))
    }
}

impl Normalizer for IceNormalizer {
    fn normalize(&self, field: &ContactField) -> HicResult<ContactField> {
        info!("Performing ICE normalization");

        let (bias, iterations) = self.estimate_bias(field)?;
        debug!("ICE bias estimated in {} iterations", iterations);

        let mut normalized = field.values().to_owned();
        Zip::from(&mut normalized)
            .and(ArrayView1::from(field.rows()))
            .and(ArrayView1::from(field.cols()))
            .for_each(|value, &row, &col| *value /= bias[row] * bias[col]);

        field.with_values(normalized)
    }
}

impl Default for IceNormalizer {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Sums the values stored in each bin of given axis.
#[must_use]
fn marginal_coverage(
    bins: ArrayView1<'_, BinIndex>,
    values: &Array1<f64>,
    num_bins: usize,
) -> Array1<f64> {
    let mut coverage = Array1::<f64>::zeros(num_bins);
    Zip::from(bins)
        .and(values)
        .for_each(|&bin, &value| coverage[bin] += value);

    coverage
}

/// Coverage relative to the mean coverage of covered bins. Uncovered bins
/// get the neutral value of `1.0`. Returns `None` if no bin is covered.
#[must_use]
fn delta_bias(coverage: &Array1<f64>) -> Option<Array1<f64>> {
    let (sum, count) = coverage
        .iter()
        .filter(|&&value| value != 0.0)
        .fold((0.0, 0usize), |(sum, count), &value| (sum + value, count + 1));
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;

    let mut delta = coverage / mean;
    delta.mapv_inplace(|value| if value == 0.0 { 1.0 } else { value });
    Some(delta)
}

#[derive(Debug, Clone)]
pub struct IceNormalizerBuilder {
    max_iter: usize,
    threshold: f64,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl IceNormalizerBuilder {
    pub fn new() -> Self {
        Self {
            max_iter: 50,
            threshold: 1e-3,
            progress_notifier: Arc::new(DummyProgressNotifier),
        }
    }

    /// Maximum number of iterations.
    pub fn max_iter(&mut self, max_iter: usize) -> &mut Self {
        self.max_iter = max_iter;
        self
    }

    /// Iteration stops when the L1 change of the bias vector falls below
    /// this value.
    pub fn threshold(&mut self, threshold: f64) -> &mut Self {
        self.threshold = threshold;
        self
    }

    pub fn progress_notifier(&mut self, progress_notifier: Arc<dyn ProgressNotifier>) -> &mut Self {
        self.progress_notifier = progress_notifier;
        self
    }

    pub fn build(&mut self) -> IceNormalizer {
        IceNormalizer {
            max_iter: self.max_iter,
            threshold: self.threshold,
            progress_notifier: self.progress_notifier.clone(),
        }
    }
}

impl Default for IceNormalizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
