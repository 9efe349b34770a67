//! TopDom topologically associating domain (TAD) caller.
//!
//! See Shin et al., *TopDom: an efficient and deterministic method for
//! identifying topological domains in genomes*, Nucleic Acids Research 44
//! (2016).

use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use serde::Serialize;

pub use crate::topdom::ranksum::{rank_sum_less, RankSumResult};
pub use crate::topdom::segmentation::{find_boundaries, local_minima, turning_points};
use crate::error::{HicError, HicResult};
use crate::matrix::{BinIndex, ContactField, SparseContactMatrix};
use crate::progress::{DummyProgressNotifier, ProgressNotifier};
use crate::topdom::signal::RowIndex;

mod ranksum;
mod segmentation;
mod signal;

/// Boundaries whose rank-sum p-value is at least this value are discarded.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// A domain boundary found by the TAD caller.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TadBoundary {
    pub bin: BinIndex,
    /// Genomic coordinate of the start of the boundary bin.
    pub coordinate: u64,
    /// Only present if the significance test has been run.
    pub p_value: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TopDomParams {
    window_size: u64,
    resolution: Option<u64>,
    significance_test: bool,
    thread_num: usize,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl TopDomParams {
    pub fn builder() -> TopDomParamsBuilder {
        TopDomParamsBuilder::new()
    }

    #[must_use]
    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    #[must_use]
    pub fn significance_test(&self) -> bool {
        self.significance_test
    }
}

impl Default for TopDomParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
pub struct TopDomParamsBuilder {
    window_size: u64,
    resolution: Option<u64>,
    significance_test: bool,
    thread_num: usize,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl TopDomParamsBuilder {
    pub fn new() -> Self {
        Self {
            window_size: 250_000,
            resolution: None,
            significance_test: true,
            thread_num: 0,
            progress_notifier: Arc::new(DummyProgressNotifier),
        }
    }

    /// Genomic distance the bin signal looks upstream and downstream of each
    /// bin; must be at least one bin long.
    pub fn window_size(&mut self, window_size: u64) -> &mut Self {
        self.window_size = window_size;
        self
    }

    /// Bin width to use instead of the resolution of the matrix.
    pub fn resolution(&mut self, resolution: u64) -> &mut Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn significance_test(&mut self, significance_test: bool) -> &mut Self {
        self.significance_test = significance_test;
        self
    }

    /// Number of threads computing the bin signal; `0` uses all available
    /// cores.
    pub fn thread_num(&mut self, thread_num: usize) -> &mut Self {
        self.thread_num = thread_num;
        self
    }

    pub fn progress_notifier(&mut self, progress_notifier: Arc<dyn ProgressNotifier>) -> &mut Self {
        self.progress_notifier = progress_notifier;
        self
    }

    pub fn build(&mut self) -> TopDomParams {
        TopDomParams {
            window_size: self.window_size,
            resolution: self.resolution,
            significance_test: self.significance_test,
            thread_num: self.thread_num,
            progress_notifier: self.progress_notifier.clone(),
        }
    }
}

impl Default for TopDomParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Calls domain boundaries in given field binned at `resolution`.
///
/// # Errors
/// Returns [`HicError::InvalidArgument`] if `resolution` is zero or the
/// window is shorter than one bin or too long to be squared, or
/// [`HicError::ThreadPool`] if the worker threads could not be started.
pub fn call_topdom(
    field: &ContactField,
    resolution: u64,
    params: &TopDomParams,
) -> HicResult<Vec<TadBoundary>> {
    if resolution == 0 {
        return Err(HicError::invalid_argument("resolution must be positive"));
    }
    if params.window_size < resolution {
        return Err(HicError::invalid_argument(format!(
            "window size ({}) must not be smaller than the resolution ({})",
            params.window_size, resolution
        )));
    }
    let window = usize::try_from(params.window_size / resolution)
        .ok()
        .filter(|&window| window_area(window).is_some())
        .ok_or_else(|| {
            HicError::invalid_argument(format!(
                "window size ({}) is too large for the resolution ({})",
                params.window_size, resolution
            ))
        })?;

    info!("Performing TopDom TAD calling (window: {} bins)", window);
    let index = RowIndex::new(field);

    info!("Step 1: calculating bin signal");
    let signal = bin_signal(&index, field.max_col(), window, params)?;

    info!("Step 2: curve fitting");
    let points = turning_points(&signal);
    let minima = local_minima(&signal, &points);
    debug!(
        "Found {} turning points, {} local minima",
        points.len(),
        minima.len()
    );

    let boundaries: Vec<(BinIndex, Option<f64>)> = if params.significance_test {
        info!("Step 3: Wilcoxon rank-sum test");
        minima
            .into_iter()
            .filter_map(|bin| {
                let p_value = boundary_p_value(&index, bin, window);
                debug!("Boundary candidate {}: p-value = {}", bin, p_value);
                (p_value < SIGNIFICANCE_LEVEL).then(|| (bin, Some(p_value)))
            })
            .collect()
    } else {
        minima.into_iter().map(|bin| (bin, None)).collect()
    };
    info!("Found {} domain boundaries", boundaries.len());

    Ok(boundaries
        .into_iter()
        .map(|(bin, p_value)| TadBoundary {
            bin,
            coordinate: bin as u64 * resolution,
            p_value,
        })
        .collect())
}

/// Computes the signal of every bin up to `max_col` in a dedicated thread
/// pool.
fn bin_signal(
    index: &RowIndex,
    max_col: Option<BinIndex>,
    window: usize,
    params: &TopDomParams,
) -> HicResult<Vec<f64>> {
    let num_bins = max_col.map_or(0, |max_col| max_col + 1);
    let progress_notifier = &params.progress_notifier;
    progress_notifier.set_iter_num(num_bins as u64);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.thread_num)
        .thread_name(|index| format!("topdom-{}", index))
        .build()?;

    let mut signal = Vec::with_capacity(num_bins);
    pool.install(|| {
        (0..num_bins)
            .into_par_iter()
            .map(|bin| {
                let value = index.bin_signal(bin, window);
                progress_notifier.inc_iter();
                value
            })
            .collect_into_vec(&mut signal);
    });

    Ok(signal)
}

/// Number of values in both samples of the rank-sum test, `2 * window²`.
#[must_use]
fn window_area(window: usize) -> Option<usize> {
    window.checked_mul(window)?.checked_mul(2)
}

/// P-value of the hypothesis that contacts across the boundary are weaker
/// than contacts on either side of it.
///
/// Both samples are zero-padded to the area of the two flanking triangles'
/// enclosing squares, so that unstored contacts count as zeros.
fn boundary_p_value(index: &RowIndex, bin: BinIndex, window: usize) -> f64 {
    let padded_len = 2 * window * window;

    let mut within: Vec<f64> = index.within_values(bin, window).collect();
    let mut between: Vec<f64> = index.between_values(bin, window).collect();
    within.resize(padded_len.max(within.len()), 0.0);
    between.resize(padded_len.max(between.len()), 0.0);

    rank_sum_less(&within, &between).p_value
}

impl SparseContactMatrix {
    /// Calls domain boundaries in given field. Uses the resolution of the
    /// matrix unless the parameters override it.
    ///
    /// # Errors
    /// Returns [`HicError::FieldNotFound`] if there is no such field, or any
    /// error of [`call_topdom`].
    pub fn call_topdom(&self, field: &str, params: &TopDomParams) -> HicResult<Vec<TadBoundary>> {
        let resolution = params.resolution.unwrap_or_else(|| self.resolution());
        info!(
            "Calling domains in field {} of chromosome {}",
            field,
            self.chrom()
        );

        call_topdom(self.field(field)?, resolution, params)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use crate::_internal_test_data::{tad_matrix, THREE_TAD_MATRIX, TWO_TAD_MATRIX};
    use crate::error::HicError;
    use crate::matrix::{SparseContactMatrix, RAW_COUNT_FIELD};
    use crate::progress::tests::CountingProgressNotifier;
    use crate::topdom::signal::RowIndex;
    use crate::topdom::{boundary_p_value, TopDomParams};

    fn params(window_size: u64, significance_test: bool) -> TopDomParams {
        TopDomParams::builder()
            .window_size(window_size)
            .significance_test(significance_test)
            .build()
    }

    #[test_log::test]
    fn test_two_domains() {
        let boundaries = TWO_TAD_MATRIX
            .call_topdom(RAW_COUNT_FIELD, &params(15_000, false))
            .unwrap();

        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].bin, 19);
        assert_eq!(boundaries[0].coordinate, 19 * 5000);
        assert_eq!(boundaries[0].p_value, None);
    }

    #[test_log::test]
    fn test_three_domains_significant() {
        let boundaries = THREE_TAD_MATRIX
            .call_topdom(RAW_COUNT_FIELD, &params(15_000, true))
            .unwrap();

        let coordinates: Vec<u64> = boundaries.iter().map(|b| b.coordinate).collect();
        assert_eq!(coordinates, [9 * 5000, 19 * 5000]);
        for boundary in boundaries {
            assert!(boundary.p_value.unwrap() < 0.05);
        }
    }

    #[test]
    fn test_single_thread_matches_parallel() {
        let single = TopDomParams::builder()
            .window_size(15_000)
            .thread_num(1)
            .build();
        let parallel = TopDomParams::builder()
            .window_size(15_000)
            .thread_num(4)
            .build();

        assert_eq!(
            THREE_TAD_MATRIX.call_topdom(RAW_COUNT_FIELD, &single).unwrap(),
            THREE_TAD_MATRIX.call_topdom(RAW_COUNT_FIELD, &parallel).unwrap()
        );
    }

    #[test]
    fn test_progress_counts_bins() {
        let notifier = Arc::new(CountingProgressNotifier::default());
        let params = TopDomParams::builder()
            .window_size(15_000)
            .progress_notifier(notifier.clone())
            .build();

        TWO_TAD_MATRIX.call_topdom(RAW_COUNT_FIELD, &params).unwrap();

        assert_eq!(notifier.iter_num.load(Ordering::SeqCst), 40);
        assert_eq!(notifier.iters.load(Ordering::SeqCst), 40);
    }

    #[test]
    fn test_significance_keeps_empty_diamond() {
        // Within diamond of bin 3 empty, flanking triangles full of 10s
        let mut rows = Vec::new();
        let mut cols = Vec::new();
        for (start, end) in [(1, 3), (4, 6)] {
            for row in start..end {
                for col in row..end {
                    rows.push(row);
                    cols.push(col);
                }
            }
        }
        let values = vec![10.0; rows.len()];
        let matrix =
            SparseContactMatrix::new(rows, cols, [(RAW_COUNT_FIELD, values)], "chr1", 100)
                .unwrap();
        let index = RowIndex::new(matrix.field(RAW_COUNT_FIELD).unwrap());

        assert!(boundary_p_value(&index, 3, 2) < 0.05);
    }

    #[test]
    fn test_significance_drops_uniform_contacts() {
        let matrix = tad_matrix("chr1", 100, 12, &[(0, 12)], None);
        let index = RowIndex::new(matrix.field(RAW_COUNT_FIELD).unwrap());

        // Diamond and triangles hold the same values
        assert!(boundary_p_value(&index, 6, 2) >= 0.05);
    }

    #[test]
    fn test_window_smaller_than_resolution() {
        let result = TWO_TAD_MATRIX.call_topdom(RAW_COUNT_FIELD, &params(4_999, false));

        assert!(matches!(result, Err(HicError::InvalidArgument(_))));
    }

    #[test]
    fn test_window_too_large() {
        let params = TopDomParams::builder()
            .window_size(1 << 40)
            .resolution(1)
            .build();

        let result = TWO_TAD_MATRIX.call_topdom(RAW_COUNT_FIELD, &params);

        assert!(matches!(result, Err(HicError::InvalidArgument(_))));
    }

    #[test_log::test]
    fn test_nan_contact_is_ignored() {
        let field = TWO_TAD_MATRIX.field(RAW_COUNT_FIELD).unwrap();
        let values: Vec<f64> = field
            .iter()
            .map(|(row, col, value)| if (row, col) == (17, 17) { f64::NAN } else { value })
            .collect();
        let matrix = SparseContactMatrix::new(
            field.rows().to_vec(),
            field.cols().to_vec(),
            [(RAW_COUNT_FIELD, values)],
            "chr1",
            5000,
        )
        .unwrap();

        let boundaries = matrix
            .call_topdom(RAW_COUNT_FIELD, &params(15_000, true))
            .unwrap();

        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].bin, 19);
        assert_relative_eq!(boundaries[0].p_value.unwrap(), 0.005_796_4, max_relative = 1e-4);
    }

    #[test]
    fn test_zero_resolution_override() {
        let params = TopDomParams::builder()
            .window_size(15_000)
            .resolution(0)
            .build();

        let result = TWO_TAD_MATRIX.call_topdom(RAW_COUNT_FIELD, &params);

        assert!(matches!(result, Err(HicError::InvalidArgument(_))));
    }

    #[test]
    fn test_unknown_field() {
        let result = TWO_TAD_MATRIX.call_topdom("ICE", &params(15_000, false));

        assert!(matches!(result, Err(HicError::FieldNotFound { .. })));
    }
}
