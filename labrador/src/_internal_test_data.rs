use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::matrix::{BinIndex, SparseContactMatrix, RAW_COUNT_FIELD};

pub const TAD_CONTACT_VALUE: f64 = 10.0;
pub const BACKGROUND_CONTACT_VALUE: f64 = 1.0;

lazy_static! {
    pub static ref EXAMPLE_CHR1_MATRIX: SparseContactMatrix = SparseContactMatrix::new(
        vec![0, 1, 0],
        vec![0, 1, 1],
        [(RAW_COUNT_FIELD, vec![5.0, 3.0, 2.0])],
        "chr1",
        1000,
    )
    .unwrap();
    pub static ref SYMMETRIC_12_BIN_MATRIX: SparseContactMatrix = symmetric_test_matrix(12);
    pub static ref TWO_TAD_MATRIX: SparseContactMatrix =
        tad_matrix("chr1", 5000, 40, &[(0, 20), (20, 40)], None);
    pub static ref THREE_TAD_MATRIX: SparseContactMatrix =
        tad_matrix("chr2", 5000, 30, &[(0, 10), (10, 20), (20, 30)], Some(8));
    pub static ref RANDOM_500_BIN_MATRIX: SparseContactMatrix = random_banded_matrix(500, 50);
}

/// Upper-triangular (diagonal included) matrix with strong contacts inside
/// given domains and weak ones elsewhere.
#[must_use]
pub fn tad_matrix(
    chrom: &str,
    resolution: u64,
    num_bins: usize,
    tads: &[(BinIndex, BinIndex)],
    max_distance: Option<usize>,
) -> SparseContactMatrix {
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut values = Vec::new();

    for row in 0..num_bins {
        for col in row..num_bins {
            if max_distance.map_or(false, |max| col - row > max) {
                continue;
            }
            let same_tad = tads
                .iter()
                .any(|&(start, end)| (start..end).contains(&row) && (start..end).contains(&col));

            rows.push(row);
            cols.push(col);
            values.push(if same_tad {
                TAD_CONTACT_VALUE
            } else {
                BACKGROUND_CONTACT_VALUE
            });
        }
    }

    SparseContactMatrix::new(rows, cols, [(RAW_COUNT_FIELD, values)], chrom, resolution)
        .unwrap()
}

/// Full (both triangles stored) symmetric matrix with uneven coverage and a
/// few missing entries.
#[must_use]
pub fn symmetric_test_matrix(num_bins: usize) -> SparseContactMatrix {
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut values = Vec::new();

    for row in 0..num_bins {
        for col in 0..num_bins {
            if (row * col) % 4 == 3 {
                continue;
            }
            rows.push(row);
            cols.push(col);
            values.push((1 + ((row + col) * 3 + row * col) % 5) as f64);
        }
    }

    SparseContactMatrix::new(rows, cols, [(RAW_COUNT_FIELD, values)], "chr1", 1000).unwrap()
}

/// Symmetric matrix with random counts decaying with the distance from the
/// diagonal, stored up to `band` bins away from it.
#[must_use]
pub fn random_banded_matrix(num_bins: usize, band: usize) -> SparseContactMatrix {
    let mut rand = Xoshiro256PlusPlus::seed_from_u64(404);

    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut values = Vec::new();
    for row in 0..num_bins {
        for col in row..num_bins.min(row + band + 1) {
            let expected = 1000.0 / (1 + col - row) as f64;
            let value: f64 = (expected * rand.gen_range(0.5..1.5)).round() + 1.0;

            rows.push(row);
            cols.push(col);
            values.push(value);
            if row != col {
                rows.push(col);
                cols.push(row);
                values.push(value);
            }
        }
    }

    SparseContactMatrix::new(rows, cols, [(RAW_COUNT_FIELD, values)], "chr1", 10_000).unwrap()
}
