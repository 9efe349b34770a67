//! One-sided Wilcoxon rank-sum (Mann-Whitney U) test.

use std::f64::consts::SQRT_2;

use itertools::Itertools;
use serde::Serialize;

/// Result of a rank-sum test.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RankSumResult {
    /// The U statistic of the second sample.
    pub statistic: f64,
    pub p_value: f64,
}

/// Tests the alternative hypothesis that values of `x` tend to be smaller
/// than values of `y`.
///
/// NaN values are omitted from both samples. Uses the normal approximation
/// of the U statistic with tie and continuity correction. When the variance
/// of the statistic is zero (e.g. all the values are equal) or either sample
/// is empty, the p-value is `1.0`.
#[must_use]
pub fn rank_sum_less(x: &[f64], y: &[f64]) -> RankSumResult {
    let x = x.iter().copied().filter(|value| !value.is_nan()).collect_vec();
    let y = y.iter().copied().filter(|value| !value.is_nan()).collect_vec();
    let nx = x.len() as f64;
    let ny = y.len() as f64;
    let n = nx + ny;

    let combined = x.iter().chain(y.iter()).copied().collect_vec();
    let (ranks, tie_term) = average_ranks(&combined);

    let rank_sum_x: f64 = ranks[..x.len()].iter().sum();
    let u_x = rank_sum_x - nx * (nx + 1.0) / 2.0;
    let u_y = nx * ny - u_x;

    let mean = nx * ny / 2.0;
    let variance = if n > 1.0 {
        nx * ny / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)))
    } else {
        0.0
    };

    let p_value = if variance > 0.0 {
        let z = (u_y - mean - 0.5) / variance.sqrt();
        normal_sf(z).min(1.0)
    } else {
        1.0
    };

    RankSumResult {
        statistic: u_y,
        p_value,
    }
}

/// Ranks of the values (1-based, ties get the average of their ranks), and
/// the tie correction term `Σ(t³ - t)` over groups of `t` tied values.
fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let order = (0..values.len())
        .sorted_by(|&a, &b| values[a].total_cmp(&values[b]))
        .collect_vec();

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut group_start = 0;
    while group_start < order.len() {
        let value = values[order[group_start]];
        let group_len = order[group_start..]
            .iter()
            .take_while(|&&index| values[index] == value)
            .count()
            .max(1);

        // Average of ranks group_start + 1 ..= group_start + group_len
        let rank = group_start as f64 + (group_len as f64 + 1.0) / 2.0;
        for &index in &order[group_start..group_start + group_len] {
            ranks[index] = rank;
        }

        let t = group_len as f64;
        tie_term += t * t * t - t;
        group_start += group_len;
    }

    (ranks, tie_term)
}

/// Survival function (upper tail probability) of the standard normal
/// distribution.
#[must_use]
fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / SQRT_2)
}

/// Complementary error function, with fractional error below 1.2e-7
/// (Chebyshev approximation from *Numerical Recipes*).
#[must_use]
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let result = t * poly.exp();

    if x >= 0.0 {
        result
    } else {
        2.0 - result
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::topdom::ranksum::{average_ranks, erfc, rank_sum_less};

    #[test]
    fn test_erfc() {
        assert_relative_eq!(erfc(0.0), 1.0, max_relative = 1e-6);
        assert_relative_eq!(erfc(1.0), 0.157_299_207, max_relative = 1e-6);
        assert_relative_eq!(erfc(-1.0), 1.842_700_793, max_relative = 1e-6);
        assert_relative_eq!(erfc(2.5), 4.069_520_174e-4, max_relative = 1e-6);
    }

    #[test]
    fn test_average_ranks() {
        let (ranks, tie_term) = average_ranks(&[3.0, 1.0, 3.0, 2.0, 3.0]);

        assert_eq!(ranks, [4.0, 1.0, 4.0, 2.0, 4.0]);
        assert_eq!(tie_term, 24.0);
    }

    #[test]
    fn test_zeros_below_tens() {
        let within = [0.0; 8];
        let between = [10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 0.0, 0.0];

        let result = rank_sum_less(&within, &between);

        assert_eq!(result.statistic, 56.0);
        assert_relative_eq!(result.p_value, 0.001_654_35, max_relative = 1e-4);
    }

    #[test]
    fn test_identical_samples() {
        let sample = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0];

        let result = rank_sum_less(&sample, &sample);

        assert_eq!(result.statistic, 18.0);
        assert!(result.p_value > 0.5);
    }

    #[test]
    fn test_larger_values_are_not_significant() {
        let result = rank_sum_less(&[10.0; 5], &[0.0, 1.0, 2.0, 3.0, 4.0]);

        assert!(result.p_value > 0.99);
    }

    #[test]
    fn test_nan_values_are_omitted() {
        let result = rank_sum_less(&[0.0, f64::NAN], &[1.0, f64::NAN, 2.0]);

        assert_eq!(result, rank_sum_less(&[0.0], &[1.0, 2.0]));
        assert_eq!(result.statistic, 2.0);
        assert_relative_eq!(result.p_value, 0.270_145_687, max_relative = 1e-5);
    }

    #[test]
    fn test_average_ranks_with_nan() {
        let (ranks, tie_term) = average_ranks(&[f64::NAN, 1.0, f64::NAN]);

        assert_eq!(ranks, [2.0, 1.0, 3.0]);
        assert_eq!(tie_term, 0.0);
    }

    #[test]
    fn test_degenerate_samples() {
        assert_eq!(rank_sum_less(&[0.0; 4], &[0.0; 4]).p_value, 1.0);
        assert_eq!(rank_sum_less(&[], &[1.0, 2.0]).p_value, 1.0);
    }
}
