use crate::matrix::BinIndex;

/// Splits the signal into segments that are well approximated by straight
/// lines, and returns the bins where one segment ends and another begins.
///
/// The current segment is extended one bin at a time. Its fitness is its
/// length minus the total absolute deviation of the signal from the line
/// joining the segment endpoints. When extending the segment lowers its
/// fitness, the bin before the current one becomes a turning point and a new
/// segment starts at the current bin.
#[must_use]
pub fn turning_points(signal: &[f64]) -> Vec<BinIndex> {
    let mut points = Vec::new();
    if signal.is_empty() {
        return points;
    }

    let end = signal.len() - 1;
    let mut start = 0;
    let mut current = 0;
    let mut prev_fitness = 0.0;
    while current <= end {
        let fitness = line_fitness(&signal[start..=current]);

        if fitness < prev_fitness {
            points.push(current - 1);
            start = current;
            prev_fitness = 0.0;
        } else {
            prev_fitness = fitness;
            current += 1;
        }
    }

    points
}

/// Segment length minus the total absolute deviation of the segment from
/// the line interpolating its first and last value.
#[must_use]
fn line_fitness(segment: &[f64]) -> f64 {
    let length = segment.len();
    let first = segment[0];
    let last = segment[length - 1];
    let step = if length > 1 {
        (last - first) / (length - 1) as f64
    } else {
        0.0
    };

    let error: f64 = segment
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let fitted = if i == length - 1 {
                last
            } else {
                first + i as f64 * step
            };
            (fitted - value).abs()
        })
        .sum();

    length as f64 - error
}

/// Turning points lying strictly below both neighbouring turning points.
#[must_use]
pub fn local_minima(signal: &[f64], points: &[BinIndex]) -> Vec<BinIndex> {
    points
        .windows(3)
        .filter(|window| {
            let value = signal[window[1]];
            signal[window[0]] > value && signal[window[2]] > value
        })
        .map(|window| window[1])
        .collect()
}

/// Candidate domain boundaries of given bin signal: local minima among its
/// turning points.
#[must_use]
pub fn find_boundaries(signal: &[f64]) -> Vec<BinIndex> {
    let points = turning_points(signal);
    local_minima(signal, &points)
}
