//! Cardinal-spline smoothing of the price line.

/// Samples drawn between each pair of closes.
const STEPS_PER_SEGMENT: usize = 8;

/// Returns `(index, value)` points along a cardinal spline through `values`.
///
/// `tension` scales the tangents; 0.0 yields the original polyline and 0.5 is
/// Catmull-Rom. The curve passes through every input point.
#[must_use]
pub fn smooth_line(values: &[f64], tension: f64) -> Vec<(f64, f64)> {
    let n = values.len();
    if n < 3 || tension <= 0.0 {
        return values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .collect();
    }

    let tangent = |i: usize| {
        let lo = i.saturating_sub(1);
        let hi = (i + 1).min(n - 1);
        2.0 * tension * (values[hi] - values[lo]) / (hi - lo) as f64
    };

    let mut points = Vec::with_capacity((n - 1) * STEPS_PER_SEGMENT + 1);
    for i in 0..n - 1 {
        let (p0, p1) = (values[i], values[i + 1]);
        let (m0, m1) = (tangent(i), tangent(i + 1));
        for step in 0..STEPS_PER_SEGMENT {
            let t = step as f64 / STEPS_PER_SEGMENT as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let y = (2.0 * t3 - 3.0 * t2 + 1.0) * p0
                + (t3 - 2.0 * t2 + t) * m0
                + (-2.0 * t3 + 3.0 * t2) * p1
                + (t3 - t2) * m1;
            points.push((i as f64 + t, y));
        }
    }
    points.push(((n - 1) as f64, values[n - 1]));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_tension_is_polyline() {
        let pts = smooth_line(&[1.0, 3.0, 2.0], 0.0);
        assert_eq!(pts, vec![(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]);
    }

    #[test]
    fn test_curve_passes_through_inputs() {
        let values = [10.0, 12.0, 11.0, 15.0];
        let pts = smooth_line(&values, 0.3);
        assert_eq!(pts.len(), 3 * STEPS_PER_SEGMENT + 1);
        for (i, v) in values.iter().enumerate() {
            let hit = pts
                .iter()
                .find(|(x, _)| (*x - i as f64).abs() < 1e-12)
                .unwrap();
            assert!((hit.1 - v).abs() < 1e-12);
        }
    }

    #[test]
    fn test_linear_input_stays_linear() {
        let values: Vec<f64> = (0..5).map(|i| i as f64 * 2.0).collect();
        for (x, y) in smooth_line(&values, 0.5) {
            assert!((y - 2.0 * x).abs() < 1e-9, "({x}, {y})");
        }
    }
}
