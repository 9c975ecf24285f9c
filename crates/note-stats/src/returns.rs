//! Returns, volatility and derived statistics.

use note_core::{EquityStats, PriceSeries};

/// Trading days used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Fewest daily returns for which a volatility estimate is considered reliable.
///
/// Smaller samples still produce a number; callers flag it as low confidence.
pub const MIN_CONFIDENT_RETURNS: usize = 20;

/// Simple daily returns `cur / prev - 1` for consecutive closes.
///
/// Pairs whose previous close is not positive, or where either close is not
/// finite, are skipped.
#[must_use]
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] > 0.0 && w[0].is_finite() && w[1].is_finite())
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Sample standard deviation.
///
/// Divides by `n - 1` when `n > 1`, by 1 otherwise. `None` for an empty slice.
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>();
    let denom = if values.len() > 1 { n - 1.0 } else { 1.0 };
    Some((sum_sq / denom).sqrt())
}

/// Statistics plus the sample size behind the volatility estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatsSummary {
    /// The derived statistics.
    pub stats: EquityStats,
    /// Number of daily returns used for volatility.
    pub return_count: usize,
}

impl StatsSummary {
    /// True when the volatility rests on fewer than [`MIN_CONFIDENT_RETURNS`] returns.
    #[must_use]
    pub const fn low_confidence(&self) -> bool {
        self.return_count < MIN_CONFIDENT_RETURNS
    }
}

/// Computes statistics and reports the return sample size.
///
/// The three fields are derived together: if any of them cannot be computed
/// the result is [`EquityStats::absent`].
#[must_use]
pub fn summarize(series: &PriceSeries) -> StatsSummary {
    let current_price = series.last().map(|p| p.close);
    let range_return = match (series.first(), current_price) {
        (Some(first), Some(current)) if first.close != 0.0 => Some(current / first.close - 1.0),
        _ => None,
    };

    let returns = daily_returns(&series.closes());
    let realised_vol_ann =
        sample_std_dev(&returns).map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt());

    let stats = EquityStats {
        current_price,
        realised_vol_ann,
        range_return,
    };

    StatsSummary {
        stats: if stats.is_complete() {
            stats
        } else {
            EquityStats::absent()
        },
        return_count: returns.len(),
    }
}

/// Computes [`EquityStats`] for a filtered series. Pure; no hidden state.
#[must_use]
pub fn compute_stats(series: &PriceSeries) -> EquityStats {
    summarize(series).stats
}

/// Upside from `current_price` to `target_price`, `target / current - 1`.
///
/// `None` if either input is missing, zero, or not finite.
#[must_use]
pub fn upside_to_target(current_price: Option<f64>, target_price: Option<f64>) -> Option<f64> {
    let current = current_price.filter(|v| v.is_finite() && *v != 0.0)?;
    let target = target_price.filter(|v| v.is_finite() && *v != 0.0)?;
    Some(target / current - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use note_core::PricePoint;
    use proptest::prelude::*;

    fn series_from(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + chrono::Days::new(i as u64), c))
            .collect()
    }

    #[test]
    fn test_daily_returns_skip_bad_pairs() {
        let returns = daily_returns(&[100.0, 110.0, 0.0, 50.0, f64::NAN, 10.0]);
        // 100->110, 110->0; 0->50 skipped (prev 0); 50->NaN and NaN->10 skipped.
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.1).abs() < 1e-12);
        assert!((returns[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_dev() {
        assert_eq!(sample_std_dev(&[]), None);
        assert_eq!(sample_std_dev(&[0.05]), Some(0.0));

        let sd = sample_std_dev(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((sd - 1.290_994_448_735_805_6).abs() < 1e-12);
    }

    #[test]
    fn test_compute_stats_linear_rise() {
        let closes: Vec<f64> = (0..12).map(|i| 100.0 + 2.0 * i as f64).collect();
        let stats = compute_stats(&series_from(&closes));

        assert_eq!(stats.current_price, Some(122.0));
        assert!((stats.range_return.unwrap() - 0.22).abs() < 1e-9);
        assert!(stats.realised_vol_ann.unwrap() > 0.0);
    }

    #[test]
    fn test_volatility_matches_manual() {
        let closes = [100.0, 101.0, 99.0, 102.0];
        let stats = compute_stats(&series_from(&closes));

        let r = [0.01, 99.0 / 101.0 - 1.0, 102.0 / 99.0 - 1.0];
        let mean = r.iter().sum::<f64>() / 3.0;
        let var = r.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 2.0;
        let expected = var.sqrt() * 252f64.sqrt();

        assert!((stats.realised_vol_ann.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_point_is_absent() {
        let stats = compute_stats(&series_from(&[100.0]));
        assert!(stats.is_absent());
        assert!(compute_stats(&PriceSeries::new()).is_absent());
    }

    #[test]
    fn test_two_points_use_degenerate_divisor() {
        let summary = summarize(&series_from(&[100.0, 110.0]));
        assert_eq!(summary.return_count, 1);
        assert_eq!(summary.stats.realised_vol_ann, Some(0.0));
        assert!(summary.low_confidence());
    }

    #[test]
    fn test_upside_to_target() {
        let upside = upside_to_target(Some(100.0), Some(110.0)).unwrap();
        assert!((upside - 0.10).abs() < 1e-12);
        assert_eq!(upside_to_target(Some(100.0), Some(0.0)), None);
        assert_eq!(upside_to_target(Some(0.0), Some(100.0)), None);
        assert_eq!(upside_to_target(None, Some(100.0)), None);
        assert_eq!(upside_to_target(Some(100.0), Some(f64::INFINITY)), None);
    }

    proptest! {
        #[test]
        fn prop_range_return_matches_endpoints(
            closes in proptest::collection::vec(0.01f64..10_000.0, 10..200)
        ) {
            let series = series_from(&closes);
            let stats = compute_stats(&series);
            let expected = closes[closes.len() - 1] / closes[0] - 1.0;
            prop_assert!((stats.range_return.unwrap() - expected).abs() < 1e-9);
            prop_assert_eq!(stats.current_price, Some(closes[closes.len() - 1]));
        }

        #[test]
        fn prop_compute_stats_is_idempotent(
            closes in proptest::collection::vec(0.01f64..10_000.0, 10..100)
        ) {
            let series = series_from(&closes);
            prop_assert_eq!(compute_stats(&series), compute_stats(&series));
        }

        #[test]
        fn prop_constant_return_has_zero_vol(r in -0.05f64..0.05, n in 10usize..60) {
            let closes: Vec<f64> = (0..n).map(|i| 100.0 * (1.0 + r).powi(i as i32)).collect();
            let stats = compute_stats(&series_from(&closes));
            prop_assert!(stats.realised_vol_ann.unwrap() < 1e-9);
        }
    }
}
