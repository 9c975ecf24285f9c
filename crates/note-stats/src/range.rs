//! Trailing window filtering.

use chrono::NaiveDate;
use note_core::{NoteError, PriceSeries, RangeWindow, Result};
use tracing::debug;

/// Fewest points a window may hold and still be charted.
pub const MIN_RANGE_POINTS: usize = 10;

/// Keeps the points dated on or after the window's cutoff from `today`.
///
/// # Errors
///
/// [`NoteError::InsufficientData`] if fewer than [`MIN_RANGE_POINTS`] remain.
pub fn filter_range(
    series: &PriceSeries,
    window: RangeWindow,
    today: NaiveDate,
) -> Result<PriceSeries> {
    let cutoff = window.cutoff(today);
    let filtered: PriceSeries = series.iter().filter(|p| p.date >= cutoff).copied().collect();

    debug!(
        window = %window,
        %cutoff,
        kept = filtered.len(),
        total = series.len(),
        "Applied range window"
    );

    if filtered.len() < MIN_RANGE_POINTS {
        return Err(NoteError::InsufficientData(format!(
            "only {} prices in the last {}, need at least {}",
            filtered.len(),
            window,
            MIN_RANGE_POINTS
        )));
    }
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use note_core::PricePoint;

    fn daily_series(start: NaiveDate, n: usize) -> PriceSeries {
        (0..n)
            .map(|i| PricePoint::new(start + chrono::Days::new(i as u64), 100.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_filter_keeps_cutoff_day() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        let series = daily_series(start, 200);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let filtered = filter_range(&series, RangeWindow::SixMonths, today).unwrap();

        assert_eq!(filtered.first().unwrap().date, start);
        assert_eq!(filtered.len(), 200);

        let filtered = filter_range(&series, RangeWindow::SixMonths, today + chrono::Days::new(10))
            .unwrap();
        assert_eq!(
            filtered.first().unwrap().date,
            NaiveDate::from_ymd_opt(2023, 12, 11).unwrap()
        );
    }

    #[test]
    fn test_filter_too_few_points() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = daily_series(start, 9);
        let err = filter_range(&series, RangeWindow::OneYear, start).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_filter_exactly_minimum() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = daily_series(start, MIN_RANGE_POINTS);
        let filtered = filter_range(&series, RangeWindow::OneYear, start).unwrap();
        assert_eq!(filtered.len(), MIN_RANGE_POINTS);
    }

    #[test]
    fn test_old_history_is_excluded() {
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let series = daily_series(start, 30);
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = filter_range(&series, RangeWindow::FiveYears, today).unwrap_err();
        assert!(err.is_insufficient_data());
    }
}
