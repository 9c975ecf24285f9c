//! Read-out formatting.

/// Shown in place of a value that is absent.
pub const PLACEHOLDER: &str = "—";

/// Formats a fraction as a percentage with one decimal (`0.1234` → `12.3%`).
#[must_use]
pub fn format_pct(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => PLACEHOLDER.to_string(),
    }
}

/// Formats a price with two decimals.
#[must_use]
pub fn format_price(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{v:.2}"),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(Some(0.1234)), "12.3%");
        assert_eq!(format_pct(Some(0.10000000000000009)), "10.0%");
        assert_eq!(format_pct(Some(-0.0549)), "-5.5%");
        assert_eq!(format_pct(None), PLACEHOLDER);
        assert_eq!(format_pct(Some(f64::NAN)), PLACEHOLDER);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(122.0)), "122.00");
        assert_eq!(format_price(Some(3.14159)), "3.14");
        assert_eq!(format_price(None), PLACEHOLDER);
    }
}
