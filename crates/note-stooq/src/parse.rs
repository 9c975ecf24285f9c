//! Extraction and parsing of the provider's daily CSV.
//!
//! The proxy returns the CSV wrapped in whatever prose or markup it decided to
//! add. [`extract_csv`] seeks the header line; [`parse_series`] turns the
//! payload into a [`PriceSeries`].

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use note_core::{NoteError, PricePoint, PriceSeries, Result};
use tracing::debug;

/// Header line that starts the CSV payload, matched case-insensitively.
pub const CSV_HEADER: &str = "date,open,high,low,close,volume";

/// Minimum number of lines (header included) a payload must have.
pub const MIN_RAW_LINES: usize = 5;

const DATE_FIELD: usize = 0;
const CLOSE_FIELD: usize = 4;

/// Result of header extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extracted<'a> {
    /// Text from the header line onward, or the raw text on fallback.
    pub payload: &'a str,
    /// Whether the header line was found.
    pub header_found: bool,
}

/// Locates the CSV header and returns everything from that line onward.
///
/// If no line matches [`CSV_HEADER`] the raw text is returned unmodified.
#[must_use]
pub fn extract_csv(raw: &str) -> Extracted<'_> {
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        if line.trim().eq_ignore_ascii_case(CSV_HEADER) {
            return Extracted {
                payload: &raw[offset..],
                header_found: true,
            };
        }
        offset += line.len();
    }
    Extracted {
        payload: raw,
        header_found: false,
    }
}

/// Parses a CSV payload into a price series.
///
/// The first line is treated as the header and skipped. Each row contributes
/// its date (field 0) and close (field 4); rows with an empty or unparseable
/// date, or a close that is not a finite positive number, are dropped.
///
/// # Errors
///
/// [`NoteError::InsufficientData`] if the trimmed payload has fewer than
/// [`MIN_RAW_LINES`] lines or no usable row survives.
pub fn parse_series(payload: &str) -> Result<PriceSeries> {
    let payload = payload.trim();
    let line_count = payload.lines().count();
    if line_count < MIN_RAW_LINES {
        return Err(NoteError::InsufficientData(format!(
            "response has {line_count} lines, need at least {MIN_RAW_LINES}"
        )));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(payload.as_bytes());

    let mut dropped = 0usize;
    let series: PriceSeries = reader
        .records()
        .filter_map(|record| {
            let point = record.ok().as_ref().and_then(parse_record);
            if point.is_none() {
                dropped += 1;
            }
            point
        })
        .collect();

    debug!(rows = series.len(), dropped, "Parsed price rows");

    if series.is_empty() {
        return Err(NoteError::InsufficientData(
            "no usable price rows in response".to_string(),
        ));
    }

    Ok(series)
}

fn parse_record(record: &StringRecord) -> Option<PricePoint> {
    let date = record.get(DATE_FIELD).filter(|d| !d.is_empty())?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let close = record.get(CLOSE_FIELD)?.parse::<f64>().ok()?;
    let point = PricePoint::new(date, close);
    point.is_valid().then_some(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "Title: stooq\n\nMarkdown Content:\nDate,Open,High,Low,Close,Volume\n\
2024-01-02,1,1,1,10.5,100\n2024-01-03,1,1,1,11,100\n2024-01-04,1,1,1,11.5,100\n\
2024-01-05,1,1,1,12,100\n";

    #[test]
    fn test_extract_finds_header() {
        let extracted = extract_csv(SAMPLE);
        assert!(extracted.header_found);
        assert!(extracted.payload.starts_with("Date,Open,High,Low,Close,Volume\n"));
        assert!(extracted.payload.ends_with("2024-01-05,1,1,1,12,100\n"));
    }

    #[test]
    fn test_extract_handles_crlf_header() {
        let raw = "junk\r\nDATE,OPEN,HIGH,LOW,CLOSE,VOLUME\r\n2024-01-02,1,1,1,1,1\r\n";
        let extracted = extract_csv(raw);
        assert!(extracted.header_found);
        assert!(extracted.payload.starts_with("DATE,OPEN"));
    }

    #[test]
    fn test_extract_falls_back_to_raw() {
        let raw = "No data";
        let extracted = extract_csv(raw);
        assert!(!extracted.header_found);
        assert_eq!(extracted.payload, raw);
    }

    #[test]
    fn test_parse_series() {
        let series = parse_series(extract_csv(SAMPLE).payload).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.closes(), vec![10.5, 11.0, 11.5, 12.0]);
        assert_eq!(
            series.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_parse_drops_bad_rows() {
        let payload = "Date,Open,High,Low,Close,Volume\n\
2024-01-02,1,1,1,10,100\n\
,1,1,1,10,100\n\
2024-01-04,1,1,1,abc,100\n\
2024-01-05,1,1,1\n\
not-a-date,1,1,1,10,100\n\
2024-01-08,1,1,1,0,100\n\
2024-01-09,1,1,1,12,100";
        let series = parse_series(payload).unwrap();
        assert_eq!(series.closes(), vec![10.0, 12.0]);
    }

    #[test]
    fn test_stray_quote_only_drops_its_row() {
        let payload = "Date,Open,High,Low,Close,Volume\n\
2024-01-02,1,1,1,10,100\n\
\"2024-01-03,1,1,1,11,100\n\
2024-01-04,1,1,1,12,100\n\
2024-01-05,1,1,1,13,100\n\
2024-01-08,1,1,1,14\",100\n\
2024-01-09,1,1,1,15,100";
        let series = parse_series(payload).unwrap();
        assert_eq!(series.closes(), vec![10.0, 12.0, 13.0, 15.0]);
    }

    #[test]
    fn test_parse_keeps_source_order() {
        let payload = "Date,Open,High,Low,Close,Volume\n\
2024-01-05,1,1,1,3,1\n2024-01-03,1,1,1,2,1\n2024-01-04,1,1,1,1,1\n2024-01-02,1,1,1,4,1";
        let series = parse_series(payload).unwrap();
        assert_eq!(series.closes(), vec![3.0, 2.0, 1.0, 4.0]);
    }

    #[test]
    fn test_parse_too_few_lines() {
        let err = parse_series("Date,Open,High,Low,Close,Volume\n2024-01-02,1,1,1,1,1\n").unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_parse_no_usable_rows() {
        let err = parse_series("a\nb\nc\nd\ne\nf").unwrap_err();
        assert!(err.is_insufficient_data());
    }

    proptest! {
        #[test]
        fn prop_extract_returns_header_onward(
            prefix in proptest::collection::vec("[a-z ]{0,12}", 0..5),
            rows in proptest::collection::vec("[0-9,.-]{0,20}", 0..10),
        ) {
            let mut raw = String::new();
            for line in &prefix {
                raw.push_str(line);
                raw.push('\n');
            }
            let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
            for row in &rows {
                csv.push_str(row);
                csv.push('\n');
            }
            raw.push_str(&csv);

            let extracted = extract_csv(&raw);
            prop_assert!(extracted.header_found);
            prop_assert_eq!(extracted.payload, csv.as_str());
        }

        #[test]
        fn prop_extract_without_header_is_verbatim(raw in "[a-vx-z0-9,\n ]{0,200}") {
            let extracted = extract_csv(&raw);
            prop_assert!(!extracted.header_found);
            prop_assert_eq!(extracted.payload, raw.as_str());
        }
    }
}
