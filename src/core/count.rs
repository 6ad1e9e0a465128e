use crate::domain::model::CountValue;
use crate::utils::error::{EtlError, Result};

/// Range separator used by the source data. A plain `-` is not accepted.
pub const RANGE_SEPARATOR: char = '\u{2013}';

/// Normalize a raw displacement count to a single non-negative integer.
///
/// Ranges such as `"1,000–2,000"` resolve to the integer midpoint of their
/// bounds, rounding down.
pub fn parse_count(value: &CountValue) -> Result<u64> {
    match value {
        CountValue::Number(n) => Ok(*n),
        CountValue::Text(text) => parse_count_str(text),
    }
}

pub fn parse_count_str(text: &str) -> Result<u64> {
    if !text.contains(RANGE_SEPARATOR) {
        return parse_segment(text, text);
    }

    let segments: Vec<&str> = text.split(RANGE_SEPARATOR).collect();
    if segments.len() != 2 {
        return Err(EtlError::malformed_count(
            text,
            format!(
                "expected exactly two range bounds, found {}",
                segments.len()
            ),
        ));
    }

    let low = parse_segment(segments[0], text)?;
    let high = parse_segment(segments[1], text)?;

    low.checked_add(high)
        .map(|sum| sum / 2)
        .ok_or_else(|| EtlError::malformed_count(text, "range bounds overflow"))
}

fn parse_segment(segment: &str, original: &str) -> Result<u64> {
    let digits = segment.replace(',', "");
    let digits = digits.trim();

    if digits.is_empty() {
        return Err(EtlError::malformed_count(original, "empty value"));
    }

    if digits.starts_with('-') {
        return Err(EtlError::malformed_count(
            original,
            "counts cannot be negative",
        ));
    }

    digits
        .parse::<u64>()
        .map_err(|e| EtlError::malformed_count(original, format!("'{}' {}", digits, e)))
}
