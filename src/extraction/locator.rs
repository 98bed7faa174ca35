//! Market locator.
//!
//! Anchors on a market label (`"<side phrase> <threshold>"`) in
//! whitespace-normalised page text and reads the first odd inside a
//! bounded forward window. The label and its value are decoupled in the
//! flattened text, so this is proximity matching: two markets rendered
//! close together can be associated with each other's odds.

use regex::RegexBuilder;
use rust_decimal::Decimal;

use super::odds::find_first_odd;
use crate::types::ExtractionMiss;

/// Default window, in characters, counted from the label's position.
pub const DEFAULT_WINDOW_CHARS: usize = 120;

/// Collapse every run of whitespace into a single space.
///
/// Done once per bookmaker text, not once per market.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Locate `phrase` case-insensitively and return the odd that follows it.
///
/// The window spans `window_chars` characters from the start of the match.
/// The phrase itself is excluded from the scan so the threshold digits are
/// never mistaken for the odd. A zero value is treated as no odd.
pub fn locate_odd(
    normalized: &str,
    phrase: &str,
    window_chars: usize,
) -> Result<Decimal, ExtractionMiss> {
    let re = RegexBuilder::new(&regex::escape(phrase))
        .case_insensitive(true)
        .build()
        .map_err(|_| ExtractionMiss::LabelNotLocated)?;
    let found = re.find(normalized).ok_or(ExtractionMiss::LabelNotLocated)?;

    let window_end = normalized[found.start()..]
        .char_indices()
        .nth(window_chars)
        .map(|(offset, _)| found.start() + offset)
        .unwrap_or(normalized.len());
    let scan_from = found.end().min(window_end);

    find_first_odd(&normalized[scan_from..window_end])
        .filter(|odd| !odd.is_zero())
        .ok_or(ExtractionMiss::NoOddFound)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
