//! Odd token scanner.
//!
//! Finds the first decimal odd (`1.85`, `2,75`) in a short text window.
//! Accepted shape is one or two digits, a `.` or `,` separator, then one
//! or two digits, bounded on both sides so longer numbers never match.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static ODD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{1,2}[.,][0-9]{1,2}\b").expect("odd regex is valid"));

/// Return the first odd in `window`, comma separator normalised to a period.
///
/// Only the first syntactic match is considered; a later, more plausible
/// candidate is never preferred.
pub fn find_first_odd(window: &str) -> Option<Decimal> {
    let token = ODD_RE.find(window)?.as_str().replace(',', ".");
    Decimal::from_str(&token).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
