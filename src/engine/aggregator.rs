//! Cross-bookmaker aggregator.
//!
//! Merges per-bookmaker label → odd maps into one comparison table.
//! Rows are the union of every label seen; a bookmaker without a label
//! gets an explicit empty cell, never a synthesised value.

use regex::Regex;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

use crate::types::{BookmakerMarketMap, ComparisonRow, ComparisonTable};

static THRESHOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d").expect("threshold regex is valid"));

// ---------------------------------------------------------------------------
// Row ordering
// ---------------------------------------------------------------------------

/// Numeric threshold embedded in a market label (first `\d+\.\d`).
pub fn label_threshold(label: &str) -> Option<Decimal> {
    THRESHOLD_RE
        .find(label)
        .and_then(|m| Decimal::from_str(m.as_str()).ok())
}

/// Ascending threshold, then label text; labels without a threshold last.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (label_threshold(a), label_threshold(b)) {
        (Some(ta), Some(tb)) => ta.cmp(&tb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Build the comparison table. Column order follows `results`.
pub fn aggregate(results: &[(String, BookmakerMarketMap)]) -> ComparisonTable {
    let labels: BTreeSet<&str> = results
        .iter()
        .flat_map(|(_, markets)| markets.keys().map(String::as_str))
        .collect();

    let mut labels: Vec<&str> = labels.into_iter().collect();
    labels.sort_by(|a, b| compare_labels(a, b));

    let rows: Vec<ComparisonRow> = labels
        .into_iter()
        .map(|label| ComparisonRow {
            market: label.to_string(),
            odds: results
                .iter()
                .map(|(_, markets)| markets.get(label).copied())
                .collect(),
        })
        .collect();

    debug!(
        bookmakers = results.len(),
        rows = rows.len(),
        "Comparison table built"
    );

    ComparisonTable {
        bookmakers: results.iter().map(|(name, _)| name.clone()).collect(),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
