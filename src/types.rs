//! Shared types for the corner odds comparator.
//!
//! These types form the data model used across all modules.
//! The extraction core, the aggregator and the fetch/presentation
//! adapters all depend on them without depending on each other.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Market keys
// ---------------------------------------------------------------------------

/// Side of a total-corners market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Over,
    Under,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Over, Side::Under];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Over => write!(f, "Over"),
            Side::Under => write!(f, "Under"),
        }
    }
}

/// A supported market threshold (e.g. 9.5 corners).
///
/// Only values from [`Threshold::SUPPORTED`] can be constructed, so an
/// unsupported threshold is never recognised anywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Threshold(Decimal);

impl Threshold {
    /// The fixed threshold set, ascending.
    pub const SUPPORTED: [Threshold; 4] = [
        Threshold(dec!(8.5)),
        Threshold(dec!(9.5)),
        Threshold(dec!(10.5)),
        Threshold(dec!(11.5)),
    ];

    /// Look up a supported threshold by value.
    pub fn new(value: Decimal) -> Option<Self> {
        Self::SUPPORTED.iter().copied().find(|t| t.0 == value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl std::str::FromStr for Threshold {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Decimal = s
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid threshold: {s}"))?;
        Threshold::new(value).ok_or_else(|| anyhow::anyhow!("Unsupported threshold: {s}"))
    }
}

/// The two strings a bookmaker uses to label "over" and "under".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhrasePair {
    pub over: &'static str,
    pub under: &'static str,
}

impl PhrasePair {
    /// Brazilian Portuguese labels (Betano, KTO, Bet365 in pt-BR).
    pub const PORTUGUESE: PhrasePair = PhrasePair {
        over: "Mais de",
        under: "Menos de",
    };

    /// English labels (Bet365 when the session renders in English).
    pub const ENGLISH: PhrasePair = PhrasePair {
        over: "Over",
        under: "Under",
    };

    pub fn phrase(&self, side: Side) -> &'static str {
        match side {
            Side::Over => self.over,
            Side::Under => self.under,
        }
    }
}

/// Semantic identity of one market: side + threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarketKey {
    pub side: Side,
    pub threshold: Threshold,
}

impl MarketKey {
    pub fn new(side: Side, threshold: Threshold) -> Self {
        Self { side, threshold }
    }

    /// Every supported key, ordered by threshold then side.
    pub fn all() -> impl Iterator<Item = MarketKey> {
        Threshold::SUPPORTED
            .into_iter()
            .flat_map(|t| Side::ALL.into_iter().map(move |s| MarketKey::new(s, t)))
    }

    /// Display label in a given locale, e.g. `"Mais de 9.5"`.
    pub fn label(&self, phrases: &PhrasePair) -> String {
        format!("{} {}", phrases.phrase(self.side), self.threshold)
    }
}

/// Label → decimal odd for one bookmaker. Unordered, unique labels.
pub type BookmakerMarketMap = HashMap<String, Decimal>;

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// A bookmaker column and the page it should be read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmakerLink {
    pub name: String,
    pub url: String,
}

impl BookmakerLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Blank links are skipped entirely by the comparator.
    pub fn is_blank(&self) -> bool {
        self.url.trim().is_empty()
    }
}

/// One market row; `odds[i]` belongs to `ComparisonTable::bookmakers[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub market: String,
    pub odds: Vec<Option<Decimal>>,
}

/// Ordered cross-bookmaker comparison. Zero rows means nothing was found.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonTable {
    pub bookmakers: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn markets(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.market.as_str())
    }

    pub fn row(&self, market: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.market == market)
    }

    /// Cell lookup. `None` covers both an unknown row/column and an
    /// absent odd.
    pub fn get(&self, market: &str, bookmaker: &str) -> Option<Decimal> {
        let col = self.bookmakers.iter().position(|b| b == bookmaker)?;
        self.row(market)?.odds.get(col).copied().flatten()
    }
}

/// Rows serialise as `{"market": label, "<bookmaker>": odd | null, ...}`.
impl Serialize for ComparisonTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct RowView<'a> {
            bookmakers: &'a [String],
            row: &'a ComparisonRow,
        }

        impl Serialize for RowView<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.bookmakers.len() + 1))?;
                map.serialize_entry("market", &self.row.market)?;
                for (name, odd) in self.bookmakers.iter().zip(&self.row.odds) {
                    map.serialize_entry(name, odd)?;
                }
                map.end()
            }
        }

        serializer.collect_seq(self.rows.iter().map(|row| RowView {
            bookmakers: &self.bookmakers,
            row,
        }))
    }
}

/// Marker printed for a bookmaker that does not show a market.
pub const NOT_AVAILABLE: &str = "n/a";

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = "Market";
        let market_width = self
            .markets()
            .map(|m| m.chars().count())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(header.len());

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| {
                r.odds
                    .iter()
                    .map(|o| match o {
                        Some(odd) => format!("{odd:.2}"),
                        None => NOT_AVAILABLE.to_string(),
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .bookmakers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .filter_map(|c| c.get(i).map(|s| s.len()))
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{header:<market_width$}")?;
        for (name, w) in self.bookmakers.iter().zip(widths.iter().copied()) {
            write!(f, "  {name:>w$}")?;
        }
        writeln!(f)?;

        for (row, row_cells) in self.rows.iter().zip(&cells) {
            write!(f, "{:<market_width$}", row.market)?;
            for (cell, w) in row_cells.iter().zip(widths.iter().copied()) {
                write!(f, "  {cell:>w$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why one side of one market produced no odd. Always recovered locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionMiss {
    #[error("label not located")]
    LabelNotLocated,

    #[error("no odd found near label")]
    NoOddFound,
}

/// Page retrieval failures. The comparator turns these into
/// "no text for this bookmaker" and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Blocked by site (HTTP {status})")]
    Blocked { status: u16 },

    #[error("HTTP error {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
