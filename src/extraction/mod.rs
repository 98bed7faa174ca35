//! Odds extraction engine.
//!
//! Turns one bookmaker's flattened page text into a label → odd map for
//! the supported total-corners markets. Pure and synchronous: no I/O, no
//! shared state, never fails on missing data.

pub mod locator;
pub mod odds;
pub mod policy;

use tracing::debug;

use crate::types::{BookmakerMarketMap, MarketKey, PhrasePair};
use locator::{locate_odd, normalize_whitespace, DEFAULT_WINDOW_CHARS};

/// Per-bookmaker market extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extractor {
    window_chars: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CHARS)
    }
}

impl Extractor {
    /// Create an extractor with a custom proximity window (in characters).
    pub fn new(window_chars: usize) -> Self {
        Self { window_chars }
    }

    pub fn window_chars(&self) -> usize {
        self.window_chars
    }

    /// Extract every supported market using the bookmaker's locale policy.
    ///
    /// Phrase pairs are tried in policy order; the first one that yields a
    /// non-empty map wins. An empty map is a valid result.
    pub fn extract_for_bookmaker(&self, text: &str, bookmaker: &str) -> BookmakerMarketMap {
        let normalized = normalize_whitespace(text);
        let phrase_pairs = policy::phrases_for(bookmaker);

        for (attempt, phrases) in phrase_pairs.iter().enumerate() {
            let markets = self.extract_normalized(&normalized, phrases);
            if !markets.is_empty() {
                debug!(
                    bookmaker,
                    over = phrases.over,
                    markets = markets.len(),
                    "Markets extracted"
                );
                return markets;
            }
            if attempt + 1 < phrase_pairs.len() {
                debug!(bookmaker, over = phrases.over, "No markets, trying next locale");
            }
        }

        debug!(bookmaker, "No markets found");
        BookmakerMarketMap::new()
    }

    /// Extract with one explicit phrase pair.
    pub fn extract_markets(&self, text: &str, phrases: &PhrasePair) -> BookmakerMarketMap {
        self.extract_normalized(&normalize_whitespace(text), phrases)
    }

    fn extract_normalized(&self, normalized: &str, phrases: &PhrasePair) -> BookmakerMarketMap {
        let mut markets = BookmakerMarketMap::new();
        for key in MarketKey::all() {
            let label = key.label(phrases);
            match locate_odd(normalized, &label, self.window_chars) {
                Ok(odd) => {
                    markets.entry(label).or_insert(odd);
                }
                Err(miss) => debug!(label = %label, reason = %miss, "Market side skipped"),
            }
        }
        markets
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
