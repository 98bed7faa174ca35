//! Bookmaker → label-locale policy table.
//!
//! Each entry maps a bookmaker name token to the phrase pairs tried, in
//! order, until one yields at least one market. Adding a bookmaker is a
//! new table row.

use crate::types::PhrasePair;

/// Phrase pairs tried for one bookmaker family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalePolicy {
    /// Lowercase token matched as a substring of the bookmaker name.
    pub token: &'static str,
    pub phrases: &'static [PhrasePair],
}

/// Bookmakers that render in more than one locale depending on session state.
pub const LOCALE_POLICIES: &[LocalePolicy] = &[LocalePolicy {
    token: "bet365",
    phrases: &[PhrasePair::PORTUGUESE, PhrasePair::ENGLISH],
}];

/// Used for every bookmaker without a table entry.
pub const DEFAULT_PHRASES: &[PhrasePair] = &[PhrasePair::PORTUGUESE];

/// Resolve the phrase pairs to try for a bookmaker (case-insensitive).
pub fn phrases_for(bookmaker: &str) -> &'static [PhrasePair] {
    let name = bookmaker.to_lowercase();
    LOCALE_POLICIES
        .iter()
        .find(|p| name.contains(p.token))
        .map(|p| p.phrases)
        .unwrap_or(DEFAULT_PHRASES)
}
