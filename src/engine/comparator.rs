//! One comparison run.
//!
//! Skips blank links, fetches the remaining pages concurrently, extracts
//! each bookmaker's markets and aggregates them. A failed fetch counts as
//! "no text for this bookmaker"; it never aborts the run.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::aggregator::aggregate;
use crate::extraction::Extractor;
use crate::fetch::PageSource;
use crate::types::{BookmakerLink, ComparisonTable};

/// A bookmaker whose page could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub bookmaker: String,
    pub error: String,
}

/// Result of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    pub bookmakers: Vec<String>,
    pub rows: ComparisonTable,
    pub failures: Vec<FetchFailure>,
}

impl ComparisonReport {
    pub fn table(&self) -> &ComparisonTable {
        &self.rows
    }

    /// No recognisable market on any page.
    pub fn nothing_found(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct Comparator {
    source: Arc<dyn PageSource>,
    extractor: Extractor,
    timeout: Option<Duration>,
}

impl Comparator {
    pub fn new(source: Arc<dyn PageSource>, extractor: Extractor) -> Self {
        Self {
            source,
            extractor,
            timeout: None,
        }
    }

    /// Per-page timeout passed to the source (source default otherwise).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn compare(&self, links: &[BookmakerLink]) -> ComparisonReport {
        let active: Vec<&BookmakerLink> = links.iter().filter(|l| !l.is_blank()).collect();
        info!(
            source = self.source.name(),
            bookmakers = active.len(),
            skipped = links.len() - active.len(),
            "Starting comparison"
        );

        let pages = join_all(
            active
                .iter()
                .map(|link| self.source.fetch_text(link.url.trim(), self.timeout)),
        )
        .await;

        let mut failures = Vec::new();
        let mut results = Vec::with_capacity(active.len());

        for (link, page) in active.into_iter().zip(pages) {
            let text = page.unwrap_or_else(|e| {
                warn!(bookmaker = %link.name, url = %link.url, error = %e, "Page fetch failed, continuing without");
                failures.push(FetchFailure {
                    bookmaker: link.name.clone(),
                    error: e.to_string(),
                });
                String::new()
            });

            let markets = self.extractor.extract_for_bookmaker(&text, &link.name);
            info!(bookmaker = %link.name, markets = markets.len(), "Bookmaker extracted");
            results.push((link.name.clone(), markets));
        }

        let table = aggregate(&results);
        if table.is_empty() {
            warn!("No corner markets found on any bookmaker page");
        } else {
            info!(rows = table.len(), failures = failures.len(), "Comparison complete");
        }

        ComparisonReport {
            generated_at: Utc::now(),
            bookmakers: table.bookmakers.clone(),
            rows: table,
            failures,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockPageSource;
    use crate::types::FetchError;
    use rust_decimal_macros::dec;

    fn mock_pages() -> MockPageSource {
        let mut source = MockPageSource::new();
        source.expect_name().return_const("mock".to_string());
        source.expect_fetch_text().returning(|url, _| match url {
            "https://betano/jogo" => Ok("Mais de 9.5 1.85 Menos de 9.5 1.95".to_string()),
            "https://bet365/jogo" => Ok("Over 9.5 1.90 Under 9.5 1.95 Over 10.5 2.30".to_string()),
            "https://kto/jogo" => Err(FetchError::Blocked { status: 403 }),
            _ => Ok(String::new()),
        });
        source
    }

    #[tokio::test]
    async fn test_compare_three_bookmakers() {
        let comparator = Comparator::new(Arc::new(mock_pages()), Extractor::default());
        let report = comparator
            .compare(&[
                BookmakerLink::new("Betano", "https://betano/jogo"),
                BookmakerLink::new("Bet365", "https://bet365/jogo"),
                BookmakerLink::new("KTO", "https://kto/jogo"),
            ])
            .await;

        assert_eq!(report.bookmakers, vec!["Betano", "Bet365", "KTO"]);
        let markets: Vec<&str> = report.table().markets().collect();
        assert_eq!(
            markets,
            vec!["Mais de 9.5", "Menos de 9.5", "Over 9.5", "Under 9.5", "Over 10.5"]
        );
        assert_eq!(report.table().get("Over 9.5", "Bet365"), Some(dec!(1.90)));
        assert_eq!(report.table().get("Over 9.5", "Betano"), None);
        assert_eq!(report.table().get("Mais de 9.5", "KTO"), None);
        assert_eq!(
            report.failures,
            vec![FetchFailure {
                bookmaker: "KTO".into(),
                error: "Blocked by site (HTTP 403)".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_blank_links_skipped() {
        let comparator = Comparator::new(Arc::new(mock_pages()), Extractor::default());
        let report = comparator
            .compare(&[
                BookmakerLink::new("Betano", "https://betano/jogo"),
                BookmakerLink::new("Bet365", "   "),
                BookmakerLink::new("KTO", ""),
            ])
            .await;

        assert_eq!(report.bookmakers, vec!["Betano"]);
        assert_eq!(report.table().len(), 2);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_nothing_found() {
        let comparator = Comparator::new(Arc::new(mock_pages()), Extractor::default());
        let report = comparator
            .compare(&[
                BookmakerLink::new("Betano", "https://elsewhere"),
                BookmakerLink::new("KTO", "https://kto/jogo"),
            ])
            .await;

        assert!(report.nothing_found());
        assert_eq!(report.bookmakers.len(), 2);
        assert_eq!(report.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_forwarded() {
        let mut source = MockPageSource::new();
        source.expect_name().return_const("mock".to_string());
        source
            .expect_fetch_text()
            .withf(|_, timeout| *timeout == Some(Duration::from_secs(7)))
            .times(1)
            .returning(|_, _| Ok(String::new()));

        let comparator = Comparator::new(Arc::new(source), Extractor::default())
            .with_timeout(Duration::from_secs(7));
        comparator.compare(&[BookmakerLink::new("KTO", "https://kto")]).await;
    }

    #[tokio::test]
    async fn test_report_serialises() {
        let comparator = Comparator::new(Arc::new(mock_pages()), Extractor::default());
        let report = comparator
            .compare(&[BookmakerLink::new("Betano", "https://betano/jogo")])
            .await;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["bookmakers"][0], "Betano");
        assert_eq!(json["rows"][0]["market"], "Mais de 9.5");
        assert_eq!(json["rows"][0]["Betano"].as_f64(), Some(1.85));
        assert!(json["failures"].as_array().unwrap().is_empty());
    }
}
