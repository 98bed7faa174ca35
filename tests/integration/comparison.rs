//! End-to-end comparison runs over in-memory bookmaker pages.

use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

use corner_odds::engine::comparator::Comparator;
use corner_odds::extraction::Extractor;
use corner_odds::fetch::cache::CachedPageSource;
use corner_odds::fetch::http::visible_text;
use corner_odds::types::{BookmakerLink, FetchError, NOT_AVAILABLE};

use crate::mock_source::StaticPageSource;

const BETANO_HTML: &str = r#"<!DOCTYPE html><html><head><title>Flamengo x Palmeiras</title>
<script>window.__odds = {"over": "9.99"}</script></head>
<body>
  <nav>Futebol  Ao vivo</nav>
  <section class="market">
    <h3>Total de escanteios</h3>
    <div class="selection"><span>Mais de 8.5</span>
        <span class="odd">1,40</span></div>
    <div class="selection"><span>Menos de 8.5</span>
        <span class="odd">2,75</span></div>
    <div class="selection"><span>Mais de 9.5</span>
        <span class="odd">1,72</span></div>
    <div class="selection"><span>Menos de 9.5</span>
        <span class="odd">2,05</span></div>
  </section>
</body></html>"#;

const BET365_TEXT: &str = "Corners\n2-Way Corners\nOver 9.5\n1.83\nUnder 9.5\n1.97\n\
                           Over 10.5\n2.25\nUnder 10.5\n1.61";

const KTO_TEXT: &str = "Escanteios | Mais de 9.5 1.80 | Menos de 9.5 2.00 | \
                        Mais de 11.5 3.10 | Menos de 11.5 1.35";

fn links() -> Vec<BookmakerLink> {
    vec![
        BookmakerLink::new("Betano", "https://www.betano.bet.br/jogo"),
        BookmakerLink::new("Bet365", "https://www.bet365.bet.br/jogo"),
        BookmakerLink::new("KTO", "https://kto.bet.br/jogo"),
    ]
}

fn source() -> StaticPageSource {
    StaticPageSource::new()
        .with_page("https://www.betano.bet.br/jogo", &visible_text(BETANO_HTML))
        .with_page("https://www.bet365.bet.br/jogo", BET365_TEXT)
        .with_page("https://kto.bet.br/jogo", KTO_TEXT)
}

#[tokio::test]
async fn test_full_comparison_table() {
    let comparator = Comparator::new(Arc::new(source()), Extractor::default());
    let report = comparator.compare(&links()).await;
    let table = report.table();

    assert_eq!(table.bookmakers, vec!["Betano", "Bet365", "KTO"]);
    let markets: Vec<&str> = table.markets().collect();
    assert_eq!(
        markets,
        vec![
            "Mais de 8.5",
            "Menos de 8.5",
            "Mais de 9.5",
            "Menos de 9.5",
            "Over 9.5",
            "Under 9.5",
            "Over 10.5",
            "Under 10.5",
            "Mais de 11.5",
            "Menos de 11.5",
        ]
    );

    assert_eq!(table.get("Mais de 8.5", "Betano"), Some(dec!(1.40)));
    assert_eq!(table.get("Menos de 8.5", "Betano"), Some(dec!(2.75)));
    assert_eq!(table.get("Mais de 9.5", "KTO"), Some(dec!(1.80)));
    assert_eq!(table.get("Mais de 9.5", "Bet365"), None);
    assert_eq!(table.get("Over 9.5", "Bet365"), Some(dec!(1.83)));
    assert_eq!(table.get("Under 10.5", "Bet365"), Some(dec!(1.61)));
    assert_eq!(table.get("Menos de 11.5", "KTO"), Some(dec!(1.35)));
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_every_row_has_at_least_one_odd() {
    let comparator = Comparator::new(Arc::new(source()), Extractor::default());
    let report = comparator.compare(&links()).await;
    for row in &report.table().rows {
        assert!(row.odds.iter().any(Option::is_some), "empty row {}", row.market);
        assert_eq!(row.odds.len(), 3);
    }
}

#[tokio::test]
async fn test_blocked_bookmaker_keeps_partial_results() {
    let source = source().with_error("https://www.bet365.bet.br/jogo", FetchError::Blocked { status: 403 });
    let comparator = Comparator::new(Arc::new(source), Extractor::default());
    let report = comparator.compare(&links()).await;

    assert!(!report.nothing_found());
    assert_eq!(report.table().bookmakers.len(), 3);
    assert!(report.table().markets().all(|m| !m.starts_with("Over")));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].bookmaker, "Bet365");
}

#[tokio::test]
async fn test_nothing_found_across_all_bookmakers() {
    let source = StaticPageSource::new()
        .with_page("https://www.betano.bet.br/jogo", "Resultado final 1 x 2")
        .with_page("https://www.bet365.bet.br/jogo", "Match result")
        .with_page("https://kto.bet.br/jogo", "");
    let comparator = Comparator::new(Arc::new(source), Extractor::default());
    let report = comparator.compare(&links()).await;

    assert!(report.nothing_found());
    assert!(report.table().to_string().starts_with("Market"));
}

#[tokio::test]
async fn test_blank_links_not_requested() {
    let source = source();
    let comparator = Comparator::new(Arc::new(source.clone()), Extractor::default());
    let report = comparator
        .compare(&[
            BookmakerLink::new("Betano", ""),
            BookmakerLink::new("Bet365", "  "),
            BookmakerLink::new("KTO", " https://kto.bet.br/jogo "),
        ])
        .await;

    assert_eq!(source.requests(), vec!["https://kto.bet.br/jogo"]);
    assert_eq!(report.table().bookmakers, vec!["KTO"]);
    assert_eq!(report.table().len(), 4);
}

#[tokio::test]
async fn test_cached_source_reuses_recent_pages() {
    let inner = source();
    let cached = CachedPageSource::new(inner.clone(), Duration::from_secs(60));
    let comparator = Comparator::new(Arc::new(cached), Extractor::default());

    let first = comparator.compare(&links()).await;
    inner.set_page("https://kto.bet.br/jogo", "Mais de 9.5 9.99");
    let second = comparator.compare(&links()).await;

    assert_eq!(inner.requests().len(), 3);
    assert_eq!(first.table(), second.table());
}

#[tokio::test]
async fn test_printed_table_marks_missing_cells() {
    let comparator = Comparator::new(Arc::new(source()), Extractor::default());
    let report = comparator.compare(&links()).await;
    let printed = report.table().to_string();

    let over_line = printed
        .lines()
        .find(|l| l.starts_with("Over 9.5"))
        .expect("Over 9.5 row printed");
    assert!(over_line.contains("1.83"));
    assert_eq!(over_line.matches(NOT_AVAILABLE).count(), 2);
}
