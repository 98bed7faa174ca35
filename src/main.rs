//! corner-odds — total-corners odds comparison across bookmakers
//!
//! Entry point. Loads configuration, initialises structured logging,
//! runs a comparison over the configured bookmaker pages and prints the
//! table. Optionally keeps refreshing and serves the dashboard.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use corner_odds::config::AppConfig;
use corner_odds::dashboard::{self, DashboardState};
use corner_odds::engine::comparator::{Comparator, ComparisonReport};
use corner_odds::extraction::Extractor;
use corner_odds::fetch::cache::CachedPageSource;
use corner_odds::fetch::http::HttpPageSource;
use corner_odds::types::NOT_AVAILABLE;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load(&AppConfig::default_path())?;
    init_logging();

    let links = cfg.links();
    info!(
        name = %cfg.app.name,
        bookmakers = links.iter().filter(|l| !l.is_blank()).count(),
        window_chars = cfg.extraction.window_chars,
        refresh_interval_secs = cfg.app.refresh_interval_secs,
        "corner-odds starting up"
    );

    let http = HttpPageSource::new(
        &cfg.fetch.user_agent,
        &cfg.fetch.accept_language,
        cfg.fetch.timeout(),
    )?;
    let source = CachedPageSource::new(http, cfg.fetch.cache_ttl());
    let comparator = Comparator::new(
        Arc::new(source),
        Extractor::new(cfg.extraction.window_chars),
    )
    .with_timeout(cfg.fetch.timeout());

    let state = Arc::new(DashboardState::new(comparator, links));

    if cfg.dashboard.enabled {
        dashboard::spawn_dashboard(state.clone(), cfg.dashboard.port).await?;
    }

    let keep_running = cfg.app.refresh_interval_secs > 0 || cfg.dashboard.enabled;
    if !keep_running {
        print_report(&state.refresh().await);
        return Ok(());
    }

    // A zero interval with the dashboard on means: compare once, then serve.
    let refresh = (cfg.app.refresh_interval_secs > 0)
        .then(|| Duration::from_secs(cfg.app.refresh_interval_secs));
    print_report(&state.refresh().await);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    match refresh {
        Some(period) => {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            info!(interval_secs = period.as_secs(), "Refreshing periodically. Press Ctrl+C to stop.");
            loop {
                tokio::select! {
                    _ = interval.tick() => print_report(&state.refresh().await),
                    _ = &mut shutdown => break,
                }
            }
        }
        None => {
            info!("Dashboard running. Press Ctrl+C to stop.");
            shutdown.await?;
        }
    }

    info!("Shutdown signal received.");
    Ok(())
}

fn print_report(report: &ComparisonReport) {
    if report.nothing_found() {
        warn!("No corner odds found in the page texts");
        println!(
            "No corner odds found. Check that each URL points at the \
             total-corners market and try again."
        );
    } else {
        println!("{}", report.table());
        println!("{NOT_AVAILABLE}: the bookmaker does not show this market right now.");
    }

    for failure in &report.failures {
        println!("! {}: {}", failure.bookmaker, failure.error);
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("corner_odds=info"));

    let json_logging = std::env::var("CORNER_ODDS_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
