//! Dashboard route handlers.
//!
//! JSON endpoints plus a server-rendered HTML table. State is shared via
//! `Arc<DashboardState>`.

use axum::{extract::State, http::StatusCode, response::Html, Json};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::engine::comparator::{Comparator, ComparisonReport};
use crate::types::{BookmakerLink, NOT_AVAILABLE};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub comparator: Comparator,
    pub links: Vec<BookmakerLink>,
    pub last_report: RwLock<Option<ComparisonReport>>,
}

impl DashboardState {
    pub fn new(comparator: Comparator, links: Vec<BookmakerLink>) -> Self {
        Self {
            comparator,
            links,
            last_report: RwLock::new(None),
        }
    }

    /// Run a comparison over the configured links and remember it.
    pub async fn refresh(&self) -> ComparisonReport {
        let report = self.comparator.compare(&self.links).await;
        *self.last_report.write().await = Some(report.clone());
        report
    }
}

pub type AppState = Arc<DashboardState>;

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResponse {
    #[serde(flatten)]
    pub report: ComparisonReport,
    pub empty: bool,
}

impl From<ComparisonReport> for ComparisonResponse {
    fn from(report: ComparisonReport) -> Self {
        let empty = report.nothing_found();
        Self { report, empty }
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/comparison
pub async fn get_comparison(State(state): State<AppState>) -> Json<ComparisonResponse> {
    Json(state.refresh().await.into())
}

/// GET /api/comparison/latest
pub async fn get_latest(
    State(state): State<AppState>,
) -> Result<Json<ComparisonResponse>, StatusCode> {
    let last = state.last_report.read().await;
    last.clone()
        .map(|r| Json(r.into()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// GET /
pub async fn get_page(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.refresh().await))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a report as a standalone HTML page.
pub fn render_page(report: &ComparisonReport) -> String {
    let table = report.table();
    let mut body = String::new();

    if report.nothing_found() {
        body.push_str(
            "<p class=\"warn\">No corner odds found on the bookmaker pages. \
             Check that each URL points at the total-corners market and try again.</p>",
        );
    } else {
        body.push_str("<table><thead><tr><th>Market</th>");
        for name in &table.bookmakers {
            body.push_str(&format!("<th>{}</th>", escape(name)));
        }
        body.push_str("</tr></thead><tbody>");
        for row in &table.rows {
            body.push_str(&format!("<tr><td>{}</td>", escape(&row.market)));
            for odd in &row.odds {
                match odd {
                    Some(odd) => body.push_str(&format!("<td>{odd:.2}</td>")),
                    None => body.push_str(&format!("<td class=\"na\">{NOT_AVAILABLE}</td>")),
                }
            }
            body.push_str("</tr>");
        }
        body.push_str("</tbody></table>");
        body.push_str(&format!(
            "<p class=\"note\">{NOT_AVAILABLE}: the bookmaker does not show this market right now.</p>"
        ));
    }

    for failure in &report.failures {
        body.push_str(&format!(
            "<p class=\"error\">{}: {}</p>",
            escape(&failure.bookmaker),
            escape(&failure.error)
        ));
    }

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>Corner odds comparison</title></head><body>\
         <h1>Corner odds comparison</h1><p>Updated {}</p>{body}</body></html>",
        report.generated_at.to_rfc3339()
    )
}
