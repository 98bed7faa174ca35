//! HTTP page source.
//!
//! Downloads the page with `reqwest` and flattens `<body>` into visible
//! text with `scraper`. Script-rendered odds are not executed, so pages
//! that build their markets client-side simply yield fewer markets.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use scraper::{Html, Node, Selector};
use std::time::Duration;
use tracing::{debug, warn};

use super::PageSource;
use crate::types::FetchError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Elements whose text is never visible.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub struct HttpPageSource {
    http: Client,
    default_timeout: Duration,
}

impl HttpPageSource {
    pub fn new(user_agent: &str, accept_language: &str, default_timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(accept_language)
                .with_context(|| format!("Invalid Accept-Language: {accept_language}"))?,
        );

        let http = Client::builder()
            .timeout(default_timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .context("Failed to build page HTTP client")?;

        Ok(Self {
            http,
            default_timeout,
        })
    }

    fn classify(err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_builder() {
            FetchError::InvalidUrl(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_text(&self, url: &str, timeout: Option<Duration>) -> Result<String, FetchError> {
        let resp = self
            .http
            .get(url)
            .timeout(timeout.unwrap_or(self.default_timeout))
            .send()
            .await
            .map_err(Self::classify)?;

        let status = resp.status();
        if matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
        ) {
            warn!(url, status = status.as_u16(), "Page request denied");
            return Err(FetchError::Blocked {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let html = resp.text().await.map_err(Self::classify)?;
        let text = visible_text(&html);
        debug!(url, html_bytes = html.len(), text_chars = text.len(), "Page fetched");
        Ok(text)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Visible text of `<body>`, whitespace-collapsed, hidden elements skipped.
///
/// Falls back to the whole document when there is no `<body>`.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = Selector::parse("body")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .unwrap_or_else(|| document.root_element());

    let mut parts: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            parts.push(text);
        }
    }

    parts
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
