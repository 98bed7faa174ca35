//! Mock page source for integration testing.
//!
//! Provides a deterministic `PageSource` that serves fixed page texts by
//! URL, records every request and can be forced to fail — all in-memory
//! with no network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use corner_odds::fetch::PageSource;
use corner_odds::types::FetchError;

/// An in-memory page source keyed by URL.
#[derive(Clone, Default)]
pub struct StaticPageSource {
    pages: Arc<Mutex<HashMap<String, Result<String, FetchError>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` for `url`.
    pub fn with_page(self, url: &str, text: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(text.to_string()));
        self
    }

    /// Fail every request for `url` with `error`.
    pub fn with_error(self, url: &str, error: FetchError) -> Self {
        self.pages.lock().unwrap().insert(url.to_string(), Err(error));
        self
    }

    /// Replace the text served for `url`.
    pub fn set_page(&self, url: &str, text: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(text.to_string()));
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn fetch_text(&self, url: &str, _timeout: Option<Duration>) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Http { status: 404 }))
    }

    fn name(&self) -> &str {
        "static"
    }
}
