//! Page retrieval.
//!
//! Defines the `PageSource` trait (URL → visible page text) and provides
//! an HTTP implementation plus a short-lived cache wrapper. Everything
//! here is I/O; the extraction core never sees it.

pub mod cache;
pub mod http;

use async_trait::async_trait;
use std::time::Duration;

use crate::types::FetchError;

/// Abstraction over page text retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the visible text of the page at `url`.
    async fn fetch_text(&self, url: &str, timeout: Option<Duration>) -> Result<String, FetchError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}
