//! Live NAV lookup abstractions.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A point-in-time NAV observation from a live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavQuote {
    pub nav: f64,
    pub as_of: Option<NaiveDate>,
}

/// Looks up the current NAV for a scheme identifier (registry code or name).
///
/// `Ok(None)` means the feed does not know the identifier. Implementations
/// must be safe to call concurrently for distinct identifiers; retry and
/// caching are the implementation's business, callers attempt each lookup
/// exactly once.
#[async_trait]
pub trait NavProvider: Send + Sync {
    async fn lookup(&self, identifier: &str) -> Result<Option<NavQuote>>;
}
