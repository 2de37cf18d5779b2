pub mod amfi_nav;
pub mod util;

use crate::core::nav::{NavProvider, NavQuote};
use anyhow::Result;
use async_trait::async_trait;

/// Stand-in provider for offline runs; every lookup reports no live NAV, so
/// valuations fall back to last transaction prices.
pub struct OfflineNavProvider;

#[async_trait]
impl NavProvider for OfflineNavProvider {
    async fn lookup(&self, _identifier: &str) -> Result<Option<NavQuote>> {
        Ok(None)
    }
}
