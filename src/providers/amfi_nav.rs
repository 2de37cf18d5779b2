use crate::core::nav::{NavProvider, NavQuote};
use crate::providers::util::with_retry;
use crate::store::{KeyValueCollection, KeyValueStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

// AMFI publishes NAVs once a day; cached answers stay good for an hour.
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// NAV lookup against an AMFI-style endpoint serving
/// `GET {base_url}/nav/{identifier}` as JSON.
pub struct AmfiNavProvider {
    base_url: String,
    cache: Arc<dyn KeyValueCollection>,
}

impl AmfiNavProvider {
    pub fn new(base_url: &str, store: &KeyValueStore) -> Self {
        AmfiNavProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: store.collection("nav", true),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_with_collection(
        base_url: &str,
        cache: Arc<dyn KeyValueCollection>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AmfiNavResponse {
    nav: f64,
    #[serde(default)]
    date: Option<String>,
}

#[async_trait]
impl NavProvider for AmfiNavProvider {
    async fn lookup(&self, identifier: &str) -> Result<Option<NavQuote>> {
        if let Some(cached) = self.cache.get(identifier.as_bytes()).await {
            return Ok(Some(serde_json::from_slice(&cached)?));
        }

        let url = format!("{}/nav/{}", self.base_url, identifier);
        debug!("Requesting NAV data from {}", url);

        let client = reqwest::Client::builder().user_agent("mfolio/0.1").build()?;
        let response = with_retry(|| async { client.get(&url).send().await }, 3, 500)
            .await
            .with_context(|| format!("Failed to send NAV request for: {identifier}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("NAV feed does not know identifier: {}", identifier);
            return Ok(None);
        }

        let response_text = response
            .text()
            .await
            .with_context(|| format!("Failed to get NAV response text for: {identifier}"))?;

        if response_text.trim().is_empty() {
            debug!("Received empty NAV response for: {}", identifier);
            return Ok(None);
        }

        let parsed: AmfiNavResponse = serde_json::from_str(&response_text).with_context(|| {
            format!(
                "Failed to parse NAV response for: {identifier}. Response: '{response_text}'",
            )
        })?;

        debug!(
            "Successfully fetched NAV for {}: {:?}",
            identifier, parsed.nav
        );

        let quote = NavQuote {
            nav: parsed.nav,
            as_of: parsed
                .date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        };

        self.cache
            .put(
                identifier.as_bytes(),
                &serde_json::to_vec(&quote)?,
                Some(CACHE_TTL),
            )
            .await;

        Ok(Some(quote))
    }
}
