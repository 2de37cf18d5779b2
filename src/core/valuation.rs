//! Valuing reconciled positions against a live NAV feed.

use crate::core::ledger::SchemePosition;
use crate::core::nav::{NavProvider, NavQuote};
use chrono::NaiveDate;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// Which feed supplied the price a holding was valued at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    /// The live feed answered for this scheme.
    Live,
    /// The feed had no answer; the last price seen in the statement is used.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuedHolding {
    pub scheme_name: String,
    pub units: f64,
    pub nav: f64,
    pub value: f64,
    pub weight_pct: Option<f64>,
    pub source: PriceSource,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub holdings: Vec<ValuedHolding>,
    pub total_value: f64,
}

/// Values every position, preferring a live quote and falling back to the
/// position's last observed price.
///
/// Lookups for distinct schemes run concurrently with a bounded fan-out and a
/// per-lookup timeout; each scheme is looked up exactly once per call. The
/// portfolio total is summed only after every lookup has resolved or timed
/// out, and holdings are sorted by scheme name so output order is stable.
/// Dropping the returned future abandons in-flight lookups.
pub async fn value_positions(
    positions: &HashMap<String, SchemePosition>,
    provider: &(dyn NavProvider + Send + Sync),
) -> PortfolioValuation {
    let quotes: HashMap<String, Option<NavQuote>> = futures::stream::iter(positions.values())
        .map(|position| async move {
            (position.scheme_name.clone(), fetch_quote(position, provider).await)
        })
        .buffer_unordered(MAX_CONCURRENT_LOOKUPS)
        .collect()
        .await;

    let mut holdings: Vec<ValuedHolding> = positions
        .values()
        .map(|position| {
            let quote = quotes.get(&position.scheme_name).cloned().flatten();
            match quote {
                Some(q) => ValuedHolding {
                    scheme_name: position.scheme_name.clone(),
                    units: position.units,
                    nav: q.nav,
                    value: position.units * q.nav,
                    weight_pct: None,
                    source: PriceSource::Live,
                    as_of: q.as_of,
                },
                None => ValuedHolding {
                    scheme_name: position.scheme_name.clone(),
                    units: position.units,
                    nav: position.last_price,
                    value: position.units * position.last_price,
                    weight_pct: None,
                    source: PriceSource::Fallback,
                    as_of: None,
                },
            }
        })
        .collect();

    holdings.sort_by(|a, b| a.scheme_name.cmp(&b.scheme_name));

    let total_value: f64 = holdings.iter().map(|h| h.value).sum();
    if total_value > 0.0 {
        for holding in &mut holdings {
            holding.weight_pct = Some((holding.value / total_value) * 100.0);
        }
    }

    PortfolioValuation {
        holdings,
        total_value,
    }
}

/// A single bounded lookup attempt. Absence, transport failure, and timeout
/// all collapse to `None`; the caller recovers with the ledger price.
async fn fetch_quote(
    position: &SchemePosition,
    provider: &(dyn NavProvider + Send + Sync),
) -> Option<NavQuote> {
    let identifier = position.isin.as_deref().unwrap_or(&position.scheme_name);

    match tokio::time::timeout(LOOKUP_TIMEOUT, provider.lookup(identifier)).await {
        Ok(Ok(Some(quote))) => Some(quote),
        Ok(Ok(None)) => {
            debug!("No live NAV for {identifier}, falling back to last transaction price");
            None
        }
        Ok(Err(e)) => {
            debug!("NAV lookup failed for {identifier}: {e}, falling back to last transaction price");
            None
        }
        Err(_) => {
            debug!("NAV lookup timed out for {identifier}, falling back to last transaction price");
            None
        }
    }
}
