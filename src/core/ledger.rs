//! Folding normalized operations into per-scheme positions.

use crate::core::transaction::Operation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Net holding of a single scheme after folding all known transactions.
///
/// Units can legitimately go negative when the statement does not cover the
/// full purchase history; that is surfaced as-is rather than treated as an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemePosition {
    pub scheme_name: String,
    pub isin: Option<String>,
    pub units: f64,
    pub last_price: f64,
}

/// Rebuilds the position map from scratch for a sequence of operations.
///
/// Operations are folded in feed order and never re-sorted, so the price that
/// sticks for a scheme is the one on its last operation in the input
/// sequence, not the one with the latest transaction date. Callers wanting
/// date semantics must pre-sort the feed.
pub fn reconcile<'a, I>(operations: I) -> HashMap<String, SchemePosition>
where
    I: IntoIterator<Item = &'a Operation>,
{
    let mut positions: HashMap<String, SchemePosition> = HashMap::new();

    for op in operations {
        let position = positions
            .entry(op.scheme_name.clone())
            .or_insert_with(|| SchemePosition {
                scheme_name: op.scheme_name.clone(),
                isin: None,
                units: 0.0,
                last_price: 0.0,
            });

        position.units += op.unit_delta;
        position.last_price = op.price;
        if op.isin.is_some() {
            position.isin = op.isin.clone();
        }
    }

    positions
}
