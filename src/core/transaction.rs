//! Classification of raw statement records into typed operations.

use crate::core::error::CoreError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single row from a CAMS transaction export.
///
/// Field names follow the record keeper's JSON labels. Units and prices are
/// kept raw here; `normalize` decides whether they are usable numbers.
#[derive(Debug, Deserialize, Clone)]
pub struct RawTransaction {
    #[serde(rename = "Scheme Name", default = "unknown_scheme")]
    pub scheme_name: String,
    #[serde(rename = "ISIN", default)]
    pub isin: Option<String>,
    #[serde(rename = "Units", default)]
    pub units: Option<Figure>,
    #[serde(rename = "Price", default)]
    pub price: Option<Figure>,
    #[serde(rename = "Desc", default)]
    pub description: String,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
}

fn unknown_scheme() -> String {
    "N/A".to_string()
}

/// Units and prices arrive as JSON numbers from some record keepers and as
/// quoted strings (sometimes with thousands separators) from others.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum Figure {
    Number(f64),
    Text(String),
}

impl Figure {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Figure::Number(n) => Some(*n),
            Figure::Text(s) => s.trim().replace(',', "").parse().ok(),
        }
    }

    fn raw(&self) -> String {
        match self {
            Figure::Number(n) => n.to_string(),
            Figure::Text(s) => s.clone(),
        }
    }
}

/// Transaction kind derived from the statement's free-text description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    Purchase,
    Redemption,
    Switch,
    Other,
}

impl TradeKind {
    /// Case-insensitive keyword match on the description. Unrecognized or
    /// empty descriptions fall back to `Other`, which is treated as an
    /// addition of units rather than an error.
    pub fn classify(description: &str) -> TradeKind {
        let desc = description.to_lowercase();
        let purchase = desc.contains("purchase");
        let redemption = desc.contains("redemption");
        let switch = desc.contains("switch");

        if purchase && (redemption || switch) {
            warn!("Ambiguous transaction description '{description}', treating as purchase");
            return TradeKind::Purchase;
        }
        if purchase {
            TradeKind::Purchase
        } else if redemption {
            TradeKind::Redemption
        } else if switch {
            TradeKind::Switch
        } else {
            TradeKind::Other
        }
    }

    /// Purchases and unclassified records add units; redemptions and
    /// switches remove them.
    pub fn signed(&self, units: f64) -> f64 {
        match self {
            TradeKind::Redemption | TradeKind::Switch => -units.abs(),
            TradeKind::Purchase | TradeKind::Other => units.abs(),
        }
    }
}

/// A statement record with its kind resolved and the unit delta signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub scheme_name: String,
    pub isin: Option<String>,
    pub kind: TradeKind,
    pub unit_delta: f64,
    pub price: f64,
}

/// Turns a raw record into a typed operation.
///
/// Units and prices must be numeric; anything else fails with a
/// `DataFormat` error naming the record so the caller can decide between
/// skipping it and aborting the batch.
pub fn normalize(record: &RawTransaction, index: usize) -> Result<Operation, CoreError> {
    let units = numeric_field(record, index, "units", record.units.as_ref())?;
    let price = numeric_field(record, index, "price", record.price.as_ref())?;

    let kind = TradeKind::classify(&record.description);
    let isin = record
        .isin
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(Operation {
        scheme_name: record.scheme_name.clone(),
        isin,
        kind,
        unit_delta: kind.signed(units),
        price,
    })
}

fn numeric_field(
    record: &RawTransaction,
    index: usize,
    field: &'static str,
    figure: Option<&Figure>,
) -> Result<f64, CoreError> {
    figure
        .and_then(Figure::as_f64)
        .ok_or_else(|| CoreError::DataFormat {
            index,
            scheme: record.scheme_name.clone(),
            field,
            value: figure.map_or_else(|| "<missing>".to_string(), Figure::raw),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(desc: &str, units: Option<Figure>, price: Option<Figure>) -> RawTransaction {
        RawTransaction {
            scheme_name: "Alpha Fund".to_string(),
            isin: None,
            units,
            price,
            description: desc.to_string(),
            date: None,
        }
    }

    #[test]
    fn test_classification_keywords() {
        assert_eq!(TradeKind::classify("Systematic Purchase"), TradeKind::Purchase);
        assert_eq!(TradeKind::classify("PURCHASE - SIP"), TradeKind::Purchase);
        assert_eq!(TradeKind::classify("Redemption of units"), TradeKind::Redemption);
        assert_eq!(TradeKind::classify("Switch Out"), TradeKind::Switch);
        assert_eq!(TradeKind::classify("Dividend Reinvestment"), TradeKind::Other);
        assert_eq!(TradeKind::classify(""), TradeKind::Other);
    }

    #[test]
    fn test_ambiguous_description_prefers_purchase() {
        assert_eq!(
            TradeKind::classify("Switch In - Purchase"),
            TradeKind::Purchase
        );
    }

    #[test]
    fn test_delta_sign_follows_kind() {
        let purchase = normalize(
            &record("Purchase", Some(Figure::Number(100.0)), Some(Figure::Number(10.0))),
            0,
        )
        .unwrap();
        assert_eq!(purchase.kind, TradeKind::Purchase);
        assert_eq!(purchase.unit_delta, 100.0);

        // Some exports pre-sign redemptions; the kind decides regardless.
        let redemption = normalize(
            &record("Redemption", Some(Figure::Number(-30.0)), Some(Figure::Number(15.0))),
            1,
        )
        .unwrap();
        assert_eq!(redemption.kind, TradeKind::Redemption);
        assert_eq!(redemption.unit_delta, -30.0);

        let switch = normalize(
            &record("Switch Out", Some(Figure::Number(20.0)), Some(Figure::Number(12.0))),
            2,
        )
        .unwrap();
        assert_eq!(switch.unit_delta, -20.0);

        let other = normalize(
            &record("Stamp Duty", Some(Figure::Number(5.0)), Some(Figure::Number(1.0))),
            3,
        )
        .unwrap();
        assert_eq!(other.kind, TradeKind::Other);
        assert_eq!(other.unit_delta, 5.0);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let op = normalize(
            &record(
                "Purchase",
                Some(Figure::Text(" 1,234.50 ".to_string())),
                Some(Figure::Text("10.25".to_string())),
            ),
            0,
        )
        .unwrap();
        assert_eq!(op.unit_delta, 1234.50);
        assert_eq!(op.price, 10.25);
    }

    #[test]
    fn test_non_numeric_units_fail_with_record_identity() {
        let err = normalize(
            &record(
                "Purchase",
                Some(Figure::Text("ten".to_string())),
                Some(Figure::Number(10.0)),
            ),
            7,
        )
        .unwrap_err();

        match err {
            CoreError::DataFormat {
                index,
                scheme,
                field,
                value,
            } => {
                assert_eq!(index, 7);
                assert_eq!(scheme, "Alpha Fund");
                assert_eq!(field, "units");
                assert_eq!(value, "ten");
            }
            other => panic!("Expected DataFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_price_fails() {
        let err = normalize(&record("Purchase", Some(Figure::Number(1.0)), None), 0).unwrap_err();
        assert!(err.to_string().contains("price"));
        assert!(err.to_string().contains("<missing>"));
    }

    #[test]
    fn test_blank_isin_is_dropped() {
        let mut rec = record("Purchase", Some(Figure::Number(1.0)), Some(Figure::Number(2.0)));
        rec.isin = Some("  ".to_string());
        assert_eq!(normalize(&rec, 0).unwrap().isin, None);

        rec.isin = Some("INF789F01XA0".to_string());
        assert_eq!(
            normalize(&rec, 0).unwrap().isin.as_deref(),
            Some("INF789F01XA0")
        );
    }
}
