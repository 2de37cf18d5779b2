//! CAMS statement container parsing.

use crate::core::transaction::RawTransaction;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CamsStatement {
    #[serde(rename = "TRXN_DETAILS", default)]
    transactions: Vec<RawTransaction>,
}

/// Reads a CAMS JSON export and returns its transaction records in file
/// order. The order is significant downstream, so no sorting happens here.
pub fn load_statement<P: AsRef<Path>>(path: P) -> Result<Vec<RawTransaction>> {
    let raw = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read statement file: {}", path.as_ref().display()))?;

    let statement: CamsStatement = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse statement file: {}", path.as_ref().display()))?;

    debug!(
        "Loaded {} transaction records from {}",
        statement.transactions.len(),
        path.as_ref().display()
    );
    Ok(statement.transactions)
}
