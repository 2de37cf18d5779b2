//! Insurance policy records and premium due-date checks.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Premiums falling due within this many days are flagged.
pub const DUE_SOON_WINDOW_DAYS: i64 = 30;

/// One row from the user's policy sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(rename = "Policy Type")]
    pub policy_type: String,
    #[serde(rename = "Policy Number")]
    pub policy_number: String,
    #[serde(rename = "Premium Amount")]
    pub premium_amount: f64,
    #[serde(rename = "Due Date")]
    pub due_date: NaiveDate,
}

/// Reads a policy CSV with `Policy Type`, `Policy Number`, `Premium Amount`
/// and `Due Date` (ISO dates) columns.
pub fn load_policies<P: AsRef<Path>>(path: P) -> Result<Vec<Policy>> {
    let mut reader = csv::Reader::from_path(path.as_ref())
        .with_context(|| format!("Failed to read policy file: {}", path.as_ref().display()))?;

    let mut policies = Vec::new();
    for record in reader.deserialize() {
        let policy: Policy = record
            .with_context(|| format!("Failed to parse policy file: {}", path.as_ref().display()))?;
        policies.push(policy);
    }

    debug!("Loaded {} insurance policies", policies.len());
    Ok(policies)
}

/// Policies whose premium falls due within the next 30 days. Past-due
/// policies are not repeated here.
pub fn due_soon(policies: &[Policy], today: NaiveDate) -> Vec<&Policy> {
    policies
        .iter()
        .filter(|policy| {
            let days = (policy.due_date - today).num_days();
            (0..DUE_SOON_WINDOW_DAYS).contains(&days)
        })
        .collect()
}
