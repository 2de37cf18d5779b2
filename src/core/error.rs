use thiserror::Error;

/// Errors raised by the reconciliation and planning core.
///
/// Provider and I/O failures stay `anyhow` at the call sites; these variants
/// cover the conditions callers need to match on.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A statement record carried a units or price field that could not be
    /// read as a number. The record is identified so callers can skip it and
    /// keep the rest of the statement.
    #[error("record {index} ({scheme}): {field} is not numeric: '{value}'")]
    DataFormat {
        index: usize,
        scheme: String,
        field: &'static str,
        value: String,
    },

    /// A goal was supplied with out-of-range parameters. Indicates a caller
    /// bug rather than a recoverable data condition.
    #[error("invalid goal parameters: {reason}")]
    GoalConfiguration { reason: String },
}

impl CoreError {
    pub(crate) fn goal(reason: impl Into<String>) -> Self {
        CoreError::GoalConfiguration {
            reason: reason.into(),
        }
    }
}
