//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod goals;
pub mod insurance;
pub mod ledger;
pub mod log;
pub mod nav;
pub mod statement;
pub mod transaction;
pub mod valuation;

// Re-export main types for cleaner imports
pub use error::CoreError;
pub use nav::{NavProvider, NavQuote};
