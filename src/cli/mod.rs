pub mod goals;
pub mod holdings;
pub mod insurance;
pub mod setup;
pub mod ui;
