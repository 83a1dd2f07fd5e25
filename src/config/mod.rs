/// Database configuration and connection management
pub mod database;

/// Display and filter settings loaded from config.toml
pub mod ledger;
