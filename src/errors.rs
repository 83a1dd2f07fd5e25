//! Unified error type for the order ledger.
//!
//! Every fallible operation in the crate returns [`Result`]. Errors raised by
//! create and edit operations are meant to be shown to the user as-is; none of
//! them leave the ledger in a partially modified state.

use thiserror::Error;

/// All errors that can occur in the order ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or value could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A required order field was blank
    #[error("Please fill out all required fields ({field} is missing)")]
    Validation {
        /// Name of the offending field
        field: &'static str,
    },

    /// Text did not name any order status
    #[error("Unknown order status '{value}'")]
    UnknownStatus {
        /// The rejected text
        value: String,
    },

    /// Edit or delete addressed an order that does not exist
    #[error("No order at position {index} (ledger holds {len})")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Number of orders at the time of the call
        len: usize,
    },

    /// Persisted ledger data could not be read back.
    ///
    /// Recovered by the store, which starts empty instead.
    #[error("Stored ledger is unreadable: {message}")]
    StorageRead {
        /// Parse or validation failure
        message: String,
    },

    /// Ledger could not be serialized for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The session flag is not set
    #[error("Not logged in")]
    NotLoggedIn,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
