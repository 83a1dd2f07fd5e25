//! Core business logic - framework-agnostic order, status and reporting operations.

/// Per-category status filters
pub mod filter;
/// Order data model
pub mod order;
/// Dashboard counters and table projections
pub mod report;
/// Session flag checks
pub mod session;
/// Status transitions and elapsed-time projection
pub mod status;
/// Key-value persistence
pub mod storage;
/// The durable order collection
pub mod store;
