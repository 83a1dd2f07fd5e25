//! Entity module - Contains the SeaORM entity definitions for the database.
//! The ledger keeps everything in a single key-value table.

pub mod key_value;

pub use key_value::{Column as KeyValueColumn, Entity as KeyValue, Model as KeyValueModel};
