//! Shared test utilities for the order ledger.
//!
//! This module provides common helpers for setting up test databases and
//! building order drafts with sensible defaults.

use crate::{
    core::{
        order::{
            DeliverySpeed, ItemType, MlOrder, OrderDetails, OrderDraft, OrderStatus, PaymentMethod,
            PaymentStatus, RobloxOrder,
        },
        storage,
        store::{OrderStore, TRANSACTIONS_KEY},
    },
    errors::Result,
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Opens an empty store on a fresh in-memory database.
pub async fn setup_test_store() -> Result<OrderStore> {
    let db = setup_test_db().await?;
    OrderStore::load(db).await
}

/// Raw ledger blob currently in storage, for byte-level comparisons.
pub async fn stored_ledger(db: &DatabaseConnection) -> Result<Option<String>> {
    storage::get_value(db, TRANSACTIONS_KEY).await
}

/// A fixed instant `minutes` after 2025-03-01 08:00 UTC.
#[allow(clippy::unwrap_used)]
pub fn timestamp(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

/// Creates a Roblox draft with sensible defaults.
///
/// # Defaults
/// * `facebook`: `"Juan Dela Cruz"`
/// * `username`: `"juan_rbx"`
/// * `amount`: `"1000"`, `payment`: NCT, `speed`: FAST
/// * `price`: `"350"`
pub fn roblox_draft(status: OrderStatus) -> OrderDraft {
    OrderDraft {
        status,
        facebook: "Juan Dela Cruz".to_string(),
        username: "juan_rbx".to_string(),
        price: "350".to_string(),
        details: OrderDetails::Roblox(RobloxOrder {
            amount: "1000".to_string(),
            payment: PaymentMethod::Nct,
            speed: DeliverySpeed::Fast,
        }),
    }
}

/// Creates an ML draft with sensible defaults.
///
/// # Defaults
/// * `facebook`: `"Maria Santos"`
/// * `username`: `"MariaMLBB"`
/// * `id`: `"98765432"`, `server`: `"1203"`
/// * `type`: Starlight, `paymentStatus`: NOT PAID
/// * `price`: `"149"`
pub fn ml_draft(status: OrderStatus) -> OrderDraft {
    OrderDraft {
        status,
        facebook: "Maria Santos".to_string(),
        username: "MariaMLBB".to_string(),
        price: "149".to_string(),
        details: OrderDetails::Ml(MlOrder {
            id: "98765432".to_string(),
            server: "1203".to_string(),
            item_type: ItemType::Starlight,
            payment_status: PaymentStatus::NotPaid,
        }),
    }
}
