//! Order store business logic - The durable, ordered collection of orders.
//!
//! The store owns the in-memory sequence (newest first) and its mirrored copy under
//! the `"transactions"` storage key. Every mutation builds the complete next sequence,
//! writes it in one upsert and only then swaps it into memory, so a failed call leaves
//! both copies exactly as they were. Readers get borrowed snapshots through [`OrderStore::all`]
//! and [`OrderStore::visible`]; only the store itself can change an order.

use crate::{
    core::{
        filter::{Filters, StatusFilter},
        order::{Game, Order, OrderDraft, OrderPatch},
        status::apply_status_change,
        storage,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

/// Storage key holding the serialized ledger
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Layout version written by this crate
pub const SCHEMA_VERSION: u64 = 1;

#[derive(Serialize)]
struct StoredLedgerRef<'a> {
    version: u64,
    transactions: &'a [Order],
}

#[derive(Deserialize)]
struct StoredLedger {
    transactions: Vec<Order>,
}

/// The ledger: every recorded order plus the per-category table filters.
#[derive(Debug)]
pub struct OrderStore {
    db: DatabaseConnection,
    orders: Vec<Order>,
    filters: Filters,
}

impl OrderStore {
    /// Opens the ledger stored in `db`.
    ///
    /// A missing ledger starts empty. So does one that cannot be read back
    /// (malformed JSON, unknown layout version, or records that break the order
    /// invariants); the problem is logged and the application carries on.
    /// Only a failure of the database itself is returned as an error.
    #[instrument(skip(db))]
    pub async fn load(db: DatabaseConnection) -> Result<Self> {
        let orders = match storage::get_value(&db, TRANSACTIONS_KEY).await? {
            None => {
                info!("No stored ledger found, starting empty");
                Vec::new()
            }
            Some(raw) => decode(&raw).unwrap_or_else(|e| {
                warn!("Discarding stored ledger: {}", e);
                Vec::new()
            }),
        };

        info!("Loaded ledger with {} orders", orders.len());
        Ok(Self {
            db,
            orders,
            filters: Filters::default(),
        })
    }

    /// Replaces the table filters, e.g. with the configured initial values.
    #[must_use]
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Validates `draft`, records it as the newest order and persists the ledger.
    ///
    /// # Errors
    /// - [`Error::Validation`] if `price` or `facebook` is blank; nothing is stored.
    /// - [`Error::Database`] or [`Error::Serialization`] if the ledger cannot be written.
    #[instrument(skip(self, draft), fields(game = %draft.details.game(), status = %draft.status))]
    pub async fn add(&mut self, draft: OrderDraft) -> Result<&Order> {
        draft.validate()?;

        let order = draft.into_order(Utc::now());
        let mut next = Vec::with_capacity(self.orders.len() + 1);
        next.push(order);
        next.extend(self.orders.iter().cloned());

        self.commit(next).await?;
        info!("Order added, ledger now holds {} orders", self.orders.len());
        Ok(&self.orders[0])
    }

    /// Applies `patch` to the order at `index` and persists the ledger.
    ///
    /// Field changes are applied first, then the status transition rule. Patch fields
    /// that do not exist for the order's game are skipped with a warning.
    ///
    /// # Errors
    /// - [`Error::IndexOutOfRange`] if there is no order at `index`.
    /// - [`Error::Validation`] if the edit would blank `price` or `facebook`.
    /// - [`Error::Database`] or [`Error::Serialization`] if the ledger cannot be written.
    #[instrument(skip(self, patch))]
    pub async fn update(&mut self, index: usize, patch: OrderPatch) -> Result<&Order> {
        let mut updated = self.get(index)?.clone();

        let ignored = updated.apply_fields(&patch);
        if !ignored.is_empty() {
            warn!(
                "Ignoring fields {:?} that do not exist on {} orders",
                ignored,
                updated.game()
            );
        }
        if let Some(status) = patch.status {
            debug!("Changing status from {} to {}", updated.status, status);
            apply_status_change(&mut updated, status, Utc::now());
        }
        updated.validate()?;

        let mut next = self.orders.clone();
        next[index] = updated;

        self.commit(next).await?;
        info!("Order {} updated", index);
        Ok(&self.orders[index])
    }

    /// Deletes the order at `index`, persists the ledger and returns the removed order.
    ///
    /// # Errors
    /// - [`Error::IndexOutOfRange`] if there is no order at `index`.
    /// - [`Error::Database`] or [`Error::Serialization`] if the ledger cannot be written.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, index: usize) -> Result<Order> {
        self.get(index)?;

        let mut next = self.orders.clone();
        let removed = next.remove(index);

        self.commit(next).await?;
        info!("Order {} removed, ledger now holds {} orders", index, self.orders.len());
        Ok(removed)
    }

    /// The order at `index`.
    pub fn get(&self, index: usize) -> Result<&Order> {
        self.orders.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.orders.len(),
        })
    }

    /// Read-only view of every order, newest first.
    ///
    /// The iterator can be cloned to restart it.
    pub fn all(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    /// Number of orders in the ledger.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether the ledger holds no orders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Selects the status filter for one category's table.
    pub fn set_filter(&mut self, game: Game, filter: StatusFilter) {
        debug!("Filter for {} set to {}", game, filter);
        self.filters.set(game, filter);
    }

    /// Status filter currently selected for `game`.
    #[must_use]
    pub fn filter(&self, game: Game) -> StatusFilter {
        self.filters.get(game)
    }

    /// Orders of `game` that pass its filter, paired with their position in the
    /// full ledger (the index `update` and `remove` expect).
    pub fn visible(&self, game: Game) -> impl Iterator<Item = (usize, &Order)> + '_ {
        let filter = self.filters.get(game);
        self.orders
            .iter()
            .enumerate()
            .filter(move |(_, order)| order.game() == game && filter.matches(order))
    }

    async fn commit(&mut self, next: Vec<Order>) -> Result<()> {
        let raw = encode(&next)?;
        storage::set_value(&self.db, TRANSACTIONS_KEY, &raw).await?;
        self.orders = next;
        Ok(())
    }
}

/// Serializes `orders` in the current layout.
pub fn encode(orders: &[Order]) -> Result<String> {
    serde_json::to_string(&StoredLedgerRef {
        version: SCHEMA_VERSION,
        transactions: orders,
    })
    .map_err(Into::into)
}

/// Reads a stored ledger back, migrating older layouts.
///
/// A bare JSON array is the unversioned layout. Its records are brought in line
/// with the current invariants rather than rejected. A versioned object must carry
/// [`SCHEMA_VERSION`] and every order in it must satisfy the invariants.
///
/// # Errors
/// Returns [`Error::StorageRead`] for anything that is not a valid ledger.
pub fn decode(raw: &str) -> Result<Vec<Order>> {
    let value: Value = serde_json::from_str(raw).map_err(storage_read)?;

    if value.is_array() {
        info!("Migrating unversioned ledger to version {}", SCHEMA_VERSION);
        let mut orders: Vec<Order> = serde_json::from_value(value).map_err(storage_read)?;
        let mut cleared = 0_usize;
        for order in &mut orders {
            if order.clear_stale_completion() {
                cleared += 1;
            }
        }
        if cleared > 0 {
            warn!(cleared, "Dropped completion dates from orders that are not DONE");
        }
        return Ok(orders);
    }

    if !value.is_object() {
        return Err(Error::StorageRead {
            message: "ledger is neither an array nor an object".to_string(),
        });
    }

    let version = value.get("version").and_then(Value::as_u64);
    if version != Some(SCHEMA_VERSION) {
        return Err(Error::StorageRead {
            message: format!("unsupported ledger version {version:?}"),
        });
    }
    let orders = serde_json::from_value::<StoredLedger>(value)
        .map_err(storage_read)?
        .transactions;

    for order in &orders {
        order.check_invariants()?;
    }

    Ok(orders)
}

fn storage_read(e: serde_json::Error) -> Error {
    Error::StorageRead {
        message: e.to_string(),
    }
}
