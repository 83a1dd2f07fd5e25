//! Order data model - The records kept in the ledger.
//!
//! An [`Order`] carries the fields shared by every category (status, timestamps,
//! customer contact, price) and an [`OrderDetails`] sum type holding the fields of
//! exactly one game. The serde layout matches the stored JSON: common fields at the
//! top level, the game-specific ones flattened next to them, and a `game` tag.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product category of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Game {
    /// Robux currency orders
    Roblox,
    /// ML in-game item orders
    Ml,
}

impl Game {
    /// Every category, in display order
    pub const ALL: [Self; 2] = [Self::Roblox, Self::Ml];

    /// Display name of the category
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Roblox => "Roblox",
            Self::Ml => "ML",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Received, not yet started
    Unpending,
    /// Being fulfilled
    Processing,
    /// Fulfilled
    Done,
    /// Held up
    Delayed,
    /// Will not be fulfilled
    Cancelled,
}

impl OrderStatus {
    /// Every status, in the order the status picker lists them
    pub const ALL: [Self; 5] = [
        Self::Unpending,
        Self::Processing,
        Self::Done,
        Self::Delayed,
        Self::Cancelled,
    ];

    /// Stored and displayed name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpending => "UNPENDING",
            Self::Processing => "PROCESSING",
            Self::Done => "DONE",
            Self::Delayed => "DELAYED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::UnknownStatus {
                value: s.to_string(),
            })
    }
}

/// How a Roblox order was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Payment method code `CT`
    #[serde(rename = "CT")]
    Ct,
    /// Payment method code `NCT`
    #[serde(rename = "NCT")]
    Nct,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ct => "CT",
            Self::Nct => "NCT",
        })
    }
}

/// Requested delivery speed of a Roblox order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliverySpeed {
    /// Fast lane
    Fast,
    /// Slow lane
    Slow,
    /// Delivered within minutes
    Mins,
}

impl fmt::Display for DeliverySpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fast => "FAST",
            Self::Slow => "SLOW",
            Self::Mins => "MINS",
        })
    }
}

/// Kind of ML item purchased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    /// Hero skin
    Skin,
    /// Starlight membership
    Starlight,
    /// Emote
    Emotes,
    /// Anything else
    Others,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skin => "Skin",
            Self::Starlight => "Starlight",
            Self::Emotes => "Emotes",
            Self::Others => "Others",
        })
    }
}

/// Payment progress of an ML order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Fully paid
    #[serde(rename = "PAID")]
    Paid,
    /// Half paid
    #[serde(rename = "HALF")]
    Half,
    /// Nothing paid yet
    #[serde(rename = "NOT PAID")]
    NotPaid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Paid => "PAID",
            Self::Half => "HALF",
            Self::NotPaid => "NOT PAID",
        })
    }
}

/// Fields specific to a Roblox order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobloxOrder {
    /// Robux amount, as entered
    pub amount: String,
    /// Payment method
    pub payment: PaymentMethod,
    /// Delivery speed
    pub speed: DeliverySpeed,
}

/// Fields specific to an ML order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlOrder {
    /// Player ID
    pub id: String,
    /// Player server
    pub server: String,
    /// Item purchased
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Payment progress
    pub payment_status: PaymentStatus,
}

/// Game-specific part of an order, tagged by `game`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game")]
pub enum OrderDetails {
    /// Roblox currency order
    Roblox(RobloxOrder),
    /// ML item order
    #[serde(rename = "ML")]
    Ml(MlOrder),
}

impl OrderDetails {
    /// Category these details belong to
    #[must_use]
    pub const fn game(&self) -> Game {
        match self {
            Self::Roblox(_) => Game::Roblox,
            Self::Ml(_) => Game::Ml,
        }
    }
}

/// A single customer order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Current lifecycle state
    pub status: OrderStatus,
    /// When the order was recorded
    pub date: DateTime<Utc>,
    /// When the order was marked DONE; present only while it is DONE
    #[serde(
        rename = "completionDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completion_date: Option<DateTime<Utc>>,
    /// Customer's Facebook name
    pub facebook: String,
    /// Roblox username or ML in-game name
    #[serde(default)]
    pub username: String,
    /// Price as entered
    pub price: String,
    /// Game-specific fields
    #[serde(flatten)]
    pub details: OrderDetails,
}

impl Order {
    /// Category of this order
    #[must_use]
    pub const fn game(&self) -> Game {
        self.details.game()
    }

    /// Checks the fields every stored order must carry.
    pub fn validate(&self) -> Result<()> {
        require_non_blank("facebook", &self.facebook)?;
        require_non_blank("price", &self.price)
    }

    /// Checks the completion date of an order read back from storage.
    ///
    /// Only a DONE order may carry a completion date. A DONE order without one
    /// predates completion tracking; it is kept and its time passed shows as N/A.
    pub fn check_invariants(&self) -> Result<()> {
        if self.status != OrderStatus::Done && self.completion_date.is_some() {
            return Err(Error::StorageRead {
                message: format!(
                    "order dated {} has status {} but completion date {:?}",
                    self.date, self.status, self.completion_date
                ),
            });
        }
        Ok(())
    }

    /// Drops a completion date left on a record that is no longer DONE.
    ///
    /// Returns `true` when the record was changed.
    pub(crate) fn clear_stale_completion(&mut self) -> bool {
        if self.status == OrderStatus::Done || self.completion_date.is_none() {
            return false;
        }
        self.completion_date = None;
        true
    }

    /// Copies the field changes of `patch` into this order.
    ///
    /// The status is not touched here; it goes through the transition rule.
    /// Returns the names of patch fields that do not exist on this order's game
    /// and were therefore skipped.
    pub(crate) fn apply_fields(&mut self, patch: &OrderPatch) -> Vec<&'static str> {
        let mut ignored = Vec::new();

        if let Some(facebook) = &patch.facebook {
            self.facebook.clone_from(facebook);
        }
        if let Some(username) = &patch.username {
            self.username.clone_from(username);
        }
        if let Some(price) = &patch.price {
            self.price.clone_from(price);
        }

        match &mut self.details {
            OrderDetails::Roblox(roblox) => {
                if let Some(amount) = &patch.amount {
                    roblox.amount.clone_from(amount);
                }
                if let Some(payment) = patch.payment {
                    roblox.payment = payment;
                }
                if let Some(speed) = patch.speed {
                    roblox.speed = speed;
                }
                if patch.player_id.is_some() {
                    ignored.push("id");
                }
                if patch.server.is_some() {
                    ignored.push("server");
                }
                if patch.item_type.is_some() {
                    ignored.push("type");
                }
                if patch.payment_status.is_some() {
                    ignored.push("paymentStatus");
                }
            }
            OrderDetails::Ml(ml) => {
                if let Some(id) = &patch.player_id {
                    ml.id.clone_from(id);
                }
                if let Some(server) = &patch.server {
                    ml.server.clone_from(server);
                }
                if let Some(item_type) = patch.item_type {
                    ml.item_type = item_type;
                }
                if let Some(payment_status) = patch.payment_status {
                    ml.payment_status = payment_status;
                }
                if patch.amount.is_some() {
                    ignored.push("amount");
                }
                if patch.payment.is_some() {
                    ignored.push("payment");
                }
                if patch.speed.is_some() {
                    ignored.push("speed");
                }
            }
        }

        ignored
    }
}

/// Input for creating an order; the store stamps the timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Initial status
    pub status: OrderStatus,
    /// Customer's Facebook name
    pub facebook: String,
    /// Roblox username or ML in-game name
    pub username: String,
    /// Price as entered
    pub price: String,
    /// Game-specific fields
    pub details: OrderDetails,
}

impl OrderDraft {
    /// Checks the required fields before anything is stored.
    pub fn validate(&self) -> Result<()> {
        require_non_blank("facebook", &self.facebook)?;
        require_non_blank("price", &self.price)
    }

    /// Turns the draft into an order recorded at `now`.
    ///
    /// A draft created directly as DONE is completed at the same instant.
    #[must_use]
    pub fn into_order(self, now: DateTime<Utc>) -> Order {
        let completion_date = (self.status == OrderStatus::Done).then_some(now);
        Order {
            status: self.status,
            date: now,
            completion_date,
            facebook: self.facebook,
            username: self.username,
            price: self.price,
            details: self.details,
        }
    }
}

/// Field-level changes to an existing order. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderPatch {
    /// New status, applied through the transition rule
    pub status: Option<OrderStatus>,
    /// New Facebook name
    pub facebook: Option<String>,
    /// New username / in-game name
    pub username: Option<String>,
    /// New price
    pub price: Option<String>,
    /// Roblox: new Robux amount
    pub amount: Option<String>,
    /// Roblox: new payment method
    pub payment: Option<PaymentMethod>,
    /// Roblox: new delivery speed
    pub speed: Option<DeliverySpeed>,
    /// ML: new player ID
    pub player_id: Option<String>,
    /// ML: new server
    pub server: Option<String>,
    /// ML: new item type
    pub item_type: Option<ItemType>,
    /// ML: new payment status
    pub payment_status: Option<PaymentStatus>,
}

impl OrderPatch {
    /// A patch that only changes the status.
    #[must_use]
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

fn require_non_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation { field });
    }
    Ok(())
}
