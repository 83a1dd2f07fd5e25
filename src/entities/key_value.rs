//! Key-value entity - Durable storage slots for the ledger.
//!
//! Each row holds one serialized value under a unique key. The ledger blob lives
//! under `"transactions"` and the session flag under `"login"`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key-value database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "key_value")]
pub struct Model {
    /// Storage key (e.g., `"transactions"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Stored value, written wholesale
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this slot was last written
    pub updated_at: DateTimeUtc,
}

/// `KeyValue` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
