//! Durable key-value slots backed by the `key_value` table.
//!
//! Values are replaced wholesale with a single upsert, so a slot is always
//! either its old value or its new one.

use crate::{
    entities::{KeyValue, key_value},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*, sea_query::OnConflict};
use tracing::{debug, instrument};

/// Reads the value stored under `key`, if any.
#[instrument(skip(db))]
pub async fn get_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let value = KeyValue::find_by_id(key.to_owned())
        .one(db)
        .await?
        .map(|row| row.value);
    debug!(
        "Storage read for key '{}': {} bytes",
        key,
        value.as_ref().map_or(0, String::len)
    );
    Ok(value)
}

/// Stores `value` under `key`, replacing any previous value.
#[instrument(skip(db, value))]
pub async fn set_value<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let row = key_value::ActiveModel {
        key: Set(key.to_owned()),
        value: Set(value.to_owned()),
        updated_at: Set(Utc::now()),
    };

    KeyValue::insert(row)
        .on_conflict(
            OnConflict::column(key_value::Column::Key)
                .update_columns([key_value::Column::Value, key_value::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    debug!("Storage write for key '{}': {} bytes", key, value.len());
    Ok(())
}

/// Deletes the value stored under `key`. Deleting a missing key is not an error.
#[instrument(skip(db))]
pub async fn remove_value<C>(db: &C, key: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = KeyValue::delete_by_id(key.to_owned()).exec(db).await?;
    debug!("Storage delete for key '{}': {} rows", key, result.rows_affected);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_set_and_get_new_key() -> Result<()> {
        let db = setup_test_db().await?;

        set_value(&db, "test_key", "test_value").await?;

        assert_eq!(
            get_value(&db, "test_key").await?,
            Some("test_value".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() -> Result<()> {
        let db = setup_test_db().await?;

        set_value(&db, "test_key", "initial").await?;
        set_value(&db, "test_key", "updated").await?;

        assert_eq!(
            get_value(&db, "test_key").await?,
            Some("updated".to_string())
        );
        assert_eq!(KeyValue::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_key() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(get_value(&db, "missing").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_value() -> Result<()> {
        let db = setup_test_db().await?;

        set_value(&db, "test_key", "value").await?;
        remove_value(&db, "test_key").await?;
        remove_value(&db, "test_key").await?;

        assert!(get_value(&db, "test_key").await?.is_none());
        Ok(())
    }
}
