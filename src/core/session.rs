//! Session gate.
//!
//! Signing in happens elsewhere; the sign-in flow records success by storing
//! `"true"` under the `"login"` key. The ledger only checks that flag before
//! showing anything and clears it on logout.

use crate::{
    core::storage,
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;
use tracing::{info, warn};

/// Storage key of the session flag
pub const LOGIN_KEY: &str = "login";

const LOGGED_IN: &str = "true";

/// Whether the session flag is set.
pub async fn is_logged_in<C>(db: &C) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(storage::get_value(db, LOGIN_KEY).await?.as_deref() == Some(LOGGED_IN))
}

/// Fails with [`Error::NotLoggedIn`] unless the session flag is set.
pub async fn require_login<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    if is_logged_in(db).await? {
        Ok(())
    } else {
        warn!("Ledger access refused: not logged in");
        Err(Error::NotLoggedIn)
    }
}

/// Sets the session flag. Called by the sign-in flow once it has accepted the user.
pub async fn log_in<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    storage::set_value(db, LOGIN_KEY, LOGGED_IN).await?;
    info!("Session started");
    Ok(())
}

/// Clears the session flag.
pub async fn log_out<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    storage::remove_value(db, LOGIN_KEY).await?;
    info!("Session ended");
    Ok(())
}
