//! `SQLite` session database.
//!
//! The storefront keeps no catalog or customer tables; the database only
//! holds the `tower_sessions` table, so carts and terms acceptance survive a
//! restart. The table is created by [`migrate`] at startup and expired rows
//! are removed by the task from [`spawn_session_cleanup`].

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::task::JoinHandle;
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions_sqlx_store::SqliteStore;

/// How often expired sessions are purged.
pub const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Create a `SQLite` connection pool.
///
/// One connection is always kept open so `sqlite::memory:` databases live as
/// long as the pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be opened.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(database_url.expose_secret())
        .await
}

/// Session store over `pool`.
#[must_use]
pub fn session_store(pool: &SqlitePool) -> SqliteStore {
    SqliteStore::new(pool.clone())
}

/// Create the session table if it does not exist.
///
/// # Errors
///
/// Returns `sqlx::Error` if the schema cannot be created.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    session_store(pool).migrate().await
}

/// Purge expired sessions every [`SESSION_CLEANUP_INTERVAL`].
#[must_use]
pub fn spawn_session_cleanup(pool: &SqlitePool) -> JoinHandle<()> {
    let store = session_store(pool);
    tokio::spawn(async move {
        if let Err(e) = store
            .continuously_delete_expired(SESSION_CLEANUP_INTERVAL)
            .await
        {
            tracing::error!(error = %e, "Expired session cleanup stopped");
        }
    })
}
