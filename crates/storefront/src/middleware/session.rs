//! Session middleware configuration.
//!
//! Sessions hold the visitor's cart, terms acceptance and intro progress, so
//! they use a long inactivity expiry. Records live in `SQLite` (see
//! [`crate::db`]); cookies are signed with `SHOP_SESSION_SECRET`.

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::{ConfigError, StorefrontConfig};
use crate::db;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "karma_session";

/// Session expiry time in seconds (365 days).
const SESSION_EXPIRY_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Session layer type used by the router.
pub type StorefrontSessionLayer = SessionManagerLayer<SqliteStore, SignedCookie>;

/// Create the signed-cookie session layer with the `SQLite` store.
///
/// The session table must already exist; see [`db::migrate`].
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` if the session secret is too short
/// to derive a signing key.
pub fn create_session_layer(
    pool: &SqlitePool,
    config: &StorefrontConfig,
) -> Result<StorefrontSessionLayer, ConfigError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes()).map_err(|e| {
        ConfigError::InsecureSecret("SHOP_SESSION_SECRET".to_string(), e.to_string())
    })?;

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    Ok(SessionManagerLayer::new(db::session_store(pool))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
