//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_SESSION_SECRET` - Session cookie signing key (min 64 chars, high entropy)
//!
//! ## Optional
//! - `SHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOP_PORT` - Listen port (default: 3000)
//! - `SHOP_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `SHOP_DATABASE_URL` - `SQLite` session database (default: `sqlite://karma-shop.db?mode=rwc`)
//! - `PLATFORM_BASE_URL` - Game platform used for verification (default: <https://www.roblox.com>)
//! - `VERIFY_TIMEOUT_SECS` - Verification request timeout (default: 5)
//! - `VERIFY_CACHE_TTL_SECS` - How long definite verification results are cached (default: 300)
//! - `FLOW_STALL_TIMEOUT_MS` - Intro animation stall fallback (default: 15000)
//! - `SHOP_STATIC_DIR` - Static asset directory (default: this crate's `static/`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use karma_shop_core::flow::FlowTimings;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Signed cookies need a 64-byte key.
const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// `SQLite` connection string for the session store
    pub database_url: SecretString,
    /// External platform verification settings
    pub platform: PlatformConfig,
    /// Intro sequence timings
    pub flow: FlowTimings,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (defaults to "development" when unset)
    pub sentry_environment: Option<String>,
}

/// Where and how game passes are verified.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Platform root, e.g. `https://www.roblox.com`
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Lifetime of cached definite outcomes
    pub cache_ttl: Duration,
}

const DEFAULT_PLATFORM_URL: &str = "https://www.roblox.com";

/// Session database next to the working directory, created on first start.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://karma-shop.db?mode=rwc";

/// Static assets shipped with the crate.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("SHOP_HOST", "127.0.0.1")?;
        let port = parse_env("SHOP_PORT", "3000")?;
        let base_url = get_env_or_default("SHOP_BASE_URL", "http://localhost:3000");
        let session_secret = get_validated_secret("SHOP_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "SHOP_SESSION_SECRET")?;
        let database_url = SecretString::from(get_env_or_default(
            "SHOP_DATABASE_URL",
            DEFAULT_DATABASE_URL,
        ));

        let platform = PlatformConfig::from_env()?;
        let flow = FlowTimings {
            stall_timeout_ms: parse_env("FLOW_STALL_TIMEOUT_MS", "15000")?,
            ..FlowTimings::default()
        };

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            database_url,
            platform,
            flow,
            static_dir: PathBuf::from(get_env_or_default("SHOP_STATIC_DIR", DEFAULT_STATIC_DIR)),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PlatformConfig {
    /// Default timeout and cache lifetime against `base_url`.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(300),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("PLATFORM_BASE_URL", DEFAULT_PLATFORM_URL);
        let base_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("PLATFORM_BASE_URL".to_string(), e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "PLATFORM_BASE_URL".to_string(),
                "must be an http(s) URL".to_string(),
            ));
        }

        Ok(Self {
            timeout: Duration::from_secs(parse_env("VERIFY_TIMEOUT_SECS", "5")?),
            cache_ttl: Duration::from_secs(parse_env("VERIFY_CACHE_TTL_SECS", "300")?),
            ..Self::new(base_url)
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("abab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("changeme-session-key-0123456789", "SHOP_SESSION_SECRET")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
        assert!(err.to_string().contains("changeme"));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"ab".repeat(40), "SHOP_SESSION_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength(
            "q7Vn2Lx9Pw4Rk8Zt1Hs6Jd3Fg5Bm0Cy7Qa2We9Ur4Ti8Op1As6Df3Gh5Jk0Lz7Xc2",
            "SHOP_SESSION_SECRET",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_session_secret_needs_64_chars() {
        let short = SecretString::from("x".repeat(63));
        assert!(validate_session_secret(&short, "SHOP_SESSION_SECRET").is_err());

        let long = SecretString::from("x".repeat(64));
        assert!(validate_session_secret(&long, "SHOP_SESSION_SECRET").is_ok());
    }

    #[test]
    fn test_platform_defaults() {
        let platform = PlatformConfig::new(Url::parse(DEFAULT_PLATFORM_URL).unwrap());
        assert_eq!(platform.base_url.as_str(), "https://www.roblox.com/");
        assert_eq!(platform.timeout, Duration::from_secs(5));
        assert_eq!(platform.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(64)),
            database_url: SecretString::from("sqlite::memory:"),
            platform: PlatformConfig::new(Url::parse("http://127.0.0.1:9").unwrap()),
            flow: FlowTimings::default(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
