//! Game platform verification client.
//!
//! Confirms that a game pass (or account) still exists before it is added to
//! a cart. Each check is a single `HEAD` request classified by
//! [`VerificationOutcome::from_status`]; redirects are not followed, so the
//! platform's canonical-URL redirect counts as found.
//!
//! Definite outcomes are cached in memory via `moka`. Inconclusive ones are
//! never cached so the next add-to-cart retries the platform.

use std::sync::Arc;

use karma_shop_core::verification::{
    VerificationOutcome, is_valid_game_pass_id, is_valid_username,
};
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::PlatformConfig;

/// Errors that prevent a verification request from being made.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Identifier cannot name a platform resource.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Platform base URL cannot carry a path.
    #[error("Invalid platform URL: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    GamePass(String),
    Account(String),
}

/// Client for the game platform's public pages.
#[derive(Clone)]
pub struct PlatformVerifier {
    inner: Arc<PlatformVerifierInner>,
}

struct PlatformVerifierInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, VerificationOutcome>,
}

impl PlatformVerifier {
    /// Create a new verifier.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the base URL
    /// cannot carry a path.
    pub fn new(config: &PlatformConfig) -> Result<Self, VerificationError> {
        if config.base_url.cannot_be_a_base() {
            return Err(VerificationError::InvalidBaseUrl(
                config.base_url.to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("karma-shop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(PlatformVerifierInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Check that a game pass exists on the platform.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if `external_id` is not a numeric id.
    /// Network failures are not errors; they yield `Unknown`.
    #[instrument(skip(self))]
    pub async fn verify_game_pass(
        &self,
        external_id: &str,
    ) -> Result<VerificationOutcome, VerificationError> {
        if !is_valid_game_pass_id(external_id) {
            return Err(VerificationError::InvalidIdentifier(
                external_id.to_string(),
            ));
        }

        let url = self.game_pass_url(external_id)?;
        Ok(self
            .check(CacheKey::GamePass(external_id.to_string()), url)
            .await)
    }

    /// Check that an account exists on the platform.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if `username` is not a plausible username.
    #[instrument(skip(self))]
    pub async fn verify_account(
        &self,
        username: &str,
    ) -> Result<VerificationOutcome, VerificationError> {
        if !is_valid_username(username) {
            return Err(VerificationError::InvalidIdentifier(username.to_string()));
        }

        let url = self.account_url(username)?;
        Ok(self
            .check(CacheKey::Account(username.to_lowercase()), url)
            .await)
    }

    /// Drop every cached outcome.
    pub fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
    }

    async fn check(&self, key: CacheKey, url: Url) -> VerificationOutcome {
        if let Some(outcome) = self.inner.cache.get(&key).await {
            debug!(%outcome, "Cache hit for verification");
            return outcome;
        }

        let outcome = match self.inner.client.head(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                let outcome = VerificationOutcome::from_status(status.as_u16());
                if !outcome.is_definite() {
                    warn!(%url, %status, "Inconclusive platform response");
                }
                outcome
            }
            Err(e) => {
                warn!(%url, error = %e, timeout = e.is_timeout(), "Platform request failed");
                VerificationOutcome::Unknown
            }
        };

        if outcome.is_definite() {
            self.inner.cache.insert(key, outcome).await;
        }

        debug!(%outcome, "Verification complete");
        outcome
    }

    fn game_pass_url(&self, external_id: &str) -> Result<Url, VerificationError> {
        self.url_with_path(&["game-pass", external_id])
    }

    fn account_url(&self, username: &str) -> Result<Url, VerificationError> {
        let mut url = self.url_with_path(&["users", "profile"])?;
        url.query_pairs_mut().append_pair("username", username);
        Ok(url)
    }

    fn url_with_path(&self, segments: &[&str]) -> Result<Url, VerificationError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| VerificationError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl std::fmt::Debug for PlatformVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformVerifier")
            .field("base_url", &self.inner.base_url.as_str())
            .field("cached", &self.inner.cache.entry_count())
            .finish_non_exhaustive()
    }
}
