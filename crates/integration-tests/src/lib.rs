//! Integration test harness for Karma Shop.
//!
//! Each test spawns its own storefront on an ephemeral port, backed by a mock
//! game platform, so no external services are needed:
//!
//! ```bash
//! cargo test -p karma-shop-integration-tests
//! ```
//!
//! The mock platform answers `HEAD /game-pass/{id}` with 200 for every id
//! except [`MISSING_GAME_PASS`] (404) and [`BROKEN_GAME_PASS`] (500), and
//! `HEAD /users/profile?username=` with 200 only for [`KNOWN_USERNAME`].
//! Both failing ids belong to catalog passes so the add-to-cart refusal can
//! be driven through the real routes.
//!
//! Sessions are stored in a private `sqlite::memory:` database per context.
//! [`TestContext::restart`] starts a fresh storefront over the same database.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use karma_shop_core::flow::FlowTimings;
use karma_shop_storefront::config::{DEFAULT_STATIC_DIR, PlatformConfig, StorefrontConfig};
use karma_shop_storefront::db;
use karma_shop_storefront::state::AppState;
use reqwest::Client;
use secrecy::SecretString;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use url::Url;

/// Platform id of the Silver donation pass (item 5); reported as deleted.
pub const MISSING_GAME_PASS: &str = "955696205";

/// Platform id of the Platinum donation pass (item 7); the platform errors.
pub const BROKEN_GAME_PASS: &str = "955937844";

/// The only account the mock platform knows.
pub const KNOWN_USERNAME: &str = "karmatsukino";

const TEST_DATABASE_URL: &str = "sqlite::memory:";

/// High-entropy signing key for test sessions.
const TEST_SESSION_SECRET: &str =
    "q7Vn2Lx9Pw4Rk8Zt1Hs6Jd3Fg5Bm0Cy7Qa2We9Ur4Ti8Op1As6Df3Gh5Jk0Lz7Xc2Nb";

/// A running storefront and a client with its own cookie jar.
pub struct TestContext {
    pub base_url: String,
    pub client: Client,
    config: StorefrontConfig,
    pool: SqlitePool,
}

impl TestContext {
    /// Start a storefront with zero-length intro pauses.
    pub async fn new() -> Self {
        Self::with_flow(FlowTimings {
            eye_reveal_ms: 0,
            terms_delay_ms: 0,
            settle_ms: 0,
            ..FlowTimings::default()
        })
        .await
    }

    /// Start a storefront with the given intro timings.
    pub async fn with_flow(flow: FlowTimings) -> Self {
        let platform = spawn_mock_platform().await;
        let config = test_config(platform, flow);

        let pool = db::create_pool(&config.database_url).await.unwrap();
        db::migrate(&pool).await.unwrap();

        let base_url = spawn_storefront(&config, &pool).await;
        Self {
            base_url,
            client: client(),
            config,
            pool,
        }
    }

    /// A new storefront process over the same session database.
    ///
    /// The visitor keeps its cookie jar, so its session carries over when it
    /// talks to the new server.
    pub async fn restart(&self) -> Self {
        let base_url = spawn_storefront(&self.config, &self.pool).await;
        Self {
            base_url,
            client: self.client.clone(),
            config: self.config.clone(),
            pool: self.pool.clone(),
        }
    }

    /// Session database shared by this context's storefronts.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Absolute URL for `path` on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A second visitor against the same server.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: client(),
            config: self.config.clone(),
            pool: self.pool.clone(),
        }
    }
}

/// Serve a storefront on an ephemeral port and return its base URL.
async fn spawn_storefront(config: &StorefrontConfig, pool: &SqlitePool) -> String {
    let state = AppState::new(config.clone(), pool.clone()).unwrap();
    let app = karma_shop_storefront::app(state).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(karma_shop_storefront::serve(
        listener,
        app,
        std::future::pending(),
    ));

    format!("http://{addr}")
}

/// Cookie-keeping client that reports redirects instead of following them.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

fn test_config(platform: SocketAddr, flow: FlowTimings) -> StorefrontConfig {
    let platform_url = Url::parse(&format!("http://{platform}")).unwrap();

    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost".to_string(),
        session_secret: SecretString::from(TEST_SESSION_SECRET),
        database_url: SecretString::from(TEST_DATABASE_URL),
        platform: PlatformConfig::new(platform_url),
        flow,
        static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Serve the mock game platform on an ephemeral port.
async fn spawn_mock_platform() -> SocketAddr {
    // GET routes also answer HEAD.
    let app = Router::new()
        .route("/game-pass/{id}", get(game_pass_status))
        .route("/users/profile", get(profile_status));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    addr
}

async fn game_pass_status(Path(id): Path<String>) -> StatusCode {
    match id.as_str() {
        MISSING_GAME_PASS => StatusCode::NOT_FOUND,
        BROKEN_GAME_PASS => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    }
}

async fn profile_status(Query(query): Query<HashMap<String, String>>) -> StatusCode {
    if query.get("username").map(String::as_str) == Some(KNOWN_USERNAME) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}
