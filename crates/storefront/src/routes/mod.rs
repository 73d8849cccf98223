//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Intro sequence (flow controller)
//! GET  /shop                   - Game pass shop, intro skipped (?category=)
//! GET  /products               - Product grid (?category=&visible=)
//! GET  /terms                  - Terms of service
//! POST /terms/accept           - Accept terms, redirect to /shop
//! POST /terms/decline          - Decline terms, redirect to /
//! GET  /privacy                - Privacy policy
//! GET  /about                  - Creator profile and issue reporting
//! GET  /info                   - Purchase, legal and support information
//! GET  /health                 - Health check
//!
//! # Checkout
//! GET  /checkout/{id}          - Checkout screen (?confirm=1 for the safety warning)
//! POST /checkout/{id}/continue - Hand off to the external platform
//!
//! # Cart (HTMX fragments or redirect with flash notice)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add item (platform verification for Roblox passes)
//! POST /cart/update            - Set quantity (<= 0 removes)
//! POST /cart/remove            - Remove item
//! POST /cart/clear             - Empty cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Flow (JSON)
//! GET  /flow                   - Current flow state, due timers applied
//! POST /flow/event             - Apply a flow event
//!
//! # API (JSON)
//! GET  /api/cart                          - Cart items and totals
//! GET  /api/verify/game-pass/{external_id} - Verify a game pass
//! GET  /api/verify/account/{username}      - Verify an account
//! GET  /api/tracks                         - Music playlist
//! GET  /api/tracks/{id}/next               - Track after {id}, wrapping
//! ```

pub mod api;
pub mod cart;
pub mod checkout;
pub mod flow;
pub mod pages;
pub mod shop;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::IntoResponse,
    routing::{get, post},
};
use karma_shop_core::Notice;
use tower_sessions::Session;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{CspNonce, cart_rate_limiter, verify_rate_limiter};
use crate::state::AppState;
use crate::storage::load_cart;

// =============================================================================
// Shared Request Context
// =============================================================================

/// Session key for the one-shot notice shown on the next page render.
pub const FLASH_NOTICE: &str = "flash_notice";

/// Data every full page needs: CSP nonce, pending notice and cart badge.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub nonce: String,
    pub notice: Option<Notice>,
    pub cart_count: u32,
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(CspNonce(nonce)) = CspNonce::from_request_parts(parts, state).await;
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(msg.to_string()))?;

        let notice = take_notice(&session).await?;
        let cart_count = load_cart(&session).await?.total_items();

        Ok(Self {
            nonce,
            notice,
            cart_count,
        })
    }
}

/// Queue a notice for the next rendered page.
///
/// # Errors
///
/// Returns the session error if the store fails.
pub async fn flash_notice(session: &Session, notice: &Notice) -> Result<(), AppError> {
    session.insert(FLASH_NOTICE, notice).await?;
    Ok(())
}

async fn take_notice(session: &Session) -> Result<Option<Notice>, AppError> {
    match session.remove::<Notice>(FLASH_NOTICE).await {
        Ok(notice) => Ok(notice),
        Err(tower_sessions::session::Error::SerdeJson(e)) => {
            tracing::warn!(error = %e, "Dropping unreadable flash notice");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Whether the request came from HTMX (`HX-Request: true`).
#[derive(Debug, Clone, Copy)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .headers
                .get("hx-request")
                .is_some_and(|v| v.as_bytes() == b"true"),
        ))
    }
}

/// Only same-site relative paths are accepted as redirect targets.
#[must_use]
pub fn safe_return_path(candidate: Option<&str>, fallback: &'static str) -> String {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(flow::intro))
        .route("/shop", get(shop::index))
        .route("/products", get(shop::products))
        .route("/terms", get(pages::terms))
        .route("/terms/accept", post(pages::accept_terms))
        .route("/terms/decline", post(pages::decline_terms))
        .route("/privacy", get(pages::privacy))
        .route("/about", get(pages::about))
        .route("/info", get(pages::info))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(checkout::show))
        .route("/{id}/continue", post(checkout::proceed))
}

/// Create the cart routes router.
///
/// Mutations are rate limited; reads are not.
pub fn cart_routes() -> Router<AppState> {
    let mutations = Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .layer(cart_rate_limiter());

    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .merge(mutations)
}

/// Create the flow routes router.
pub fn flow_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(flow::state))
        .route("/event", post(flow::event))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    let verify = Router::new()
        .route("/game-pass/{external_id}", get(api::verify_game_pass))
        .route("/account/{username}", get(api::verify_account))
        .layer(verify_rate_limiter());

    Router::new()
        .route("/cart", get(api::cart))
        .route("/tracks", get(api::tracks))
        .route("/tracks/{id}/next", get(api::next_track))
        .nest("/verify", verify)
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .route("/health", get(health))
        .nest("/checkout", checkout_routes())
        .nest("/cart", cart_routes())
        .nest("/flow", flow_routes())
        .nest("/api", api_routes())
        .fallback(not_found)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub ctx: PageContext,
}

/// Fallback for unknown paths.
async fn not_found(ctx: PageContext) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate { ctx })
}
