//! JSON API route handlers.
//!
//! Used by the page scripts: the cart summary, the music player, and the
//! platform verification checks.

use axum::{
    Json,
    extract::{Path, State},
};
use karma_shop_core::Notice;
use karma_shop_core::cart::{CartItem, CartTotals};
use karma_shop_core::catalog::{Track, tracks as all_tracks};
use karma_shop_core::music::Playlist;
use karma_shop_core::verification::VerificationOutcome;
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::storage::load_cart;

/// Cart contents with derived totals.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

/// Result of a platform verification check.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub outcome: VerificationOutcome,
    /// What to tell the visitor when the outcome is not `verified`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl From<VerificationOutcome> for VerifyResponse {
    fn from(outcome: VerificationOutcome) -> Self {
        Self {
            outcome,
            notice: outcome.refusal_notice(),
        }
    }
}

/// Current cart items and totals.
#[instrument(skip(session))]
pub async fn cart(session: Session) -> Result<Json<CartResponse>> {
    let store = load_cart(&session).await?;

    Ok(Json(CartResponse {
        items: store.items().to_vec(),
        totals: store.totals(),
    }))
}

/// Verify that a game pass exists on the platform.
#[instrument(skip(state))]
pub async fn verify_game_pass(
    State(state): State<AppState>,
    Path(external_id): Path<String>,
) -> Result<Json<VerifyResponse>> {
    let outcome = state.verifier().verify_game_pass(&external_id).await?;
    Ok(Json(outcome.into()))
}

/// Verify that an account exists on the platform.
#[instrument(skip(state))]
pub async fn verify_account(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<VerifyResponse>> {
    let outcome = state.verifier().verify_account(&username).await?;
    Ok(Json(outcome.into()))
}

/// The background music playlist.
pub async fn tracks() -> Json<&'static [Track]> {
    Json(all_tracks())
}

/// The track after `id`, wrapping to the first.
#[instrument]
pub async fn next_track(Path(id): Path<String>) -> Result<Json<&'static Track>> {
    let mut playlist = Playlist::builtin();
    playlist
        .select(&id)
        .ok_or_else(|| AppError::NotFound(format!("Track {id}")))?;

    let next = playlist
        .next()
        .ok_or_else(|| AppError::NotFound(format!("Track after {id}")))?;
    Ok(Json(next))
}
