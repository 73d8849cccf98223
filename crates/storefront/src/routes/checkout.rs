//! Checkout route handlers.
//!
//! There is no payment processing here: checkout shows the pass, warns that
//! the purchase happens on another site, then hands the visitor off to the
//! pass's external link.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query},
    response::{IntoResponse, Redirect, Response},
};
use karma_shop_core::ItemId;
use karma_shop_core::catalog::{GamePass, find_game_pass};
use serde::Deserialize;
use tracing::instrument;

use super::PageContext;
use crate::error::add_breadcrumb;
use crate::filters;

/// Query parameters for the checkout page.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub confirm: Option<String>,
}

impl CheckoutQuery {
    fn wants_confirm(&self) -> bool {
        matches!(self.confirm.as_deref(), Some("1" | "true"))
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub ctx: PageContext,
    pub pass: &'static GamePass,
    /// Show the leaving-the-site warning instead of the summary.
    pub confirm: bool,
}

/// Resolve a checkout path segment to a game pass.
///
/// Non-numeric ids and ids outside the game pass table resolve to nothing.
#[must_use]
pub fn lookup(id: &str) -> Option<&'static GamePass> {
    id.parse::<ItemId>().ok().and_then(find_game_pass)
}

/// Display the checkout page, or send unknown ids home.
#[instrument(skip(ctx))]
pub async fn show(
    ctx: PageContext,
    Path(id): Path<String>,
    Query(query): Query<CheckoutQuery>,
) -> Response {
    let Some(pass) = lookup(&id) else {
        tracing::debug!(id, "Unknown checkout id, redirecting home");
        return Redirect::to("/").into_response();
    };

    CheckoutTemplate {
        ctx,
        pass,
        confirm: query.wants_confirm(),
    }
    .into_response()
}

/// Hand the visitor off to the platform the pass is sold on.
#[instrument]
pub async fn proceed(Path(id): Path<String>) -> Redirect {
    let Some(pass) = lookup(&id) else {
        return Redirect::to("/");
    };

    match pass.external_link.as_deref() {
        Some(link) => {
            tracing::info!(
                item_id = %pass.id,
                platform = %pass.platform,
                "Checkout hand-off"
            );
            add_breadcrumb(
                "checkout",
                "External hand-off",
                &[("item_id", &pass.id.to_string()), ("link", link)],
            );
            Redirect::to(link)
        }
        None => {
            tracing::debug!(item_id = %pass.id, "Pass has no external link");
            Redirect::to(&format!("/checkout/{}", pass.id))
        }
    }
}
