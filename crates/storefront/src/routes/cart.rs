//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session under the `cart` key and is driven
//! through [`CartStore`]. HTMX requests get the cart items fragment plus an
//! `HX-Trigger` header carrying the new count and any notice; plain form
//! posts get a flash notice and a redirect back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderName, HeaderValue},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use karma_shop_core::ItemId;
use karma_shop_core::Notice;
use karma_shop_core::cart::{CartItem, CartStore, CartTotals};
use karma_shop_core::catalog::find_item;
use karma_shop_core::storage::KeyValueStore;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{HxRequest, PageContext, flash_notice, safe_return_path};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::storage::{SessionStorage, load_cart};

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

impl CartView {
    #[must_use]
    pub fn of<S: KeyValueStore>(store: &CartStore<S>) -> Self {
        Self {
            items: store.items().to_vec(),
            totals: store.totals(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Write the cart back to the session and return its view.
async fn save_cart(session: &Session, store: CartStore<SessionStorage>) -> Result<CartView> {
    let view = CartView::of(&store);
    store.into_storage().commit(session).await?;
    Ok(view)
}

fn parse_item_id(raw: &str) -> Result<ItemId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid item id: {raw}")))
}

/// `HX-Trigger` value announcing the new count and an optional notice.
fn hx_trigger(count: u32, notice: Option<&Notice>) -> HeaderValue {
    let cart_updated = serde_json::json!({ "count": count });
    let events = match notice.and_then(|n| serde_json::to_value(n).ok()) {
        Some(notice) => serde_json::json!({ "cart-updated": cart_updated, "notice": notice }),
        None => serde_json::json!({ "cart-updated": cart_updated }),
    };
    HeaderValue::from_str(&events.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("cart-updated"))
}

/// Respond to a cart mutation in the style the client asked for.
async fn respond(
    hx: bool,
    session: &Session,
    cart: CartView,
    notice: Option<Notice>,
    return_to: Option<&str>,
    fallback: &'static str,
) -> Result<Response> {
    if hx {
        let trigger = hx_trigger(cart.totals.total_items, notice.as_ref());
        return Ok((
            AppendHeaders([(HeaderName::from_static("hx-trigger"), trigger)]),
            CartItemsTemplate { cart },
        )
            .into_response());
    }

    if let Some(notice) = &notice {
        flash_notice(session, notice).await?;
    }
    Ok(Redirect::to(&safe_return_path(return_to, fallback)).into_response())
}

// =============================================================================
// Forms and Templates
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub return_to: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: i64,
    pub return_to: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
    pub return_to: Option<String>,
}

/// Clear cart form data.
#[derive(Debug, Deserialize)]
pub struct ClearCartForm {
    pub return_to: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartShowTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session, ctx))]
pub async fn show(session: Session, ctx: PageContext) -> Result<CartShowTemplate> {
    let store = load_cart(&session).await?;
    Ok(CartShowTemplate {
        ctx,
        cart: CartView::of(&store),
    })
}

/// Add one unit of an item to the cart.
///
/// Roblox game passes are checked against the platform first; anything
/// short of a confirmed match leaves the cart untouched.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    HxRequest(hx): HxRequest,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = parse_item_id(&form.id)?;
    let entry = find_item(id).ok_or_else(|| AppError::NotFound(format!("Item {id}")))?;

    if let Some(external_id) = entry.verification_target() {
        let outcome = state.verifier().verify_game_pass(external_id).await?;
        if let Some(notice) = outcome.refusal_notice() {
            tracing::info!(item_id = %id, %outcome, "Add to cart refused");
            let store = load_cart(&session).await?;
            return respond(
                hx,
                &session,
                CartView::of(&store),
                Some(notice),
                form.return_to.as_deref(),
                "/shop",
            )
            .await;
        }
    }

    let mut store = load_cart(&session).await?;
    store.add_to_cart(entry);
    let cart = save_cart(&session, store).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("item_id", &id.to_string()), ("name", entry.name())],
    );
    tracing::info!(item_id = %id, count = cart.totals.total_items, "Added to cart");

    let notice = Notice::added_to_cart(entry.name());
    respond(
        hx,
        &session,
        cart,
        Some(notice),
        form.return_to.as_deref(),
        "/cart",
    )
    .await
}

/// Set an item's quantity. Zero or below removes it.
#[instrument(skip(session))]
pub async fn update(
    HxRequest(hx): HxRequest,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = parse_item_id(&form.id)?;

    let mut store = load_cart(&session).await?;
    store.update_quantity(id, form.quantity);
    let cart = save_cart(&session, store).await?;

    respond(hx, &session, cart, None, form.return_to.as_deref(), "/cart").await
}

/// Remove an item from the cart.
#[instrument(skip(session))]
pub async fn remove(
    HxRequest(hx): HxRequest,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = parse_item_id(&form.id)?;

    let mut store = load_cart(&session).await?;
    store.remove_from_cart(id);
    let cart = save_cart(&session, store).await?;

    respond(hx, &session, cart, None, form.return_to.as_deref(), "/cart").await
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(
    HxRequest(hx): HxRequest,
    session: Session,
    Form(form): Form<ClearCartForm>,
) -> Result<Response> {
    let mut store = load_cart(&session).await?;
    store.clear_cart();
    let cart = save_cart(&session, store).await?;

    respond(hx, &session, cart, None, form.return_to.as_deref(), "/cart").await
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let store = load_cart(&session).await?;
    Ok(CartCountTemplate {
        count: store.total_items(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use karma_shop_core::storage::MemoryStorage;

    use super::*;

    #[test]
    fn test_hx_trigger_carries_count_and_notice() {
        let notice = Notice::added_to_cart("Gold");
        let value = hx_trigger(3, Some(&notice));
        let json: serde_json::Value = serde_json::from_slice(value.as_bytes()).unwrap();

        assert_eq!(json["cart-updated"]["count"], 3);
        assert_eq!(json["notice"]["title"], "Added to cart");
    }

    #[test]
    fn test_hx_trigger_without_notice() {
        let value = hx_trigger(0, None);
        let json: serde_json::Value = serde_json::from_slice(value.as_bytes()).unwrap();

        assert_eq!(json["cart-updated"]["count"], 0);
        assert!(json.get("notice").is_none());
    }

    #[test]
    fn test_cart_view_reflects_store() {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add_to_cart(find_item(ItemId::new(3)).unwrap());
        store.add_to_cart(find_item(ItemId::new(4)).unwrap());

        let view = CartView::of(&store);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.totals.total_items, 2);
        assert_eq!(view.totals.total.display(), "$85.00");
    }

    #[test]
    fn test_parse_item_id() {
        assert_eq!(parse_item_id("6").unwrap(), ItemId::new(6));
        assert!(matches!(parse_item_id("six"), Err(AppError::BadRequest(_))));
    }
}
