//! Integration tests for the session cart.
//!
//! Run with: cargo test -p karma-shop-integration-tests

#![allow(clippy::unwrap_used)]

use karma_shop_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::Value;

/// Add `id` with a plain form post.
async fn add(ctx: &TestContext, id: &str) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/cart/add"))
        .form(&[("id", id), ("return_to", "/cart")])
        .send()
        .await
        .expect("Failed to add to cart")
}

async fn cart_json(ctx: &TestContext) -> Value {
    let resp = ctx
        .client
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Cart should be JSON")
}

fn amount(totals: &Value, field: &str) -> f64 {
    totals[field]
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| totals[field].as_f64())
        .unwrap_or_else(|| panic!("{field} missing from {totals}"))
}

#[tokio::test]
async fn test_empty_cart() {
    let ctx = TestContext::new().await;
    let cart = cart_json(&ctx).await;

    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(cart["totals"]["totalItems"], 0);
    assert!(amount(&cart["totals"], "total").abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_totals_below_free_shipping() {
    let ctx = TestContext::new().await;

    let resp = add(&ctx, "3").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/cart");
    add(&ctx, "4").await;

    let cart = cart_json(&ctx).await;
    let totals = &cart["totals"];
    assert_eq!(totals["totalItems"], 2);
    assert!((amount(totals, "subtotal") - 75.0).abs() < f64::EPSILON);
    assert!((amount(totals, "shipping") - 10.0).abs() < f64::EPSILON);
    assert!((amount(totals, "total") - 85.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_totals_above_free_shipping() {
    let ctx = TestContext::new().await;
    for _ in 0..3 {
        add(&ctx, "6").await;
    }

    let cart = cart_json(&ctx).await;
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1, "repeat adds should merge into one line");
    assert_eq!(items[0]["quantity"], 3);

    let totals = &cart["totals"];
    assert!((amount(totals, "subtotal") - 300.0).abs() < f64::EPSILON);
    assert!(amount(totals, "shipping").abs() < f64::EPSILON);
    assert!((amount(totals, "total") - 300.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_htmx_add_returns_fragment_and_trigger() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/add"))
        .header("HX-Request", "true")
        .form(&[("id", "101")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let trigger: Value =
        serde_json::from_str(resp.headers()["hx-trigger"].to_str().unwrap()).unwrap();
    assert_eq!(trigger["cart-updated"]["count"], 1);
    assert_eq!(trigger["notice"]["title"], "Added to cart");

    let body = resp.text().await.unwrap();
    assert!(body.contains("cart-line"), "fragment should list the item");
    assert!(!body.contains("<html"), "fragment should not be a full page");
}

#[tokio::test]
async fn test_update_and_remove() {
    let ctx = TestContext::new().await;
    add(&ctx, "3").await;
    add(&ctx, "4").await;

    ctx.client
        .post(ctx.url("/cart/update"))
        .form(&[("id", "3"), ("quantity", "4")])
        .send()
        .await
        .unwrap();
    let cart = cart_json(&ctx).await;
    assert_eq!(cart["totals"]["totalItems"], 5);

    // Zero removes the line
    ctx.client
        .post(ctx.url("/cart/update"))
        .form(&[("id", "3"), ("quantity", "0")])
        .send()
        .await
        .unwrap();
    ctx.client
        .post(ctx.url("/cart/remove"))
        .form(&[("id", "4")])
        .send()
        .await
        .unwrap();

    let cart = cart_json(&ctx).await;
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_clear_cart() {
    let ctx = TestContext::new().await;
    add(&ctx, "3").await;
    add(&ctx, "102").await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/clear"))
        .form(&[("return_to", "/shop")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/shop");

    let cart = cart_json(&ctx).await;
    assert_eq!(cart["totals"]["totalItems"], 0);
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let ctx = TestContext::new().await;
    add(&ctx, "3").await;

    let other = ctx.new_visitor();
    let cart = cart_json(&other).await;
    assert_eq!(cart["totals"]["totalItems"], 0);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let ctx = TestContext::new().await;
    add(&ctx, "3").await;
    add(&ctx, "4").await;

    let restarted = ctx.restart().await;
    let cart = cart_json(&restarted).await;
    assert_eq!(cart["totals"]["totalItems"], 2);
}

#[tokio::test]
async fn test_sessions_are_stored_in_database() {
    let ctx = TestContext::new().await;
    add(&ctx, "3").await;
    add(&ctx.new_visitor(), "4").await;

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tower_sessions")
        .fetch_one(ctx.pool())
        .await
        .unwrap();
    assert_eq!(rows, 2);
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    let ctx = TestContext::new().await;

    let resp = add(&ctx, "9999").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = add(&ctx, "abc").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_offsite_return_path_is_ignored() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/add"))
        .form(&[("id", "3"), ("return_to", "https://evil.example/")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/cart");
}

#[tokio::test]
async fn test_cart_page_shows_flash_notice_once() {
    let ctx = TestContext::new().await;
    add(&ctx, "4").await;

    let page = ctx
        .client
        .get(ctx.url("/cart"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Donation - Bronze has been added to your cart."));

    let again = ctx
        .client
        .get(ctx.url("/cart"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!again.contains("has been added to your cart."));
}
