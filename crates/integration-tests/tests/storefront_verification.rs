//! Integration tests for platform verification.
//!
//! The mock platform answers for the catalog's pass ids, see
//! `karma_shop_integration_tests`.

#![allow(clippy::unwrap_used)]

use karma_shop_integration_tests::{
    BROKEN_GAME_PASS, KNOWN_USERNAME, MISSING_GAME_PASS, TestContext,
};
use reqwest::StatusCode;
use serde_json::Value;

async fn get_json(ctx: &TestContext, path: &str) -> (StatusCode, Value) {
    let resp = ctx
        .client
        .get(ctx.url(path))
        .send()
        .await
        .expect("Failed to call verification API");
    let status = resp.status();
    (status, resp.json().await.unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_game_pass_outcomes() {
    let ctx = TestContext::new().await;

    let (status, body) = get_json(&ctx, "/api/verify/game-pass/956035778").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "verified");
    assert!(body.get("notice").is_none());

    let (_, body) = get_json(&ctx, &format!("/api/verify/game-pass/{MISSING_GAME_PASS}")).await;
    assert_eq!(body["outcome"], "not_found");
    assert_eq!(body["notice"]["title"], "Verification Failed");

    let (_, body) = get_json(&ctx, &format!("/api/verify/game-pass/{BROKEN_GAME_PASS}")).await;
    assert_eq!(body["outcome"], "unknown");
    assert_eq!(body["notice"]["title"], "Verification Error");
}

#[tokio::test]
async fn test_invalid_game_pass_id_is_rejected() {
    let ctx = TestContext::new().await;

    let (status, _) = get_json(&ctx, "/api/verify/game-pass/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_account_outcomes() {
    let ctx = TestContext::new().await;

    let (_, body) = get_json(&ctx, &format!("/api/verify/account/{KNOWN_USERNAME}")).await;
    assert_eq!(body["outcome"], "verified");

    let (_, body) = get_json(&ctx, "/api/verify/account/nobody_here").await;
    assert_eq!(body["outcome"], "not_found");
}

#[tokio::test]
async fn test_missing_pass_is_not_added() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/add"))
        .header("HX-Request", "true")
        .form(&[("id", "5")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let trigger: Value =
        serde_json::from_str(resp.headers()["hx-trigger"].to_str().unwrap()).unwrap();
    assert_eq!(trigger["cart-updated"]["count"], 0);
    assert_eq!(trigger["notice"]["title"], "Verification Failed");
}

#[tokio::test]
async fn test_inconclusive_check_is_not_added() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/add"))
        .form(&[("id", "7"), ("return_to", "/shop")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/shop");

    let (_, cart) = get_json(&ctx, "/api/cart").await;
    assert_eq!(cart["totals"]["totalItems"], 0);

    let page = ctx
        .client
        .get(ctx.url("/shop"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("An error occurred while verifying this gamepass."));
}

#[tokio::test]
async fn test_products_skip_verification() {
    let ctx = TestContext::new().await;

    // Products carry no platform id and go straight in
    ctx.client
        .post(ctx.url("/cart/add"))
        .form(&[("id", "103")])
        .send()
        .await
        .unwrap();

    let (_, cart) = get_json(&ctx, "/api/cart").await;
    assert_eq!(cart["totals"]["totalItems"], 1);
}
