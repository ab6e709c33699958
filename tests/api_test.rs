mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::*;
use review_scout::http::{router, NOT_FOUND_MESSAGE};
use std::sync::Arc;
use tower::ServiceExt;

async fn post_reviews(
    app: axum::Router,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reviews")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn app_with(available: bool, pages: Vec<String>, static_html: String) -> (axum::Router, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let renderer = ScriptedRenderer::new(pages, counters.clone());
    let state = app_state(dispatcher(available, renderer, static_html, counters.clone()));
    (router(state), counters)
}

#[tokio::test]
async fn health_reports_rendering_capability() {
    let (app, _) = app_with(false, vec![], String::new());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "review-scout");
    assert_eq!(json["rendering"], false);
}

#[tokio::test]
async fn rendered_reviews_are_returned() {
    init_logger();
    let (app, counters) = app_with(
        true,
        vec![amazon_page(&["Solid build quality", "Screen is too dim"])],
        String::new(),
    );

    let (status, json) = post_reviews(
        app,
        serde_json::json!({"url": "https://www.amazon.com/product-reviews/B0X", "max_reviews": 2}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["site"], "amazon");
    assert_eq!(json["mode"], "render");
    assert_eq!(json["total"], 2);
    assert_eq!(json["reviews"][0], "Solid build quality");
    assert_eq!(Counters::get(&counters.static_fetches), 0);
}

#[tokio::test]
async fn max_reviews_defaults_when_omitted() {
    init_logger();
    let (app, _) = app_with(false, vec![], flipkart_page(&["Value for money phone"]));

    let (status, json) = post_reviews(
        app,
        serde_json::json!({"url": "https://www.flipkart.com/x/product-reviews/itm9"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mode"], "static");
    assert_eq!(json["reviews"][0], "Value for money phone");
}

#[tokio::test]
async fn unsupported_site_is_rejected_without_fetching() {
    init_logger();
    let (app, counters) = app_with(true, vec![], String::new());

    let (status, json) = post_reviews(
        app,
        serde_json::json!({"url": "https://shop.example.com/item/1"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Currently supports Amazon & Flipkart."));
    assert_eq!(Counters::get(&counters.opens), 0);
    assert_eq!(Counters::get(&counters.static_fetches), 0);
}

#[tokio::test]
async fn malformed_url_is_rejected() {
    let (app, _) = app_with(true, vec![], String::new());
    let (status, _) = post_reviews(app, serde_json::json!({"url": "amazon"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_result_maps_to_not_found() {
    init_logger();
    let (app, counters) = app_with(true, vec![amazon_page(&[])], String::new());

    let (status, json) = post_reviews(
        app,
        serde_json::json!({"url": "https://www.amazon.in/dp/B0EMPTY"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], NOT_FOUND_MESSAGE);
    assert_eq!(Counters::get(&counters.static_fetches), 1);
}

#[tokio::test]
async fn zero_max_returns_empty_list() {
    let (app, counters) = app_with(true, vec![amazon_page(&["Not requested"])], String::new());

    let (status, json) = post_reviews(
        app,
        serde_json::json!({"url": "https://www.amazon.in/dp/B0", "max_reviews": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 0);
    assert_eq!(json["mode"], "not_requested");
    assert_eq!(Counters::get(&counters.opens), 0);
}

#[tokio::test]
async fn zero_max_skips_site_validation() {
    let (app, counters) = app_with(true, vec![], String::new());

    let (status, json) = post_reviews(
        app,
        serde_json::json!({"url": "https://shop.example.com/item/1", "max_reviews": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 0);
    assert_eq!(json["mode"], "not_requested");
    assert!(json.get("site").is_none());
    assert_eq!(Counters::get(&counters.opens), 0);
    assert_eq!(Counters::get(&counters.static_fetches), 0);
}
