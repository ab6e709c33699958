mod common;

use axum::{http::StatusCode, routing::get, Router};
use review_scout::scraping::{HttpFetcher, StaticFetcher};
use std::time::Duration;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(reqwest::Client::new(), Duration::from_secs(5), None)
}

#[tokio::test]
async fn returns_body_on_success() {
    common::init_logger();
    let base = serve(Router::new().route(
        "/reviews",
        get(|| async { common::amazon_page(&["Served over plain HTTP"]) }),
    ))
    .await;

    let html = fetcher().fetch(&format!("{}/reviews", base)).await;
    assert!(html.contains("Served over plain HTTP"));
}

#[tokio::test]
async fn error_status_yields_empty_body() {
    common::init_logger();
    let base = serve(Router::new().route(
        "/reviews",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "try later") }),
    ))
    .await;

    assert_eq!(fetcher().fetch(&format!("{}/reviews", base)).await, "");
}

#[tokio::test]
async fn unreachable_host_yields_empty_body() {
    common::init_logger();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    assert_eq!(fetcher().fetch(&format!("http://{}/", addr)).await, "");
}

#[tokio::test]
async fn sends_browser_user_agent() {
    common::init_logger();
    let base = serve(Router::new().route(
        "/ua",
        get(|headers: axum::http::HeaderMap| async move {
            headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        }),
    ))
    .await;

    let body = fetcher().fetch(&format!("{}/ua", base)).await;
    assert!(body.starts_with("Mozilla/5.0"), "got {}", body);
}
