//! Thin HTTP surface over the scraper core. Classification and any other
//! downstream processing belong to the caller.

use crate::core::types::{ErrorResponse, FetchMode, FetchRequest, ReviewsResponse};
use crate::{AppState, ScoutError};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub const NOT_FOUND_MESSAGE: &str = "No reviews found (website might be blocking scraping).";

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/reviews", post(reviews_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "review-scout",
        "version": env!("CARGO_PKG_VERSION"),
        "rendering": state.rendering_available(),
        "sites": state.sites.names(),
    }))
}

async fn reviews_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FetchRequest>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let (site, result) = crate::tools::fetch_reviews(&state, &request)
        .await
        .map_err(|e| match e {
            ScoutError::InvalidUrl(_) | ScoutError::UnsupportedSite(_) => {
                api_error(StatusCode::BAD_REQUEST, e.to_string())
            }
            other => api_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        })?;

    if result.is_empty() && result.mode != FetchMode::NotRequested {
        warn!("No reviews for {} ({})", request.url, result.mode.as_str());
        return Err(api_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE));
    }

    Ok(Json(ReviewsResponse {
        url: request.url,
        site: site.map(str::to_string),
        mode: result.mode,
        total: result.reviews.len(),
        reviews: result.reviews,
    }))
}
