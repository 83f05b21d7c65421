mod collections;
mod load_more;
mod products;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shopscroll_core::AppConfig;
use shopscroll_storefront::{StorefrontClient, StorefrontError};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub storefront: StorefrontClient,
    /// Products per page on collection routes.
    pub page_size: u32,
    pub collections_page_size: u32,
}

impl AppState {
    pub fn new(storefront: StorefrontClient, config: &AppConfig) -> Self {
        Self {
            storefront,
            page_size: config.page_size,
            collections_page_size: config.collections_page_size,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a storefront failure onto the API error envelope.
pub(super) fn map_storefront_error(request_id: String, error: &StorefrontError) -> ApiError {
    match error {
        StorefrontError::RateLimited {
            retry_after_secs, ..
        } => {
            tracing::warn!(error = %error, "storefront rate limited the request");
            ApiError::new(
                request_id,
                "rate_limited",
                format!("storefront is rate limiting requests, retry after {retry_after_secs}s"),
            )
        }
        StorefrontError::InvalidStoreDomain { .. } | StorefrontError::PaginationLimit { .. } => {
            tracing::error!(error = %error, "storefront request could not be served");
            ApiError::new(request_id, "internal_error", "storefront request failed")
        }
        _ => {
            tracing::error!(error = %error, "storefront query failed");
            ApiError::new(request_id, "upstream_error", "storefront query failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/load-more", get(load_more::load_more))
        .route("/api/v1/collections", get(collections::list_collections))
        .route(
            "/api/v1/collections/{handle}",
            get(collections::get_collection),
        )
        .route("/api/v1/products/{handle}", get(products::get_product))
        // Target of the `variant_url` links on product cards.
        .route("/products/{handle}", get(products::get_product))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
