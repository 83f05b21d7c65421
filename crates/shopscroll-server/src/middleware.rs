//! Request correlation for the storefront proxy.
//!
//! Every request runs inside a `request` span carrying its id, so the
//! storefront failures logged by the handlers can be matched to the
//! `meta.request_id` the client received.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is echoed back.
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Caller ids are kept only when short and made of token characters;
/// anything else is replaced rather than echoed into logs and headers.
fn accepted_request_id(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    let valid = !raw.is_empty()
        && raw.len() <= MAX_REQUEST_ID_LEN
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'));
    valid.then_some(raw)
}

pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(accepted_request_id)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path()
    );
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).instrument(span).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::{Extension, Router};
    use tower::ServiceExt;

    async fn echoed_id(header: Option<&str>) -> String {
        let app = Router::new()
            .route("/", get(|Extension(id): Extension<RequestId>| async move { id.0 }))
            .layer(axum::middleware::from_fn(request_id));
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(REQUEST_ID_HEADER, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_owned();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, header.as_bytes(), "extension and header must agree");
        header
    }

    #[test]
    fn token_ids_are_accepted() {
        assert_eq!(accepted_request_id(" req-42.a:b_c "), Some("req-42.a:b_c"));
    }

    #[test]
    fn unsafe_or_oversized_ids_are_rejected() {
        assert_eq!(accepted_request_id(""), None);
        assert_eq!(accepted_request_id("a b"), None);
        assert_eq!(accepted_request_id("id\"}"), None);
        assert_eq!(accepted_request_id(&"x".repeat(MAX_REQUEST_ID_LEN + 1)), None);
        assert!(accepted_request_id(&"x".repeat(MAX_REQUEST_ID_LEN)).is_some());
    }

    #[tokio::test]
    async fn caller_id_is_kept() {
        assert_eq!(echoed_id(Some("trace-1")).await, "trace-1");
    }

    #[tokio::test]
    async fn rejected_or_missing_id_is_replaced_with_uuid() {
        for header in [None, Some("<script>"), Some("   ")] {
            let id = echoed_id(header).await;
            assert!(Uuid::parse_str(&id).is_ok(), "not a uuid: {id}");
        }
    }
}
