//! Resource route that runs an arbitrary storefront query for the
//! infinite-scroll fetcher and returns the raw `data` member.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use shopscroll_paging::Variables;

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LoadMoreQuery {
    pub query: Option<String>,
    /// JSON-encoded variables object.
    pub variables: Option<String>,
}

pub(super) async fn load_more(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<LoadMoreQuery>,
) -> Result<Json<Value>, ApiError> {
    let Some(query) = params.query.filter(|q| !q.trim().is_empty()) else {
        return Err(ApiError::new(req_id.0, "bad_request", "query is required"));
    };
    let variables = parse_variables(params.variables.as_deref())
        .map_err(|reason| ApiError::new(req_id.0.clone(), "bad_request", reason))?;

    let data = state
        .storefront
        .query(&query, &variables)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    Ok(Json(data))
}

/// Absent, empty and `null` variables all mean "no variables".
fn parse_variables(raw: Option<&str>) -> Result<Variables, String> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(Variables::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Variables::new()),
        Ok(_) => Err("variables must be a JSON object".to_owned()),
        Err(e) => Err(format!("variables are not valid JSON: {e}")),
    }
}
