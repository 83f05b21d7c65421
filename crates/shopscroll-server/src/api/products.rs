//! Product page with variant selection.
//!
//! The query string carries the selected options (`?Size=XL&Color=Black`).
//! When they do not resolve to a variant the route redirects to the first
//! variant's options, except for single-variant products, which always show
//! their only variant.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use shopscroll_storefront::{selected_options_from_query, with_variant_query, ProductDetail};

use crate::middleware::RequestId;

use super::collections::ProductCard;
use super::{map_storefront_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ProductPage {
    product: ProductDetail,
    related_products: Vec<ProductCard>,
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let selected = selected_options_from_query(uri.query().unwrap_or_default());

    let product = state
        .storefront
        .product(&handle, &selected)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;
    let Some(mut product) = product else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("product {handle} not found"),
        ));
    };

    if product.has_only_default_variant() {
        product.selected_variant = product.first_variant().cloned();
    } else if product.selected_variant.is_none() {
        if let Some(first) = product.first_variant() {
            let location = with_variant_query(uri.path(), &first.selected_options);
            tracing::debug!(handle = %handle, location = %location, "redirecting to first variant");
            return Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response());
        }
    }

    let related = match product.first_collection() {
        Some(collection) => state
            .storefront
            .related_products(&collection.handle, state.page_size)
            .await
            .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?,
        None => Vec::new(),
    };

    Ok(Json(ApiResponse {
        data: ProductPage {
            product,
            related_products: related.into_iter().map(ProductCard::new).collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
    .into_response())
}
