use axum::{
    extract::{Path, RawQuery, State},
    Extension, Json,
};
use serde::Serialize;
use shopscroll_paging::route::{next_page_url, previous_page_url, END_CURSOR_VARIABLE};
use shopscroll_paging::{
    encode_path_segment, ConnectionExtractor, PageExtractor, PageInfo, QueryState, RoutePagination,
};
use shopscroll_storefront::queries::{
    collection_query, collections_query, COLLECTIONS_CONNECTION, COLLECTION_PRODUCTS_CONNECTION,
};
use shopscroll_storefront::{CollectionItem, CollectionSummary, ProductItem, StorefrontError};

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, ApiResponse, AppState, ResponseMeta};

const COLLECTIONS_PATH: &str = "/api/v1/collections";

#[derive(Debug, Serialize)]
pub(super) struct CollectionsPage {
    items: Vec<CollectionItem>,
    page_info: PageInfo,
    next_page_url: Option<String>,
    previous_page_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductCard {
    #[serde(flatten)]
    product: ProductItem,
    variant_url: String,
}

impl ProductCard {
    pub(super) fn new(product: ProductItem) -> Self {
        Self {
            variant_url: product.variant_url(),
            product,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CollectionPage {
    collection: CollectionSummary,
    products: Vec<ProductCard>,
    page_info: PageInfo,
    next_page_url: Option<String>,
    previous_page_url: Option<String>,
}

/// Query state for a route position, with the cursor carried in `endCursor`.
fn route_request(query: String, pagination: &RoutePagination, page_by: u32) -> QueryState {
    QueryState::new(query, pagination.variables(page_by)).with_cursor_variable(END_CURSOR_VARIABLE)
}

pub(super) async fn list_collections(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiResponse<CollectionsPage>>, ApiError> {
    let pagination = RoutePagination::from_query(raw.as_deref().unwrap_or_default());
    let request = route_request(collections_query(), &pagination, state.collections_page_size);

    let page = state
        .storefront
        .fetch_page::<CollectionItem>(&request, COLLECTIONS_CONNECTION)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    tracing::debug!(
        items = page.items.len(),
        has_next_page = page.page_info.has_next_page,
        "collections page served"
    );

    Ok(Json(ApiResponse {
        data: CollectionsPage {
            next_page_url: next_page_url(COLLECTIONS_PATH, &page.page_info),
            previous_page_url: previous_page_url(COLLECTIONS_PATH, &page.page_info),
            items: page.items,
            page_info: page.page_info,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_collection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiResponse<CollectionPage>>, ApiError> {
    let pagination = RoutePagination::from_query(raw.as_deref().unwrap_or_default());
    let mut request = route_request(collection_query(), &pagination, state.page_size);
    request
        .variables
        .insert("handle".to_owned(), serde_json::Value::String(handle.clone()));

    let data = state
        .storefront
        .query(&request.query, &request.variables)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    let Some(raw_collection) = data.get("collection").filter(|c| !c.is_null()) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("collection {handle} not found"),
        ));
    };

    let collection: CollectionSummary = serde_json::from_value(raw_collection.clone())
        .map_err(|e| {
            map_storefront_error(
                req_id.0.clone(),
                &StorefrontError::Deserialize {
                    context: format!("collection {handle}"),
                    source: e,
                },
            )
        })?;
    let page = ConnectionExtractor::<ProductItem>::new(COLLECTION_PRODUCTS_CONNECTION)
        .extract_page(&data)
        .map_err(|e| map_storefront_error(req_id.0.clone(), &StorefrontError::Paging(e)))?;

    let path = format!("{COLLECTIONS_PATH}/{}", encode_path_segment(&handle));
    let products = page.items.into_iter().map(ProductCard::new).collect();

    Ok(Json(ApiResponse {
        data: CollectionPage {
            collection,
            products,
            next_page_url: next_page_url(&path, &page.page_info),
            previous_page_url: previous_page_url(&path, &page.page_info),
            page_info: page.page_info,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
