//! Product page fetches for `StorefrontClient`.

use serde_json::{json, Value};
use shopscroll_paging::{variables, ConnectionExtractor, PageExtractor};

use crate::error::StorefrontError;
use crate::queries::{collection_query, product_query, COLLECTION_PRODUCTS_CONNECTION};
use crate::types::{ProductDetail, ProductItem, SelectedOption};

use super::StorefrontClient;

impl StorefrontClient {
    /// Fetches the product page for `handle`, resolving `selected_variant`
    /// from `selected_options`. Unknown options are ignored by the storefront.
    ///
    /// Returns `Ok(None)` when no product has that handle.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::query`]; returns
    /// [`StorefrontError::Deserialize`] if the product does not decode.
    pub async fn product(
        &self,
        handle: &str,
        selected_options: &[SelectedOption],
    ) -> Result<Option<ProductDetail>, StorefrontError> {
        let vars = variables(json!({
            "handle": handle,
            "selectedOptions": selected_options,
        }));
        let data = self.query(&product_query(), &vars).await?;

        match data.get("product") {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => serde_json::from_value(raw.clone())
                .map(Some)
                .map_err(|source| StorefrontError::Deserialize {
                    context: format!("product {handle}"),
                    source,
                }),
        }
    }

    /// First `first` products of the collection `collection_handle`, used as
    /// related products on a product page. A collection that no longer
    /// exists yields an empty list.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::query`]; returns
    /// [`StorefrontError::Paging`] if the product connection is malformed.
    pub async fn related_products(
        &self,
        collection_handle: &str,
        first: u32,
    ) -> Result<Vec<ProductItem>, StorefrontError> {
        let vars = variables(json!({ "handle": collection_handle, "first": first }));
        let data = self.query(&collection_query(), &vars).await?;

        if data.get("collection").is_none_or(Value::is_null) {
            tracing::warn!(collection = collection_handle, "related collection not found");
            return Ok(Vec::new());
        }
        let items = ConnectionExtractor::<ProductItem>::new(COLLECTION_PRODUCTS_CONNECTION)
            .extract_items(&data)?;
        Ok(items)
    }
}
