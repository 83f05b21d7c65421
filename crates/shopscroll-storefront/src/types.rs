//! Storefront GraphQL item types.
//!
//! ## Observed shape
//!
//! Money amounts arrive as decimal strings (`"12.99"`), never as floats, so
//! they are decoded into [`Decimal`]. `featuredImage` and `image` are `null`
//! for items without media. `altText` is frequently `null` even when an image
//! is present.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::variants::{is_default_title, variant_url};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    pub amount: Decimal,
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: MoneyV2,
    pub max_variant_price: MoneyV2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// `{ nodes: [...] }` wrapper for non-paginated nested lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nodes<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

/// Product card as fetched by the product-item fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductItem {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub featured_image: Option<Image>,
    pub price_range: PriceRange,
    #[serde(default)]
    pub variants: Nodes<VariantSummary>,
}

impl ProductItem {
    /// Link to the product page with its first variant preselected.
    #[must_use]
    pub fn variant_url(&self) -> String {
        let options = self
            .variants
            .nodes
            .first()
            .map_or(&[][..], |v| v.selected_options.as_slice());
        variant_url(&self.handle, options)
    }
}

/// Collection card in the collections listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItem {
    pub id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub image: Option<Image>,
}

/// Collection header returned alongside its product connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Purchasable variant as shown on the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub available_for_sale: bool,
    pub price: MoneyV2,
    #[serde(default)]
    pub compare_at_price: Option<MoneyV2>,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    pub name: String,
    #[serde(default)]
    pub option_values: Vec<OptionValue>,
}

/// Collection a product belongs to; the first one feeds related products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: String,
    pub handle: String,
    pub title: String,
}

/// Product page payload.
///
/// `selected_variant` is the variant matching the requested options, or
/// `None` when the options did not resolve to one. `variants` holds only
/// the first variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub collections: Nodes<CollectionRef>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default)]
    pub selected_variant: Option<Variant>,
    #[serde(default)]
    pub variants: Nodes<Variant>,
}

impl ProductDetail {
    #[must_use]
    pub fn first_variant(&self) -> Option<&Variant> {
        self.variants.nodes.first()
    }

    /// Whether the product has no real options, only Shopify's
    /// `Title=Default Title` placeholder.
    #[must_use]
    pub fn has_only_default_variant(&self) -> bool {
        self.first_variant()
            .is_some_and(|v| v.selected_options.iter().any(is_default_title))
    }

    #[must_use]
    pub fn first_collection(&self) -> Option<&CollectionRef> {
        self.collections.nodes.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_json() -> serde_json::Value {
        json!({
            "id": "gid://shopify/Product/1",
            "handle": "snowboard",
            "title": "The Snowboard",
            "featuredImage": {
                "id": "gid://shopify/ProductImage/9",
                "altText": null,
                "url": "https://cdn.shopify.com/s/files/board.png",
                "width": 800,
                "height": 600
            },
            "priceRange": {
                "minVariantPrice": {"amount": "699.95", "currencyCode": "USD"},
                "maxVariantPrice": {"amount": "729.95", "currencyCode": "USD"}
            },
            "variants": {"nodes": [{"selectedOptions": [{"name": "Size", "value": "154cm"}]}]}
        })
    }

    #[test]
    fn product_item_decodes_money_as_decimal() {
        let item: ProductItem = serde_json::from_value(product_json()).unwrap();
        assert_eq!(
            item.price_range.min_variant_price.amount,
            Decimal::new(69_995, 2)
        );
        assert_eq!(item.featured_image.unwrap().alt_text, None);
    }

    #[test]
    fn product_item_variant_url_uses_first_variant() {
        let item: ProductItem = serde_json::from_value(product_json()).unwrap();
        assert_eq!(item.variant_url(), "/products/snowboard?Size=154cm");
    }

    #[test]
    fn product_item_without_variants_links_to_product() {
        let mut raw = product_json();
        raw.as_object_mut().unwrap().remove("variants");
        raw["featuredImage"] = serde_json::Value::Null;
        let item: ProductItem = serde_json::from_value(raw).unwrap();
        assert!(item.featured_image.is_none());
        assert_eq!(item.variant_url(), "/products/snowboard");
    }

    #[test]
    fn collection_item_allows_missing_image() {
        let item: CollectionItem = serde_json::from_value(json!({
            "id": "gid://shopify/Collection/3",
            "title": "Boards",
            "handle": "boards",
            "image": null
        }))
        .unwrap();
        assert_eq!(item.handle, "boards");
        assert!(item.image.is_none());
    }

    fn detail_json(first_options: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "gid://shopify/Product/7",
            "handle": "gift-card",
            "title": "Gift Card",
            "vendor": "Snowdevil",
            "collections": {"nodes": [{"id": "gid://shopify/Collection/1", "handle": "extras", "title": "Extras"}]},
            "options": [{"name": "Title", "optionValues": [{"name": "Default Title"}]}],
            "selectedVariant": null,
            "variants": {"nodes": [{
                "id": "gid://shopify/ProductVariant/70",
                "title": "Default Title",
                "availableForSale": true,
                "price": {"amount": "25.00", "currencyCode": "USD"},
                "compareAtPrice": null,
                "image": null,
                "sku": null,
                "selectedOptions": first_options
            }]}
        })
    }

    #[test]
    fn default_title_product_is_single_variant() {
        let detail: ProductDetail =
            serde_json::from_value(detail_json(json!([{"name": "Title", "value": "Default Title"}])))
                .unwrap();
        assert!(detail.has_only_default_variant());
        assert!(detail.selected_variant.is_none());
        assert_eq!(detail.first_collection().map(|c| c.handle.as_str()), Some("extras"));
    }

    #[test]
    fn product_with_real_options_is_not_single_variant() {
        let detail: ProductDetail =
            serde_json::from_value(detail_json(json!([{"name": "Size", "value": "154cm"}]))).unwrap();
        assert!(!detail.has_only_default_variant());
        assert_eq!(
            detail.first_variant().map(|v| v.price.amount),
            Some(Decimal::new(2500, 2))
        );
    }
}
