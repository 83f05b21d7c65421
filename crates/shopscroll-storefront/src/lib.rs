//! Shopify Storefront API client and storefront item types.

pub mod client;
pub mod error;
pub mod queries;
pub(crate) mod rate_limit;
pub mod types;
pub mod variants;

pub use client::{graphql_endpoint, StorefrontClient};
pub use error::StorefrontError;
pub use types::{
    CollectionItem, CollectionRef, CollectionSummary, Image, MoneyV2, OptionValue, PriceRange,
    ProductDetail, ProductItem, ProductOption, SelectedOption, Variant,
};
pub use variants::{selected_options_from_query, variant_url, with_variant_query};
