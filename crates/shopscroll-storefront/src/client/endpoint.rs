//! Endpoint derivation for the Storefront API.

use crate::error::StorefrontError;

/// Builds `https://{domain}/api/{version}/graphql.json` for a store domain.
///
/// Accepts a bare domain (`demo.myshopify.com`) or a URL with a scheme; any
/// path on the URL is dropped so the endpoint always sits at the store root.
///
/// # Errors
///
/// Returns [`StorefrontError::InvalidStoreDomain`] if the domain is empty or
/// does not parse as a URL host.
pub fn graphql_endpoint(store_domain: &str, api_version: &str) -> Result<String, StorefrontError> {
    let trimmed = store_domain.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(StorefrontError::InvalidStoreDomain {
            store_domain: store_domain.to_owned(),
            reason: "store domain is empty".to_owned(),
        });
    }
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };
    let url = reqwest::Url::parse(&with_scheme).map_err(|e| StorefrontError::InvalidStoreDomain {
        store_domain: store_domain.to_owned(),
        reason: e.to_string(),
    })?;
    if url.host_str().is_none() {
        return Err(StorefrontError::InvalidStoreDomain {
            store_domain: store_domain.to_owned(),
            reason: "no host".to_owned(),
        });
    }
    Ok(format!(
        "{}/api/{api_version}/graphql.json",
        url.origin().ascii_serialization()
    ))
}

/// Extracts the hostname from an endpoint URL for use in error messages.
///
/// Falls back to the full string if parsing fails.
pub(super) fn extract_domain(endpoint: &str) -> String {
    reqwest::Url::parse(endpoint)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| endpoint.to_owned())
}
