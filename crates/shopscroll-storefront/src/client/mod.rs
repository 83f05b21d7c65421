//! HTTP client for the Shopify Storefront GraphQL API.

mod connection;
mod endpoint;
mod product;

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use shopscroll_core::AppConfig;
use shopscroll_paging::{PageSource, PagingError, QueryState, Variables};

use crate::error::StorefrontError;
use crate::rate_limit::retry_with_backoff;

pub use endpoint::graphql_endpoint;
#[cfg(test)]
use endpoint::extract_domain;

/// Maximum number of pages [`StorefrontClient::fetch_all`] will request
/// before giving up. Guards against cursors that never terminate.
pub(super) const MAX_PAGES: usize = 200;

/// Header carrying the public storefront access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

/// Client for one store's Storefront API endpoint.
///
/// Rate limiting (429), not-found (404) and other non-2xx responses surface as
/// typed errors. Transient failures are retried with jittered exponential
/// backoff up to `max_retries` additional attempts. Cloning is cheap; clones
/// share the connection pool.
#[derive(Clone)]
pub struct StorefrontClient {
    pub(super) client: Client,
    endpoint: String,
    access_token: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Creates a client for `store_domain` (e.g. `demo.myshopify.com`) at the
    /// given Storefront API version.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::InvalidStoreDomain`] if the domain does not form a
    ///   valid endpoint URL.
    /// - [`StorefrontError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        store_domain: &str,
        api_version: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, StorefrontError> {
        let endpoint = graphql_endpoint(store_domain, api_version)?;
        Self::with_endpoint(
            &endpoint,
            access_token,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_secs,
        )
    }

    /// Creates a client that posts to an explicit GraphQL endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_endpoint(
        endpoint: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, StorefrontError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
            access_token: access_token.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, StorefrontError> {
        Self::new(
            &config.store_domain,
            &config.storefront_api_version,
            &config.storefront_token,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs a GraphQL document and returns the response's `data` member.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::RateLimited`]: HTTP 429 after all retries.
    /// - [`StorefrontError::NotFound`]: HTTP 404 (not retried).
    /// - [`StorefrontError::UnexpectedStatus`]: any other non-2xx status (5xx retried).
    /// - [`StorefrontError::Http`]: network or TLS failure after all retries.
    /// - [`StorefrontError::Deserialize`]: body is not a GraphQL envelope.
    /// - [`StorefrontError::GraphQl`]: the envelope carries `errors`.
    /// - [`StorefrontError::MalformedResponse`]: the envelope has no `data`.
    pub async fn query(&self, query: &str, variables: &Variables) -> Result<Value, StorefrontError> {
        let body = json!({ "query": query, "variables": variables });

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let body = &body;
            async move {
                let response = self
                    .client
                    .post(&self.endpoint)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .header(ACCESS_TOKEN_HEADER, &self.access_token)
                    .json(body)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(StorefrontError::RateLimited {
                        domain: endpoint::extract_domain(&self.endpoint),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(StorefrontError::NotFound {
                        url: self.endpoint.clone(),
                    });
                }

                if !status.is_success() {
                    return Err(StorefrontError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: self.endpoint.clone(),
                    });
                }

                let text = response.text().await?;
                let envelope = serde_json::from_str::<GraphQlEnvelope>(&text).map_err(|e| {
                    StorefrontError::Deserialize {
                        context: format!("GraphQL response from {}", self.endpoint),
                        source: e,
                    }
                })?;
                unwrap_envelope(envelope)
            }
        })
        .await
    }
}

fn unwrap_envelope(envelope: GraphQlEnvelope) -> Result<Value, StorefrontError> {
    if !envelope.errors.is_empty() {
        return Err(StorefrontError::GraphQl {
            messages: envelope.errors.into_iter().map(|e| e.message).collect(),
        });
    }
    match envelope.data {
        Some(Value::Null) | None => Err(StorefrontError::MalformedResponse {
            reason: "response has neither data nor errors".to_owned(),
        }),
        Some(data) => Ok(data),
    }
}

impl PageSource for StorefrontClient {
    type Response = Value;

    fn fetch(&self, request: QueryState) -> BoxFuture<'static, Result<Value, PagingError>> {
        let client = self.clone();
        async move {
            client
                .query(&request.query, &request.variables)
                .await
                .map_err(PagingError::from)
        }
        .boxed()
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
