//! In-process router for the navigation trigger style.
//!
//! Navigating reads the position from the target URL the way a listing
//! route's loader would, runs the route's query and resolves with the page.

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shopscroll_paging::{
    LoadFuture, NavigateOptions, PagingError, QueryState, RoutePagination, Router, Variables,
};
use shopscroll_storefront::StorefrontClient;

/// A listing route: its query, where the connection sits in the response,
/// and any fixed variables (such as the collection handle).
#[derive(Debug, Clone)]
pub(super) struct RouteListing {
    pub client: StorefrontClient,
    pub path: String,
    pub query: String,
    pub connection: &'static str,
    pub page_by: u32,
    pub fixed: Variables,
}

impl RouteListing {
    /// Variables for the route at `pagination`.
    pub(super) fn variables(&self, pagination: &RoutePagination) -> Variables {
        let mut vars = self.fixed.clone();
        vars.extend(pagination.variables(self.page_by));
        vars
    }
}

#[derive(Debug, Clone)]
pub(super) struct StorefrontRouter {
    listing: RouteListing,
    history: Arc<Mutex<Vec<String>>>,
}

impl StorefrontRouter {
    pub(super) fn new(listing: RouteListing) -> Self {
        Self {
            listing,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Current history stack, oldest first.
    pub(super) fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    fn record(&self, to: &str, options: NavigateOptions) {
        let Ok(mut history) = self.history.lock() else {
            return;
        };
        if options.replace {
            history.pop();
        }
        history.push(to.to_owned());
    }
}

impl<T> Router<T> for StorefrontRouter
where
    T: DeserializeOwned + Send + 'static,
{
    fn navigate(&self, to: String, options: NavigateOptions, state: Value) -> LoadFuture<T> {
        self.record(&to, options);
        let position = RoutePagination::from_query(to.split_once('?').map_or("", |(_, q)| q));
        tracing::debug!(
            to = %to,
            replace = options.replace,
            prevent_scroll_reset = options.prevent_scroll_reset,
            state = %state,
            "route transition"
        );

        let request = QueryState::new(self.listing.query.clone(), self.listing.variables(&position));
        let client = self.listing.client.clone();
        let connection = self.listing.connection;
        async move {
            client
                .fetch_page::<T>(&request, connection)
                .await
                .map_err(PagingError::from)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shopscroll_paging::{variables, Page};
    use shopscroll_storefront::queries::{collection_query, COLLECTION_PRODUCTS_CONNECTION};
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing(server: &MockServer) -> RouteListing {
        RouteListing {
            client: StorefrontClient::with_endpoint(
                &format!("{}/api/2024-10/graphql.json", server.uri()),
                "token",
                5,
                "shopscroll-test/0.1",
                0,
                0,
            )
            .unwrap(),
            path: "/collections/boards".to_owned(),
            query: collection_query(),
            connection: COLLECTION_PRODUCTS_CONNECTION,
            page_by: 8,
            fixed: variables(json!({"handle": "boards"})),
        }
    }

    #[tokio::test]
    async fn navigate_loads_page_at_url_cursor_and_replaces_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "variables": {"handle": "boards", "first": 8, "endCursor": "e8"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"collection": {"products": {
                    "nodes": [{"id": "p9"}],
                    "pageInfo": {"hasNextPage": false, "endCursor": "e9"}
                }}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let router = StorefrontRouter::new(listing(&server));
        router.record("/collections/boards", NavigateOptions::default());

        let page: Page<Value> = router
            .navigate(
                "/collections/boards?direction=next&cursor=e8".to_owned(),
                NavigateOptions::infinite_scroll(),
                json!({}),
            )
            .await
            .unwrap();

        assert_eq!(page.items, vec![json!({"id": "p9"})]);
        assert_eq!(
            router.history(),
            vec!["/collections/boards?direction=next&cursor=e8".to_owned()]
        );
    }

    #[test]
    fn route_variables_keep_fixed_variables() {
        let listing = RouteListing {
            client: StorefrontClient::with_endpoint("http://127.0.0.1:1/graphql.json", "t", 1, "ua", 0, 0)
                .unwrap(),
            path: "/collections/boards".to_owned(),
            query: collection_query(),
            connection: COLLECTION_PRODUCTS_CONNECTION,
            page_by: 4,
            fixed: variables(json!({"handle": "boards"})),
        };
        let vars = listing.variables(&RoutePagination::from_query("direction=previous&cursor=s1"));
        assert_eq!(
            Value::Object(vars),
            json!({"handle": "boards", "last": 4, "startCursor": "s1"})
        );
    }
}
