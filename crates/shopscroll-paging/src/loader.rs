//! What happens when the sentinel is hit.
//!
//! [`LoadMore`] is the single injected hook behind both trigger styles:
//! [`FetchLoader`] queries the upstream directly, while
//! [`crate::route::NavigationLoader`] asks the routing layer to navigate to
//! the next page's URL and lets the route transition perform the fetch.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::PagingError;
use crate::extract::PageExtractor;
use crate::page::Page;
use crate::query::QueryState;

pub type LoadFuture<T> = BoxFuture<'static, Result<Page<T>, PagingError>>;

/// Loads the page described by `request`.
pub trait LoadMore<T> {
    fn load_more(&self, request: QueryState) -> LoadFuture<T>;
}

impl<T, F> LoadMore<T> for F
where
    F: Fn(QueryState) -> LoadFuture<T>,
{
    fn load_more(&self, request: QueryState) -> LoadFuture<T> {
        self(request)
    }
}

/// Upstream paginated-query service. The response is opaque here; a
/// [`PageExtractor`] gives it meaning.
pub trait PageSource {
    type Response: Send + 'static;

    fn fetch(&self, request: QueryState) -> BoxFuture<'static, Result<Self::Response, PagingError>>;
}

/// Direct-fetch trigger: issues the query and extracts the page.
#[derive(Debug, Clone)]
pub struct FetchLoader<S, E> {
    source: S,
    extractor: E,
}

impl<S, E> FetchLoader<S, E> {
    pub fn new(source: S, extractor: E) -> Self {
        Self { source, extractor }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S, E> LoadMore<E::Item> for FetchLoader<S, E>
where
    S: PageSource<Response = E::Response>,
    E: PageExtractor + Clone + Send + Sync + 'static,
    E::Item: Send + 'static,
{
    fn load_more(&self, request: QueryState) -> LoadFuture<E::Item> {
        let fetch = self.source.fetch(request);
        let extractor = self.extractor.clone();
        async move {
            let response = fetch.await?;
            extractor.extract_page(&response)
        }
        .boxed()
    }
}
