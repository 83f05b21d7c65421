//! Both trigger styles drive the same accumulation core.
//!
//! A three-page catalog is served once through a `PageSource` (direct fetch)
//! and once through a `Router` (navigation). Either way the view must end up
//! with the same items and stop loading after the last page.

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};

use shopscroll_paging::route::END_CURSOR_VARIABLE;
use shopscroll_paging::{
    variables, ConnectionExtractor, Cursor, FetchLoader, InfiniteScroll, LoadFuture, LoadMore,
    NavigateOptions, NavigationLoader, Page, PageExtractor, PageSource, PagingError, QueryState,
    RoutePagination, Router, ScrollUpdate,
};

/// Returns the `products` connection for the page after `cursor`.
fn catalog_response(cursor: Option<&str>) -> Value {
    let (nodes, page_info) = match cursor {
        None => (
            json!([{"id": "A"}, {"id": "B"}]),
            json!({"hasNextPage": true, "hasPreviousPage": false, "endCursor": "c2"}),
        ),
        Some("c2") => (
            json!([{"id": "C"}, {"id": "D"}]),
            json!({"hasNextPage": true, "hasPreviousPage": true, "endCursor": "c4"}),
        ),
        Some(_) => (
            json!([{"id": "E"}]),
            json!({"hasNextPage": false, "hasPreviousPage": true, "endCursor": "c5"}),
        ),
    };
    json!({"products": {"nodes": nodes, "pageInfo": page_info}})
}

#[derive(Clone, Default)]
struct Catalog {
    seen: Arc<Mutex<Vec<Value>>>,
}

impl PageSource for Catalog {
    type Response = Value;

    fn fetch(&self, request: QueryState) -> BoxFuture<'static, Result<Value, PagingError>> {
        self.seen
            .lock()
            .unwrap()
            .push(Value::Object(request.variables.clone()));
        let cursor = request.cursor();
        async move { Ok(catalog_response(cursor.as_ref().map(Cursor::as_str))) }.boxed()
    }
}

/// Router whose route loader reads the cursor from the URL, like a listing
/// route would.
#[derive(Clone, Default)]
struct CatalogRouter {
    navigations: Arc<Mutex<Vec<(String, NavigateOptions)>>>,
}

impl Router<Value> for CatalogRouter {
    fn navigate(&self, to: String, options: NavigateOptions, _state: Value) -> LoadFuture<Value> {
        self.navigations.lock().unwrap().push((to.clone(), options));
        async move {
            let query = to.split_once('?').map_or("", |(_, q)| q);
            let position = RoutePagination::from_query(query);
            let body = catalog_response(position.cursor.as_ref().map(Cursor::as_str));
            ConnectionExtractor::<Value>::new("products").extract_page(&body)
        }
        .boxed()
    }
}

async fn scroll_to_end<L: LoadMore<Value>>(view: &mut InfiniteScroll<Value, L>) -> Vec<String> {
    let mut guard = 0;
    while view.on_visibility(true) {
        let update = view.next_update().await.expect("load was issued");
        assert!(
            matches!(update, ScrollUpdate::Appended { .. }),
            "unexpected update: {update:?}"
        );
        guard += 1;
        assert!(guard < 10, "view never became terminal");
    }
    view.items()
        .iter()
        .map(|v| v["id"].as_str().unwrap_or_default().to_owned())
        .collect()
}

#[tokio::test]
async fn direct_fetch_accumulates_all_pages() {
    let catalog = Catalog::default();
    let loader = FetchLoader::new(catalog.clone(), ConnectionExtractor::<Value>::new("products"));
    let mut view = InfiniteScroll::new(
        QueryState::new("query Products", variables(json!({"first": 2}))),
        loader,
    );

    let ids = scroll_to_end(&mut view).await;

    assert_eq!(ids, ["A", "B", "C", "D", "E"]);
    assert_eq!(
        *catalog.seen.lock().unwrap(),
        vec![
            json!({"first": 2}),
            json!({"first": 2, "after": "c2"}),
            json!({"first": 2, "after": "c4"}),
        ]
    );
    assert!(view.accumulator().is_terminal());
}

#[tokio::test]
async fn navigation_accumulates_all_pages() {
    let router = CatalogRouter::default();
    let loader = NavigationLoader::new(router.clone(), "/collections/all");
    let mut view = InfiniteScroll::new(
        QueryState::new("query Collection", RoutePagination::default().variables(2))
            .with_cursor_variable(END_CURSOR_VARIABLE),
        loader,
    );

    let ids = scroll_to_end(&mut view).await;

    assert_eq!(ids, ["A", "B", "C", "D", "E"]);
    let navigations = router.navigations.lock().unwrap().clone();
    let urls: Vec<&str> = navigations.iter().map(|(to, _)| to.as_str()).collect();
    assert_eq!(
        urls,
        [
            "/collections/all",
            "/collections/all?direction=next&cursor=c2",
            "/collections/all?direction=next&cursor=c4",
        ]
    );
    assert!(navigations
        .iter()
        .all(|(_, opts)| *opts == NavigateOptions::infinite_scroll()));
}

#[tokio::test]
async fn seeded_view_continues_after_server_rendered_page() {
    let body = catalog_response(None);
    let first: Page<Value> = ConnectionExtractor::<Value>::new("products")
        .extract_page(&body)
        .unwrap();
    let accumulator = shopscroll_paging::PaginationAccumulator::with_first_page(
        QueryState::new("query Collection", RoutePagination::default().variables(2))
            .with_cursor_variable(END_CURSOR_VARIABLE),
        first,
    )
    .unwrap();

    let router = CatalogRouter::default();
    let mut view = InfiniteScroll::from_accumulator(
        accumulator,
        NavigationLoader::new(router.clone(), "/collections/all"),
    );

    let ids = scroll_to_end(&mut view).await;

    assert_eq!(ids, ["A", "B", "C", "D", "E"]);
    assert_eq!(router.navigations.lock().unwrap().len(), 2);
}
