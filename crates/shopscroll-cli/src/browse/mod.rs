//! `browse` command: an infinite-scroll feed over a storefront listing.
//!
//! The feed is mounted with a simulated viewport that is scrolled to the end
//! after every page, so the sentinel keeps coming into view until the listing
//! is exhausted or `--max-pages` is reached.

mod listing;
mod router;
mod viewport;

use clap::{Args, Subcommand};
use serde_json::json;
use shopscroll_core::AppConfig;
use shopscroll_paging::route::END_CURSOR_VARIABLE;
use shopscroll_paging::{
    encode_path_segment, variables, ConnectionExtractor, FeedEvent, FetchLoader, InfiniteScroll,
    LoadMore, LookAhead, NavigationLoader, PagingError, QueryState, RoutePagination, ScrollUpdate,
    Sentinel, Variables,
};
use shopscroll_storefront::queries::{
    collection_query, collections_query, products_query, COLLECTIONS_CONNECTION,
    COLLECTION_PRODUCTS_CONNECTION, PRODUCTS_CONNECTION,
};
use shopscroll_storefront::{CollectionItem, ProductItem, StorefrontClient};
use tokio::sync::mpsc;

use self::listing::Listing;
use self::router::{RouteListing, StorefrontRouter};
use self::viewport::{ScrolledObserver, Viewport};

/// Consecutive failed loads tolerated before the feed gives up.
const MAX_CONSECUTIVE_RETRIES: u32 = 3;

/// Options shared by every listing.
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Items per page (defaults to the configured page size for the listing)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Stop after this many pages even if more are available
    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_pages: usize,

    /// Load pages through route navigation instead of direct queries
    #[arg(long)]
    pub navigate: bool,
}

/// Sub-commands available under `browse`.
#[derive(Debug, Subcommand)]
pub enum BrowseCommands {
    /// Every product in the store
    Products {
        #[command(flatten)]
        args: BrowseArgs,
    },
    /// The store's collections
    Collections {
        #[command(flatten)]
        args: BrowseArgs,
    },
    /// Products in one collection
    Collection {
        /// Collection handle, e.g. `frontpage`
        handle: String,

        #[command(flatten)]
        args: BrowseArgs,
    },
}

/// Runs a `browse` sub-command to completion.
///
/// # Errors
///
/// Returns an error if the storefront client cannot be built, if `--navigate`
/// is used on a listing without route pagination, or if the feed stops on a
/// load failure.
pub(crate) async fn run_browse(config: &AppConfig, command: BrowseCommands) -> anyhow::Result<()> {
    let client = StorefrontClient::from_app_config(config)?;
    let look_ahead = LookAhead::new(config.look_ahead_px);

    match command {
        BrowseCommands::Products { args } => {
            if args.navigate {
                anyhow::bail!(
                    "--navigate needs a route-paginated listing; use `collections` or `collection <handle>`"
                );
            }
            let page_by = args.page_size.unwrap_or(config.page_size);
            let request = QueryState::new(products_query(), variables(json!({ "first": page_by })));
            let loader = FetchLoader::new(
                client,
                ConnectionExtractor::<ProductItem>::new(PRODUCTS_CONNECTION),
            );
            scroll(InfiniteScroll::new(request, loader), look_ahead, args.max_pages).await
        }
        BrowseCommands::Collections { args } => {
            let listing = RouteListing {
                client,
                path: "/collections".to_owned(),
                query: collections_query(),
                connection: COLLECTIONS_CONNECTION,
                page_by: args.page_size.unwrap_or(config.collections_page_size),
                fixed: Variables::new(),
            };
            browse_route::<CollectionItem>(listing, &args, look_ahead).await
        }
        BrowseCommands::Collection { handle, args } => {
            let listing = RouteListing {
                client,
                path: format!("/collections/{}", encode_path_segment(&handle)),
                query: collection_query(),
                connection: COLLECTION_PRODUCTS_CONNECTION,
                page_by: args.page_size.unwrap_or(config.page_size),
                fixed: variables(json!({ "handle": handle })),
            };
            browse_route::<ProductItem>(listing, &args, look_ahead).await
        }
    }
}

/// Browses a route-paginated listing with either trigger style.
async fn browse_route<T>(
    listing: RouteListing,
    args: &BrowseArgs,
    look_ahead: LookAhead,
) -> anyhow::Result<()>
where
    T: Listing + serde::de::DeserializeOwned + Send + 'static,
{
    let request = QueryState::new(
        listing.query.clone(),
        listing.variables(&RoutePagination::default()),
    )
    .with_cursor_variable(END_CURSOR_VARIABLE);

    if args.navigate {
        let router = StorefrontRouter::new(listing.clone());
        let loader = NavigationLoader::new(router.clone(), listing.path);
        let view = InfiniteScroll::new(request, loader);
        let result = scroll::<T, _>(view, look_ahead, args.max_pages).await;
        tracing::info!(history = ?router.history(), "navigation finished");
        result
    } else {
        let loader = FetchLoader::new(
            listing.client,
            ConnectionExtractor::<T>::new(listing.connection),
        );
        scroll(InfiniteScroll::new(request, loader), look_ahead, args.max_pages).await
    }
}

/// Mounts `view`, prints items as pages arrive and unmounts once the listing
/// is exhausted, `max_pages` pages have loaded, or loading fails for good.
async fn scroll<T, L>(
    mut view: InfiniteScroll<T, L>,
    look_ahead: LookAhead,
    max_pages: usize,
) -> anyhow::Result<()>
where
    T: Listing,
    L: LoadMore<T>,
{
    let viewport = Viewport::new(look_ahead);
    let (events_tx, events_rx) = mpsc::channel(8);
    let observer = ScrolledObserver::new(viewport, events_tx.clone());

    let mut printed = 0usize;
    let mut pages = 0usize;
    let mut retries = 0u32;
    let mut failure: Option<PagingError> = None;

    view.start(&observer);
    let view = view
        .run(events_rx, |current, update| {
            let next = match update {
                ScrollUpdate::Appended { .. } => {
                    for (index, item) in current.items().iter().enumerate().skip(printed) {
                        println!("{:>4}. {}", index + 1, item.line());
                    }
                    printed = current.len();
                    pages += 1;
                    retries = 0;
                    if pages >= max_pages || current.accumulator().is_terminal() {
                        FeedEvent::Unmount
                    } else {
                        let sentinel = Sentinel::after(current.len());
                        FeedEvent::Visibility(viewport.visible_when_scrolled_to_end(sentinel))
                    }
                }
                ScrollUpdate::Retry(err) => {
                    retries += 1;
                    if retries > MAX_CONSECUTIVE_RETRIES {
                        failure = Some(err.clone());
                        FeedEvent::Unmount
                    } else {
                        FeedEvent::Visibility(true)
                    }
                }
                ScrollUpdate::Failed(err) => {
                    failure = Some(err.clone());
                    FeedEvent::Unmount
                }
                ScrollUpdate::Cancelled => FeedEvent::Unmount,
                ScrollUpdate::Ignored => return,
            };
            // A sentinel that stays out of view would leave the feed idle forever.
            let next = match next {
                FeedEvent::Visibility(false) => FeedEvent::Unmount,
                other => other,
            };
            if events_tx.try_send(next).is_err() {
                tracing::warn!("feed event channel full, dropping event");
            }
        })
        .await;

    tracing::info!(
        items = view.len(),
        pages,
        loads = view.loads_issued(),
        exhausted = view.accumulator().is_terminal(),
        "feed unmounted"
    );
    println!("-- {} items over {pages} pages", view.len());

    match failure {
        Some(err) => Err(anyhow::anyhow!("feed stopped: {err}")),
        None => Ok(()),
    }
}
