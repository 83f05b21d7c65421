//! Cursor-paginated list accumulation for infinite-scroll views.
//!
//! A view mounts an [`InfiniteScroll`] with a query and an injected
//! [`LoadMore`] hook. Each time the sentinel comes within the look-ahead
//! margin the next page is loaded (directly via [`FetchLoader`], or through a
//! route transition via [`NavigationLoader`]) and appended to the list.

pub mod accumulator;
pub mod error;
pub mod extract;
pub mod loader;
pub mod page;
pub mod query;
pub mod route;
pub mod scroll;
pub mod visibility;

pub use accumulator::{Applied, LoadState, PaginationAccumulator, Rendered};
pub use error::PagingError;
pub use extract::{ConnectionExtractor, PageExtractor};
pub use loader::{FetchLoader, LoadFuture, LoadMore, PageSource};
pub use page::{Cursor, Page, PageInfo};
pub use query::{variables, QueryState, Variables};
pub use route::{
    encode_path_segment, NavigateOptions, NavigationLoader, PageDirection, RoutePagination, Router,
};
pub use scroll::{FeedEvent, InfiniteScroll, ScrollUpdate};
pub use visibility::{LookAhead, Observation, Rect, Sentinel, VisibilityObserver};
