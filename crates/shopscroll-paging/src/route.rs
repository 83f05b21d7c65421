//! Route-driven pagination.
//!
//! Listing routes take their position from the URL (`?direction=next&cursor=…`)
//! and turn it into connection variables. In the navigation trigger style the
//! sentinel does not fetch; it navigates to the next page's URL, replacing the
//! history entry without resetting scroll, and the route transition loads the
//! page.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::{json, Value};

use crate::loader::{LoadFuture, LoadMore};
use crate::page::{Cursor, PageInfo};
use crate::query::{QueryState, Variables};

/// Variable carrying the forward cursor in route queries.
pub const END_CURSOR_VARIABLE: &str = "endCursor";
/// Variable carrying the backward cursor in route queries.
pub const START_CURSOR_VARIABLE: &str = "startCursor";

/// Characters left unescaped in a query value or path segment (RFC 3986
/// unreserved).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageDirection {
    #[default]
    Next,
    Previous,
}

impl PageDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}

/// Position in a listing as encoded in the route's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePagination {
    pub cursor: Option<Cursor>,
    pub direction: PageDirection,
}

impl RoutePagination {
    /// Reads `cursor` and `direction` from a raw query string (with or without
    /// the leading `?`). Unknown directions fall back to `next`; empty cursors
    /// are ignored. A repeated key takes its last value.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut out = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = percent_decode_str(value).decode_utf8_lossy();
            match key {
                "cursor" if !value.is_empty() => out.cursor = Some(Cursor::new(value)),
                "direction" => {
                    out.direction = if value == "previous" {
                        PageDirection::Previous
                    } else {
                        PageDirection::Next
                    };
                }
                _ => {}
            }
        }
        out
    }

    pub fn new(cursor: Option<Cursor>, direction: PageDirection) -> Self {
        Self { cursor, direction }
    }

    /// Connection variables for a page of `page_by` items at this position.
    ///
    /// | position | variables |
    /// |----------|-----------|
    /// | no cursor | `{first}` |
    /// | `next` + cursor | `{first, endCursor}` |
    /// | `previous` + cursor | `{last, startCursor}` |
    #[must_use]
    pub fn variables(&self, page_by: u32) -> Variables {
        let mut vars = Variables::new();
        match (&self.cursor, self.direction) {
            (Some(cursor), PageDirection::Previous) => {
                vars.insert("last".to_owned(), json!(page_by));
                vars.insert(START_CURSOR_VARIABLE.to_owned(), json!(cursor.as_str()));
            }
            (Some(cursor), PageDirection::Next) => {
                vars.insert("first".to_owned(), json!(page_by));
                vars.insert(END_CURSOR_VARIABLE.to_owned(), json!(cursor.as_str()));
            }
            (None, _) => {
                vars.insert("first".to_owned(), json!(page_by));
            }
        }
        vars
    }
}

/// Percent-encodes one path segment (such as a collection handle) so it
/// cannot end the path or start a query.
#[must_use]
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, QUERY_VALUE).to_string()
}

/// URL of the page at `cursor` in `direction` under `path`.
#[must_use]
pub fn page_url(path: &str, direction: PageDirection, cursor: &Cursor) -> String {
    format!(
        "{path}?direction={}&cursor={}",
        direction.as_str(),
        utf8_percent_encode(cursor.as_str(), QUERY_VALUE)
    )
}

/// URL of the page following the one described by `page_info`.
#[must_use]
pub fn next_page_url(path: &str, page_info: &PageInfo) -> Option<String> {
    if !page_info.has_next_page {
        return None;
    }
    page_info
        .end_cursor
        .as_ref()
        .map(|c| page_url(path, PageDirection::Next, c))
}

/// URL of the page preceding the one described by `page_info`.
#[must_use]
pub fn previous_page_url(path: &str, page_info: &PageInfo) -> Option<String> {
    if !page_info.has_previous_page {
        return None;
    }
    page_info
        .start_cursor
        .as_ref()
        .map(|c| page_url(path, PageDirection::Previous, c))
}

/// Options for a client-side transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing one.
    pub replace: bool,
    /// Keep the current scroll position across the transition.
    pub prevent_scroll_reset: bool,
}

impl NavigateOptions {
    /// Options used when the sentinel drives navigation.
    #[must_use]
    pub fn infinite_scroll() -> Self {
        Self {
            replace: true,
            prevent_scroll_reset: true,
        }
    }
}

/// Client-side routing layer. Navigating performs the route's data load and
/// resolves with the page it produced.
pub trait Router<T> {
    fn navigate(&self, to: String, options: NavigateOptions, state: Value) -> LoadFuture<T>;
}

/// Navigation trigger: turns the next-page request into a route transition.
#[derive(Debug, Clone)]
pub struct NavigationLoader<R> {
    router: R,
    path: String,
}

impl<R> NavigationLoader<R> {
    pub fn new(router: R, path: impl Into<String>) -> Self {
        Self {
            router,
            path: path.into(),
        }
    }

    /// Target URL for `request`: the bare path for the first page, otherwise
    /// the next-page URL for the request's cursor.
    #[must_use]
    pub fn target(&self, request: &QueryState) -> String {
        match request.cursor() {
            Some(cursor) => page_url(&self.path, PageDirection::Next, &cursor),
            None => self.path.clone(),
        }
    }
}

impl<T, R: Router<T>> LoadMore<T> for NavigationLoader<R> {
    fn load_more(&self, request: QueryState) -> LoadFuture<T> {
        let to = self.target(&request);
        let state = json!({ "variables": request.variables });
        tracing::debug!(to = %to, "sentinel visible, navigating to next page");
        self.router
            .navigate(to, NavigateOptions::infinite_scroll(), state)
    }
}
