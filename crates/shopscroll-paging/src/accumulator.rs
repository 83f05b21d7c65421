//! The pagination accumulator: a small state machine that threads cursors
//! between fetches and concatenates pages in arrival order.
//!
//! ```text
//!  Idle { has_next_page: true } --begin_load--> Loading
//!  Loading --complete(page)--> Idle { has_next_page: page.has_next_page }
//!  Loading --fail(fetch error)--> Idle { has_next_page: true }
//!  Loading --fail(malformed)--> Failed
//! ```
//!
//! `Idle { has_next_page: false }` and `Failed` are terminal.

use crate::error::PagingError;
use crate::page::Page;
use crate::query::QueryState;
use crate::visibility::Sentinel;

/// Where the accumulator is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle { has_next_page: bool },
    Loading,
    Failed,
}

impl LoadState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Idle { has_next_page: false } | Self::Failed)
    }
}

/// Result of feeding a response into the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The page was appended.
    Appended { added: usize, has_next_page: bool },
    /// No fetch was outstanding (the view was stopped, or the response is a
    /// duplicate); nothing changed.
    Ignored,
}

/// Accumulated items rendered for display, followed by the load-more
/// sentinel while more pages exist.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<R> {
    pub items: Vec<R>,
    pub sentinel: Option<Sentinel>,
}

#[derive(Debug)]
pub struct PaginationAccumulator<T> {
    query: QueryState,
    items: Vec<T>,
    state: LoadState,
    pages_loaded: usize,
}

impl<T> PaginationAccumulator<T> {
    /// Creates an empty accumulator that will fetch its first page with the
    /// initial variables in `query`.
    pub fn new(query: QueryState) -> Self {
        Self {
            query,
            items: Vec::new(),
            state: LoadState::Idle {
                has_next_page: true,
            },
            pages_loaded: 0,
        }
    }

    /// Creates an accumulator whose first page was already loaded elsewhere
    /// (e.g. by the route loader that rendered the page).
    ///
    /// # Errors
    ///
    /// Returns [`PagingError::MalformedResponse`] under the same conditions as
    /// [`Self::complete`].
    pub fn with_first_page(query: QueryState, page: Page<T>) -> Result<Self, PagingError> {
        let mut acc = Self::new(query);
        acc.state = LoadState::Loading;
        acc.complete(page)?;
        Ok(acc)
    }

    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Query and variables the next fetch will be issued with.
    #[must_use]
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    #[must_use]
    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// `true` while another page may still be requested at some point.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        matches!(
            self.state,
            LoadState::Idle {
                has_next_page: true
            } | LoadState::Loading
        )
    }

    /// Moves to `Loading` and returns the query to issue, if a load is eligible.
    ///
    /// Returns `None` while a fetch is outstanding or once the accumulator is
    /// terminal, so repeated triggers never produce a second request.
    pub fn begin_load(&mut self) -> Option<QueryState> {
        match self.state {
            LoadState::Idle {
                has_next_page: true,
            } => {
                self.state = LoadState::Loading;
                Some(self.query.clone())
            }
            _ => None,
        }
    }

    /// Appends a fetched page and threads its `endCursor` into the variables.
    ///
    /// # Errors
    ///
    /// Returns [`PagingError::MalformedResponse`] (and moves to `Failed`) when
    /// the page claims a next page but carries no `endCursor` to reach it.
    pub fn complete(&mut self, page: Page<T>) -> Result<Applied, PagingError> {
        if self.state != LoadState::Loading {
            return Ok(Applied::Ignored);
        }

        let has_next_page = page.page_info.has_next_page;
        if has_next_page {
            let Some(cursor) = page.page_info.end_cursor.as_ref() else {
                self.state = LoadState::Failed;
                return Err(PagingError::malformed(
                    "pageInfo/endCursor",
                    "hasNextPage is true but endCursor is missing",
                ));
            };
            self.query.advance(cursor);
        }

        let added = page.items.len();
        self.items.extend(page.items);
        self.pages_loaded += 1;
        self.state = LoadState::Idle { has_next_page };

        Ok(Applied::Appended {
            added,
            has_next_page,
        })
    }

    /// Records a failed fetch.
    ///
    /// Fetch failures and cancellations return the accumulator to the
    /// eligible-retry state; malformed responses make it terminal.
    pub fn fail(&mut self, err: &PagingError) {
        if self.state != LoadState::Loading {
            return;
        }
        self.state = if err.is_terminal() {
            LoadState::Failed
        } else {
            LoadState::Idle {
                has_next_page: true,
            }
        };
    }

    /// Renders every accumulated item with `render(item, index)` and appends
    /// the sentinel while more pages may be loaded.
    pub fn render<R>(&self, mut render: impl FnMut(&T, usize) -> R) -> Rendered<R> {
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| render(item, index))
            .collect();
        let sentinel = self.has_next_page().then(|| Sentinel::after(self.items.len()));
        Rendered { items, sentinel }
    }
}

#[cfg(test)]
#[path = "accumulator_test.rs"]
mod tests;
