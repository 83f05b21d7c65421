//! Event-driven infinite-scroll view.
//!
//! [`InfiniteScroll`] owns one [`PaginationAccumulator`], one injected
//! [`LoadMore`] hook and at most one in-flight load. All transitions happen
//! on discrete events: a visibility change, a load completing, or unmount.

use std::fmt;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::accumulator::{Applied, LoadState, PaginationAccumulator, Rendered};
use crate::error::PagingError;
use crate::loader::{LoadFuture, LoadMore};
use crate::page::Page;
use crate::query::QueryState;
use crate::visibility::{Observation, Sentinel, VisibilityObserver};

/// Events delivered to a mounted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    /// The sentinel entered (`true`) or left (`false`) the look-ahead area.
    Visibility(bool),
    /// The view is being torn down.
    Unmount,
}

/// Outcome of a settled load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollUpdate {
    Appended { added: usize, has_next_page: bool },
    /// The load failed; the view is eligible to retry on the next visibility event.
    Retry(PagingError),
    /// The load failed for good; observation has been released.
    Failed(PagingError),
    /// The view was stopped while the load was outstanding.
    Cancelled,
    /// A response arrived that no longer had an outstanding request.
    Ignored,
}

pub type ErrorHook = Box<dyn Fn(&PagingError) + Send>;

pub struct InfiniteScroll<T, L> {
    accumulator: PaginationAccumulator<T>,
    loader: L,
    in_flight: Option<LoadFuture<T>>,
    cancel: CancellationToken,
    observation: Option<Observation>,
    on_error: ErrorHook,
    loads_issued: usize,
}

impl<T, L> fmt::Debug for InfiniteScroll<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfiniteScroll")
            .field("state", &self.accumulator.state())
            .field("items", &self.accumulator.items().len())
            .field("loads_issued", &self.loads_issued)
            .field("observing", &self.is_observing())
            .field("stopped", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl<T, L: LoadMore<T>> InfiniteScroll<T, L> {
    /// Mounts a view with an empty list and the initial variables in `query`.
    pub fn new(query: QueryState, loader: L) -> Self {
        Self::from_accumulator(PaginationAccumulator::new(query), loader)
    }

    /// Mounts a view over an accumulator that may already hold pages.
    pub fn from_accumulator(accumulator: PaginationAccumulator<T>, loader: L) -> Self {
        Self {
            accumulator,
            loader,
            in_flight: None,
            cancel: CancellationToken::new(),
            observation: None,
            on_error: Box::new(|err: &PagingError| tracing::warn!(error = %err, "page load failed")),
            loads_issued: 0,
        }
    }

    /// Replaces the default error hook (a `tracing` warning).
    #[must_use]
    pub fn with_error_hook(mut self, hook: impl Fn(&PagingError) + Send + 'static) -> Self {
        self.on_error = Box::new(hook);
        self
    }

    /// Starts observing the sentinel. Does nothing if the view is already
    /// observing, stopped, or has nothing more to load.
    pub fn start(&mut self, observer: &impl VisibilityObserver) {
        if self.observation.is_some() || self.cancel.is_cancelled() || self.accumulator.is_terminal()
        {
            return;
        }
        let sentinel = Sentinel::after(self.accumulator.items().len());
        self.observation = Some(observer.observe(sentinel));
    }

    /// Tears the view down: aborts any outstanding load and releases the
    /// observation. Later events and completions change nothing.
    pub fn stop(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        if self.in_flight.take().is_some() {
            self.accumulator.fail(&PagingError::Cancelled);
            tracing::debug!("view stopped with a load outstanding");
        }
        self.release_observation();
    }

    /// Sentinel visibility changed. Issues a load when the sentinel is
    /// visible and a load is eligible; returns whether one was issued.
    pub fn on_visibility(&mut self, visible: bool) -> bool {
        if !visible || self.cancel.is_cancelled() {
            return false;
        }
        let Some(request) = self.accumulator.begin_load() else {
            return false;
        };
        tracing::debug!(
            page = self.accumulator.pages_loaded() + 1,
            cursor = ?request.cursor(),
            "loading next page"
        );
        self.in_flight = Some(self.loader.load_more(request));
        self.loads_issued += 1;
        true
    }

    /// Waits for the outstanding load, if any, and applies its result.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_update(&mut self) -> Option<ScrollUpdate> {
        self.in_flight.as_ref()?;
        let result = settle(&mut self.in_flight, &self.cancel).await;
        self.in_flight = None;
        Some(self.apply(result))
    }

    /// Runs the view until [`FeedEvent::Unmount`] arrives or the sender is
    /// dropped, calling `on_update` after every settled load.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<FeedEvent>,
        mut on_update: impl FnMut(&Self, &ScrollUpdate),
    ) -> Self {
        loop {
            let in_flight = self.in_flight.is_some();
            tokio::select! {
                event = events.recv() => match event {
                    Some(FeedEvent::Visibility(visible)) => {
                        self.on_visibility(visible);
                    }
                    Some(FeedEvent::Unmount) | None => {
                        self.stop();
                        break;
                    }
                },
                result = settle(&mut self.in_flight, &self.cancel), if in_flight => {
                    self.in_flight = None;
                    let update = self.apply(result);
                    on_update(&self, &update);
                }
            }
        }
        self
    }

    fn apply(&mut self, result: Result<Page<T>, PagingError>) -> ScrollUpdate {
        match result {
            Ok(page) => match self.accumulator.complete(page) {
                Ok(Applied::Appended {
                    added,
                    has_next_page,
                }) => {
                    tracing::debug!(added, has_next_page, total = self.len(), "page appended");
                    if !has_next_page {
                        self.release_observation();
                    }
                    ScrollUpdate::Appended {
                        added,
                        has_next_page,
                    }
                }
                Ok(Applied::Ignored) => ScrollUpdate::Ignored,
                Err(err) => self.fail_terminally(err),
            },
            Err(PagingError::Cancelled) => {
                self.accumulator.fail(&PagingError::Cancelled);
                ScrollUpdate::Cancelled
            }
            Err(err) if err.is_terminal() => {
                self.accumulator.fail(&err);
                self.fail_terminally(err)
            }
            Err(err) => {
                self.accumulator.fail(&err);
                (self.on_error)(&err);
                ScrollUpdate::Retry(err)
            }
        }
    }

    fn fail_terminally(&mut self, err: PagingError) -> ScrollUpdate {
        tracing::error!(error = %err, "page load failed permanently, no further pages will load");
        (self.on_error)(&err);
        self.release_observation();
        ScrollUpdate::Failed(err)
    }
}

impl<T, L> InfiniteScroll<T, L> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.accumulator.items()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accumulator.items().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accumulator.items().is_empty()
    }

    #[must_use]
    pub fn state(&self) -> LoadState {
        self.accumulator.state()
    }

    #[must_use]
    pub fn accumulator(&self) -> &PaginationAccumulator<T> {
        &self.accumulator
    }

    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.accumulator.into_items()
    }

    /// Number of loads handed to the injected hook so far.
    #[must_use]
    pub fn loads_issued(&self) -> usize {
        self.loads_issued
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn render<R>(&self, render: impl FnMut(&T, usize) -> R) -> Rendered<R> {
        self.accumulator.render(render)
    }

    fn release_observation(&mut self) {
        if let Some(observation) = self.observation.take() {
            observation.stop();
        }
    }
}

/// Resolves the outstanding load, or `Cancelled` once the view is stopped.
async fn settle<T>(
    in_flight: &mut Option<LoadFuture<T>>,
    cancel: &CancellationToken,
) -> Result<Page<T>, PagingError> {
    let Some(load) = in_flight.as_mut() else {
        return Err(PagingError::Cancelled);
    };
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(PagingError::Cancelled),
        result = load => result,
    }
}

#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;
