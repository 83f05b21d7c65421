//! Simulated viewport for driving the feed from a terminal.

use shopscroll_paging::{FeedEvent, LookAhead, Observation, Rect, Sentinel, VisibilityObserver};
use tokio::sync::mpsc;

/// Height of one printed item when laid out as a list.
const ROW_HEIGHT_PX: f64 = 48.0;
const VIEWPORT_HEIGHT_PX: f64 = 720.0;

/// A fixed-height window over a list of equally tall rows.
#[derive(Debug, Clone, Copy)]
pub(super) struct Viewport {
    height_px: f64,
    row_height_px: f64,
    look_ahead: LookAhead,
}

impl Viewport {
    pub(super) fn new(look_ahead: LookAhead) -> Self {
        Self {
            height_px: VIEWPORT_HEIGHT_PX,
            row_height_px: ROW_HEIGHT_PX,
            look_ahead,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn sentinel_rect(&self, sentinel: Sentinel) -> Rect {
        Rect::new(sentinel.position() as f64 * self.row_height_px, 1.0)
    }

    /// Whether `sentinel` is within look-ahead with the window's top edge at `scroll_top`.
    pub(super) fn visible_at(&self, sentinel: Sentinel, scroll_top: f64) -> bool {
        let window = Rect::new(scroll_top.max(0.0), self.height_px);
        self.look_ahead.is_visible(window, self.sentinel_rect(sentinel))
    }

    /// Whether `sentinel` is within look-ahead once the reader has scrolled
    /// to the end of the rendered rows.
    pub(super) fn visible_when_scrolled_to_end(&self, sentinel: Sentinel) -> bool {
        let content_bottom = self.sentinel_rect(sentinel).top;
        self.visible_at(sentinel, content_bottom - self.height_px)
    }
}

/// Observer that reports the sentinel's visibility at the end of the list
/// over the view's event channel.
pub(super) struct ScrolledObserver {
    viewport: Viewport,
    events: mpsc::Sender<FeedEvent>,
}

impl ScrolledObserver {
    pub(super) fn new(viewport: Viewport, events: mpsc::Sender<FeedEvent>) -> Self {
        Self { viewport, events }
    }
}

impl VisibilityObserver for ScrolledObserver {
    fn observe(&self, sentinel: Sentinel) -> Observation {
        let visible = self.viewport.visible_when_scrolled_to_end(sentinel);
        if self.events.try_send(FeedEvent::Visibility(visible)).is_err() {
            tracing::warn!("feed event channel unavailable, initial visibility dropped");
        }
        let position = sentinel.position();
        Observation::new(move || tracing::debug!(position, "sentinel observation released"))
    }
}
