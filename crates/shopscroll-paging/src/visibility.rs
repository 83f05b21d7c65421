//! Sentinel visibility: the look-ahead proximity test and the scoped
//! observation handle a view framework hands back when it starts watching
//! the sentinel.

use std::fmt;

/// Default look-ahead margin in pixels.
pub const DEFAULT_LOOK_AHEAD_PX: f64 = 100.0;

/// Marker rendered after the last accumulated item. Its visibility signals
/// intent to load the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinel {
    position: usize,
}

impl Sentinel {
    /// A sentinel following the first `position` items.
    #[must_use]
    pub fn after(position: usize) -> Self {
        Self { position }
    }

    #[must_use]
    pub fn position(self) -> usize {
        self.position
    }
}

/// Vertical extent of an element or of the viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
        }
    }
}

/// Proximity threshold: the sentinel counts as visible once it is within
/// `margin_px` of the viewport edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAhead {
    margin_px: f64,
}

impl Default for LookAhead {
    fn default() -> Self {
        Self {
            margin_px: DEFAULT_LOOK_AHEAD_PX,
        }
    }
}

impl LookAhead {
    /// Negative margins are clamped to zero.
    #[must_use]
    pub fn new(margin_px: f64) -> Self {
        Self {
            margin_px: margin_px.max(0.0),
        }
    }

    #[must_use]
    pub fn margin_px(self) -> f64 {
        self.margin_px
    }

    /// `true` when `sentinel` intersects `viewport` grown by the margin.
    #[must_use]
    pub fn is_visible(self, viewport: Rect, sentinel: Rect) -> bool {
        sentinel.top <= viewport.bottom + self.margin_px
            && sentinel.bottom >= viewport.top - self.margin_px
    }
}

/// Handle for an active sentinel observation.
///
/// Releasing happens exactly once: on [`Observation::stop`] or on drop,
/// whichever comes first.
pub struct Observation {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Observation {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// An observation with nothing to release, for hosts that signal
    /// visibility without a registration step.
    #[must_use]
    pub fn detached() -> Self {
        Self { release: None }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn stop(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        self.release_now();
    }
}

/// Intersection-observation primitive supplied by the view layer.
pub trait VisibilityObserver {
    /// Starts watching `sentinel`; visibility changes are delivered to the
    /// owning view as [`crate::FeedEvent::Visibility`].
    fn observe(&self, sentinel: Sentinel) -> Observation;
}
