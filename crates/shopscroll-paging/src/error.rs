use thiserror::Error;

/// Errors surfaced by the pagination accumulator and its loaders.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PagingError {
    /// The upstream fetch (or the navigation that performs it) failed.
    /// The view stays eligible for another attempt.
    #[error("page fetch failed: {message}")]
    Fetch { message: String, retriable: bool },

    /// The response did not contain the expected connection shape.
    /// Terminal for the owning view.
    #[error("malformed response at {path}: {reason}")]
    MalformedResponse { path: String, reason: String },

    /// The owning view was torn down while the fetch was outstanding.
    #[error("page fetch cancelled")]
    Cancelled,
}

impl PagingError {
    /// Builds a [`PagingError::Fetch`] from any displayable upstream error.
    pub fn fetch(err: impl std::fmt::Display, retriable: bool) -> Self {
        Self::Fetch {
            message: err.to_string(),
            retriable,
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// `true` when the owning view must stop loading for good.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }
}
