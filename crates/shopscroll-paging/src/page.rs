//! Relay-style page model returned by the storefront's connection fields.
//!
//! ## Observed shape
//!
//! ```json
//! {
//!   "nodes": [ ... ],
//!   "pageInfo": {
//!     "hasNextPage": true,
//!     "hasPreviousPage": false,
//!     "startCursor": "eyJsYXN0X2lkIjo...",
//!     "endCursor": "eyJsYXN0X2lkIjo..."
//!   }
//! }
//! ```
//!
//! Cursors are `null` when the connection is empty, so both cursor fields are
//! modelled as `Option<Cursor>`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque position token issued by the upstream query service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Page-info descriptor accompanying every paginated response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
    #[serde(default)]
    pub start_cursor: Option<Cursor>,
    #[serde(default)]
    pub end_cursor: Option<Cursor>,
}

impl PageInfo {
    /// Page-info for the final page of a result set.
    #[must_use]
    pub fn last(end_cursor: Option<Cursor>) -> Self {
        Self {
            has_next_page: false,
            end_cursor,
            ..Self::default()
        }
    }

    /// Page-info for a page that is followed by `end_cursor`.
    #[must_use]
    pub fn next(end_cursor: Cursor) -> Self {
        Self {
            has_next_page: true,
            end_cursor: Some(end_cursor),
            ..Self::default()
        }
    }
}

/// One batch of items plus its page-info.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_info_deserializes_camel_case_shape() {
        let info: PageInfo = serde_json::from_value(serde_json::json!({
            "hasNextPage": true,
            "hasPreviousPage": false,
            "startCursor": "c1",
            "endCursor": "c2"
        }))
        .unwrap();
        assert!(info.has_next_page);
        assert!(!info.has_previous_page);
        assert_eq!(info.start_cursor, Some(Cursor::from("c1")));
        assert_eq!(info.end_cursor, Some(Cursor::from("c2")));
    }

    #[test]
    fn page_info_accepts_null_cursors_on_empty_connection() {
        let info: PageInfo = serde_json::from_value(serde_json::json!({
            "hasNextPage": false,
            "hasPreviousPage": false,
            "startCursor": null,
            "endCursor": null
        }))
        .unwrap();
        assert_eq!(info, PageInfo::default());
    }

    #[test]
    fn cursor_serializes_as_plain_string() {
        let json = serde_json::to_value(Cursor::from("abc")).unwrap();
        assert_eq!(json, serde_json::json!("abc"));
    }
}
