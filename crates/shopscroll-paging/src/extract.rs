//! Extraction of items and page-info from a raw query response.
//!
//! The accumulator never looks inside a response itself; the caller hands it
//! a [`PageExtractor`] that knows where the connection lives.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::PagingError;
use crate::page::{Page, PageInfo};

/// Typed capability that turns a raw response into a [`Page`].
pub trait PageExtractor {
    type Response;
    type Item;

    /// Items of the page, in the order the upstream returned them.
    ///
    /// # Errors
    ///
    /// Returns [`PagingError::MalformedResponse`] if the item sequence is missing
    /// or cannot be decoded.
    fn extract_items(&self, response: &Self::Response) -> Result<Vec<Self::Item>, PagingError>;

    /// # Errors
    ///
    /// Returns [`PagingError::MalformedResponse`] if page-info is missing or
    /// cannot be decoded.
    fn extract_page_info(&self, response: &Self::Response) -> Result<PageInfo, PagingError>;

    /// # Errors
    ///
    /// Propagates errors from [`Self::extract_items`] and [`Self::extract_page_info`].
    fn extract_page(&self, response: &Self::Response) -> Result<Page<Self::Item>, PagingError> {
        let items = self.extract_items(response)?;
        let page_info = self.extract_page_info(response)?;
        Ok(Page::new(items, page_info))
    }
}

/// Extracts a Relay connection found at a fixed location in a JSON response.
///
/// The location is either a JSON pointer (`/collection/products`) or a dotted
/// path (`collection.products`). Items are read from `nodes`, falling back to
/// `edges[].node`.
pub struct ConnectionExtractor<T> {
    pointer: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for ConnectionExtractor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionExtractor")
            .field("pointer", &self.pointer)
            .finish()
    }
}

impl<T> Clone for ConnectionExtractor<T> {
    fn clone(&self) -> Self {
        Self {
            pointer: self.pointer.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> ConnectionExtractor<T> {
    pub fn new(path: &str) -> Self {
        let pointer = if path.is_empty() || path.starts_with('/') {
            path.to_owned()
        } else {
            path.split('.').fold(String::new(), |mut acc, seg| {
                acc.push('/');
                acc.push_str(seg);
                acc
            })
        };
        Self {
            pointer,
            _item: PhantomData,
        }
    }

    #[must_use]
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    fn connection<'a>(&self, response: &'a Value) -> Result<&'a Value, PagingError> {
        match response.pointer(&self.pointer) {
            Some(Value::Null) | None => Err(PagingError::malformed(
                self.pointer.clone(),
                "connection not found in response",
            )),
            Some(conn) => Ok(conn),
        }
    }
}

impl<T: DeserializeOwned> PageExtractor for ConnectionExtractor<T> {
    type Response = Value;
    type Item = T;

    fn extract_items(&self, response: &Value) -> Result<Vec<T>, PagingError> {
        let conn = self.connection(response)?;

        let raw: Vec<&Value> = if let Some(nodes) = conn.get("nodes").and_then(Value::as_array) {
            nodes.iter().collect()
        } else if let Some(edges) = conn.get("edges").and_then(Value::as_array) {
            edges
                .iter()
                .map(|edge| {
                    edge.get("node").ok_or_else(|| {
                        PagingError::malformed(
                            format!("{}/edges", self.pointer),
                            "edge without node",
                        )
                    })
                })
                .collect::<Result<_, _>>()?
        } else {
            return Err(PagingError::malformed(
                self.pointer.clone(),
                "connection has neither nodes nor edges",
            ));
        };

        raw.into_iter()
            .enumerate()
            .map(|(index, node)| {
                T::deserialize(node).map_err(|e| {
                    PagingError::malformed(format!("{}/nodes/{index}", self.pointer), e.to_string())
                })
            })
            .collect()
    }

    fn extract_page_info(&self, response: &Value) -> Result<PageInfo, PagingError> {
        let conn = self.connection(response)?;
        let info = conn.get("pageInfo").ok_or_else(|| {
            PagingError::malformed(self.pointer.clone(), "connection has no pageInfo")
        })?;
        PageInfo::deserialize(info).map_err(|e| {
            PagingError::malformed(format!("{}/pageInfo", self.pointer), e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Cursor;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[test]
    fn dotted_path_becomes_json_pointer() {
        let ex = ConnectionExtractor::<Item>::new("collection.products");
        assert_eq!(ex.pointer(), "/collection/products");
    }

    #[test]
    fn extracts_nodes_and_page_info() {
        let body = json!({
            "products": {
                "nodes": [{"id": "A"}, {"id": "B"}],
                "pageInfo": {"hasNextPage": true, "hasPreviousPage": false, "endCursor": "c2", "startCursor": "c1"}
            }
        });
        let page = ConnectionExtractor::<Item>::new("products")
            .extract_page(&body)
            .unwrap();
        assert_eq!(
            page.items,
            vec![Item { id: "A".into() }, Item { id: "B".into() }]
        );
        assert_eq!(page.page_info.end_cursor, Some(Cursor::from("c2")));
        assert!(page.page_info.has_next_page);
    }

    #[test]
    fn falls_back_to_edges() {
        let body = json!({
            "collections": {
                "edges": [{"cursor": "x", "node": {"id": "C"}}],
                "pageInfo": {"hasNextPage": false}
            }
        });
        let items = ConnectionExtractor::<Item>::new("collections")
            .extract_items(&body)
            .unwrap();
        assert_eq!(items, vec![Item { id: "C".into() }]);
    }

    #[test]
    fn missing_connection_is_malformed() {
        let body = json!({"collection": null});
        let err = ConnectionExtractor::<Item>::new("collection.products")
            .extract_items(&body)
            .unwrap_err();
        assert!(err.is_terminal(), "got: {err:?}");
    }

    #[test]
    fn missing_page_info_is_malformed() {
        let body = json!({"products": {"nodes": []}});
        let err = ConnectionExtractor::<Item>::new("products")
            .extract_page_info(&body)
            .unwrap_err();
        assert!(matches!(err, PagingError::MalformedResponse { .. }));
    }

    #[test]
    fn undecodable_node_reports_its_index() {
        let body = json!({
            "products": {"nodes": [{"id": "A"}, {"name": "no id"}], "pageInfo": {}}
        });
        let err = ConnectionExtractor::<Item>::new("products")
            .extract_items(&body)
            .unwrap_err();
        match err {
            PagingError::MalformedResponse { path, .. } => assert_eq!(path, "/products/nodes/1"),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }
}
