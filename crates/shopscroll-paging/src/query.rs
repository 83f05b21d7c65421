use serde::Serialize;
use serde_json::{Map, Value};

use crate::page::Cursor;

/// GraphQL variables keyed by name.
pub type Variables = Map<String, Value>;

/// Variable that carries the forward cursor unless told otherwise.
pub const DEFAULT_CURSOR_VARIABLE: &str = "after";

/// Query document plus the variables the next fetch will use.
///
/// Only the cursor variable changes between fetches; everything else the
/// caller supplied is sent unchanged with every page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryState {
    pub query: String,
    pub variables: Variables,
    #[serde(skip)]
    cursor_variable: String,
}

impl QueryState {
    pub fn new(query: impl Into<String>, variables: Variables) -> Self {
        Self {
            query: query.into(),
            variables,
            cursor_variable: DEFAULT_CURSOR_VARIABLE.to_owned(),
        }
    }

    /// Uses `name` instead of `after` for the forward cursor (the storefront's
    /// route queries call it `endCursor`).
    #[must_use]
    pub fn with_cursor_variable(mut self, name: impl Into<String>) -> Self {
        self.cursor_variable = name.into();
        self
    }

    #[must_use]
    pub fn cursor_variable(&self) -> &str {
        &self.cursor_variable
    }

    /// The cursor the next fetch will start after, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<Cursor> {
        self.variables
            .get(&self.cursor_variable)
            .and_then(Value::as_str)
            .map(Cursor::from)
    }

    /// Replaces the cursor variable with `cursor`.
    pub fn advance(&mut self, cursor: &Cursor) {
        self.variables.insert(
            self.cursor_variable.clone(),
            Value::String(cursor.as_str().to_owned()),
        );
    }
}

/// Builds a [`Variables`] map from a `serde_json::json!` object literal.
///
/// Non-object values yield an empty map.
#[must_use]
pub fn variables(value: Value) -> Variables {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn advance_sets_after_and_keeps_other_variables() {
        let mut state = QueryState::new("query Q", variables(json!({"first": 2})));
        state.advance(&Cursor::from("c2"));
        assert_eq!(
            Value::Object(state.variables.clone()),
            json!({"first": 2, "after": "c2"})
        );
        assert_eq!(state.cursor(), Some(Cursor::from("c2")));
    }

    #[test]
    fn advance_replaces_previous_cursor() {
        let mut state = QueryState::new("query Q", variables(json!({"after": "c1"})));
        state.advance(&Cursor::from("c9"));
        assert_eq!(state.variables["after"], json!("c9"));
        assert_eq!(state.variables.len(), 1);
    }

    #[test]
    fn custom_cursor_variable_is_used() {
        let mut state = QueryState::new("query Q", variables(json!({"first": 8})))
            .with_cursor_variable("endCursor");
        state.advance(&Cursor::from("x"));
        assert_eq!(state.variables["endCursor"], json!("x"));
        assert!(!state.variables.contains_key("after"));
    }

    #[test]
    fn variables_from_non_object_is_empty() {
        assert!(variables(json!([1, 2])).is_empty());
    }
}
