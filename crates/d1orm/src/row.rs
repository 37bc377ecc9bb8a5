//! Result rows and typed decoding.

use crate::error::{OrmError, OrmResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row: column name -> JSON scalar, in the order D1 returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new(columns: Map<String, Value>) -> Self {
        Self(columns)
    }

    /// Raw value of a column; `None` when the column is absent.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Decode a single column.
    ///
    /// A missing column decodes like SQL `NULL`, so `Option<T>` accepts it.
    pub fn get<T: DeserializeOwned>(&self, column: &str) -> OrmResult<T> {
        let value = self.0.get(column).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| OrmError::decode(column, e.to_string()))
    }

    /// Decode the whole row into `T` (typically a `#[derive(Deserialize)]` struct).
    pub fn decode<T: DeserializeOwned>(&self) -> OrmResult<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| OrmError::decode("*", e.to_string()))
    }

    /// Column names, in result order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Row {
    fn from(columns: Map<String, Value>) -> Self {
        Self(columns)
    }
}
