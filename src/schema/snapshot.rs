use crate::error::Result;
use crate::schema::definition::SchemaDefinition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Point-in-time capture of a table name and its column specs.
///
/// Serialized as `{"table": "...", "schemas": {"column": "spec", ...}}`; the
/// column order is significant and survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub table: String,
    #[serde(rename = "schemas")]
    pub columns: IndexMap<String, String>,
}

impl SchemaSnapshot {
    pub fn new(table: impl Into<String>, columns: IndexMap<String, String>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    pub fn from_definition(definition: &SchemaDefinition) -> Self {
        Self {
            table: definition.table.clone(),
            columns: definition.schemas(),
        }
    }

    pub fn from_serialized(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_serialized(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Serialized form as text, as stored in the history `schema_load` column
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn spec(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }
}
