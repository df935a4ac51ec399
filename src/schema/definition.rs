use crate::constants::{INCREMENTS, REMEMBER_TOKEN, SOFT_DELETES, TIMESTAMPS};
use crate::error::{Result, SmoothError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative description of one table, as authored in `{Identity}.yaml`.
///
/// ```yaml
/// table: posts
/// run_first: [UsersSchema]
/// timestamps: true
/// columns:
///   title: string
///   user_id: integer,on:users,onDelete:cascade
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    pub table: String,

    #[serde(default = "default_auto_increment")]
    pub auto_increment: bool,

    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    #[serde(default)]
    pub run_first: Vec<String>,

    #[serde(default)]
    pub columns: IndexMap<String, String>,

    #[serde(default)]
    pub timestamps: bool,

    #[serde(default)]
    pub soft_deletes: bool,

    #[serde(default)]
    pub remember_token: bool,
}

fn default_auto_increment() -> bool {
    true
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl SchemaDefinition {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            auto_increment: default_auto_increment(),
            primary_key: default_primary_key(),
            run_first: Vec::new(),
            columns: IndexMap::new(),
            timestamps: false,
            soft_deletes: false,
            remember_token: false,
        }
    }

    pub fn column(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.columns.insert(name.into(), spec.into());
        self
    }

    pub fn without_auto_increment(mut self) -> Self {
        self.auto_increment = false;
        self
    }

    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = name.into();
        self
    }

    pub fn timestamps(mut self) -> Self {
        self.timestamps = true;
        self
    }

    pub fn soft_deletes(mut self) -> Self {
        self.soft_deletes = true;
        self
    }

    pub fn remember_token(mut self) -> Self {
        self.remember_token = true;
        self
    }

    pub fn run_first(mut self, identity: impl Into<String>) -> Self {
        self.run_first.push(identity.into());
        self
    }

    /// Parse a definition from YAML and check it is usable
    pub fn from_yaml(identity: &str, contents: &str) -> Result<Self> {
        let definition: SchemaDefinition =
            serde_yaml::from_str(contents).map_err(|e| SmoothError::InvalidDefinition {
                identity: identity.to_string(),
                reason: e.to_string(),
            })?;
        definition.validate(identity)?;
        Ok(definition)
    }

    pub fn load(identity: &str, path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| SmoothError::InvalidDefinition {
                identity: identity.to_string(),
                reason: format!("cannot read {}: {}", path.display(), e),
            })?;
        Self::from_yaml(identity, &contents)
    }

    pub fn validate(&self, identity: &str) -> Result<()> {
        let invalid = |reason: String| SmoothError::InvalidDefinition {
            identity: identity.to_string(),
            reason,
        };

        if self.table.trim().is_empty() {
            return Err(invalid("table name cannot be empty".to_string()));
        }

        if self.auto_increment && self.columns.contains_key(&self.primary_key) {
            return Err(invalid(format!(
                "column '{}' is declared while auto_increment already creates it",
                self.primary_key
            )));
        }

        for reserved in [REMEMBER_TOKEN, TIMESTAMPS, SOFT_DELETES] {
            if self.columns.contains_key(reserved) {
                return Err(invalid(format!(
                    "column '{}' is reserved, use its flag instead",
                    reserved
                )));
            }
        }

        if let Some((name, _)) = self.columns.iter().find(|(_, spec)| spec.trim().is_empty()) {
            return Err(invalid(format!("column '{}' has an empty spec", name)));
        }

        Ok(())
    }

    /// Columns in snapshot order: primary key, declared columns, then the
    /// remember-token, timestamp and soft-delete columns
    pub fn schemas(&self) -> IndexMap<String, String> {
        let mut schemas = IndexMap::new();

        if self.auto_increment {
            schemas.insert(self.primary_key.clone(), INCREMENTS.to_string());
        }

        for (name, spec) in &self.columns {
            schemas.insert(name.clone(), spec.clone());
        }

        let flagged = [
            (self.remember_token, REMEMBER_TOKEN),
            (self.timestamps, TIMESTAMPS),
            (self.soft_deletes, SOFT_DELETES),
        ];
        for (enabled, column) in flagged {
            if enabled {
                schemas.insert(column.to_string(), column.to_string());
            }
        }

        schemas
    }
}
