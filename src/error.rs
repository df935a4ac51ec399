use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by schema loading, diffing and migration composition.
#[derive(Error, Debug)]
pub enum SmoothError {
    #[error("Failed to deserialize schema snapshot: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Unsupported migration action '{0}' (expected 'create' or 'update')")]
    UnsupportedAction(String),

    #[error("Migration stub not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Circular run-first reference: {schema} and {dependency} require each other to run first")]
    CircularDependency { schema: String, dependency: String },

    #[error("Schema {schema} requires {dependency} to run first, but no such schema exists")]
    MissingDependency { schema: String, dependency: String },

    #[error("No usable schema snapshot for {identity} at or before batch {batch}")]
    MissingSnapshot { identity: String, batch: i64 },

    #[error("Invalid schema definition {identity}: {reason}")]
    InvalidDefinition { identity: String, reason: String },

    #[error("Failed to render migration stub: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SmoothError>;
