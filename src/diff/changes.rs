//! Classified schema changes

use crate::schema::SchemaSnapshot;
use std::fmt;

/// One detected difference between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRecord {
    TableRename {
        from: String,
        to: String,
    },
    ColumnRename {
        from: String,
        to: String,
    },
    ColumnAdd {
        name: String,
    },
    ColumnDrop {
        name: String,
    },
    DefinitionChange {
        column: String,
        previous_spec: String,
        current_spec: String,
    },
    ForeignAdd {
        column: String,
    },
    ForeignDrop {
        column: String,
    },
    PrimaryDrop {
        column: String,
    },
    UniqueDrop {
        column: String,
    },
    IndexDrop {
        column: String,
    },
    MorphDrop {
        column: String,
    },
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeRecord::TableRename { from, to } => {
                write!(f, "Table renamed from {} to {}", from, to)
            }
            ChangeRecord::ColumnRename { from, to } => {
                write!(f, "Column renamed from {} to {}", from, to)
            }
            ChangeRecord::ColumnAdd { name } => write!(f, "Column {} added", name),
            ChangeRecord::ColumnDrop { name } => write!(f, "Column {} dropped", name),
            ChangeRecord::DefinitionChange {
                column,
                previous_spec,
                current_spec,
            } => write!(
                f,
                "Column {} definition changed from '{}' to '{}'",
                column, previous_spec, current_spec
            ),
            ChangeRecord::ForeignAdd { column } => write!(f, "Foreign key added on {}", column),
            ChangeRecord::ForeignDrop { column } => {
                write!(f, "Foreign key dropped on {}", column)
            }
            ChangeRecord::PrimaryDrop { column } => {
                write!(f, "Primary key dropped on {}", column)
            }
            ChangeRecord::UniqueDrop { column } => {
                write!(f, "Unique index dropped on {}", column)
            }
            ChangeRecord::IndexDrop { column } => write!(f, "Index dropped on {}", column),
            ChangeRecord::MorphDrop { column } => {
                write!(f, "Morph columns dropped for {}", column)
            }
        }
    }
}

/// The result of one differencing pass.
///
/// Holds both snapshots so the composer can look up the spec a column had
/// before or after the change.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    previous: SchemaSnapshot,
    current: SchemaSnapshot,
    changes: Vec<ChangeRecord>,
    log: Vec<String>,
}

impl ChangeSet {
    pub(crate) fn new(previous: SchemaSnapshot, current: SchemaSnapshot) -> Self {
        Self {
            previous,
            current,
            changes: Vec::new(),
            log: Vec::new(),
        }
    }

    /// Add a record with its own log line
    pub(crate) fn record(&mut self, change: ChangeRecord) {
        self.log.push(change.to_string());
        self.changes.push(change);
    }

    /// Add a record whose log line is written separately
    pub(crate) fn record_unlogged(&mut self, change: ChangeRecord) {
        self.changes.push(change);
    }

    pub(crate) fn log(&mut self, line: String) {
        self.log.push(line);
    }

    pub fn previous(&self) -> &SchemaSnapshot {
        &self.previous
    }

    pub fn current(&self) -> &SchemaSnapshot {
        &self.current
    }

    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    pub fn logs(&self) -> &[String] {
        &self.log
    }

    pub fn has_changed(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Name a column had before a positional rename
    pub fn renamed_from(&self, column: &str) -> Option<&str> {
        self.changes.iter().find_map(|change| match change {
            ChangeRecord::ColumnRename { from, to } if to == column => Some(from.as_str()),
            _ => None,
        })
    }

    pub fn table_rename(&self) -> Option<(&str, &str)> {
        self.changes.iter().find_map(|change| match change {
            ChangeRecord::TableRename { from, to } => Some((from.as_str(), to.as_str())),
            _ => None,
        })
    }
}
