use crate::config::types::*;

/// Trait for merging optional configuration values
pub trait Merge<T> {
    fn merge(self, other: T) -> T;
}

impl<T> Merge<Option<T>> for Option<T> {
    fn merge(self, other: Option<T>) -> Option<T> {
        other.or(self)
    }
}

impl Merge<ConfigInput> for ConfigInput {
    fn merge(self, other: ConfigInput) -> ConfigInput {
        ConfigInput {
            directories: match (self.directories, other.directories) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.merge_with(b)),
            },
            history: match (self.history, other.history) {
                (None, None) => None,
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (Some(a), Some(b)) => Some(a.merge_with(b)),
            },
            spec: self.spec.merge(other.spec),
            migration: self.migration.merge(other.migration),
        }
    }
}

// Custom merge implementations for complex types
impl DirectoriesInput {
    pub fn merge_with(self, other: DirectoriesInput) -> DirectoriesInput {
        DirectoriesInput {
            schema_dir: other.schema_dir.or(self.schema_dir),
            serializers_dir: other.serializers_dir.or(self.serializers_dir),
            migrations_dir: other.migrations_dir.or(self.migrations_dir),
            stubs_dir: other.stubs_dir.or(self.stubs_dir),
        }
    }
}

impl HistoryInput {
    pub fn merge_with(self, other: HistoryInput) -> HistoryInput {
        HistoryInput {
            backend: other.backend.or(self.backend),
            file: other.file.or(self.file),
            database_url: other.database_url.or(self.database_url),
            tracking_table: other.tracking_table.or(self.tracking_table),
        }
    }
}
