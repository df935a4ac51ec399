use crate::config::types::*;
use crate::constants::{HISTORY_TABLE_NAME, MIGRATION_TIMESTAMP_FORMAT};

impl Default for Directories {
    fn default() -> Self {
        Self {
            schema: "database/schema".to_string(),
            serializers: "database/serializers".to_string(),
            migrations: "database/migrations".to_string(),
            stubs: None,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: HistoryBackend::File,
            file: "database/smooth_history.json".to_string(),
            database_url: None,
            tracking_table: TrackingTable::default(),
        }
    }
}

impl Default for TrackingTable {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            name: HISTORY_TABLE_NAME.to_string(),
        }
    }
}

impl Default for Migration {
    fn default() -> Self {
        Self {
            timestamp_format: MIGRATION_TIMESTAMP_FORMAT.to_string(),
        }
    }
}
