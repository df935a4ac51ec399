pub mod file_store;
pub mod postgres;

use crate::config::types::{HistoryBackend, HistoryConfig};
use crate::schema::SchemaSnapshot;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

pub use file_store::FileHistoryStore;
pub use postgres::{PgHistoryStore, format_tracking_table_name};

/// One generated migration and the schema state it was generated from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    /// Schema identity, e.g. `PostsSchema`
    pub schema_class: String,
    /// Serialized snapshot
    pub schema_load: String,
    pub migration_path: Option<String>,
    pub batch: i64,
}

impl HistoryRecord {
    pub fn new(
        schema_class: impl Into<String>,
        schema_load: impl Into<String>,
        migration_path: Option<String>,
        batch: i64,
    ) -> Self {
        Self {
            id: 0,
            schema_class: schema_class.into(),
            schema_load: schema_load.into(),
            migration_path,
            batch,
        }
    }

    pub fn snapshot(&self) -> crate::error::Result<SchemaSnapshot> {
        SchemaSnapshot::from_serialized(self.schema_load.as_bytes())
    }
}

/// Persistent record of generated migrations per schema identity
#[allow(async_fn_in_trait)]
pub trait HistoryStore {
    /// Create the backing storage if it does not exist yet
    async fn ensure_repository(&self) -> Result<()>;

    /// Highest recorded batch for the identity, 0 when there is none
    async fn last_batch_number(&self, identity: &str) -> Result<i64>;

    async fn find_by_batch(&self, identity: &str, batch: i64) -> Result<Option<HistoryRecord>>;

    /// Store a record, replacing any record with the same identity and batch
    async fn record_migration(&self, record: HistoryRecord) -> Result<HistoryRecord>;

    /// All records ordered by identity then batch, optionally for one identity
    async fn list(&self, identity: Option<&str>) -> Result<Vec<HistoryRecord>>;
}

/// Snapshot recorded for `identity` at `batch`, falling back to the nearest
/// earlier batch. Records that fail to decode are skipped.
pub async fn previous_snapshot<S: HistoryStore>(
    store: &S,
    identity: &str,
    batch: i64,
) -> Result<Option<SchemaSnapshot>> {
    for candidate in (1..=batch).rev() {
        let Some(record) = store.find_by_batch(identity, candidate).await? else {
            continue;
        };

        match record.snapshot() {
            Ok(snapshot) => {
                debug!("Using snapshot of {} from batch {}", identity, candidate);
                return Ok(Some(snapshot));
            }
            Err(e) => warn!(
                "Skipping unreadable snapshot of {} in batch {}: {}",
                identity, candidate, e
            ),
        }
    }

    Ok(None)
}

/// History store selected by configuration
pub enum History {
    File(FileHistoryStore),
    Postgres(PgHistoryStore),
}

impl History {
    /// Open the configured backend; a relative history file is resolved
    /// against `root_dir`
    pub async fn open(config: &HistoryConfig, root_dir: &Path) -> Result<Self> {
        match config.backend {
            HistoryBackend::File => Ok(History::File(FileHistoryStore::new(
                root_dir.join(&config.file),
            ))),
            HistoryBackend::Postgres => {
                let url = config.database_url.as_deref().context(
                    "The postgres history backend needs a database URL (history.database_url or DATABASE_URL)",
                )?;
                let store = PgHistoryStore::connect(url, &config.tracking_table).await?;
                Ok(History::Postgres(store))
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            History::File(store) => format!("file {}", store.path().display()),
            History::Postgres(store) => format!("table {}", store.table_name()),
        }
    }
}

impl HistoryStore for History {
    async fn ensure_repository(&self) -> Result<()> {
        match self {
            History::File(store) => store.ensure_repository().await,
            History::Postgres(store) => store.ensure_repository().await,
        }
    }

    async fn last_batch_number(&self, identity: &str) -> Result<i64> {
        match self {
            History::File(store) => store.last_batch_number(identity).await,
            History::Postgres(store) => store.last_batch_number(identity).await,
        }
    }

    async fn find_by_batch(&self, identity: &str, batch: i64) -> Result<Option<HistoryRecord>> {
        match self {
            History::File(store) => store.find_by_batch(identity, batch).await,
            History::Postgres(store) => store.find_by_batch(identity, batch).await,
        }
    }

    async fn record_migration(&self, record: HistoryRecord) -> Result<HistoryRecord> {
        match self {
            History::File(store) => store.record_migration(record).await,
            History::Postgres(store) => store.record_migration(record).await,
        }
    }

    async fn list(&self, identity: Option<&str>) -> Result<Vec<HistoryRecord>> {
        match self {
            History::File(store) => store.list(identity).await,
            History::Postgres(store) => store.list(identity).await,
        }
    }
}
