use super::{HistoryRecord, HistoryStore};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// History kept as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read history file {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history file {}", self.path.display()))
    }

    async fn write_all(&self, records: &[HistoryRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, contents)
            .await
            .with_context(|| format!("Failed to write history file {}", self.path.display()))
    }
}

impl HistoryStore for FileHistoryStore {
    async fn ensure_repository(&self) -> Result<()> {
        if fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(());
        }

        debug!("Creating history file {}", self.path.display());
        self.write_all(&[]).await
    }

    async fn last_batch_number(&self, identity: &str) -> Result<i64> {
        Ok(self
            .read_all()
            .await?
            .iter()
            .filter(|r| r.schema_class == identity)
            .map(|r| r.batch)
            .max()
            .unwrap_or(0))
    }

    async fn find_by_batch(&self, identity: &str, batch: i64) -> Result<Option<HistoryRecord>> {
        Ok(self
            .read_all()
            .await?
            .into_iter()
            .find(|r| r.schema_class == identity && r.batch == batch))
    }

    async fn record_migration(&self, mut record: HistoryRecord) -> Result<HistoryRecord> {
        let mut records = self.read_all().await?;

        match records
            .iter_mut()
            .find(|r| r.schema_class == record.schema_class && r.batch == record.batch)
        {
            Some(existing) => {
                record.id = existing.id;
                *existing = record.clone();
            }
            None => {
                record.id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
                records.push(record.clone());
            }
        }

        self.write_all(&records).await?;
        Ok(record)
    }

    async fn list(&self, identity: Option<&str>) -> Result<Vec<HistoryRecord>> {
        let mut records: Vec<_> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|r| identity.is_none_or(|id| r.schema_class == id))
            .collect();
        records.sort_by(|a, b| {
            a.schema_class
                .cmp(&b.schema_class)
                .then(a.batch.cmp(&b.batch))
        });
        Ok(records)
    }
}
