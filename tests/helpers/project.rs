use anyhow::{Context, Result};
use indexmap::IndexMap;
use smooth_migrate::config::{Config, ConfigBuilder};
use smooth_migrate::migration_tracking::{FileHistoryStore, HistoryRecord, HistoryStore};
use smooth_migrate::schema::SchemaSnapshot;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Snapshot from `(column, spec)` pairs, in order
pub fn snapshot(table: &str, columns: &[(&str, &str)]) -> SchemaSnapshot {
    let columns: IndexMap<String, String> = columns
        .iter()
        .map(|(name, spec)| (name.to_string(), spec.to_string()))
        .collect();
    SchemaSnapshot::new(table, columns)
}

/// A temporary project laid out with the default directories and the file
/// history backend
pub struct TestProject {
    pub temp_dir: TempDir,
    pub config: Config,
}

impl TestProject {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = ConfigBuilder::new()
            .resolve()
            .expect("Default config should resolve");
        Self { temp_dir, config }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_schema(&self, identity: &str, content: &str) -> Result<()> {
        let dir = self.root().join(&self.config.directories.schema);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{}.yaml", identity)), content)?;
        Ok(())
    }

    pub fn migrations_dir(&self) -> PathBuf {
        self.root().join(&self.config.directories.migrations)
    }

    /// Migration file names, sorted
    pub fn migration_files(&self) -> Result<Vec<String>> {
        let dir = self.migrations_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str()
                && name.ends_with(".php")
            {
                files.push(name.to_string());
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn read_migration(&self, filename: &str) -> Result<String> {
        fs::read_to_string(self.migrations_dir().join(filename))
            .context("Failed to read migration file")
    }

    /// The single migration whose name ends with `suffix`
    pub fn migration_ending_with(&self, suffix: &str) -> Result<String> {
        let matching: Vec<String> = self
            .migration_files()?
            .into_iter()
            .filter(|f| f.ends_with(suffix))
            .collect();
        match matching.as_slice() {
            [single] => self.read_migration(single),
            other => anyhow::bail!("Expected one migration ending with {}, found {:?}", suffix, other),
        }
    }

    pub fn history(&self) -> FileHistoryStore {
        FileHistoryStore::new(self.root().join(&self.config.history.file))
    }

    pub async fn history_records(&self) -> Result<Vec<HistoryRecord>> {
        self.history().list(None).await
    }
}
