use super::{HistoryRecord, HistoryStore};
use crate::config::types::TrackingTable;
use anyhow::{Context, Result};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::info;

/// History kept in a PostgreSQL table
#[derive(Debug, Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
    table_name: String,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool, tracking_table: &TrackingTable) -> Result<Self> {
        Ok(Self {
            pool,
            table_name: format_tracking_table_name(tracking_table)?,
        })
    }

    /// Connect with a 5-second timeout
    pub async fn connect(url: &str, tracking_table: &TrackingTable) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to history database at {}",
                    mask_url_password(url)
                )
            })?;
        Self::new(pool, tracking_table)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn record_from_row(row: &PgRow) -> HistoryRecord {
    HistoryRecord {
        id: i64::from(row.get::<i32, _>("id")),
        schema_class: row.get("schema_class"),
        schema_load: row.get("schema_load"),
        migration_path: row.get("migration_path"),
        batch: i64::from(row.get::<i32, _>("batch")),
    }
}

fn batch_to_db(batch: i64) -> Result<i32> {
    i32::try_from(batch).with_context(|| format!("Batch number {} is out of range", batch))
}

impl HistoryStore for PgHistoryStore {
    async fn ensure_repository(&self) -> Result<()> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id SERIAL PRIMARY KEY,
                schema_class TEXT NOT NULL,
                schema_load TEXT NOT NULL,
                migration_path TEXT NULL,
                batch INTEGER NOT NULL
            )
            "#,
            self.table_name
        ))
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to create history table {}", self.table_name))?;

        info!("History table {} is ready", self.table_name);
        Ok(())
    }

    async fn last_batch_number(&self, identity: &str) -> Result<i64> {
        let row = sqlx::query(&format!(
            "SELECT MAX(batch) AS batch FROM {} WHERE schema_class = $1",
            self.table_name
        ))
        .bind(identity)
        .fetch_one(&self.pool)
        .await?;

        let batch: Option<i32> = row.get("batch");
        Ok(batch.map(i64::from).unwrap_or(0))
    }

    async fn find_by_batch(&self, identity: &str, batch: i64) -> Result<Option<HistoryRecord>> {
        let row = sqlx::query(&format!(
            "SELECT id, schema_class, schema_load, migration_path, batch FROM {} \
             WHERE schema_class = $1 AND batch = $2 ORDER BY id DESC LIMIT 1",
            self.table_name
        ))
        .bind(identity)
        .bind(batch_to_db(batch)?)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    async fn record_migration(&self, record: HistoryRecord) -> Result<HistoryRecord> {
        let batch = batch_to_db(record.batch)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "DELETE FROM {} WHERE schema_class = $1 AND batch = $2",
            self.table_name
        ))
        .bind(&record.schema_class)
        .bind(batch)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(&format!(
            "INSERT INTO {} (schema_class, schema_load, migration_path, batch) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, schema_class, schema_load, migration_path, batch",
            self.table_name
        ))
        .bind(&record.schema_class)
        .bind(&record.schema_load)
        .bind(&record.migration_path)
        .bind(batch)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| {
            format!(
                "Failed to record batch {} of {}",
                record.batch, record.schema_class
            )
        })?;

        tx.commit().await?;
        Ok(record_from_row(&row))
    }

    async fn list(&self, identity: Option<&str>) -> Result<Vec<HistoryRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT id, schema_class, schema_load, migration_path, batch FROM {} \
             WHERE $1::TEXT IS NULL OR schema_class = $1 \
             ORDER BY schema_class, batch",
            self.table_name
        ))
        .bind(identity)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }
}

/// Safely format a schema-qualified table name for SQL queries
/// This prevents SQL injection by properly escaping SQL identifiers
pub fn format_tracking_table_name(tracking_table: &TrackingTable) -> Result<String> {
    // Allow alphanumeric, underscore, and dollar sign (PostgreSQL identifier rules)
    fn is_valid_sql_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {
                chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
            }
            _ => false,
        }
    }

    if !is_valid_sql_identifier(&tracking_table.schema) {
        return Err(anyhow::anyhow!(
            "Invalid schema name '{}': must contain only letters, numbers, underscores, and dollar signs, starting with letter or underscore",
            tracking_table.schema
        ));
    }

    if !is_valid_sql_identifier(&tracking_table.name) {
        return Err(anyhow::anyhow!(
            "Invalid table name '{}': must contain only letters, numbers, underscores, and dollar signs, starting with letter or underscore",
            tracking_table.name
        ));
    }

    Ok(format!(
        r#""{}"."{}""#,
        tracking_table.schema, tracking_table.name
    ))
}

/// Mask password in database URL for display
pub fn mask_url_password(url: &str) -> String {
    let Some((protocol, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    if let Some((user_info, host_and_path)) = rest.split_once('@') {
        if let Some((username, _)) = user_info.split_once(':') {
            return format!("{}://{}:***@{}", protocol, username, host_and_path);
        }
    }

    url.to_string()
}
