use crate::config::Config;
use crate::error::SmoothError;
use crate::migrate::{MigrationGenerationInput, generate_migration};
use crate::migration_tracking::{History, HistoryRecord, HistoryStore, previous_snapshot};
use crate::render::Stubs;
use crate::schema::SchemaSnapshot;
use crate::schema_loader::{SchemaFile, SchemaLoader, SchemaLoaderConfig, schema_identity};
use anyhow::{Context, Result, anyhow};
use chrono::{Duration, NaiveDateTime};
use console::style;
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

const ALL_SCHEMAS: &str = "all";
const DEFAULT_CORRECTION_OFFSET: i64 = 1;

/// Which schemas `--correct` regenerates and how many batches back the
/// baseline sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionTarget {
    /// `None` targets every schema with history
    pub schema: Option<String>,
    pub offset: i64,
}

impl CorrectionTarget {
    pub fn applies_to(&self, identity: &str) -> bool {
        self.schema.as_deref().is_none_or(|schema| schema == identity)
    }

    /// Batch whose snapshot the corrected migration is diffed against
    pub fn baseline(&self, last_batch: i64) -> i64 {
        (last_batch - self.offset).max(0)
    }
}

impl FromStr for CorrectionTarget {
    type Err = anyhow::Error;

    /// `posts`, `posts.2`, `all`, `all.3`
    fn from_str(value: &str) -> Result<Self> {
        let (name, offset) = match value.split_once('.') {
            Some((name, offset)) => {
                let offset: i64 = offset
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid correction offset '{}'", offset))?;
                if offset < 1 {
                    return Err(anyhow!("Correction offset must be at least 1, got {}", offset));
                }
                (name.trim(), offset)
            }
            None => (value.trim(), DEFAULT_CORRECTION_OFFSET),
        };

        if name.is_empty() {
            return Err(anyhow!("Correction target cannot be empty"));
        }

        let schema = if name.eq_ignore_ascii_case(ALL_SCHEMAS) {
            None
        } else {
            Some(schema_identity(name))
        };

        Ok(Self { schema, offset })
    }
}

/// Generate migrations for every schema whose definition changed since its
/// last recorded snapshot
pub async fn cmd_make(
    config: &Config,
    root_dir: &Path,
    correct: Option<&CorrectionTarget>,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        println!("🔍 Dry-run mode: previewing migrations without writing them");
    }

    let schema_dir = root_dir.join(&config.directories.schema);
    let loader = SchemaLoader::new(SchemaLoaderConfig::new(schema_dir.clone()));
    let schemas = loader.load_ordered_schema_files()?;

    if schemas.is_empty() {
        println!("No schema files found in {}", schema_dir.display());
        return Ok(());
    }

    if let Some(schema) = correct.and_then(|c| c.schema.as_deref())
        && !schemas.iter().any(|s| s.identity == schema)
    {
        return Err(anyhow!(
            "Cannot correct {}: no such schema in {}",
            schema,
            schema_dir.display()
        ));
    }

    let history = History::open(&config.history, root_dir).await?;
    if !dry_run {
        history.ensure_repository().await?;
    }
    debug!("Using history {}", history.describe());

    let stubs = match &config.directories.stubs {
        Some(dir) => Stubs::from_dir(root_dir.join(dir)),
        None => Stubs::embedded(),
    };

    let maker = MigrationMaker {
        config,
        root_dir,
        history: &history,
        stubs: &stubs,
        correct,
        dry_run,
        started_at: chrono::Local::now().naive_local(),
    };

    let mut written = 0;
    for schema in &schemas {
        // Later schemas get later timestamps so run-first order survives file name sorting
        if maker.make(schema, written).await? {
            written += 1;
        }
    }

    info!("{} migration(s) generated", written);
    Ok(())
}

struct MigrationMaker<'a> {
    config: &'a Config,
    root_dir: &'a Path,
    history: &'a History,
    stubs: &'a Stubs,
    correct: Option<&'a CorrectionTarget>,
    dry_run: bool,
    started_at: NaiveDateTime,
}

impl MigrationMaker<'_> {
    /// Returns whether a migration was produced for the schema
    async fn make(&self, schema: &SchemaFile, sequence: i64) -> Result<bool> {
        let identity = schema.identity.as_str();
        let current = SchemaSnapshot::from_definition(&schema.definition);
        let last_batch = self.history.last_batch_number(identity).await?;

        let correction = self.correction_for(identity, last_batch)?;
        let (baseline, batch) = match correction {
            Some(target) => (target.baseline(last_batch), last_batch),
            None => (last_batch, last_batch + 1),
        };

        let previous = previous_snapshot(self.history, identity, baseline).await?;
        if previous.is_none() && correction.is_none() && last_batch > 0 {
            return Err(SmoothError::MissingSnapshot {
                identity: identity.to_string(),
                batch: baseline,
            }
            .into());
        }

        let mut input = MigrationGenerationInput::new(previous, current.clone(), batch);
        input.timestamp = self.started_at + Duration::seconds(sequence);
        input.timestamp_format = self.config.migration.timestamp_format.clone();
        input.syntax = self.config.spec;

        let result = generate_migration(input, self.stubs)
            .with_context(|| format!("Failed to generate migration for {}", identity))?;

        let Some(source) = result.migration_source else {
            println!("No Schema Change Detected For {}", style(identity).cyan());
            return Ok(false);
        };

        let relative_path = match correction {
            Some(_) => self
                .history
                .find_by_batch(identity, last_batch)
                .await?
                .and_then(|record| record.migration_path)
                .map(PathBuf::from),
            None => None,
        }
        .unwrap_or_else(|| {
            Path::new(&self.config.directories.migrations).join(&result.migration_filename)
        });
        let migration_path = self.root_dir.join(&relative_path);

        if self.dry_run {
            print_preview(identity, &migration_path, &source)?;
            return Ok(true);
        }

        let verb = if correction.is_some() { "Correcting" } else { "Writing" };
        println!("{} Migration For {}", verb, style(identity).cyan());

        write_file(&migration_path, &source)?;
        for log in &result.logs {
            println!("  {}", log);
        }
        if result.has_destructive {
            println!(
                "  {} {} drops data, review before running it",
                style("⚠️").yellow(),
                result.class_name
            );
        }
        println!(
            "{} Migration for {} Created Successfully: {}",
            style("✅").green(),
            identity,
            relative_path.display()
        );

        let schema_load = current.to_json()?;
        let serializer_path = self
            .root_dir
            .join(&self.config.directories.serializers)
            .join(format!("{}.{}", identity, crate::constants::SERIALIZER_FILE_EXTENSION));
        write_file(&serializer_path, &schema_load)?;

        self.history
            .record_migration(HistoryRecord::new(
                identity,
                schema_load,
                Some(relative_path.to_string_lossy().into_owned()),
                batch,
            ))
            .await
            .with_context(|| format!("Failed to update history for {}", identity))?;
        println!("Log for {} Updated Successfully", identity);

        Ok(true)
    }

    /// The correction that applies to this schema. An explicitly targeted
    /// schema without history cannot be corrected; `all` skips such schemas.
    fn correction_for(&self, identity: &str, last_batch: i64) -> Result<Option<&CorrectionTarget>> {
        let Some(target) = self.correct.filter(|c| c.applies_to(identity)) else {
            return Ok(None);
        };

        if last_batch > 0 {
            return Ok(Some(target));
        }

        if target.schema.is_some() {
            return Err(SmoothError::MissingSnapshot {
                identity: identity.to_string(),
                batch: 0,
            }
            .into());
        }

        debug!("{} has no history, generating instead of correcting", identity);
        Ok(None)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_preview(identity: &str, path: &Path, source: &str) -> Result<()> {
    println!(
        "\n📋 {} {}",
        style(identity).bold().underlined(),
        style(path.display()).dim()
    );
    println!("{}", style("─".repeat(60)).dim());

    if path.is_file() {
        let existing = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let diff = TextDiff::from_lines(existing.as_str(), source);
        for change in diff.iter_all_changes() {
            let line = change.to_string_lossy();
            match change.tag() {
                ChangeTag::Delete => print!("{}", style(format!("-{}", line)).red()),
                ChangeTag::Insert => print!("{}", style(format!("+{}", line)).green()),
                ChangeTag::Equal => print!(" {}", line),
            }
        }
    } else {
        println!("{}", source);
    }

    println!("{}", style("─".repeat(60)).dim());
    Ok(())
}
