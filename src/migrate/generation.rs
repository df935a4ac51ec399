use crate::constants::{MIGRATION_FILE_EXTENSION, MIGRATION_TIMESTAMP_FORMAT};
use crate::diff::diff_with_syntax;
use crate::error::Result;
use crate::migrate::compose::{MigrationPlan, compose, render_migration};
use crate::render::{MigrationAction, Stubs};
use crate::schema::{SchemaSnapshot, SpecSyntax};
use chrono::NaiveDateTime;

/// Input for migration generation - all pure data, no side effects
#[derive(Debug, Clone)]
pub struct MigrationGenerationInput {
    pub previous: Option<SchemaSnapshot>,
    pub current: SchemaSnapshot,
    /// Batch the generated migration is recorded under
    pub batch: i64,
    pub timestamp: NaiveDateTime,
    pub timestamp_format: String,
    pub syntax: SpecSyntax,
}

impl MigrationGenerationInput {
    pub fn new(previous: Option<SchemaSnapshot>, current: SchemaSnapshot, batch: i64) -> Self {
        Self {
            previous,
            current,
            batch,
            timestamp: chrono::Local::now().naive_local(),
            timestamp_format: MIGRATION_TIMESTAMP_FORMAT.to_string(),
            syntax: SpecSyntax::default(),
        }
    }
}

/// Result of migration generation - all pure data
#[derive(Debug, Clone)]
pub struct MigrationGenerationResult {
    pub action: MigrationAction,
    pub class_name: String,
    pub migration_filename: String,
    /// Rendered migration, `None` when nothing changed
    pub migration_source: Option<String>,
    pub logs: Vec<String>,
    pub has_changes: bool,
    pub has_destructive: bool,
}

/// Diff, compose and render the migration for one schema
pub fn generate_migration(
    input: MigrationGenerationInput,
    stubs: &Stubs,
) -> Result<MigrationGenerationResult> {
    let table = input.current.table.clone();

    let (plan, logs) = match input.previous {
        None => (
            MigrationPlan::Create {
                snapshot: input.current,
            },
            vec![format!("Table {} created", table)],
        ),
        Some(previous) => {
            let changes = diff_with_syntax(&previous, &input.current, &input.syntax);
            let logs = changes.logs().to_vec();
            (MigrationPlan::Update { changes }, logs)
        }
    };

    let action = plan.action();
    let class_name = migration_class_name(action, &table, input.batch);
    let migration_filename =
        migration_filename(&class_name, &input.timestamp, &input.timestamp_format);

    let has_changes = match &plan {
        MigrationPlan::Create { .. } => true,
        MigrationPlan::Update { changes } => changes.has_changed(),
    };

    if !has_changes {
        return Ok(MigrationGenerationResult {
            action,
            class_name,
            migration_filename,
            migration_source: None,
            logs,
            has_changes,
            has_destructive: false,
        });
    }

    let composed = compose(&plan, &table, &input.syntax);
    let source = render_migration(&composed, &class_name, &table, stubs)?;

    Ok(MigrationGenerationResult {
        action,
        class_name,
        migration_filename,
        migration_source: Some(source),
        logs,
        has_changes,
        has_destructive: composed.has_destructive(),
    })
}

/// `CreatePostsTable` or `UpdatePostsTableBatch3`
pub fn migration_class_name(action: MigrationAction, table: &str, batch: i64) -> String {
    match action {
        MigrationAction::Create => format!("Create{}Table", studly(table)),
        MigrationAction::Update => format!("Update{}TableBatch{}", studly(table), batch),
    }
}

pub fn migration_filename(class_name: &str, timestamp: &NaiveDateTime, format: &str) -> String {
    format!(
        "{}_{}.{}",
        timestamp.format(format),
        snake(class_name),
        MIGRATION_FILE_EXTENSION
    )
}

/// `blog_posts` -> `BlogPosts`
pub fn studly(value: &str) -> String {
    value
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `UpdatePostsTableBatch2` -> `update_posts_table_batch2`
pub fn snake(value: &str) -> String {
    let mut result = String::new();

    for (i, c) in value.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else if c == '-' || c.is_whitespace() {
            if !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.push(c);
        }
    }

    result
}
