use crate::config::Config;
use crate::constants::SERIALIZER_FILE_EXTENSION;
use crate::prompts::{prompt_required_string_with_validation, validate_table_name};
use crate::schema::{SchemaDefinition, SchemaSnapshot};
use crate::schema_loader::{SchemaLoader, SchemaLoaderConfig, schema_identity};
use anyhow::{Context, Result, anyhow};
use console::style;
use std::path::Path;
use tracing::debug;

/// Scaffold a schema definition for `table` and its initial serializer
pub async fn cmd_create(config: &Config, root_dir: &Path, table: Option<&str>) -> Result<()> {
    let table = prompt_required_string_with_validation(table, "Table name", validate_table_name)?;
    let identity = schema_identity(&table);

    let loader = SchemaLoader::new(SchemaLoaderConfig::new(
        root_dir.join(&config.directories.schema),
    ));
    let schema_path = loader.schema_path(&identity);
    if schema_path.exists() {
        return Err(anyhow!(
            "Schema {} already exists at {}",
            identity,
            schema_path.display()
        ));
    }

    let contents = schema_template(&table);
    let definition = SchemaDefinition::from_yaml(&identity, &contents)?;

    if let Some(parent) = schema_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&schema_path, &contents)
        .with_context(|| format!("Failed to write {}", schema_path.display()))?;
    println!(
        "{} Schema {} created at {}",
        style("✅").green(),
        style(&identity).cyan(),
        schema_path.display()
    );

    let serializers_dir = root_dir.join(&config.directories.serializers);
    std::fs::create_dir_all(&serializers_dir)?;
    let serializer_path =
        serializers_dir.join(format!("{}.{}", identity, SERIALIZER_FILE_EXTENSION));
    let snapshot = SchemaSnapshot::from_definition(&definition);
    std::fs::write(&serializer_path, snapshot.to_json()?)
        .with_context(|| format!("Failed to write {}", serializer_path.display()))?;
    debug!("Wrote serializer {}", serializer_path.display());
    println!("Serializer for {} created successfully", identity);

    Ok(())
}

fn schema_template(table: &str) -> String {
    format!(
        r#"table: {table}

# Schemas that must be migrated before this one
run_first: []

# column: spec, e.g.
#   title: string:100,nullable
#   user_id: integer,unsigned,on:users,onDelete:cascade
columns: {{}}

timestamps: true
soft_deletes: false
remember_token: false
"#
    )
}
