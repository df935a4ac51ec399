use crate::config::Config;
use crate::migration_tracking::{History, HistoryRecord, HistoryStore};
use crate::schema_loader::schema_identity;
use anyhow::Result;
use console::style;
use itertools::Itertools;
use std::path::Path;

/// Print recorded migrations, grouped by schema
pub async fn cmd_status(config: &Config, root_dir: &Path, schema: Option<&str>) -> Result<()> {
    let history = History::open(&config.history, root_dir).await?;
    let identity = schema.map(schema_identity);
    let records = history.list(identity.as_deref()).await?;

    if records.is_empty() {
        match &identity {
            Some(identity) => println!("No migrations recorded for {}", identity),
            None => println!("No migrations recorded in {}", history.describe()),
        }
        return Ok(());
    }

    println!("\n📋 {}", style("Migration History").bold().underlined());
    for line in format_status(&records) {
        println!("{}", line);
    }
    Ok(())
}

fn format_status(records: &[HistoryRecord]) -> Vec<String> {
    let mut lines = Vec::new();

    for (identity, group) in &records.iter().chunk_by(|r| r.schema_class.as_str()) {
        lines.push(format!("{}", style(identity).cyan().bold()));
        for record in group {
            lines.push(format!(
                "  batch {:>3}  {}",
                record.batch,
                record.migration_path.as_deref().unwrap_or("-")
            ));
        }
    }

    lines
}
