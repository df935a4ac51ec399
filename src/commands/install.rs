use crate::config::Config;
use crate::migration_tracking::{History, HistoryStore};
use anyhow::Result;
use console::style;
use std::path::Path;

/// Create the migration history repository for the configured backend
pub async fn cmd_install(config: &Config, root_dir: &Path) -> Result<()> {
    let history = History::open(&config.history, root_dir).await?;
    history.ensure_repository().await?;

    println!(
        "{} Migration history ready ({})",
        style("✅").green(),
        history.describe()
    );
    Ok(())
}
