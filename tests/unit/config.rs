use anyhow::Result;
use smooth_migrate::config::{
    ConfigBuilder, ConfigInput, HistoryBackend, HistoryInput, TrackingTableInput, load_config,
};
use std::fs;
use tempfile::TempDir;

/// Integration tests for config file loading and CLI overrides
mod config_integration_tests {
    use super::*;

    #[test]
    fn test_config_file_relative_to_its_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let project = temp_dir.path().join("app");
        fs::create_dir_all(&project)?;
        fs::write(
            project.join("smooth.yaml"),
            r#"
directories:
  schema_dir: schemas
  migrations_dir: migrations
migration:
  timestamp_format: "%Y%m%d%H%M%S"
"#,
        )?;

        let config_path = project.join("smooth.yaml");
        let (file_config, root_dir) = load_config(config_path.to_str().unwrap())?;
        let config = ConfigBuilder::new().with_file(file_config).resolve()?;

        assert_eq!(root_dir, project);
        assert_eq!(config.directories.schema, "schemas");
        assert_eq!(config.directories.migrations, "migrations");
        assert_eq!(config.directories.serializers, "database/serializers");
        assert_eq!(config.migration.timestamp_format, "%Y%m%d%H%M%S");
        Ok(())
    }

    #[test]
    fn test_invalid_yaml_is_reported() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("smooth.yaml");
        fs::write(&config_path, "history: [unbalanced")?;

        let err = load_config(config_path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }

    #[test]
    fn test_unknown_backend_is_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("smooth.yaml");
        fs::write(&config_path, "history:\n  backend: mysql\n")?;

        assert!(load_config(config_path.to_str().unwrap()).is_err());
        Ok(())
    }

    #[test]
    fn test_cli_history_overrides_file() -> Result<()> {
        let file_config = ConfigInput {
            history: Some(HistoryInput {
                backend: Some(HistoryBackend::File),
                file: Some("from_file.json".to_string()),
                database_url: None,
                tracking_table: Some(TrackingTableInput {
                    schema: Some("audit".to_string()),
                    name: None,
                }),
            }),
            ..Default::default()
        };
        let cli_config = ConfigInput {
            history: Some(HistoryInput {
                backend: Some(HistoryBackend::Postgres),
                file: None,
                database_url: Some("postgres://localhost/smooth".to_string()),
                tracking_table: None,
            }),
            ..Default::default()
        };

        let config = ConfigBuilder::new()
            .with_file(file_config)
            .with_cli_args(cli_config)
            .resolve()?;

        assert_eq!(config.history.backend, HistoryBackend::Postgres);
        assert_eq!(config.history.file, "from_file.json");
        assert_eq!(
            config.history.database_url.as_deref(),
            Some("postgres://localhost/smooth")
        );
        assert_eq!(config.history.tracking_table.schema, "audit");
        assert_eq!(config.history.tracking_table.name, "smooth_migrations");
        Ok(())
    }
}
