use crate::config::{merge::Merge, types::*};
use crate::schema::SpecSyntax;
use anyhow::{Result, anyhow};

pub struct ConfigBuilder {
    config_input: ConfigInput,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config_input: ConfigInput::default(),
        }
    }

    pub fn with_file(mut self, file_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(file_input);
        self
    }

    pub fn with_cli_args(mut self, cli_input: ConfigInput) -> Self {
        self.config_input = self.config_input.merge(cli_input);
        self
    }

    pub fn resolve(self) -> Result<Config> {
        let defaults = Config::default();

        Ok(Config {
            directories: self.resolve_directories(&defaults.directories),
            history: self.resolve_history(&defaults.history),
            spec: self.resolve_spec(&defaults.spec)?,
            migration: self.resolve_migration(&defaults.migration),
        })
    }

    fn resolve_directories(&self, defaults: &Directories) -> Directories {
        let dir_input = self.config_input.directories.as_ref();

        Directories {
            schema: dir_input
                .and_then(|d| d.schema_dir.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.schema.clone()),
            serializers: dir_input
                .and_then(|d| d.serializers_dir.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.serializers.clone()),
            migrations: dir_input
                .and_then(|d| d.migrations_dir.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.migrations.clone()),
            stubs: dir_input
                .and_then(|d| d.stubs_dir.as_ref())
                .cloned()
                .or_else(|| defaults.stubs.clone()),
        }
    }

    fn resolve_history(&self, defaults: &HistoryConfig) -> HistoryConfig {
        let history_input = self.config_input.history.as_ref();

        let database_url = history_input
            .and_then(|h| h.database_url.as_ref())
            .cloned()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .or_else(|| defaults.database_url.clone());

        let tracking_table = history_input
            .and_then(|h| h.tracking_table.as_ref())
            .map(|t| TrackingTable {
                schema: t
                    .schema
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| defaults.tracking_table.schema.clone()),
                name: t
                    .name
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| defaults.tracking_table.name.clone()),
            })
            .unwrap_or_else(|| defaults.tracking_table.clone());

        HistoryConfig {
            backend: history_input
                .and_then(|h| h.backend)
                .unwrap_or(defaults.backend),
            file: history_input
                .and_then(|h| h.file.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.file.clone()),
            database_url,
            tracking_table,
        }
    }

    fn resolve_spec(&self, defaults: &SpecSyntax) -> Result<SpecSyntax> {
        let spec_input = self.config_input.spec.as_ref();

        let syntax = SpecSyntax {
            token_delimiter: spec_input
                .and_then(|s| s.token_delimiter)
                .unwrap_or(defaults.token_delimiter),
            value_separator: spec_input
                .and_then(|s| s.value_separator)
                .unwrap_or(defaults.value_separator),
        };

        for c in [syntax.token_delimiter, syntax.value_separator] {
            if c.is_whitespace() || c == '[' || c == ']' {
                return Err(anyhow!(
                    "Invalid spec delimiter {:?}: whitespace and brackets are reserved for values",
                    c
                ));
            }
        }
        if syntax.token_delimiter == syntax.value_separator {
            return Err(anyhow!(
                "spec.token_delimiter and spec.value_separator must differ (both are {:?})",
                syntax.token_delimiter
            ));
        }

        Ok(syntax)
    }

    fn resolve_migration(&self, defaults: &Migration) -> Migration {
        let migration_input = self.config_input.migration.as_ref();

        Migration {
            timestamp_format: migration_input
                .and_then(|m| m.timestamp_format.as_ref())
                .cloned()
                .unwrap_or_else(|| defaults.timestamp_format.clone()),
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
