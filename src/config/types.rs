use crate::schema::SpecSyntax;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

/// Raw configuration input - all fields Optional for merging
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigInput {
    pub directories: Option<DirectoriesInput>,
    pub history: Option<HistoryInput>,
    pub spec: Option<SpecInput>,
    pub migration: Option<MigrationInput>,
}

/// Resolved configuration with all defaults applied
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub directories: Directories,
    pub history: HistoryConfig,
    pub spec: SpecSyntax,
    pub migration: Migration,
}

// Directory configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DirectoriesInput {
    pub schema_dir: Option<String>,
    pub serializers_dir: Option<String>,
    pub migrations_dir: Option<String>,
    pub stubs_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Directories {
    pub schema: String,
    pub serializers: String,
    pub migrations: String,
    /// Custom stubs; the embedded ones are used when unset
    pub stubs: Option<String>,
}

// History configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum HistoryBackend {
    /// JSON file next to the schemas
    #[default]
    File,
    /// Table in a PostgreSQL database
    Postgres,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HistoryInput {
    pub backend: Option<HistoryBackend>,
    pub file: Option<String>,
    pub database_url: Option<String>,
    pub tracking_table: Option<TrackingTableInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackingTableInput {
    pub schema: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub backend: HistoryBackend,
    pub file: String,
    pub database_url: Option<String>,
    pub tracking_table: TrackingTable,
}

#[derive(Debug, Clone)]
pub struct TrackingTable {
    pub schema: String,
    pub name: String,
}

// Spec string syntax
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpecInput {
    pub token_delimiter: Option<char>,
    pub value_separator: Option<char>,
}

// Migration file configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MigrationInput {
    pub timestamp_format: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Migration {
    /// chrono format of the migration file name prefix
    pub timestamp_format: String,
}

// CLI argument groups for command-specific options
#[derive(Debug, Clone, Default, Args)]
pub struct DirectoryArgs {
    #[arg(long, help = "Schema definition directory path")]
    pub schema_dir: Option<String>,

    #[arg(long, help = "Schema serializer directory path")]
    pub serializers_dir: Option<String>,

    #[arg(long, help = "Migrations directory path")]
    pub migrations_dir: Option<String>,

    #[arg(long, help = "Directory with custom create.stub/update.stub")]
    pub stubs_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct HistoryArgs {
    #[arg(long, value_enum, help = "Where generated migrations are recorded")]
    pub history_backend: Option<HistoryBackend>,

    #[arg(long, help = "History file path (file backend)")]
    pub history_file: Option<String>,

    #[arg(long, help = "History database URL (postgres backend)")]
    pub database_url: Option<String>,
}

// Conversion functions from CLI args to config input
impl From<DirectoryArgs> for DirectoriesInput {
    fn from(args: DirectoryArgs) -> Self {
        Self {
            schema_dir: args.schema_dir,
            serializers_dir: args.serializers_dir,
            migrations_dir: args.migrations_dir,
            stubs_dir: args.stubs_dir,
        }
    }
}

impl From<HistoryArgs> for HistoryInput {
    fn from(args: HistoryArgs) -> Self {
        Self {
            backend: args.history_backend,
            file: args.history_file,
            database_url: args.database_url,
            tracking_table: None, // Table name comes from file only
        }
    }
}
