// Schema definition files
pub const SCHEMA_FILE_SUFFIX: &str = "Schema";
pub const SCHEMA_FILE_EXTENSION: &str = "yaml";
pub const SERIALIZER_FILE_EXTENSION: &str = "json";

// Configuration file name
pub const CONFIG_FILENAME: &str = "smooth.yaml";

// Default history table, mirrors the columns written by the file backend
pub const HISTORY_TABLE_NAME: &str = "smooth_migrations";

// Columns with dedicated drop statements
pub const SOFT_DELETES: &str = "softDeletes";
pub const TIMESTAMPS: &str = "timestamps";
pub const REMEMBER_TOKEN: &str = "rememberToken";

// Spec tokens with structural meaning
pub const MORPHS: &str = "morphs";
pub const NULLABLE_MORPHS: &str = "nullableMorphs";
pub const FOREIGN: &str = "foreign";
pub const FOREIGN_ON: &str = "on";
pub const FOREIGN_REFERENCES: &str = "references";
pub const FOREIGN_ON_DELETE: &str = "onDelete";
pub const FOREIGN_ON_UPDATE: &str = "onUpdate";
pub const DEFAULT_REFERENCE: &str = "id";
pub const PRIMARY: &str = "primary";
pub const UNIQUE: &str = "unique";
pub const INDEX: &str = "index";
pub const UNSIGNED: &str = "unsigned";
pub const CHANGE: &str = "change";
pub const INCREMENTS: &str = "increments";

// Parking name for columns caught in a rename cycle
pub const RENAME_TEMP_PREFIX: &str = "__tmp_";

// Migration file naming
pub const MIGRATION_FILE_EXTENSION: &str = "php";
pub const MIGRATION_TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

