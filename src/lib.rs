pub mod commands;
pub mod config;
pub mod constants;
pub mod diff;
pub mod error;
pub mod migrate;
pub mod migration_tracking;
pub mod prompts;
pub mod render;
pub mod schema;
pub mod schema_loader;
