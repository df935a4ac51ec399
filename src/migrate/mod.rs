pub mod compose;
pub mod generation;

pub use compose::{ComposedMigration, MigrationPlan, compose, render_migration};
pub use generation::{MigrationGenerationInput, MigrationGenerationResult, generate_migration};
