pub mod definition;
pub mod snapshot;
pub mod spec;

pub use definition::SchemaDefinition;
pub use snapshot::SchemaSnapshot;
pub use spec::{ColumnSpec, SpecSyntax, SpecToken};
