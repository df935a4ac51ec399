pub mod changes;
pub mod columns;
pub mod tables;

pub use changes::{ChangeRecord, ChangeSet};

use crate::schema::{SchemaSnapshot, SpecSyntax};
use tracing::info;

/// Diff two snapshots of the same schema using the default spec syntax
pub fn diff(previous: &SchemaSnapshot, current: &SchemaSnapshot) -> ChangeSet {
    diff_with_syntax(previous, current, &SpecSyntax::default())
}

pub fn diff_with_syntax(
    previous: &SchemaSnapshot,
    current: &SchemaSnapshot,
    syntax: &SpecSyntax,
) -> ChangeSet {
    info!("Diffing snapshots of {}...", current.table);
    let set = tables::diff(previous, current, syntax);
    info!("Found {} change(s)", set.changes().len());
    set
}
