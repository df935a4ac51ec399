use crate::diff::changes::{ChangeRecord, ChangeSet};
use crate::diff::columns;
use crate::schema::{SchemaSnapshot, SpecSyntax};
use tracing::debug;

pub fn diff(previous: &SchemaSnapshot, current: &SchemaSnapshot, syntax: &SpecSyntax) -> ChangeSet {
    let mut set = ChangeSet::new(previous.clone(), current.clone());

    if previous.table != current.table {
        set.record(ChangeRecord::TableRename {
            from: previous.table.clone(),
            to: current.table.clone(),
        });
    }

    if previous.columns.len() == current.columns.len() {
        diff_positional(&mut set, previous, current, syntax);
    } else {
        diff_by_name(&mut set, previous, current, syntax);
    }

    set
}

/// Same column count: a name change at a position is a rename
fn diff_positional(
    set: &mut ChangeSet,
    previous: &SchemaSnapshot,
    current: &SchemaSnapshot,
    syntax: &SpecSyntax,
) {
    debug!("Comparing {} columns by position", current.columns.len());
    let pairs: Vec<_> = previous.columns.iter().zip(current.columns.iter()).collect();

    for ((old_name, _), (new_name, _)) in &pairs {
        if old_name != new_name {
            set.record(ChangeRecord::ColumnRename {
                from: old_name.to_string(),
                to: new_name.to_string(),
            });
        }
    }

    for ((_, old_spec), (new_name, new_spec)) in &pairs {
        for change in columns::diff(new_name, old_spec, new_spec, syntax) {
            set.record(change);
        }
    }
}

/// Different column count: renames cannot be told apart from drop + add
fn diff_by_name(
    set: &mut ChangeSet,
    previous: &SchemaSnapshot,
    current: &SchemaSnapshot,
    syntax: &SpecSyntax,
) {
    debug!(
        "Column count changed from {} to {}, comparing by name",
        previous.columns.len(),
        current.columns.len()
    );

    let dropped: Vec<_> = previous
        .columns
        .iter()
        .filter(|(name, _)| !current.columns.contains_key(*name))
        .collect();
    record_batch(
        set,
        dropped
            .iter()
            .flat_map(|(name, spec)| columns::dropped(name, spec, syntax)),
        dropped.len(),
        "Dropped",
    );

    let added: Vec<_> = current
        .columns
        .iter()
        .filter(|(name, _)| !previous.columns.contains_key(*name))
        .collect();
    record_batch(
        set,
        added
            .iter()
            .flat_map(|(name, spec)| columns::added(name, spec, syntax)),
        added.len(),
        "Added",
    );

    for (name, new_spec) in &current.columns {
        if let Some(old_spec) = previous.columns.get(name) {
            for change in columns::diff(name, old_spec, new_spec, syntax) {
                set.record(change);
            }
        }
    }
}

/// Adds and drops are logged once per pass; their cascades get their own line
fn record_batch(
    set: &mut ChangeSet,
    changes: impl Iterator<Item = ChangeRecord>,
    count: usize,
    verb: &str,
) {
    if count == 0 {
        return;
    }

    set.log(format!("{} Column(s) {}", count, verb));
    for change in changes {
        match change {
            ChangeRecord::ColumnAdd { .. } | ChangeRecord::ColumnDrop { .. } => {
                set.record_unlogged(change)
            }
            other => set.record(other),
        }
    }
}
