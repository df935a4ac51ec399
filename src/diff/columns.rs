use crate::constants::{INDEX, PRIMARY, UNIQUE};
use crate::diff::changes::ChangeRecord;
use crate::schema::{ColumnSpec, SpecSyntax};

/// Diff the spec of a column present in both snapshots
pub fn diff(
    column: &str,
    previous_spec: &str,
    current_spec: &str,
    syntax: &SpecSyntax,
) -> Vec<ChangeRecord> {
    let previous = ColumnSpec::parse(previous_spec, syntax);
    let current = ColumnSpec::parse(current_spec, syntax);

    if !previous.differs_from(&current) {
        return Vec::new();
    }

    let mut changes = vec![ChangeRecord::DefinitionChange {
        column: column.to_string(),
        previous_spec: previous_spec.to_string(),
        current_spec: current_spec.to_string(),
    }];

    match (previous.foreign_part(), current.foreign_part()) {
        (None, Some(_)) => changes.push(ChangeRecord::ForeignAdd {
            column: column.to_string(),
        }),
        (Some(_), None) => changes.push(ChangeRecord::ForeignDrop {
            column: column.to_string(),
        }),
        // A redefined constraint has to be dropped and added again
        (Some(old_fk), Some(new_fk)) if old_fk.differs_from(&new_fk) => {
            changes.push(ChangeRecord::ForeignDrop {
                column: column.to_string(),
            });
            changes.push(ChangeRecord::ForeignAdd {
                column: column.to_string(),
            });
        }
        _ => {}
    }

    let flags: [(&str, fn(String) -> ChangeRecord); 3] = [
        (PRIMARY, |column| ChangeRecord::PrimaryDrop { column }),
        (UNIQUE, |column| ChangeRecord::UniqueDrop { column }),
        (INDEX, |column| ChangeRecord::IndexDrop { column }),
    ];
    for (flag, record) in flags {
        if previous.has(flag) && !current.has(flag) {
            changes.push(record(column.to_string()));
        }
    }

    changes
}

/// Records for a column that only exists in the previous snapshot
pub fn dropped(name: &str, spec: &str, syntax: &SpecSyntax) -> Vec<ChangeRecord> {
    let parsed = ColumnSpec::parse(spec, syntax);
    let mut changes = vec![ChangeRecord::ColumnDrop {
        name: name.to_string(),
    }];

    if parsed.has_foreign() {
        changes.push(ChangeRecord::ForeignDrop {
            column: name.to_string(),
        });
    }
    if parsed.is_morph() {
        changes.push(ChangeRecord::MorphDrop {
            column: name.to_string(),
        });
    }

    changes
}

/// Records for a column that only exists in the current snapshot
pub fn added(name: &str, spec: &str, syntax: &SpecSyntax) -> Vec<ChangeRecord> {
    let parsed = ColumnSpec::parse(spec, syntax);
    let mut changes = vec![ChangeRecord::ColumnAdd {
        name: name.to_string(),
    }];

    if parsed.has_foreign() {
        changes.push(ChangeRecord::ForeignAdd {
            column: name.to_string(),
        });
    }

    changes
}
