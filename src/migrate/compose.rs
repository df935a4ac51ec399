//! Translation of change sets into migration statements
//!
//! A create plan renders every column of the current snapshot. An update plan
//! walks the change records in a fixed kind order; every record contributes
//! its forward statements to the up body and its inverse statements to the
//! down body. Down statements are emitted in reverse kind order so the down
//! body undoes the up body step by step.

use crate::constants::{CHANGE, REMEMBER_TOKEN, RENAME_TEMP_PREFIX, SOFT_DELETES, TIMESTAMPS};
use crate::diff::{ChangeRecord, ChangeSet};
use crate::error::Result;
use crate::render::template::BODY_INDENT;
use crate::render::{
    MigrationAction, RenderedStatement, StubContext, Stubs, escape_string, render_chain,
    render_column, render_method,
};
use crate::schema::{ColumnSpec, SchemaSnapshot, SpecSyntax};
use itertools::Itertools;

/// What a migration has to do for one schema
#[derive(Debug, Clone)]
pub enum MigrationPlan {
    /// No earlier snapshot exists: create the table from scratch
    Create { snapshot: SchemaSnapshot },
    /// Alter the table according to a diff
    Update { changes: ChangeSet },
}

impl MigrationPlan {
    pub fn action(&self) -> MigrationAction {
        match self {
            MigrationPlan::Create { .. } => MigrationAction::Create,
            MigrationPlan::Update { .. } => MigrationAction::Update,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComposedMigration {
    pub action: MigrationAction,
    pub up: Vec<RenderedStatement>,
    pub down: Vec<RenderedStatement>,
    pub table_rename: Option<(String, String)>,
}

impl ComposedMigration {
    pub fn up_body(&self) -> String {
        join_statements(&self.up)
    }

    pub fn down_body(&self) -> String {
        join_statements(&self.down)
    }

    pub fn has_destructive(&self) -> bool {
        self.up.iter().any(RenderedStatement::is_destructive)
    }
}

fn join_statements(statements: &[RenderedStatement]) -> String {
    statements
        .iter()
        .map(|s| s.php.as_str())
        .join(&format!("\n{}", BODY_INDENT))
}

pub fn compose(plan: &MigrationPlan, table: &str, syntax: &SpecSyntax) -> ComposedMigration {
    match plan {
        MigrationPlan::Create { snapshot } => compose_create(snapshot, syntax),
        MigrationPlan::Update { changes } => UpdateComposer {
            changes,
            table,
            syntax,
        }
        .compose(),
    }
}

/// Render a composed migration into its stub
pub fn render_migration(
    composed: &ComposedMigration,
    class: &str,
    table: &str,
    stubs: &Stubs,
) -> Result<String> {
    let (rename_up, rename_down) = match &composed.table_rename {
        Some((from, to)) => (rename_table(from, to), rename_table(to, from)),
        None => (String::new(), String::new()),
    };

    let context = StubContext {
        class: class.to_string(),
        table: table.to_string(),
        up: composed.up_body(),
        down: composed.down_body(),
        rename_up,
        rename_down,
    };

    stubs.render(composed.action, &context)
}

fn rename_table(from: &str, to: &str) -> String {
    format!(
        "        Schema::rename({}, {});\n",
        escape_string(from),
        escape_string(to)
    )
}

fn compose_create(snapshot: &SchemaSnapshot, syntax: &SpecSyntax) -> ComposedMigration {
    let mut up = Vec::new();
    let mut foreign = Vec::new();

    for (column, spec) in &snapshot.columns {
        let (statement, foreign_statement) = render_column(column, &ColumnSpec::parse(spec, syntax));
        up.push(RenderedStatement::new(statement));
        foreign.extend(foreign_statement.map(RenderedStatement::new));
    }

    // Constraints go last so every referenced column already exists
    up.extend(foreign);

    ComposedMigration {
        action: MigrationAction::Create,
        up,
        down: Vec::new(),
        table_rename: None,
    }
}

/// Number of kind groups in an update migration
const KIND_COUNT: usize = 8;

const RENAME_RANK: usize = 7;

/// Position of a record's kind in the up body, `None` for table renames
/// which live outside the table block.
fn kind_rank(change: &ChangeRecord) -> Option<usize> {
    match change {
        ChangeRecord::PrimaryDrop { .. }
        | ChangeRecord::UniqueDrop { .. }
        | ChangeRecord::IndexDrop { .. } => Some(0),
        ChangeRecord::DefinitionChange { .. } => Some(1),
        ChangeRecord::ColumnAdd { .. } => Some(2),
        ChangeRecord::ForeignDrop { .. } => Some(3),
        ChangeRecord::ForeignAdd { .. } => Some(4),
        ChangeRecord::MorphDrop { .. } => Some(5),
        ChangeRecord::ColumnDrop { .. } => Some(6),
        ChangeRecord::ColumnRename { .. } => Some(RENAME_RANK),
        ChangeRecord::TableRename { .. } => None,
    }
}

type Statements = Vec<RenderedStatement>;

struct UpdateComposer<'a> {
    changes: &'a ChangeSet,
    table: &'a str,
    syntax: &'a SpecSyntax,
}

impl UpdateComposer<'_> {
    fn compose(&self) -> ComposedMigration {
        let mut up = Vec::new();
        let mut down_groups: Vec<Statements> = vec![Vec::new(); KIND_COUNT];

        let ordered = self
            .changes
            .changes()
            .iter()
            .filter_map(|change| kind_rank(change).map(|rank| (rank, change)))
            .sorted_by_key(|(rank, _)| *rank);

        for (rank, change) in ordered {
            let (forward, inverse) = self.translate(change);
            up.extend(forward);
            down_groups[rank].extend(inverse);
        }

        let (forward, inverse) = self.renames();
        up.extend(forward);
        down_groups[RENAME_RANK] = inverse;

        ComposedMigration {
            action: MigrationAction::Update,
            up,
            down: down_groups.into_iter().rev().flatten().collect(),
            table_rename: self
                .changes
                .table_rename()
                .map(|(from, to)| (from.to_string(), to.to_string())),
        }
    }

    fn translate(&self, change: &ChangeRecord) -> (Statements, Statements) {
        match change {
            ChangeRecord::DefinitionChange {
                column,
                previous_spec,
                current_spec,
            } => {
                let name = self.original_name(column);
                (
                    vec![self.change_statement(name, current_spec)],
                    vec![self.change_statement(name, previous_spec)],
                )
            }
            ChangeRecord::ColumnAdd { name } => {
                let spec = self.parse(self.current_spec(name));
                (
                    vec![RenderedStatement::new(render_column(name, &spec).0)],
                    vec![RenderedStatement::destructive(drop_statement(name, &spec))],
                )
            }
            ChangeRecord::ColumnDrop { name } => {
                let spec = self.parse(self.previous_spec(name));
                // Morph columns are dropped through their MorphDrop record
                if spec.is_morph() {
                    return (Vec::new(), Vec::new());
                }
                (
                    vec![RenderedStatement::destructive(drop_statement(name, &spec))],
                    vec![RenderedStatement::new(render_column(name, &spec).0)],
                )
            }
            ChangeRecord::ForeignAdd { column } => {
                let name = self.original_name(column);
                let spec = self.parse(self.current_spec(column));
                (
                    render_column(name, &spec)
                        .1
                        .map(RenderedStatement::new)
                        .into_iter()
                        .collect(),
                    vec![self.drop_index("dropForeign", name, "foreign")],
                )
            }
            ChangeRecord::ForeignDrop { column } => {
                let name = self.original_name(column);
                let spec = self.parse(self.previous_spec(name));
                (
                    vec![self.drop_index("dropForeign", name, "foreign")],
                    render_column(name, &spec)
                        .1
                        .map(RenderedStatement::new)
                        .into_iter()
                        .collect(),
                )
            }
            ChangeRecord::MorphDrop { column } => {
                let spec = self.parse(self.previous_spec(column));
                (
                    vec![RenderedStatement::destructive(render_method(
                        "dropMorphs",
                        [column.as_str()],
                    ))],
                    vec![RenderedStatement::new(render_column(column, &spec).0)],
                )
            }
            // The index comes back with the previous definition's change statement
            ChangeRecord::PrimaryDrop { column } => (
                vec![self.drop_index("dropPrimary", self.original_name(column), "primary")],
                Vec::new(),
            ),
            ChangeRecord::UniqueDrop { column } => (
                vec![self.drop_index("dropUnique", self.original_name(column), "unique")],
                Vec::new(),
            ),
            ChangeRecord::IndexDrop { column } => (
                vec![self.drop_index("dropIndex", self.original_name(column), "index")],
                Vec::new(),
            ),
            // Renames depend on each other and are sequenced together
            ChangeRecord::ColumnRename { .. } | ChangeRecord::TableRename { .. } => {
                (Vec::new(), Vec::new())
            }
        }
    }

    /// Rename statements in an order that never targets a name still in use.
    /// The down body replays the same steps backwards.
    fn renames(&self) -> (Statements, Statements) {
        let renames: Vec<(&str, &str)> = self
            .changes
            .changes()
            .iter()
            .filter_map(|change| match change {
                ChangeRecord::ColumnRename { from, to } => Some((from.as_str(), to.as_str())),
                _ => None,
            })
            .collect();

        let steps = rename_steps(&renames);
        let up = steps
            .iter()
            .map(|(from, to)| rename_column(from, to))
            .collect();
        let down = steps
            .iter()
            .rev()
            .map(|(from, to)| rename_column(to, from))
            .collect();
        (up, down)
    }

    /// Name of the column before this migration's renames run
    fn original_name<'a>(&'a self, column: &'a str) -> &'a str {
        self.changes.renamed_from(column).unwrap_or(column)
    }

    fn previous_spec(&self, column: &str) -> &str {
        self.changes.previous().spec(column).unwrap_or_default()
    }

    fn current_spec(&self, column: &str) -> &str {
        self.changes.current().spec(column).unwrap_or_default()
    }

    fn parse(&self, spec: &str) -> ColumnSpec {
        ColumnSpec::parse(spec, self.syntax)
    }

    fn change_statement(&self, column: &str, spec: &str) -> RenderedStatement {
        let (column_part, _) = self.parse(spec).split_foreign();
        RenderedStatement::new(format!(
            "{}->{}();",
            render_chain(column, column_part.tokens()),
            CHANGE
        ))
    }

    fn drop_index(&self, method: &str, column: &str, kind: &str) -> RenderedStatement {
        let index = format!("{}_{}_{}", self.table, column, kind);
        RenderedStatement::new(render_method(method, [index.as_str()]))
    }
}

/// Sequence renames so each one runs once its target name is free. A chain
/// `a -> b, b -> c` runs back to front; a cycle parks one column under a
/// temporary name until the rest of the cycle has moved.
fn rename_steps(renames: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut pending: Vec<(String, String)> = renames
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();
    let mut steps = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let ready = pending
            .iter()
            .position(|(_, to)| !pending.iter().any(|(from, _)| from == to));

        match ready {
            Some(index) => steps.push(pending.remove(index)),
            None => {
                let from = &mut pending[0].0;
                let parked = format!("{}{}", RENAME_TEMP_PREFIX, from);
                steps.push((from.clone(), parked.clone()));
                *from = parked;
            }
        }
    }

    steps
}

fn rename_column(from: &str, to: &str) -> RenderedStatement {
    RenderedStatement::new(render_method("renameColumn", [from, to]))
}

/// Drop statement for a column, using the dedicated forms for columns that
/// expand to more than one database column.
fn drop_statement(column: &str, spec: &ColumnSpec) -> String {
    let builder = spec.builder().unwrap_or(column);
    let args: Vec<&str> = if builder == column {
        Vec::new()
    } else {
        vec![column]
    };

    match builder {
        SOFT_DELETES => render_method("dropSoftDeletes", args),
        TIMESTAMPS => render_method("dropTimestamps", args),
        REMEMBER_TOKEN => render_method("dropRememberToken", args),
        _ if spec.is_morph() => render_method("dropMorphs", [column]),
        _ => render_method("dropColumn", [column]),
    }
}
