use crate::helpers::project::snapshot;
use rstest::rstest;
use smooth_migrate::diff::{ChangeRecord, diff};

fn column_drop(name: &str) -> ChangeRecord {
    ChangeRecord::ColumnDrop {
        name: name.to_string(),
    }
}

#[test]
fn test_rename_with_definition_change() {
    let previous = snapshot("users", &[("id", "increments"), ("mail", "string")]);
    let current = snapshot("users", &[("id", "increments"), ("email", "string,unique")]);

    let changes = diff(&previous, &current);

    assert_eq!(
        changes.changes(),
        &[
            ChangeRecord::ColumnRename {
                from: "mail".to_string(),
                to: "email".to_string(),
            },
            ChangeRecord::DefinitionChange {
                column: "email".to_string(),
                previous_spec: "string".to_string(),
                current_spec: "string,unique".to_string(),
            },
        ]
    );
    assert_eq!(changes.renamed_from("email"), Some("mail"));
}

#[test]
fn test_dropped_foreign_and_morph_columns() {
    let previous = snapshot(
        "comments",
        &[
            ("id", "increments"),
            ("user_id", "integer,on:users"),
            ("commentable", "morphs"),
        ],
    );
    let current = snapshot("comments", &[("id", "increments")]);

    let changes = diff(&previous, &current);

    assert_eq!(
        changes.changes(),
        &[
            column_drop("user_id"),
            ChangeRecord::ForeignDrop {
                column: "user_id".to_string(),
            },
            column_drop("commentable"),
            ChangeRecord::MorphDrop {
                column: "commentable".to_string(),
            },
        ]
    );
    assert_eq!(
        changes.logs(),
        &[
            "2 Column(s) Dropped".to_string(),
            "Foreign key dropped on user_id".to_string(),
            "Morph columns dropped for commentable".to_string(),
        ]
    );
}

#[rstest]
#[case("integer,primary", "integer", ChangeRecord::PrimaryDrop { column: "code".to_string() })]
#[case("string,unique", "string", ChangeRecord::UniqueDrop { column: "code".to_string() })]
#[case("string,index", "string,nullable", ChangeRecord::IndexDrop { column: "code".to_string() })]
fn test_index_flag_removal(
    #[case] before: &str,
    #[case] after: &str,
    #[case] expected: ChangeRecord,
) {
    let previous = snapshot("codes", &[("code", before)]);
    let current = snapshot("codes", &[("code", after)]);

    let changes = diff(&previous, &current);

    assert_eq!(changes.changes().len(), 2);
    assert!(matches!(
        changes.changes()[0],
        ChangeRecord::DefinitionChange { .. }
    ));
    assert_eq!(changes.changes()[1], expected);
}

#[test]
fn test_token_order_is_not_a_change() {
    let previous = snapshot("posts", &[("title", "string,nullable,index")]);
    let current = snapshot("posts", &[("title", "string,index,nullable")]);

    assert!(!diff(&previous, &current).has_changed());
}

#[test]
fn test_implicit_reference_is_not_a_change() {
    let previous = snapshot("posts", &[("user_id", "integer,on:users")]);
    let current = snapshot("posts", &[("user_id", "integer,on:users,references:id")]);

    assert!(!diff(&previous, &current).has_changed());
}

#[test]
fn test_table_name_only_is_a_single_rename() {
    let previous = snapshot("posts", &[("id", "increments"), ("title", "string")]);
    let current = snapshot("articles", &[("id", "increments"), ("title", "string")]);

    let changes = diff(&previous, &current);

    assert!(changes.has_changed());
    assert_eq!(
        changes.changes(),
        &[ChangeRecord::TableRename {
            from: "posts".to_string(),
            to: "articles".to_string(),
        }]
    );
}

#[test]
fn test_swapped_columns_are_two_renames() {
    let previous = snapshot("posts", &[("a", "string"), ("b", "string")]);
    let current = snapshot("posts", &[("b", "string"), ("a", "string")]);

    let changes = diff(&previous, &current);

    assert_eq!(changes.changes().len(), 2);
    assert_eq!(changes.renamed_from("a"), Some("b"));
    assert_eq!(changes.renamed_from("b"), Some("a"));
}
