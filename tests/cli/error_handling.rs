//! CLI error handling tests
//!
//! Tests that verify smooth fails with a helpful message for common mistakes.

use crate::helpers::cli::with_cli_helper;
use anyhow::Result;
use predicates::prelude::*;
use std::fs;

/// Test that invalid YAML in the config file gives a helpful error
#[tokio::test]
async fn test_invalid_config_yaml_error() -> Result<()> {
    with_cli_helper(async |helper| {
        fs::write(
            helper.root().join("smooth.yaml"),
            "invalid: yaml: content: [unbalanced",
        )?;

        helper
            .command()
            .arg("make")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse config file"));

        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_circular_run_first_error() -> Result<()> {
    with_cli_helper(async |helper| {
        helper.init_project()?;
        helper.write_schema("PostsSchema", "table: posts\nrun_first: [UsersSchema]\n")?;
        helper.write_schema("UsersSchema", "table: users\nrun_first: [PostsSchema]\n")?;

        helper
            .command()
            .arg("make")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Circular run-first reference"));

        // Nothing is composed when ordering fails
        assert!(helper.migration_files()?.is_empty());
        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_correct_unknown_schema_error() -> Result<()> {
    with_cli_helper(async |helper| {
        helper.init_project()?;
        helper.write_schema("PostsSchema", "table: posts\n")?;

        helper
            .command()
            .args(["make", "--correct", "comments"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cannot correct CommentsSchema"));

        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_invalid_correction_offset_error() -> Result<()> {
    with_cli_helper(async |helper| {
        helper.init_project()?;

        helper
            .command()
            .args(["make", "--correct", "posts.zero"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid correction offset"));

        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_postgres_backend_without_url_error() -> Result<()> {
    with_cli_helper(async |helper| {
        helper.init_project()?;

        helper
            .command()
            .args(["install", "--history-backend", "postgres"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("database URL"));

        Ok(())
    })
    .await
}

#[tokio::test]
async fn test_invalid_schema_definition_error() -> Result<()> {
    with_cli_helper(async |helper| {
        helper.init_project()?;
        helper.write_schema("PostsSchema", "table: posts\nunknown_flag: true\n")?;

        helper
            .command()
            .arg("make")
            .assert()
            .failure()
            .stderr(predicate::str::contains("PostsSchema"));

        Ok(())
    })
    .await
}
