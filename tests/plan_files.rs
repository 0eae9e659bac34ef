//! Integration tests for plan and config files on disk.

use std::fs;

use pretty_assertions::assert_eq;
use schemashift::prelude::*;
use tempfile::TempDir;

const USERS_PLAN: &str = r#"
name = "users"
description = "Accounts and their audit trail"

[[change]]
kind = "create_table"
name = "users"

[[change.fields]]
name = "id"
type = "serial"
primary_key = true

[[change.fields]]
name = "email"
type = "varchar(255)"
allow_null = false
unique = true

[[change]]
kind = "insert_row"
table = "logs"
values = ["1", "'x'"]

[[change]]
kind = "add_column"
table = "users"
column = { name = "age", type = "integer" }
"#;

fn write_plan(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("20261017093005_users.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_plan_forward_script() {
    let dir = TempDir::new().unwrap();
    let plan = schemashift::load_plan(write_plan(&dir, USERS_PLAN)).unwrap();

    assert_eq!(plan.name.as_deref(), Some("users"));
    assert_eq!(
        plan.forward_statements(),
        vec![
            "CREATE TABLE users (id SERIAL PRIMARY KEY,email varchar(255) UNIQUE NOT NULL)",
            "INSERT INTO logs VALUES (1,'x')",
            "ALTER TABLE users ADD COLUMN age integer",
        ]
    );
}

#[test]
fn test_load_plan_revert_script() {
    let dir = TempDir::new().unwrap();
    let plan = schemashift::load_plan(write_plan(&dir, USERS_PLAN)).unwrap();

    match plan.revert_statements() {
        Err(ShiftError::Irreversible { index, .. }) => assert_eq!(index, 1),
        other => panic!("Expected irreversible insert, got {other:?}"),
    }

    let (statements, skipped) = plan.revert_statements_lossy();
    assert_eq!(
        statements,
        vec!["ALTER TABLE users DROP COLUMN age", "DROP TABLE users"]
    );
    assert_eq!(skipped, vec![1]);
}

#[test]
fn test_script_uses_config_terminator() {
    let dir = TempDir::new().unwrap();
    let plan = schemashift::load_plan(write_plan(&dir, USERS_PLAN)).unwrap();
    let config_path = dir.path().join("schemashift.toml");
    fs::write(&config_path, "terminator = \";;\"\n").unwrap();

    let config = Config::load(Some(config_path.as_path())).unwrap();
    let (statements, _) = plan.revert_statements_lossy();
    assert_eq!(
        config.script(&statements),
        "ALTER TABLE users DROP COLUMN age;;\nDROP TABLE users;;"
    );
}

#[test]
fn test_load_missing_plan() {
    let dir = TempDir::new().unwrap();
    let result = schemashift::load_plan(dir.path().join("missing.toml"));
    assert!(matches!(result, Err(ShiftError::Io(_))));
}

#[test]
fn test_load_plan_unknown_kind() {
    let dir = TempDir::new().unwrap();
    let path = write_plan(
        &dir,
        r#"
        [[change]]
        kind = "drop_table"
        name = "users"
        "#,
    );
    let err = schemashift::load_plan(path).unwrap_err();
    assert!(matches!(err, ShiftError::Plan(_)));
}

#[test]
fn test_load_plan_primary_key_with_reference() {
    let dir = TempDir::new().unwrap();
    let path = write_plan(
        &dir,
        r#"
        [[change]]
        kind = "create_table"
        name = "profiles"

        [[change.fields]]
        name = "user_id"
        type = "integer"
        primary_key = true
        references = { table = "users", field = "id" }
        "#,
    );
    let err = schemashift::load_plan(path).unwrap_err();
    assert!(
        err.to_string()
            .contains("primary key cannot also reference another table"),
        "{err}"
    );
}

#[test]
fn test_reference_actions_in_plan() {
    let plan = MigrationPlan::from_toml_str(
        r#"
        [[change]]
        kind = "add_column"
        table = "posts"

        [change.column]
        name = "author_id"
        type = "integer"
        references = { table = "users", field = "id", on_delete = "set null", on_update = "CASCADE" }
        "#,
    )
    .unwrap();

    assert_eq!(
        plan.forward_statements(),
        vec![
            "ALTER TABLE posts ADD COLUMN author_id integer REFERENCES users(id) ON DELETE SET NULL ON UPDATE CASCADE"
        ]
    );
}

#[test]
fn test_explain_json_shape() {
    let plan = MigrationPlan::from_toml_str(USERS_PLAN).unwrap();
    let json = serde_json::to_value(plan.render()).unwrap();

    assert_eq!(json[1]["kind"], "insert_row");
    assert_eq!(json[1]["revert"], serde_json::Value::Null);
    assert_eq!(json[2]["revert"], "ALTER TABLE users DROP COLUMN age");
}
