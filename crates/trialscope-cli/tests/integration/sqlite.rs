//! SQLite integration tests for the live model source.
//!
//! These tests create temporary SQLite databases and verify the CLI reads
//! its schema from the database rather than the static snapshot.

use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use crate::{run_cli, run_cli_success};

/// A small registry: studies, conditions keyed by nct_id, and a results chain.
fn create_test_db(path: &Path) {
    let conn = Connection::open(path).expect("open sqlite db");

    conn.execute_batch(
        r#"
        CREATE TABLE studies (
            nct_id TEXT PRIMARY KEY,
            phase TEXT
        );

        CREATE TABLE conditions (
            id INTEGER PRIMARY KEY,
            nct_id TEXT NOT NULL REFERENCES studies(nct_id),
            name TEXT
        );

        CREATE TABLE outcomes (
            id INTEGER PRIMARY KEY,
            nct_id TEXT NOT NULL REFERENCES studies(nct_id),
            title TEXT
        );

        CREATE TABLE outcome_analyses (
            id INTEGER PRIMARY KEY,
            outcome_id INTEGER NOT NULL REFERENCES outcomes,
            p_value REAL
        );
        "#,
    )
    .expect("create test tables");
}

/// Data directory holding only an annotated snapshot for `studies`.
fn write_annotations(dir: &Path) {
    fs::write(
        dir.join("aact_schema_static.json"),
        r#"{
            "tables": [
                {"table_name": "studies", "domain": "Protocol", "rows_per_study": "1",
                 "description": "One row per registered trial.",
                 "columns": [
                    {"column_name": "nct_id", "data_type": "character varying", "is_nullable": "NO",
                     "is_primary_key": true, "description": "Registry identifier"}
                 ]}
            ],
            "foreign_keys": []
        }"#,
    )
    .expect("write snapshot");
}

#[test]
fn test_sqlite_schema_comes_from_the_database() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("aact.db");
    create_test_db(&db_path);
    write_annotations(dir.path());

    let url = format!("sqlite://{}", db_path.display());
    let output = run_cli_success(
        dir.path(),
        &["--metadata-url", &url, "aact://schema/outcome_analyses"],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("CREATE TABLE ctgov.outcome_analyses ("));
    // Implicit `REFERENCES outcomes` resolves to the parent's primary key.
    assert!(stdout.contains("--   outcome_analyses.outcome_id -> outcomes.id"));
}

#[test]
fn test_sqlite_relationships_are_classified() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("aact.db");
    create_test_db(&db_path);
    write_annotations(dir.path());

    let url = format!("sqlite://{}", db_path.display());
    let output = run_cli_success(dir.path(), &["--metadata-url", &url, "aact://relationships"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total: 3 relationships"));
    assert!(stdout.contains("  conditions.nct_id -> studies.nct_id\n"));
    let hierarchical = stdout
        .split("--- Hierarchical FK relationships ---")
        .nth(1)
        .expect("hierarchical section");
    assert!(hierarchical.contains("  outcome_analyses.outcome_id -> outcomes.id\n"));
}

#[test]
fn test_sqlite_annotations_are_overlaid() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("aact.db");
    create_test_db(&db_path);
    write_annotations(dir.path());

    let url = format!("sqlite://{}", db_path.display());
    let output = run_cli_success(dir.path(), &["--metadata-url", &url, "aact://schema/studies"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-- Registry identifier"));
    assert!(stdout.contains("-- One row per registered trial."));
    // Columns only the database knows about are still listed.
    assert!(stdout.contains("    phase text"));
}

#[test]
fn test_sqlite_source_is_reported() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("aact.db");
    create_test_db(&db_path);
    write_annotations(dir.path());

    let url = format!("sqlite://{}", db_path.display());
    let output = run_cli_success(dir.path(), &["--metadata-url", &url, "--list"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Source: live | 4 tables | 3 foreign keys"));
}

#[test]
fn test_unknown_table_from_live_schema() {
    let dir = tempdir().expect("create temp dir");
    let db_path = dir.path().join("aact.db");
    create_test_db(&db_path);
    write_annotations(dir.path());

    let url = format!("sqlite://{}", db_path.display());
    let output = run_cli(dir.path(), &["--metadata-url", &url, "aact://schema/sponsors"]);
    assert_eq!(output.status.code(), Some(1));
}
