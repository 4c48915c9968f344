use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trialscope"))
        .arg("--data-dir")
        .arg(bundled_data_dir())
        .args(args)
        .env_remove("AACT_DATABASE_URL")
        .env_remove("TRIALSCOPE_LOG")
        .output()
        .expect("run CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn reads_a_table_schema() {
    let output = run_cli(&["aact://schema/sponsors"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("CREATE TABLE ctgov.sponsors ("));
    assert!(text.contains("-- sponsors references:"));
}

#[test]
fn writes_json_envelopes_to_file() {
    let dir = tempdir().expect("temp dir");
    let output_path = dir.path().join("resources.json");

    let output = run_cli(&[
        "-f",
        "json",
        "-o",
        output_path.to_str().expect("output path"),
        "aact://tables",
        "aact://glossary",
    ]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let json: Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).expect("output exists"))
            .expect("valid JSON");
    let entries = json.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["uri"], "aact://tables");
    assert_eq!(entries[1]["uri"], "aact://glossary");
    assert!(entries[1]["estimatedTokens"].as_u64().unwrap() > 0);
}

#[test]
fn tables_flag_reads_a_targeted_subset() {
    let output = run_cli(&["--tables", "studies,outcomes,not_a_table"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("-- Targeted schema: 2 of 14 tables\n"));
    assert!(text.contains("CREATE TABLE ctgov.outcomes ("));
}

#[test]
fn unknown_table_exits_with_failure() {
    let output = run_cli(&["aact://schema/nonexistent_table"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("table 'nonexistent_table' not found"));
}

#[test]
fn failed_lookups_do_not_hide_the_others() {
    let output = run_cli(&["aact://nowhere", "aact://query-patterns"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("-- studies_by_phase"));
}

#[test]
fn lists_resources_without_arguments() {
    let output = run_cli(&[]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Source: static | 14 tables | 17 foreign keys"));
    assert!(text.contains("aact://column-profiles/{table}"));
}

#[test]
fn lists_resources_as_json() {
    let output = run_cli(&["--list", "-f", "json", "--compact"]);
    assert!(output.status.success());
    let json: Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    let descriptors = json.as_array().expect("array");
    assert_eq!(descriptors.len(), 9);
    assert!(descriptors.iter().all(|d| d["available"] == true));
}

#[test]
fn missing_data_dir_is_a_config_error() {
    let dir = tempdir().expect("temp dir");
    let output = Command::new(env!("CARGO_BIN_EXE_trialscope"))
        .arg("--data-dir")
        .arg(dir.path())
        .arg("aact://schema")
        .env_remove("AACT_DATABASE_URL")
        .output()
        .expect("run CLI");
    assert_eq!(output.status.code(), Some(66));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load schema catalog"));
    assert!(stderr.contains("aact_schema_static.json"));
}

#[test]
fn optional_documents_may_be_missing() {
    let dir = tempdir().expect("temp dir");
    std::fs::copy(
        bundled_data_dir().join("aact_schema_static.json"),
        dir.path().join("aact_schema_static.json"),
    )
    .expect("copy snapshot");

    let output = Command::new(env!("CARGO_BIN_EXE_trialscope"))
        .arg("--data-dir")
        .arg(dir.path())
        .args(["aact://schema/studies", "aact://glossary"])
        .env_remove("AACT_DATABASE_URL")
        .output()
        .expect("run CLI");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("CREATE TABLE ctgov.studies ("));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("resource 'glossary' is unavailable"));
}
