#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::json;
use trialscope_core::{
    GlossaryDocument, ModelBuilder, ModelOptions, PatternDocument, ProfileDocument, SchemaModel,
    SchemaSnapshot,
};

/// The bundled document set shipped at the workspace root.
pub fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

/// `studies(nct_id PK, phase)` and `sponsors(id PK, study_id -> studies.nct_id, name)`.
pub fn two_table_snapshot() -> SchemaSnapshot {
    serde_json::from_value(json!({
        "tables": [
            {
                "table_name": "studies",
                "domain": "Protocol",
                "rows_per_study": "1",
                "description": "One row per registered trial.",
                "columns": [
                    {"column_name": "nct_id", "data_type": "character varying", "is_nullable": "NO", "is_primary_key": true},
                    {"column_name": "phase", "data_type": "character varying", "is_nullable": "YES"}
                ]
            },
            {
                "table_name": "sponsors",
                "domain": "Protocol",
                "rows_per_study": "many",
                "columns": [
                    {"column_name": "id", "data_type": "integer", "is_nullable": "NO", "is_primary_key": true},
                    {"column_name": "study_id", "data_type": "character varying", "is_nullable": "NO"},
                    {"column_name": "name", "data_type": "character varying", "is_nullable": "YES", "description": "Organization name"}
                ]
            }
        ],
        "foreign_keys": [
            {"child_table": "sponsors", "child_column": "study_id", "parent_table": "studies", "parent_column": "nct_id"}
        ]
    }))
    .unwrap()
}

/// Two-table model plus a hierarchical result chain hanging off `studies`.
pub fn results_snapshot() -> SchemaSnapshot {
    let mut snapshot = two_table_snapshot();
    let extra: SchemaSnapshot = serde_json::from_value(json!({
        "tables": [
            {
                "table_name": "conditions",
                "columns": [
                    {"column_name": "id", "data_type": "integer", "is_nullable": "NO", "is_primary_key": true},
                    {"column_name": "nct_id", "data_type": "character varying", "is_nullable": "NO"},
                    {"column_name": "name", "data_type": "character varying"}
                ]
            },
            {
                "table_name": "outcomes",
                "domain": "Results",
                "columns": [
                    {"column_name": "id", "data_type": "integer", "is_nullable": "NO", "is_primary_key": true},
                    {"column_name": "nct_id", "data_type": "character varying", "is_nullable": "NO"},
                    {"column_name": "title", "data_type": "text"}
                ]
            },
            {
                "table_name": "outcome_analyses",
                "domain": "Results",
                "columns": [
                    {"column_name": "id", "data_type": "integer", "is_nullable": "NO", "is_primary_key": true},
                    {"column_name": "outcome_id", "data_type": "integer", "is_nullable": "NO"},
                    {"column_name": "p_value", "data_type": "numeric"}
                ]
            }
        ],
        "foreign_keys": [
            {"child_table": "conditions", "child_column": "nct_id", "parent_table": "studies", "parent_column": "nct_id"},
            {"child_table": "outcomes", "child_column": "nct_id", "parent_table": "studies", "parent_column": "nct_id"},
            {"child_table": "outcome_analyses", "child_column": "outcome_id", "parent_table": "outcomes", "parent_column": "id"}
        ]
    }))
    .unwrap();
    snapshot.tables.extend(extra.tables);
    snapshot.foreign_keys.extend(extra.foreign_keys);
    snapshot
}

pub fn glossary() -> GlossaryDocument {
    serde_json::from_value(json!({
        "terms": [
            {
                "term": "sponsor",
                "definition": "Organization responsible for the study.",
                "mappings": [{"table": "sponsors", "column": "name"}],
                "warning": "Several sponsors may be listed per study."
            }
        ]
    }))
    .unwrap()
}

pub fn profiles() -> ProfileDocument {
    serde_json::from_value(json!({
        "table_row_counts": {"studies": 1000},
        "profiles": {
            "studies.phase": {
                "table": "studies", "column": "phase", "profile_type": "enum",
                "n_distinct": 3, "n_null": 5,
                "values": {"PHASE1": 100, "PHASE2": 300, "NA": 595}
            },
            "studies.nct_id": {
                "table": "studies", "column": "nct_id", "profile_type": "sample",
                "n_distinct": 1000, "n_null": 0,
                "sample_values": ["NCT00000102", "NCT00000104"]
            }
        }
    }))
    .unwrap()
}

pub fn patterns() -> PatternDocument {
    serde_json::from_value(json!({
        "patterns": [
            {
                "name": "sponsors_per_phase",
                "description": "How many sponsors back trials in each phase?",
                "sql": "SELECT s.phase, COUNT(*) FROM ctgov.studies s JOIN ctgov.sponsors sp ON sp.study_id = s.nct_id GROUP BY s.phase"
            }
        ]
    }))
    .unwrap()
}

pub fn build(snapshot: SchemaSnapshot) -> SchemaModel {
    ModelBuilder::new(ModelOptions::default())
        .schema(snapshot)
        .build()
        .unwrap()
}

/// Model with every optional collection loaded.
pub fn full_model() -> SchemaModel {
    ModelBuilder::new(ModelOptions::default())
        .schema(results_snapshot())
        .glossary(Some(glossary()))
        .profiles(Some(profiles()))
        .patterns(Some(patterns()))
        .build()
        .unwrap()
}
