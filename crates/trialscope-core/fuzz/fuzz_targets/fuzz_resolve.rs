//! Fuzz target for URI parsing and resolution.
//!
//! Any string is either resolved or rejected with a `LookupError`; nothing panics.

#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use trialscope_core::{parse_document, ModelBuilder, ModelOptions, Resolver, SchemaModel, SchemaSnapshot};

const SNAPSHOT: &str = r#"{
    "tables": [
        {"table_name": "studies", "columns": [
            {"column_name": "nct_id", "data_type": "character varying", "is_nullable": "NO", "is_primary_key": true}
        ]},
        {"table_name": "outcomes", "columns": [
            {"column_name": "id", "data_type": "integer", "is_nullable": "NO", "is_primary_key": true},
            {"column_name": "nct_id", "data_type": "character varying", "is_nullable": "NO"}
        ]},
        {"table_name": "outcome_analyses", "columns": [
            {"column_name": "id", "data_type": "integer", "is_nullable": "NO", "is_primary_key": true},
            {"column_name": "outcome_id", "data_type": "integer"}
        ]}
    ],
    "foreign_keys": [
        {"child_table": "outcomes", "child_column": "nct_id", "parent_table": "studies", "parent_column": "nct_id"},
        {"child_table": "outcome_analyses", "child_column": "outcome_id", "parent_table": "outcomes", "parent_column": "id"}
    ]
}"#;

fn model() -> &'static SchemaModel {
    static MODEL: OnceLock<SchemaModel> = OnceLock::new();
    MODEL.get_or_init(|| {
        let snapshot: SchemaSnapshot = parse_document("fuzz", SNAPSHOT).unwrap();
        ModelBuilder::new(ModelOptions::default())
            .schema(snapshot)
            .build()
            .unwrap()
    })
}

fuzz_target!(|uri: &str| {
    let resolver = Resolver::new(model());
    let _ = resolver.resolve_uri(uri);
    let _ = resolver.resolve_subset(&uri.split(',').collect::<Vec<_>>());
});
