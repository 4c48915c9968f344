//! Fuzz target for document loading.
//!
//! Arbitrary document text must produce a model or a `LoadError`, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use trialscope_core::{
    parse_document, GlossaryDocument, ModelBuilder, ModelOptions, PatternDocument,
    ProfileDocument, SchemaSnapshot,
};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    schema: String,
    glossary: Option<String>,
    profiles: Option<String>,
    patterns: Option<String>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(snapshot) = parse_document::<SchemaSnapshot>("schema", &input.schema) else {
        return;
    };
    let glossary = input
        .glossary
        .and_then(|text| parse_document::<GlossaryDocument>("glossary", &text).ok());
    let profiles = input
        .profiles
        .and_then(|text| parse_document::<ProfileDocument>("profiles", &text).ok());
    let patterns = input
        .patterns
        .and_then(|text| parse_document::<PatternDocument>("patterns", &text).ok());

    let _ = ModelBuilder::new(ModelOptions::default())
        .schema(snapshot)
        .glossary(glossary)
        .profiles(profiles)
        .patterns(patterns)
        .build();
});
