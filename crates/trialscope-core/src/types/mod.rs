//! Types for the schema catalog.
//!
//! `input` holds the raw documents exactly as they are stored, `model` the
//! validated entities the loader builds from them, and `resource` the
//! addressing types used by the resolver.

mod input;
mod model;
mod resource;

pub use input::{
    ColumnInput, ForeignKeyInput, GlossaryDocument, GlossaryMappingInput, GlossaryTermInput,
    Nullability, PatternDocument, PatternInput, ProfileDocument, ProfileEntryInput,
    ProfileStatsInput, SchemaSnapshot, TableInput,
};
pub use model::{
    Column, ColumnProfile, ColumnRef, ForeignKey, GlossaryEntry, GlossaryMapping, JoinKind,
    ProfileKind, QueryPattern, Table, ValueCount,
};
pub use resource::{
    split_table_list, ResolvedResource, ResourceDescriptor, ResourceKey, ResourceRequest,
    TEXT_MIME_TYPE, URI_SCHEME,
};
