//! The immutable catalog aggregate.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{
    ColumnProfile, ForeignKey, GlossaryEntry, JoinKind, QueryPattern, ResourceKey, Table,
};

/// Domain conventions the loader and renderers depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelOptions {
    /// Namespace used in rendered DDL and as the default `table_schema`
    pub schema_name: String,

    /// The universal record identifier every identifier join is keyed on
    pub identifier_column: String,

    /// Table holding one row per identifier
    pub root_table: String,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            schema_name: "ctgov".to_string(),
            identifier_column: "nct_id".to_string(),
            root_table: "studies".to_string(),
        }
    }
}

impl ModelOptions {
    /// Classifies an edge by its endpoint columns.
    pub fn classify(&self, source_column: &str, target_column: &str) -> JoinKind {
        if source_column == self.identifier_column || target_column == self.identifier_column {
            JoinKind::Identifier
        } else {
            JoinKind::Hierarchical
        }
    }
}

/// Column profiles grouped by table, plus the row counts taken while profiling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSet {
    by_table: BTreeMap<String, BTreeMap<String, ColumnProfile>>,
    row_counts: BTreeMap<String, u64>,
}

impl ProfileSet {
    pub(crate) fn new(
        by_table: BTreeMap<String, BTreeMap<String, ColumnProfile>>,
        row_counts: BTreeMap<String, u64>,
    ) -> Self {
        Self {
            by_table,
            row_counts,
        }
    }

    /// Profiles of one table keyed by column name, if any column was profiled.
    pub fn for_table(&self, table: &str) -> Option<&BTreeMap<String, ColumnProfile>> {
        self.by_table.get(table).filter(|columns| !columns.is_empty())
    }

    pub fn get(&self, table: &str, column: &str) -> Option<&ColumnProfile> {
        self.by_table.get(table)?.get(column)
    }

    pub fn row_count(&self, table: &str) -> Option<u64> {
        self.row_counts.get(table).copied()
    }

    /// Profiled tables in name order, with their profiled column counts.
    pub fn tables(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_table
            .iter()
            .filter(|(_, columns)| !columns.is_empty())
            .map(|(table, columns)| (table.as_str(), columns.len()))
    }

    pub fn column_count(&self) -> usize {
        self.by_table.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.column_count() == 0
    }
}

/// Counts exposed to health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub tables: usize,
    pub foreign_keys: usize,
    /// `None` when the glossary was not loaded
    pub glossary_terms: Option<usize>,
    pub profiled_columns: Option<usize>,
    pub query_patterns: Option<usize>,
}

/// The aggregate root: tables, foreign keys and the optional reference collections.
///
/// Built once by [`crate::ModelBuilder`] and never mutated, so a shared
/// reference can serve any number of concurrent readers.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    options: ModelOptions,
    tables: BTreeMap<String, Table>,
    foreign_keys: Vec<ForeignKey>,
    glossary: Option<Vec<GlossaryEntry>>,
    profiles: Option<ProfileSet>,
    patterns: Option<Vec<QueryPattern>>,
}

impl SchemaModel {
    pub(crate) fn new(
        options: ModelOptions,
        tables: BTreeMap<String, Table>,
        foreign_keys: Vec<ForeignKey>,
        glossary: Option<Vec<GlossaryEntry>>,
        profiles: Option<ProfileSet>,
        patterns: Option<Vec<QueryPattern>>,
    ) -> Self {
        Self {
            options,
            tables,
            foreign_keys,
            glossary,
            profiles,
            patterns,
        }
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Foreign keys sorted by source then target.
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Outgoing edges of `table`, in sorted order.
    pub fn foreign_keys_from<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ForeignKey> {
        self.foreign_keys
            .iter()
            .filter(move |fk| fk.source.table == table)
    }

    /// Incoming edges of `table`, in sorted order.
    pub fn foreign_keys_to<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ForeignKey> {
        self.foreign_keys
            .iter()
            .filter(move |fk| fk.target.table == table)
    }

    pub fn glossary(&self) -> Option<&[GlossaryEntry]> {
        self.glossary.as_deref()
    }

    pub fn profiles(&self) -> Option<&ProfileSet> {
        self.profiles.as_ref()
    }

    pub fn patterns(&self) -> Option<&[QueryPattern]> {
        self.patterns.as_deref()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn foreign_key_count(&self) -> usize {
        self.foreign_keys.len()
    }

    pub fn column_count(&self) -> usize {
        self.tables.values().map(|t| t.columns.len()).sum()
    }

    /// Readiness flag for health checks.
    pub fn is_ready(&self) -> bool {
        !self.tables.is_empty()
    }

    /// Whether the collection backing `key` was loaded.
    pub fn is_available(&self, key: ResourceKey) -> bool {
        match key {
            ResourceKey::Glossary => self.glossary.is_some(),
            ResourceKey::ColumnProfileSummary | ResourceKey::ColumnProfileTable => {
                self.profiles.is_some()
            }
            ResourceKey::QueryPatterns => self.patterns.is_some(),
            _ => true,
        }
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            tables: self.table_count(),
            foreign_keys: self.foreign_key_count(),
            glossary_terms: self.glossary.as_ref().map(Vec::len),
            profiled_columns: self.profiles.as_ref().map(ProfileSet::column_count),
            query_patterns: self.patterns.as_ref().map(Vec::len),
        }
    }
}
