//! Model Loader: validates raw documents and builds a [`SchemaModel`].
//!
//! Every referential-integrity check runs here. A model that comes out of
//! [`ModelBuilder::build`] never needs to be re-validated at lookup time.

mod source;
#[cfg(feature = "sql-validation")]
mod sql;

pub use source::{
    ModelSource, StaticSource, GLOSSARY_DOCUMENT, PATTERNS_DOCUMENT, PROFILES_DOCUMENT,
    SCHEMA_DOCUMENT,
};

use std::collections::{BTreeMap, HashSet};

use serde::de::DeserializeOwned;
#[cfg(feature = "tracing")]
use tracing::{info, warn};

use crate::error::LoadError;
use crate::model::{ModelOptions, ProfileSet, SchemaModel};
use crate::types::{
    Column, ColumnProfile, ColumnRef, ForeignKey, GlossaryDocument, GlossaryEntry,
    GlossaryMapping, PatternDocument, ProfileDocument, ProfileKind, ProfileStatsInput,
    QueryPattern, SchemaSnapshot, Table, ValueCount,
};

/// Parses one JSON document, reporting syntax and shape errors as
/// [`LoadError::MalformedInput`] with the offending position.
pub fn parse_document<T: DeserializeOwned>(document: &str, text: &str) -> Result<T, LoadError> {
    serde_json::from_str(text).map_err(|e| {
        LoadError::malformed(
            document,
            format!("line {} column {}", e.line(), e.column()),
            e.to_string(),
        )
    })
}

/// Collects the input documents and validates them into a [`SchemaModel`].
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    options: ModelOptions,
    schema_label: String,
    schema: Option<SchemaSnapshot>,
    glossary: Option<GlossaryDocument>,
    profiles: Option<ProfileDocument>,
    patterns: Option<PatternDocument>,
}

impl ModelBuilder {
    pub fn new(options: ModelOptions) -> Self {
        Self {
            options,
            schema_label: SCHEMA_DOCUMENT.to_string(),
            schema: None,
            glossary: None,
            profiles: None,
            patterns: None,
        }
    }

    pub fn schema(mut self, snapshot: SchemaSnapshot) -> Self {
        self.schema = Some(snapshot);
        self
    }

    /// Names the structural snapshot in error messages (defaults to the file name).
    pub fn schema_label(mut self, label: impl Into<String>) -> Self {
        self.schema_label = label.into();
        self
    }

    pub fn glossary(mut self, glossary: Option<GlossaryDocument>) -> Self {
        self.glossary = glossary;
        self
    }

    pub fn profiles(mut self, profiles: Option<ProfileDocument>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn patterns(mut self, patterns: Option<PatternDocument>) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn build(self) -> Result<SchemaModel, LoadError> {
        let snapshot = self.schema.ok_or_else(|| {
            LoadError::malformed(&self.schema_label, "tables", "schema snapshot is required")
        })?;
        let tables = build_tables(&self.schema_label, &self.options, &snapshot)?;
        let foreign_keys = build_foreign_keys(&self.schema_label, &self.options, &snapshot, &tables)?;
        let glossary = self
            .glossary
            .map(|doc| build_glossary(&doc, &tables))
            .transpose()?;
        let profiles = self
            .profiles
            .map(|doc| build_profiles(doc, &tables))
            .transpose()?;
        let patterns = self
            .patterns
            .map(|doc| build_patterns(doc, &tables))
            .transpose()?;

        #[cfg(feature = "tracing")]
        info!(
            tables = tables.len(),
            foreign_keys = foreign_keys.len(),
            glossary_terms = glossary.as_ref().map(Vec::len),
            profiled_columns = profiles.as_ref().map(ProfileSet::column_count),
            query_patterns = patterns.as_ref().map(Vec::len),
            "schema model loaded"
        );

        Ok(SchemaModel::new(
            self.options,
            tables,
            foreign_keys,
            glossary,
            profiles,
            patterns,
        ))
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn build_tables(
    document: &str,
    options: &ModelOptions,
    snapshot: &SchemaSnapshot,
) -> Result<BTreeMap<String, Table>, LoadError> {
    if snapshot.tables.is_empty() {
        return Err(LoadError::malformed(
            document,
            "tables",
            "snapshot contains no tables",
        ));
    }

    let mut tables = BTreeMap::new();
    for (i, input) in snapshot.tables.iter().enumerate() {
        let name = input.table_name.trim();
        if name.is_empty() {
            return Err(LoadError::malformed(
                document,
                format!("tables[{i}].table_name"),
                "table name is empty",
            ));
        }
        if tables.contains_key(name) {
            return Err(LoadError::malformed(
                document,
                format!("tables[{i}].table_name"),
                format!("duplicate table '{name}'"),
            ));
        }

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(input.columns.len());
        for (j, column) in input.columns.iter().enumerate() {
            let field = |leaf: &str| format!("tables[{i}].columns[{j}].{leaf}");
            let column_name = column.column_name.trim();
            if column_name.is_empty() {
                return Err(LoadError::malformed(
                    document,
                    field("column_name"),
                    "column name is empty",
                ));
            }
            if !seen.insert(column_name) {
                return Err(LoadError::malformed(
                    document,
                    field("column_name"),
                    format!("duplicate column '{column_name}' in table '{name}'"),
                ));
            }
            let data_type = column.data_type.trim();
            if data_type.is_empty() {
                return Err(LoadError::malformed(
                    document,
                    field("data_type"),
                    "data type is empty",
                ));
            }
            let nullable = column.is_nullable.as_bool().ok_or_else(|| {
                LoadError::malformed(
                    document,
                    field("is_nullable"),
                    "expected YES, NO or a boolean",
                )
            })?;
            columns.push(Column {
                name: column_name.to_string(),
                data_type: data_type.to_string(),
                nullable,
                primary_key: column.is_primary_key,
                description: non_blank(column.description.as_deref()),
            });
        }

        tables.insert(
            name.to_string(),
            Table {
                name: name.to_string(),
                schema: non_blank(input.table_schema.as_deref())
                    .unwrap_or_else(|| options.schema_name.clone()),
                description: non_blank(input.description.as_deref()),
                domain: non_blank(input.domain.as_deref()),
                cardinality: non_blank(input.rows_per_study.as_deref()),
                columns,
            },
        );
    }
    Ok(tables)
}

fn check_column(
    document: &str,
    field: &str,
    tables: &BTreeMap<String, Table>,
    table: &str,
    column: &str,
) -> Result<(), LoadError> {
    let Some(found) = tables.get(table) else {
        return Err(LoadError::malformed(
            document,
            format!("{field}.table"),
            format!("table '{table}' does not exist"),
        ));
    };
    if !found.has_column(column) {
        return Err(LoadError::malformed(
            document,
            format!("{field}.column"),
            format!("column '{table}.{column}' does not exist"),
        ));
    }
    Ok(())
}

fn build_foreign_keys(
    document: &str,
    options: &ModelOptions,
    snapshot: &SchemaSnapshot,
    tables: &BTreeMap<String, Table>,
) -> Result<Vec<ForeignKey>, LoadError> {
    let mut foreign_keys = Vec::with_capacity(snapshot.foreign_keys.len());
    for (k, input) in snapshot.foreign_keys.iter().enumerate() {
        let endpoints = [
            ("child", input.child_table.trim(), input.child_column.trim()),
            ("parent", input.parent_table.trim(), input.parent_column.trim()),
        ];
        for (side, table, column) in endpoints {
            let Some(found) = tables.get(table) else {
                return Err(LoadError::malformed(
                    document,
                    format!("foreign_keys[{k}].{side}_table"),
                    format!("table '{table}' does not exist"),
                ));
            };
            if !found.has_column(column) {
                return Err(LoadError::malformed(
                    document,
                    format!("foreign_keys[{k}].{side}_column"),
                    format!("column '{table}.{column}' does not exist"),
                ));
            }
        }

        let source = ColumnRef::new(input.child_table.trim(), input.child_column.trim());
        let target = ColumnRef::new(input.parent_table.trim(), input.parent_column.trim());
        let kind = options.classify(&source.column, &target.column);
        foreign_keys.push(ForeignKey {
            source,
            target,
            kind,
        });
    }
    foreign_keys.sort();
    foreign_keys.dedup();
    Ok(foreign_keys)
}

fn build_glossary(
    glossary: &GlossaryDocument,
    tables: &BTreeMap<String, Table>,
) -> Result<Vec<GlossaryEntry>, LoadError> {
    let mut entries = Vec::with_capacity(glossary.terms.len());
    for (i, term) in glossary.terms.iter().enumerate() {
        let name = term.term.trim();
        if name.is_empty() {
            return Err(LoadError::malformed(
                GLOSSARY_DOCUMENT,
                format!("terms[{i}].term"),
                "term is empty",
            ));
        }

        let mut mappings = Vec::with_capacity(term.mappings.len());
        for (j, mapping) in term.mappings.iter().enumerate() {
            let field = format!("terms[{i}].mappings[{j}]");
            let table = mapping.table.trim();
            let column = non_blank(mapping.column.as_deref());
            match &column {
                Some(column) => check_column(GLOSSARY_DOCUMENT, &field, tables, table, column)?,
                None if !tables.contains_key(table) => {
                    return Err(LoadError::malformed(
                        GLOSSARY_DOCUMENT,
                        format!("{field}.table"),
                        format!("table '{table}' does not exist"),
                    ));
                }
                None => {}
            }
            mappings.push(GlossaryMapping {
                table: table.to_string(),
                column,
            });
        }

        entries.push(GlossaryEntry {
            term: name.to_string(),
            definition: term.definition.trim().to_string(),
            mappings,
            warning: non_blank(term.warning.as_deref()),
        });
    }
    Ok(entries)
}

fn profile_kind(stats: ProfileStatsInput) -> Option<ProfileKind> {
    let kind = match stats {
        ProfileStatsInput::Enum {
            n_distinct,
            n_null,
            values,
        } => {
            let mut values: Vec<ValueCount> = values
                .into_iter()
                .map(|(value, count)| ValueCount { value, count })
                .collect();
            values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
            ProfileKind::Enumeration {
                distinct: n_distinct,
                nulls: n_null,
                values,
            }
        }
        ProfileStatsInput::Sample {
            n_distinct,
            n_null,
            sample_values,
        } => ProfileKind::Sample {
            distinct: n_distinct,
            nulls: n_null,
            samples: sample_values,
        },
        ProfileStatsInput::Numeric {
            min,
            max,
            median,
            mean,
            n_null,
            n_non_null,
        } => ProfileKind::NumericRange {
            min,
            max,
            median,
            mean,
            nulls: n_null,
            non_null: n_non_null,
        },
        ProfileStatsInput::DateRange {
            min,
            max,
            n_null,
            n_non_null,
        } => ProfileKind::DateRange {
            min,
            max,
            nulls: n_null,
            non_null: n_non_null,
        },
        ProfileStatsInput::Boolean {
            n_true,
            n_false,
            n_null,
        } => ProfileKind::BooleanCounts {
            true_count: n_true,
            false_count: n_false,
            nulls: n_null,
        },
        ProfileStatsInput::Error { .. } => return None,
    };
    Some(kind)
}

fn build_profiles(
    document: ProfileDocument,
    tables: &BTreeMap<String, Table>,
) -> Result<ProfileSet, LoadError> {
    for table in document.table_row_counts.keys() {
        if !tables.contains_key(table) {
            return Err(LoadError::malformed(
                PROFILES_DOCUMENT,
                format!("table_row_counts.{table}"),
                format!("table '{table}' does not exist"),
            ));
        }
    }

    let mut seen = HashSet::new();
    let mut by_table: BTreeMap<String, BTreeMap<String, ColumnProfile>> = BTreeMap::new();
    for (key, entry) in document.profiles {
        let field = format!("profiles[\"{key}\"]");
        let table = entry.table.trim().to_string();
        let column = entry.column.trim().to_string();
        if key != format!("{table}.{column}") {
            return Err(LoadError::malformed(
                PROFILES_DOCUMENT,
                field,
                format!("key does not match entry '{table}.{column}'"),
            ));
        }
        if !seen.insert(key.clone()) {
            return Err(LoadError::malformed(
                PROFILES_DOCUMENT,
                field,
                format!("duplicate profile for '{table}.{column}'"),
            ));
        }
        check_column(PROFILES_DOCUMENT, &field, tables, &table, &column)?;

        if let ProfileStatsInput::Error { error: _reason } = &entry.stats {
            #[cfg(feature = "tracing")]
            warn!(profile = %key, reason = %_reason, "skipping column profile that failed to compute");
            continue;
        }

        let Some(profile) = profile_kind(entry.stats) else {
            continue;
        };
        by_table.entry(table.clone()).or_default().insert(
            column.clone(),
            ColumnProfile {
                table,
                column,
                profile,
            },
        );
    }

    Ok(ProfileSet::new(by_table, document.table_row_counts))
}

fn build_patterns(
    document: PatternDocument,
    tables: &BTreeMap<String, Table>,
) -> Result<Vec<QueryPattern>, LoadError> {
    let mut names = HashSet::new();
    let mut patterns = Vec::with_capacity(document.patterns.len());
    for (i, input) in document.patterns.into_iter().enumerate() {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(LoadError::malformed(
                PATTERNS_DOCUMENT,
                format!("patterns[{i}].name"),
                "pattern name is empty",
            ));
        }
        if !names.insert(name.clone()) {
            return Err(LoadError::malformed(
                PATTERNS_DOCUMENT,
                format!("patterns[{i}].name"),
                format!("duplicate pattern '{name}'"),
            ));
        }

        let sql = input.sql.trim().to_string();
        let referenced = pattern_tables(&sql, tables).map_err(|message| {
            LoadError::malformed(PATTERNS_DOCUMENT, format!("patterns[{i}].sql"), message)
        })?;

        patterns.push(QueryPattern {
            name,
            description: input.description.trim().to_string(),
            sql,
            tables: referenced,
        });
    }
    Ok(patterns)
}

#[cfg(feature = "sql-validation")]
fn pattern_tables(sql: &str, tables: &BTreeMap<String, Table>) -> Result<Vec<String>, String> {
    let relations = sql::referenced_relations(sql)?;
    Ok(tables
        .keys()
        .filter(|name| relations.contains(&name.to_ascii_lowercase()))
        .cloned()
        .collect())
}

#[cfg(not(feature = "sql-validation"))]
fn pattern_tables(sql: &str, _tables: &BTreeMap<String, Table>) -> Result<Vec<String>, String> {
    if sql.is_empty() {
        return Err("no SQL statement found".to_string());
    }
    Ok(Vec::new())
}
