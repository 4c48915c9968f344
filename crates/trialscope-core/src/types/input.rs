//! Raw input documents as they appear on disk or come out of a live catalog.
//!
//! These types mirror the JSON documents one-to-one and carry no invariants.
//! [`crate::loader::ModelBuilder`] validates them and produces the typed model.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structural schema snapshot (`aact_schema_static.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub tables: Vec<TableInput>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableInput {
    pub table_name: String,
    /// Schema namespace; defaults to the configured namespace when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Approximate cardinality class, e.g. `1` or `many`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_per_study: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ColumnInput {
    pub column_name: String,
    pub data_type: String,
    #[serde(default)]
    pub is_nullable: Nullability,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Nullability as reported by `information_schema` (`YES`/`NO`) or as a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Nullability {
    Flag(bool),
    Text(String),
}

impl Default for Nullability {
    fn default() -> Self {
        Self::Flag(true)
    }
}

impl Nullability {
    /// Interprets the value, returning `None` for unrecognized text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Text(text) => match text.trim().to_ascii_uppercase().as_str() {
                "YES" | "TRUE" | "Y" => Some(true),
                "NO" | "FALSE" | "N" => Some(false),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKeyInput {
    pub child_table: String,
    pub child_column: String,
    pub parent_table: String,
    pub parent_column: String,
}

/// Curated glossary (`glossary.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GlossaryDocument {
    #[serde(default)]
    pub terms: Vec<GlossaryTermInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GlossaryTermInput {
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub mappings: Vec<GlossaryMappingInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GlossaryMappingInput {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

/// Column value profiles (`column_profiles.json`), as written by the offline profiler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProfileDocument {
    #[serde(default)]
    pub table_row_counts: BTreeMap<String, u64>,
    /// Keyed by `table.column`, in document order. Repeated keys are kept
    /// so the loader can reject them.
    #[serde(default, with = "profile_entries")]
    #[schemars(with = "BTreeMap<String, ProfileEntryInput>")]
    pub profiles: Vec<(String, ProfileEntryInput)>,
}

/// Reads a JSON object as its list of entries without collapsing repeated keys.
mod profile_entries {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::ProfileEntryInput;

    pub fn serialize<S>(
        entries: &[(String, ProfileEntryInput)],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, entry) in entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Vec<(String, ProfileEntryInput)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Vec<(String, ProfileEntryInput)>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object of column profiles keyed by table.column")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, ProfileEntryInput>()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProfileEntryInput {
    pub table: String,
    pub column: String,
    #[serde(flatten)]
    pub stats: ProfileStatsInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "profile_type", rename_all = "snake_case")]
pub enum ProfileStatsInput {
    Enum {
        #[serde(default)]
        n_distinct: u64,
        #[serde(default)]
        n_null: u64,
        #[serde(default)]
        values: BTreeMap<String, u64>,
    },
    Sample {
        #[serde(default)]
        n_distinct: u64,
        #[serde(default)]
        n_null: u64,
        #[serde(default)]
        sample_values: Vec<String>,
    },
    Numeric {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default)]
        median: Option<f64>,
        #[serde(default)]
        mean: Option<f64>,
        #[serde(default)]
        n_null: u64,
        #[serde(default)]
        n_non_null: u64,
    },
    DateRange {
        #[serde(default)]
        min: Option<String>,
        #[serde(default)]
        max: Option<String>,
        #[serde(default)]
        n_null: u64,
        #[serde(default)]
        n_non_null: u64,
    },
    Boolean {
        #[serde(default)]
        n_true: u64,
        #[serde(default)]
        n_false: u64,
        #[serde(default)]
        n_null: u64,
    },
    /// Profiling failed offline; carried through so the loader can skip it.
    Error {
        #[serde(default)]
        error: String,
    },
}

/// Tested query templates (`query_patterns.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PatternDocument {
    #[serde(default)]
    pub patterns: Vec<PatternInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PatternInput {
    pub name: String,
    pub description: String,
    pub sql: String,
}
