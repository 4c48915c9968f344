//! Validated catalog entities.
//!
//! Values of these types are only produced by the loader and are never
//! mutated afterwards.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A table in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Table name, unique within the model
    pub name: String,

    /// Schema namespace the table lives in (e.g. `ctgov`)
    pub schema: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Domain classification such as `Protocol` or `Results`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Approximate rows per root record (`1`, `many`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<String>,

    /// Columns in declared ordinal order
    pub columns: Vec<Column>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// A column within a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A `(table, column)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// How a foreign key joins its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// Keyed on the universal record identifier (e.g. `nct_id`)
    Identifier,
    /// Any other parent/child reference
    Hierarchical,
}

/// A foreign key edge, classified at load time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub source: ColumnRef,
    pub target: ColumnRef,
    pub kind: JoinKind,
}

impl ForeignKey {
    /// Returns true when either endpoint lives in `table`.
    pub fn touches(&self, table: &str) -> bool {
        self.source.table == table || self.target.table == table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
    pub mappings: Vec<GlossaryMapping>,
    /// Cautionary note, e.g. disambiguating two similar tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// A glossary term's target: a whole table, or one of its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryMapping {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl fmt::Display for GlossaryMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "{}.{}", self.table, column),
            None => f.write_str(&self.table),
        }
    }
}

/// Precomputed value statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub table: String,
    pub column: String,
    pub profile: ProfileKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileKind {
    /// Low-cardinality column; every value with its count, most frequent first.
    Enumeration {
        distinct: u64,
        nulls: u64,
        values: Vec<ValueCount>,
    },
    /// High-cardinality column; a handful of example values.
    Sample {
        distinct: u64,
        nulls: u64,
        samples: Vec<String>,
    },
    NumericRange {
        min: Option<f64>,
        max: Option<f64>,
        median: Option<f64>,
        mean: Option<f64>,
        nulls: u64,
        non_null: u64,
    },
    DateRange {
        min: Option<String>,
        max: Option<String>,
        nulls: u64,
        non_null: u64,
    },
    BooleanCounts {
        true_count: u64,
        false_count: u64,
        nulls: u64,
    },
}

impl ProfileKind {
    /// Short label used in renderings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Enumeration { .. } => "enum",
            Self::Sample { .. } => "sample",
            Self::NumericRange { .. } => "numeric",
            Self::DateRange { .. } => "date range",
            Self::BooleanCounts { .. } => "boolean",
        }
    }
}

/// A named, tested SQL template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryPattern {
    pub name: String,
    pub description: String,
    pub sql: String,
    /// Model tables the SQL references, sorted by name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<String>,
}
