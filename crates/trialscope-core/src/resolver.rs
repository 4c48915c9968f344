//! Resolver: maps resource requests onto renderers and providers.
//!
//! Every call is a pure read of the borrowed [`SchemaModel`]. Direct
//! single-table lookups are strict (an unknown name is
//! [`LookupError::UnknownTable`]); the targeted subset is lenient and drops
//! unknown names, since its table list is often machine-generated.

use std::collections::BTreeSet;
use std::fmt::Write;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::error::LookupError;
use crate::model::SchemaModel;
use crate::providers::{GlossaryProvider, PatternProvider, ProfileProvider};
use crate::render::{self, estimate_tokens};
use crate::types::{
    ResolvedResource, ResourceDescriptor, ResourceKey, ResourceRequest, Table, TEXT_MIME_TYPE,
    URI_SCHEME,
};

struct ResourceInfo {
    key: ResourceKey,
    uri: &'static str,
    name: &'static str,
    description: &'static str,
}

const RESOURCES: &[ResourceInfo] = &[
    ResourceInfo {
        key: ResourceKey::FullSchema,
        uri: "schema",
        name: "Full Schema",
        description: "Complete DDL-style schema: every table, column types, keys, foreign key \
            constraints and a relationship summary.",
    },
    ResourceInfo {
        key: ResourceKey::TableSchema,
        uri: "schema/{table}",
        name: "Table Schema",
        description: "DDL for a single table with the foreign keys that reference it and that \
            it references.",
    },
    ResourceInfo {
        key: ResourceKey::TargetedSubset,
        uri: "schema?tables={tables}",
        name: "Targeted Schema",
        description: "DDL for a comma-separated set of tables plus the relationships touching \
            them. Unknown names are ignored.",
    },
    ResourceInfo {
        key: ResourceKey::TableList,
        uri: "tables",
        name: "Table List",
        description: "Every table with its column count, domain and rows per study. Use it to \
            pick tables before requesting their schema.",
    },
    ResourceInfo {
        key: ResourceKey::Relationships,
        uri: "relationships",
        name: "Relationships",
        description: "Foreign keys grouped into identifier joins and hierarchical chains, with \
            JOIN examples.",
    },
    ResourceInfo {
        key: ResourceKey::Glossary,
        uri: "glossary",
        name: "Glossary",
        description: "Domain terms mapped to the tables and columns that hold them, with \
            disambiguation warnings.",
    },
    ResourceInfo {
        key: ResourceKey::ColumnProfileSummary,
        uri: "column-profiles",
        name: "Column Profile Summary",
        description: "Which tables have precomputed value profiles.",
    },
    ResourceInfo {
        key: ResourceKey::ColumnProfileTable,
        uri: "column-profiles/{table}",
        name: "Column Profiles",
        description: "Actual value distributions for one table's columns: enumerations with \
            counts, ranges and samples.",
    },
    ResourceInfo {
        key: ResourceKey::QueryPatterns,
        uri: "query-patterns",
        name: "Query Patterns",
        description: "Tested SQL templates for common questions.",
    },
];

/// Resolves requests against one loaded model.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    model: &'a SchemaModel,
}

impl<'a> Resolver<'a> {
    pub fn new(model: &'a SchemaModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'a SchemaModel {
        self.model
    }

    /// Resource registry, in a stable order.
    pub fn list(&self) -> Vec<ResourceDescriptor> {
        RESOURCES
            .iter()
            .map(|info| ResourceDescriptor {
                uri: format!("{URI_SCHEME}{}", info.uri),
                key: info.key,
                name: info.name.to_string(),
                description: info.description.to_string(),
                mime_type: TEXT_MIME_TYPE.to_string(),
                available: self.model.is_available(info.key),
            })
            .collect()
    }

    /// Renders the text for `request`.
    pub fn resolve(&self, request: &ResourceRequest) -> Result<String, LookupError> {
        #[cfg(feature = "tracing")]
        debug!(key = %request.key(), "resolving resource");

        match request {
            ResourceRequest::FullSchema => Ok(render::full_schema(self.model)),
            ResourceRequest::TableSchema(name) => {
                Ok(render::table_schema(self.model, self.table(name)?))
            }
            ResourceRequest::TableList => Ok(render::table_list(self.model)),
            ResourceRequest::Relationships => {
                Ok(render::relationships::relationships(self.model))
            }
            ResourceRequest::Glossary => {
                let entries = self.model.glossary().ok_or(LookupError::ResourceUnavailable {
                    resource: ResourceKey::Glossary,
                })?;
                Ok(GlossaryProvider::new(entries).list())
            }
            ResourceRequest::ColumnProfileSummary => Ok(self.profiles(request.key())?.summary()),
            ResourceRequest::ColumnProfileTable(name) => {
                self.table(name)?;
                self.profiles(request.key())?.for_table(name)
            }
            ResourceRequest::QueryPatterns => {
                let patterns = self.model.patterns().ok_or(LookupError::ResourceUnavailable {
                    resource: ResourceKey::QueryPatterns,
                })?;
                Ok(PatternProvider::new(patterns).list())
            }
            ResourceRequest::Subset(names) => Ok(self.resolve_subset(names)),
        }
    }

    /// Parses `uri` and resolves it, attaching payload metadata.
    pub fn resolve_uri(&self, uri: &str) -> Result<ResolvedResource, LookupError> {
        self.resolve_request(&ResourceRequest::parse(uri)?)
    }

    /// Like [`Resolver::resolve`], with the canonical URI and token estimate attached.
    pub fn resolve_request(&self, request: &ResourceRequest) -> Result<ResolvedResource, LookupError> {
        let text = self.resolve(request)?;
        Ok(ResolvedResource {
            uri: request.uri(),
            key: request.key(),
            estimated_tokens: estimate_tokens(&text),
            text,
        })
    }

    /// DDL for the known tables among `names`, then the relationships touching them.
    ///
    /// Unknown and duplicate names are dropped; never fails.
    pub fn resolve_subset<S: AsRef<str>>(&self, names: &[S]) -> String {
        let mut selected: BTreeSet<&str> = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            match self.model.table(name) {
                Some(table) => {
                    selected.insert(table.name.as_str());
                }
                None => {
                    #[cfg(feature = "tracing")]
                    debug!(table = name, "dropping unknown table from targeted subset");
                }
            }
        }

        let mut out = String::new();
        writeln!(
            out,
            "-- Targeted schema: {} of {} tables",
            selected.len(),
            self.model.table_count()
        )
        .unwrap();
        if selected.is_empty() {
            writeln!(out, "-- No matching tables.").unwrap();
            return out;
        }

        for name in &selected {
            if let Some(table) = self.model.table(name) {
                writeln!(out).unwrap();
                out.push_str(&render::table_ddl(self.model, table));
            }
        }

        let touching = self
            .model
            .foreign_keys()
            .iter()
            .filter(|fk| selected.iter().any(|name| fk.touches(name)));
        writeln!(out).unwrap();
        writeln!(out, "-- Relationships touching these tables:").unwrap();
        out.push_str(&render::summarize(self.model.options(), touching));
        out
    }

    fn table(&self, name: &str) -> Result<&'a Table, LookupError> {
        self.model.table(name).ok_or_else(|| LookupError::UnknownTable {
            table: name.to_string(),
        })
    }

    fn profiles(&self, key: ResourceKey) -> Result<ProfileProvider<'a>, LookupError> {
        let profiles = self
            .model
            .profiles()
            .ok_or(LookupError::ResourceUnavailable { resource: key })?;
        Ok(ProfileProvider::new(self.model, profiles))
    }
}
