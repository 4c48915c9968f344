//! Resource addressing: URI grammar, request keys and resolved payloads.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// URI scheme shared by every catalog resource.
pub const URI_SCHEME: &str = "aact://";

/// MIME type of every resolved payload.
pub const TEXT_MIME_TYPE: &str = "text/plain";

/// The closed set of resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKey {
    FullSchema,
    TableSchema,
    TableList,
    Relationships,
    Glossary,
    ColumnProfileSummary,
    ColumnProfileTable,
    QueryPatterns,
    TargetedSubset,
}

impl ResourceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullSchema => "full-schema",
            Self::TableSchema => "table-schema",
            Self::TableList => "table-list",
            Self::Relationships => "relationships",
            Self::Glossary => "glossary",
            Self::ColumnProfileSummary => "column-profile-summary",
            Self::ColumnProfileTable => "column-profile-table",
            Self::QueryPatterns => "query-patterns",
            Self::TargetedSubset => "targeted-subset",
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    FullSchema,
    TableSchema(String),
    TableList,
    Relationships,
    Glossary,
    ColumnProfileSummary,
    ColumnProfileTable(String),
    QueryPatterns,
    /// Requested table names as supplied; unknown names are tolerated.
    Subset(Vec<String>),
}

impl ResourceRequest {
    /// Parses an `aact://` URI.
    ///
    /// Anything outside the grammar, including a parameter on a key that
    /// takes none or an empty table list, is [`LookupError::UnknownResource`].
    pub fn parse(uri: &str) -> Result<Self, LookupError> {
        let unknown = || LookupError::UnknownResource {
            uri: uri.to_string(),
        };

        let rest = uri.trim().strip_prefix(URI_SCHEME).ok_or_else(unknown)?;
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        if let Some(query) = query {
            if path != "schema" {
                return Err(unknown());
            }
            let list = query.strip_prefix("tables=").ok_or_else(unknown)?;
            let tables = split_table_list(list);
            if tables.is_empty() {
                return Err(unknown());
            }
            return Ok(Self::Subset(tables));
        }

        let request = match path.split_once('/') {
            None => match path {
                "schema" => Self::FullSchema,
                "tables" => Self::TableList,
                "relationships" => Self::Relationships,
                "glossary" => Self::Glossary,
                "column-profiles" => Self::ColumnProfileSummary,
                "query-patterns" => Self::QueryPatterns,
                _ => return Err(unknown()),
            },
            Some((_, table)) if table.is_empty() || table.contains('/') => {
                return Err(unknown());
            }
            Some(("schema", table)) => Self::TableSchema(table.to_string()),
            Some(("column-profiles", table)) => Self::ColumnProfileTable(table.to_string()),
            Some(_) => return Err(unknown()),
        };
        Ok(request)
    }

    pub fn key(&self) -> ResourceKey {
        match self {
            Self::FullSchema => ResourceKey::FullSchema,
            Self::TableSchema(_) => ResourceKey::TableSchema,
            Self::TableList => ResourceKey::TableList,
            Self::Relationships => ResourceKey::Relationships,
            Self::Glossary => ResourceKey::Glossary,
            Self::ColumnProfileSummary => ResourceKey::ColumnProfileSummary,
            Self::ColumnProfileTable(_) => ResourceKey::ColumnProfileTable,
            Self::QueryPatterns => ResourceKey::QueryPatterns,
            Self::Subset(_) => ResourceKey::TargetedSubset,
        }
    }

    /// Canonical URI for this request.
    pub fn uri(&self) -> String {
        match self {
            Self::FullSchema => format!("{URI_SCHEME}schema"),
            Self::TableSchema(table) => format!("{URI_SCHEME}schema/{table}"),
            Self::TableList => format!("{URI_SCHEME}tables"),
            Self::Relationships => format!("{URI_SCHEME}relationships"),
            Self::Glossary => format!("{URI_SCHEME}glossary"),
            Self::ColumnProfileSummary => format!("{URI_SCHEME}column-profiles"),
            Self::ColumnProfileTable(table) => format!("{URI_SCHEME}column-profiles/{table}"),
            Self::QueryPatterns => format!("{URI_SCHEME}query-patterns"),
            Self::Subset(tables) => format!("{URI_SCHEME}schema?tables={}", tables.join(",")),
        }
    }
}

/// Splits a comma-separated table list, trimming blanks and dropping empties.
pub fn split_table_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Registry entry describing one resource or resource template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Concrete URI or URI template (`aact://schema/{table}`)
    pub uri: String,
    pub key: ResourceKey,
    pub name: String,
    pub description: String,
    pub mime_type: String,
    /// False when the backing collection was not loaded
    pub available: bool,
}

/// A resolved payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedResource {
    pub uri: String,
    pub key: ResourceKey,
    pub text: String,
    /// Rough size in LLM tokens (`chars / 4`)
    pub estimated_tokens: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_keys() {
        assert_eq!(
            ResourceRequest::parse("aact://schema").unwrap(),
            ResourceRequest::FullSchema
        );
        assert_eq!(
            ResourceRequest::parse("aact://tables").unwrap(),
            ResourceRequest::TableList
        );
        assert_eq!(
            ResourceRequest::parse("aact://column-profiles").unwrap(),
            ResourceRequest::ColumnProfileSummary
        );
        assert_eq!(
            ResourceRequest::parse("aact://query-patterns").unwrap(),
            ResourceRequest::QueryPatterns
        );
    }

    #[test]
    fn test_parse_parameterized_keys() {
        assert_eq!(
            ResourceRequest::parse("aact://schema/studies").unwrap(),
            ResourceRequest::TableSchema("studies".to_string())
        );
        assert_eq!(
            ResourceRequest::parse("aact://column-profiles/outcomes").unwrap(),
            ResourceRequest::ColumnProfileTable("outcomes".to_string())
        );
    }

    #[test]
    fn test_parse_subset_trims_and_skips_blanks() {
        assert_eq!(
            ResourceRequest::parse("aact://schema?tables= studies, ,conditions").unwrap(),
            ResourceRequest::Subset(vec!["studies".to_string(), "conditions".to_string()])
        );
    }

    #[test]
    fn test_parse_rejects_out_of_grammar_uris() {
        for uri in [
            "",
            "schema",
            "http://schema",
            "aact://",
            "aact://nope",
            "aact://glossary/studies",
            "aact://schema/",
            "aact://schema/a/b",
            "aact://schema?tables=",
            "aact://schema?columns=a",
            "aact://tables?tables=a",
        ] {
            let err = ResourceRequest::parse(uri).unwrap_err();
            assert_eq!(err.kind(), "unknown_resource", "uri: {uri:?}");
        }
    }

    #[test]
    fn test_uri_is_parseable() {
        let requests = [
            ResourceRequest::FullSchema,
            ResourceRequest::TableSchema("studies".to_string()),
            ResourceRequest::ColumnProfileTable("studies".to_string()),
            ResourceRequest::Subset(vec!["a".to_string(), "b".to_string()]),
        ];
        for request in requests {
            assert_eq!(ResourceRequest::parse(&request.uri()).unwrap(), request);
        }
    }

    #[test]
    fn test_key_display_is_kebab_case() {
        assert_eq!(ResourceKey::ColumnProfileSummary.to_string(), "column-profile-summary");
        assert_eq!(
            serde_json::to_string(&ResourceKey::TargetedSubset).unwrap(),
            "\"targeted-subset\""
        );
    }
}
