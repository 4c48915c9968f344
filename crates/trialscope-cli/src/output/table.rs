//! Human-readable resource listing.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::fmt::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use trialscope_core::{CatalogStats, ResourceDescriptor};

#[derive(Tabled)]
struct DescriptorRow {
    #[tabled(rename = "URI")]
    uri: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Available")]
    available: &'static str,
}

/// Formats the registry as a table, with a catalog summary above it.
pub fn format_resource_table(
    descriptors: &[ResourceDescriptor],
    source: &str,
    stats: &CatalogStats,
    use_colors: bool,
) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    write_header(&mut out, colored);
    write_summary(&mut out, source, stats, colored);

    let rows = descriptors.iter().map(|d| DescriptorRow {
        uri: d.uri.clone(),
        name: d.name.clone(),
        available: if d.available { "yes" } else { "no" },
    });
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    writeln!(out, "{table}").unwrap();

    out
}

fn write_header(out: &mut String, colored: bool) {
    let title = "TrialScope Resources";
    let line = "═".repeat(50);

    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
        writeln!(out, "{}", line.dimmed()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
        writeln!(out, "{line}").unwrap();
    }
}

fn write_summary(out: &mut String, source: &str, stats: &CatalogStats, colored: bool) {
    let optional = |count: Option<usize>| count.map_or_else(|| "-".to_string(), |n| n.to_string());
    let summary = format!(
        "Source: {source} | {} tables | {} foreign keys | {} glossary terms | {} profiled columns | {} query patterns",
        stats.tables,
        stats.foreign_keys,
        optional(stats.glossary_terms),
        optional(stats.profiled_columns),
        optional(stats.query_patterns),
    );

    if colored {
        writeln!(out, "{}", summary.cyan()).unwrap();
    } else {
        writeln!(out, "{summary}").unwrap();
    }
    writeln!(out).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialscope_core::ResourceKey;

    fn descriptor(uri: &str, available: bool) -> ResourceDescriptor {
        ResourceDescriptor {
            uri: uri.to_string(),
            key: ResourceKey::Glossary,
            name: "Glossary".to_string(),
            description: String::new(),
            mime_type: "text/plain".to_string(),
            available,
        }
    }

    #[test]
    fn test_plain_table_lists_every_uri() {
        let stats = CatalogStats {
            tables: 2,
            foreign_keys: 1,
            glossary_terms: None,
            profiled_columns: Some(4),
            query_patterns: None,
        };
        let text = format_resource_table(
            &[descriptor("aact://glossary", false), descriptor("aact://schema", true)],
            "static",
            &stats,
            false,
        );
        assert!(text.starts_with("TrialScope Resources\n"));
        assert!(text.contains(
            "Source: static | 2 tables | 1 foreign keys | - glossary terms | 4 profiled columns | - query patterns\n"
        ));
        assert!(text.contains("aact://glossary"));
        assert!(text.contains("aact://schema"));
        assert!(text.contains("URI"));
        assert!(!text.contains('\u{1b}'), "no ANSI escapes without colors");
    }
}
