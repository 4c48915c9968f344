//! Relationship Summarizer: groups foreign keys by join kind.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use super::text::write_title;
use crate::model::{ModelOptions, SchemaModel};
use crate::types::{ForeignKey, JoinKind};

const HIERARCHICAL_HEADING: &str = "--- Hierarchical FK relationships ---";

pub(crate) fn write_edge(out: &mut String, prefix: &str, fk: &ForeignKey) {
    writeln!(out, "{prefix}{} -> {}", fk.source, fk.target).unwrap();
}

fn identifier_heading(options: &ModelOptions) -> String {
    format!(
        "--- {} joins (link tables to {}) ---",
        options.identifier_column, options.root_table
    )
}

/// Renders the two join groups, identifier joins first.
///
/// Within a group edges are ordered by source table, then source column,
/// whatever order they were passed in.
pub fn summarize<'a>(
    options: &ModelOptions,
    foreign_keys: impl IntoIterator<Item = &'a ForeignKey>,
) -> String {
    let mut edges: Vec<&ForeignKey> = foreign_keys.into_iter().collect();
    edges.sort();
    edges.dedup();
    let (identifier, hierarchical): (Vec<_>, Vec<_>) = edges
        .iter()
        .partition(|fk| fk.kind == JoinKind::Identifier);

    let mut out = String::new();
    writeln!(out, "Total: {} relationships", edges.len()).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "{}", identifier_heading(options)).unwrap();
    writeln!(out).unwrap();
    write_group(&mut out, &identifier);

    writeln!(out).unwrap();
    writeln!(out, "{HIERARCHICAL_HEADING}").unwrap();
    writeln!(
        out,
        "--- (Use these for multi-level JOINs beyond {}) ---",
        options.identifier_column
    )
    .unwrap();
    writeln!(out).unwrap();
    write_group(&mut out, &hierarchical);
    out
}

fn write_group(out: &mut String, group: &[&&ForeignKey]) {
    if group.is_empty() {
        writeln!(out, "  (none)").unwrap();
    }
    for fk in group {
        write_edge(out, "  ", fk);
    }
}

/// Maximal parent-to-child paths over hierarchical edges, at most `limit` of them.
///
/// Each chain is a run of edges where every edge's parent table is the
/// previous edge's child table. Chains start at tables that are never a
/// hierarchical child and are returned in name order.
pub fn hierarchical_chains(model: &SchemaModel, limit: usize) -> Vec<Vec<&ForeignKey>> {
    let mut children: BTreeMap<&str, Vec<&ForeignKey>> = BTreeMap::new();
    let mut child_tables = BTreeSet::new();
    for fk in model.foreign_keys() {
        if fk.kind == JoinKind::Hierarchical && fk.source.table != fk.target.table {
            children.entry(fk.target.table.as_str()).or_default().push(fk);
            child_tables.insert(fk.source.table.as_str());
        }
    }

    let mut chains = Vec::new();
    for root in children.keys().filter(|t| !child_tables.contains(*t)) {
        if chains.len() >= limit {
            break;
        }
        let mut visited = BTreeSet::from([*root]);
        collect_chains(root, &children, limit, &mut Vec::new(), &mut visited, &mut chains);
    }
    chains
}

fn collect_chains<'a>(
    table: &str,
    children: &BTreeMap<&str, Vec<&'a ForeignKey>>,
    limit: usize,
    path: &mut Vec<&'a ForeignKey>,
    visited: &mut BTreeSet<&'a str>,
    chains: &mut Vec<Vec<&'a ForeignKey>>,
) {
    let next: Vec<&'a ForeignKey> = children
        .get(table)
        .map(|edges| {
            edges
                .iter()
                .copied()
                .filter(|fk| !visited.contains(fk.source.table.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if next.is_empty() {
        if !path.is_empty() {
            chains.push(path.clone());
        }
        return;
    }
    for fk in next {
        if chains.len() >= limit {
            return;
        }
        visited.insert(fk.source.table.as_str());
        path.push(fk);
        collect_chains(&fk.source.table, children, limit, path, visited, chains);
        path.pop();
        visited.remove(fk.source.table.as_str());
    }
}

/// `parent -> child -> grandchild`
pub fn chain_path(chain: &[&ForeignKey]) -> String {
    let mut tables: Vec<&str> = Vec::with_capacity(chain.len() + 1);
    if let Some(first) = chain.first() {
        tables.push(&first.target.table);
    }
    tables.extend(chain.iter().map(|fk| fk.source.table.as_str()));
    tables.join(" -> ")
}

fn write_chain_example(out: &mut String, schema: &str, chain: &[&ForeignKey]) {
    let Some(first) = chain.first() else {
        return;
    };
    writeln!(out, "-- {}:", chain_path(chain)).unwrap();
    writeln!(out, "--   SELECT * FROM {schema}.{} t0", first.target.table).unwrap();
    for (i, fk) in chain.iter().enumerate() {
        writeln!(
            out,
            "--   JOIN {schema}.{} t{} ON t{}.{} = t{}.{}",
            fk.source.table,
            i + 1,
            i,
            fk.target.column,
            i + 1,
            fk.source.column
        )
        .unwrap();
    }
    writeln!(out).unwrap();
}

/// The relationships resource: both groups plus JOIN guidance derived from the model.
pub fn relationships(model: &SchemaModel) -> String {
    let options = model.options();
    let mut out = String::new();
    write_title(
        &mut out,
        &format!("Foreign Key Relationships ({} schema)", options.schema_name),
    );
    out.push_str(&summarize(options, model.foreign_keys()));

    writeln!(out).unwrap();
    writeln!(out, "--- Common JOIN patterns ---").unwrap();
    writeln!(out).unwrap();
    for chain in hierarchical_chains(model, 3) {
        write_chain_example(&mut out, &options.schema_name, &chain);
    }
    writeln!(out, "-- Join any table to {}:", options.root_table).unwrap();
    writeln!(
        out,
        "--   SELECT * FROM {}.{} r",
        options.schema_name, options.root_table
    )
    .unwrap();
    writeln!(
        out,
        "--   JOIN {}.<table_name> t ON r.{id} = t.{id}",
        options.schema_name,
        id = options.identifier_column
    )
    .unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnRef;

    fn fk(source: (&str, &str), target: (&str, &str), kind: JoinKind) -> ForeignKey {
        ForeignKey {
            source: ColumnRef::new(source.0, source.1),
            target: ColumnRef::new(target.0, target.1),
            kind,
        }
    }

    #[test]
    fn test_summarize_orders_within_groups() {
        let edges = [
            fk(("sponsors", "nct_id"), ("studies", "nct_id"), JoinKind::Identifier),
            fk(("outcome_analyses", "outcome_id"), ("outcomes", "id"), JoinKind::Hierarchical),
            fk(("conditions", "nct_id"), ("studies", "nct_id"), JoinKind::Identifier),
        ];
        let text = summarize(&ModelOptions::default(), &edges);
        let conditions = text.find("  conditions.nct_id -> studies.nct_id").unwrap();
        let sponsors = text.find("  sponsors.nct_id -> studies.nct_id").unwrap();
        let hierarchical = text.find(HIERARCHICAL_HEADING).unwrap();
        let analyses = text.find("  outcome_analyses.outcome_id -> outcomes.id").unwrap();
        assert!(conditions < sponsors);
        assert!(sponsors < hierarchical);
        assert!(hierarchical < analyses);
        assert!(text.starts_with("Total: 3 relationships\n"));
    }

    #[test]
    fn test_summarize_marks_empty_group() {
        let edges = [fk(("sponsors", "nct_id"), ("studies", "nct_id"), JoinKind::Identifier)];
        let text = summarize(&ModelOptions::default(), &edges);
        assert!(text.ends_with("\n  (none)\n"));
    }

    /// Two tables per layer, each referencing both tables of the layer above.
    fn layered_model(layers: usize) -> SchemaModel {
        let name = |layer: usize, side: &str| format!("layer{layer:02}_{side}");
        let mut tables = Vec::new();
        let mut foreign_keys = Vec::new();
        for layer in 0..layers {
            for side in ["a", "b"] {
                tables.push(serde_json::json!({
                    "table_name": name(layer, side),
                    "columns": [
                        {"column_name": "id", "data_type": "integer", "is_primary_key": true},
                        {"column_name": "a_id", "data_type": "integer"},
                        {"column_name": "b_id", "data_type": "integer"}
                    ]
                }));
                if layer == 0 {
                    continue;
                }
                for parent in ["a", "b"] {
                    foreign_keys.push(serde_json::json!({
                        "child_table": name(layer, side),
                        "child_column": format!("{parent}_id"),
                        "parent_table": name(layer - 1, parent),
                        "parent_column": "id"
                    }));
                }
            }
        }
        let snapshot = serde_json::from_value(serde_json::json!({
            "tables": tables,
            "foreign_keys": foreign_keys,
        }))
        .unwrap();
        crate::loader::ModelBuilder::new(ModelOptions::default())
            .schema(snapshot)
            .build()
            .unwrap()
    }

    #[test]
    fn test_chains_stop_at_limit_in_layered_schema() {
        let model = layered_model(60);
        let chains = hierarchical_chains(&model, 3);
        assert_eq!(chains.len(), 3);
        for chain in &chains {
            assert_eq!(chain.len(), 59);
            assert_eq!(chain[0].target.table, "layer00_a");
        }
        assert!(relationships(&model).contains("-- layer00_a -> layer01_a -> layer02_a"));
    }

    #[test]
    fn test_zero_limit_yields_no_chains() {
        assert!(hierarchical_chains(&layered_model(4), 0).is_empty());
    }

    #[test]
    fn test_chain_path() {
        let a = fk(("outcome_analyses", "outcome_id"), ("outcomes", "id"), JoinKind::Hierarchical);
        let b = fk(
            ("outcome_analysis_groups", "outcome_analysis_id"),
            ("outcome_analyses", "id"),
            JoinKind::Hierarchical,
        );
        assert_eq!(
            chain_path(&[&a, &b]),
            "outcomes -> outcome_analyses -> outcome_analysis_groups"
        );
    }
}
