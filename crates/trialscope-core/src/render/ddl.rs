//! Pseudo-DDL rendering.
//!
//! Output is meant for reading, not execution. Every function here is pure:
//! the same model always renders to the same bytes.

use std::fmt::Write;

use super::relationships::write_edge;
use super::text::{truncate, COLUMN_DESCRIPTION_LIMIT, COMMENT_RULE, TABLE_DESCRIPTION_LIMIT};
use crate::model::SchemaModel;
use crate::types::{Column, Table};

const FOREIGN_KEY_PREFIX: &str = "    FOREIGN KEY (";

/// One column line: `    <name> <type>[ NOT NULL][ PRIMARY KEY],[  -- <desc>]`.
pub fn column_line(column: &Column) -> String {
    let mut line = format!("    {} {}", column.name, column.data_type);
    if !column.nullable {
        line.push_str(" NOT NULL");
    }
    if column.primary_key {
        line.push_str(" PRIMARY KEY");
    }
    line.push(',');
    if let Some(description) = &column.description {
        write!(
            line,
            "  -- {}",
            truncate(description, COLUMN_DESCRIPTION_LIMIT)
        )
        .unwrap();
    }
    line
}

/// Returns true for body lines that are foreign-key constraints rather than columns.
pub fn is_constraint_line(line: &str) -> bool {
    line.starts_with(FOREIGN_KEY_PREFIX)
}

/// Renders one `CREATE TABLE` block followed by its descriptive comments.
pub fn table_ddl(model: &SchemaModel, table: &Table) -> String {
    let mut body: Vec<String> = table.columns.iter().map(column_line).collect();
    for fk in model.foreign_keys_from(&table.name) {
        let schema = model
            .table(&fk.target.table)
            .map_or(table.schema.as_str(), |t| t.schema.as_str());
        body.push(format!(
            "{FOREIGN_KEY_PREFIX}{}) REFERENCES {}.{}({}),",
            fk.source.column, schema, fk.target.table, fk.target.column
        ));
    }
    strip_trailing_comma(&mut body);

    let mut out = String::new();
    writeln!(out, "CREATE TABLE {}.{} (", table.schema, table.name).unwrap();
    for line in &body {
        writeln!(out, "{line}").unwrap();
    }
    writeln!(out, ");").unwrap();

    let mut meta = Vec::new();
    if let Some(domain) = &table.domain {
        meta.push(format!("Domain: {domain}"));
    }
    if let Some(cardinality) = &table.cardinality {
        meta.push(format!("Rows per study: {cardinality}"));
    }
    if !meta.is_empty() {
        writeln!(out, "-- {}", meta.join(" | ")).unwrap();
    }
    if let Some(description) = &table.description {
        writeln!(out, "-- {}", truncate(description, TABLE_DESCRIPTION_LIMIT)).unwrap();
    }
    out
}

/// The column part of a body line may itself end in a description comment,
/// so the comma to drop is the one before `  -- `.
fn strip_trailing_comma(body: &mut [String]) {
    let Some(last) = body.last_mut() else {
        return;
    };
    match last.find(",  -- ") {
        Some(pos) if !is_constraint_line(last) => {
            last.remove(pos);
        }
        _ => {
            if last.ends_with(',') {
                last.pop();
            }
        }
    }
}

/// Single-table resource: the table DDL plus its incoming and outgoing edges.
pub fn table_schema(model: &SchemaModel, table: &Table) -> String {
    let mut out = table_ddl(model, table);

    let incoming: Vec<_> = model.foreign_keys_to(&table.name).collect();
    let outgoing: Vec<_> = model.foreign_keys_from(&table.name).collect();
    if incoming.is_empty() && outgoing.is_empty() {
        return out;
    }

    writeln!(out).unwrap();
    if !incoming.is_empty() {
        writeln!(out, "-- Tables referencing {}:", table.name).unwrap();
        for fk in incoming {
            write_edge(&mut out, "--   ", fk);
        }
    }
    if !outgoing.is_empty() {
        writeln!(out, "-- {} references:", table.name).unwrap();
        for fk in outgoing {
            write_edge(&mut out, "--   ", fk);
        }
    }
    out
}

/// Every table by name, framed by a header and a foreign-key summary.
pub fn full_schema(model: &SchemaModel) -> String {
    let options = model.options();
    let mut out = String::new();

    writeln!(out, "{COMMENT_RULE}").unwrap();
    writeln!(out, "-- Database Schema ({})", options.schema_name).unwrap();
    writeln!(out, "{COMMENT_RULE}").unwrap();
    writeln!(
        out,
        "-- {} tables | {} foreign key relationships",
        model.table_count(),
        model.foreign_key_count()
    )
    .unwrap();
    writeln!(out, "--").unwrap();
    writeln!(out, "-- Join guidance:").unwrap();
    writeln!(
        out,
        "--   Most tables join to '{}' via {}.",
        options.root_table, options.identifier_column
    )
    .unwrap();
    let chains = super::relationships::hierarchical_chains(model, 3);
    if !chains.is_empty() {
        writeln!(out, "--   Hierarchical FK chains:").unwrap();
        for chain in &chains {
            writeln!(out, "--     {}", super::relationships::chain_path(chain)).unwrap();
        }
    }
    writeln!(out, "{COMMENT_RULE}").unwrap();

    for table in model.tables() {
        writeln!(out).unwrap();
        out.push_str(&table_ddl(model, table));
    }

    writeln!(out).unwrap();
    writeln!(out, "{COMMENT_RULE}").unwrap();
    writeln!(out, "-- FOREIGN KEY RELATIONSHIP SUMMARY").unwrap();
    writeln!(out, "{COMMENT_RULE}").unwrap();
    for fk in model.foreign_keys() {
        write_edge(&mut out, "-- ", fk);
    }
    out
}
