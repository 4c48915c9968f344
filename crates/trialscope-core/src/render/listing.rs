use std::fmt::Write;

use super::text::{truncate, write_title, COLUMN_DESCRIPTION_LIMIT};
use crate::model::SchemaModel;

/// Compact table index: name, column count, domain and cardinality per table.
pub fn table_list(model: &SchemaModel) -> String {
    let mut out = String::new();
    write_title(
        &mut out,
        &format!("Database Tables ({} schema)", model.options().schema_name),
    );
    writeln!(
        out,
        "{:<35} {:>5}  {:<20}  {:<10}",
        "Table", "Cols", "Domain", "Rows/Study"
    )
    .unwrap();
    writeln!(out, "{}", "-".repeat(80)).unwrap();

    for table in model.tables() {
        let line = format!(
            "{:<35} {:>5}  {:<20}  {:<10}",
            table.name,
            table.columns.len(),
            table.domain.as_deref().unwrap_or(""),
            table.cardinality.as_deref().unwrap_or("")
        );
        writeln!(out, "{}", line.trim_end()).unwrap();
        if let Some(description) = &table.description {
            writeln!(out, "    {}", truncate(description, COLUMN_DESCRIPTION_LIMIT)).unwrap();
        }
    }

    writeln!(out).unwrap();
    writeln!(out, "Total: {} tables", model.table_count()).unwrap();
    out
}
