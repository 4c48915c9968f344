use std::fmt::Write;

use crate::error::LookupError;
use crate::model::{ProfileSet, SchemaModel};
use crate::render::{flatten, write_title};
use crate::types::{ColumnProfile, ProfileKind};

/// Enumeration values listed per column before eliding the rest.
const MAX_ENUM_VALUES: usize = 25;

/// Formats column value profiles.
#[derive(Debug, Clone, Copy)]
pub struct ProfileProvider<'a> {
    model: &'a SchemaModel,
    profiles: &'a ProfileSet,
}

impl<'a> ProfileProvider<'a> {
    pub fn new(model: &'a SchemaModel, profiles: &'a ProfileSet) -> Self {
        Self { model, profiles }
    }

    /// Which tables have profiles, with counts only.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        write_title(&mut out, "Column Profiles");
        if self.profiles.is_empty() {
            writeln!(out, "No tables profiled.").unwrap();
            return out;
        }

        writeln!(out, "Profiled columns: {}", self.profiles.column_count()).unwrap();
        writeln!(out).unwrap();
        for (table, columns) in self.profiles.tables() {
            let noun = if columns == 1 { "column" } else { "columns" };
            match self.profiles.row_count(table) {
                Some(rows) => {
                    writeln!(out, "{table}  {columns} profiled {noun}  ({rows} rows)").unwrap()
                }
                None => writeln!(out, "{table}  {columns} profiled {noun}").unwrap(),
            }
        }
        out
    }

    /// Per-column profiles of one table, in declared column order.
    ///
    /// A table the schema does not know is [`LookupError::UnknownTable`]; a
    /// known table without profiled columns is [`LookupError::NoProfiles`].
    pub fn for_table(&self, name: &str) -> Result<String, LookupError> {
        let table = self.model.table(name).ok_or_else(|| LookupError::UnknownTable {
            table: name.to_string(),
        })?;
        let columns = self
            .profiles
            .for_table(name)
            .ok_or_else(|| LookupError::NoProfiles {
                table: name.to_string(),
            })?;

        let mut out = String::new();
        let title = match self.profiles.row_count(name) {
            Some(rows) => format!("Column Profiles: {name} ({rows} rows)"),
            None => format!("Column Profiles: {name}"),
        };
        write_title(&mut out, &title);
        for column in &table.columns {
            if let Some(profile) = columns.get(&column.name) {
                write_profile(&mut out, profile);
            }
        }
        Ok(out)
    }
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

fn write_profile(out: &mut String, profile: &ColumnProfile) {
    let label = profile.profile.label();
    match &profile.profile {
        ProfileKind::Enumeration {
            distinct,
            nulls,
            values,
        } => {
            writeln!(out, "{} [{label}] {distinct} distinct, {nulls} nulls", profile.column)
                .unwrap();
            for value in values.iter().take(MAX_ENUM_VALUES) {
                writeln!(out, "  {}: {}", flatten(&value.value), value.count).unwrap();
            }
            if values.len() > MAX_ENUM_VALUES {
                writeln!(out, "  ... {} more", values.len() - MAX_ENUM_VALUES).unwrap();
            }
        }
        ProfileKind::Sample {
            distinct,
            nulls,
            samples,
        } => {
            writeln!(out, "{} [{label}] {distinct} distinct, {nulls} nulls", profile.column)
                .unwrap();
            if !samples.is_empty() {
                let quoted: Vec<String> = samples
                    .iter()
                    .map(|s| format!("\"{}\"", flatten(s)))
                    .collect();
                writeln!(out, "  e.g. {}", quoted.join(", ")).unwrap();
            }
        }
        ProfileKind::NumericRange {
            min,
            max,
            median,
            mean,
            nulls,
            non_null,
        } => {
            writeln!(
                out,
                "{} [{label}] min {}, max {}, median {}, mean {}, {non_null} non-null, {nulls} nulls",
                profile.column,
                number(*min),
                number(*max),
                number(*median),
                number(*mean)
            )
            .unwrap();
        }
        ProfileKind::DateRange {
            min,
            max,
            nulls,
            non_null,
        } => {
            writeln!(
                out,
                "{} [{label}] {} .. {}, {non_null} non-null, {nulls} nulls",
                profile.column,
                min.as_deref().unwrap_or("?"),
                max.as_deref().unwrap_or("?")
            )
            .unwrap();
        }
        ProfileKind::BooleanCounts {
            true_count,
            false_count,
            nulls,
        } => {
            writeln!(
                out,
                "{} [{label}] true {true_count}, false {false_count}, {nulls} nulls",
                profile.column
            )
            .unwrap();
        }
    }
}
