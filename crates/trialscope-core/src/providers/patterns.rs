use std::fmt::Write;

use crate::render::flatten;
use crate::types::QueryPattern;

/// Formats the tested query templates in their input order.
#[derive(Debug, Clone, Copy)]
pub struct PatternProvider<'a> {
    patterns: &'a [QueryPattern],
}

impl<'a> PatternProvider<'a> {
    pub fn new(patterns: &'a [QueryPattern]) -> Self {
        Self { patterns }
    }

    pub fn list(&self) -> String {
        let mut out = String::new();
        writeln!(out, "-- Tested query patterns: {}", self.patterns.len()).unwrap();
        for pattern in self.patterns {
            writeln!(out).unwrap();
            writeln!(out, "-- {}", flatten(&pattern.name)).unwrap();
            writeln!(out, "-- {}", flatten(&pattern.description)).unwrap();
            if !pattern.tables.is_empty() {
                writeln!(out, "-- Tables: {}", pattern.tables.join(", ")).unwrap();
            }
            writeln!(out, "{}", pattern.sql).unwrap();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(name: &str, tables: &[&str]) -> QueryPattern {
        QueryPattern {
            name: name.to_string(),
            description: format!("{name} description"),
            sql: format!("SELECT 1 AS {name};"),
            tables: tables.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_list_keeps_input_order() {
        let patterns = vec![pattern("zeta", &["studies"]), pattern("alpha", &[])];
        let text = PatternProvider::new(&patterns).list();
        assert!(text.find("-- zeta").unwrap() < text.find("-- alpha").unwrap());
        assert!(text.contains("-- Tables: studies\nSELECT 1 AS zeta;\n"));
        assert!(text.contains("-- alpha description\nSELECT 1 AS alpha;\n"));
    }
}
