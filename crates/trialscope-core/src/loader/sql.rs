//! Query-pattern SQL validation.

use std::collections::BTreeSet;
use std::ops::ControlFlow;

use sqlparser::ast::visit_relations;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

/// Parses `sql` as PostgreSQL and returns the relation names it reads, by
/// unqualified name, lowercased and deduplicated.
pub(crate) fn referenced_relations(sql: &str) -> Result<BTreeSet<String>, String> {
    let statements = Parser::parse_sql(&PostgreSqlDialect {}, sql).map_err(|e| e.to_string())?;
    if statements.is_empty() {
        return Err("no SQL statement found".to_string());
    }

    let mut relations = BTreeSet::new();
    for statement in &statements {
        let _ = visit_relations(statement, |name| {
            if let Some(ident) = name.0.last().and_then(|part| part.as_ident()) {
                relations.insert(ident.value.to_ascii_lowercase());
            }
            ControlFlow::<()>::Continue(())
        });
    }
    Ok(relations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_qualified_and_joined_relations() {
        let relations = referenced_relations(
            "SELECT s.nct_id, c.name FROM ctgov.studies s \
             JOIN ctgov.conditions c ON c.nct_id = s.nct_id \
             WHERE s.nct_id IN (SELECT nct_id FROM Sponsors)",
        )
        .unwrap();
        let names: Vec<_> = relations.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["conditions", "sponsors", "studies"]);
    }

    #[test]
    fn test_rejects_invalid_sql() {
        assert!(referenced_relations("SELEC nct_id FROM studies").is_err());
    }

    #[test]
    fn test_rejects_empty_sql() {
        assert!(referenced_relations("   ").is_err());
    }
}
