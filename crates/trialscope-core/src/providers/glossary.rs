use std::fmt::Write;

use crate::render::write_title;
use crate::types::GlossaryEntry;

/// Formats the domain glossary. The glossary is small, so it is only served whole.
#[derive(Debug, Clone, Copy)]
pub struct GlossaryProvider<'a> {
    entries: &'a [GlossaryEntry],
}

impl<'a> GlossaryProvider<'a> {
    pub fn new(entries: &'a [GlossaryEntry]) -> Self {
        Self { entries }
    }

    pub fn list(&self) -> String {
        let mut out = String::new();
        write_title(&mut out, "Domain Glossary");
        if self.entries.is_empty() {
            writeln!(out, "No glossary terms defined.").unwrap();
            return out;
        }

        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(out).unwrap();
            }
            writeln!(out, "{}: {}", entry.term, entry.definition).unwrap();
            if !entry.mappings.is_empty() {
                let targets: Vec<String> = entry.mappings.iter().map(ToString::to_string).collect();
                writeln!(out, "  Maps to: {}", targets.join(", ")).unwrap();
            }
            if let Some(warning) = &entry.warning {
                writeln!(out, "  WARNING: {warning}").unwrap();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GlossaryMapping;

    #[test]
    fn test_list_renders_mappings_and_warning() {
        let entries = vec![GlossaryEntry {
            term: "condition".to_string(),
            definition: "Disease or disorder studied".to_string(),
            mappings: vec![
                GlossaryMapping {
                    table: "conditions".to_string(),
                    column: Some("name".to_string()),
                },
                GlossaryMapping {
                    table: "browse_conditions".to_string(),
                    column: None,
                },
            ],
            warning: Some("Prefer browse_conditions for MeSH terms".to_string()),
        }];
        let text = GlossaryProvider::new(&entries).list();
        assert!(text.contains("condition: Disease or disorder studied\n"));
        assert!(text.contains("  Maps to: conditions.name, browse_conditions\n"));
        assert!(text.ends_with("  WARNING: Prefer browse_conditions for MeSH terms\n"));
    }
}
