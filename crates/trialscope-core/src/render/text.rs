//! Small text helpers shared by every renderer.

use std::fmt::Write;

/// Column descriptions are cut to this many characters.
pub const COLUMN_DESCRIPTION_LIMIT: usize = 120;
/// Table descriptions are cut to this many characters.
pub const TABLE_DESCRIPTION_LIMIT: usize = 200;

pub(crate) const COMMENT_RULE: &str =
    "-- =============================================================";

/// Collapses a description onto one line so it is safe inside a `--` comment.
pub fn flatten(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("--", "-")
}

/// Flattens `text` and cuts it to `limit` characters, marking the cut with `...`.
pub fn truncate(text: &str, limit: usize) -> String {
    let flat = flatten(text);
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut cut: String = flat.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

/// Rough LLM token estimate used in payload metadata.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

/// Writes a title underlined with `=`.
pub(crate) fn write_title(out: &mut String, title: &str) {
    writeln!(out, "{title}").unwrap();
    writeln!(out, "{}", "=".repeat(50)).unwrap();
    writeln!(out).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_joins_lines_and_defuses_comment_markers() {
        assert_eq!(
            flatten("Start date --\n  as reported\tby sponsor"),
            "Start date - as reported by sponsor"
        );
    }

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate("Overall status", 120), "Overall status");
    }

    #[test]
    fn test_truncate_cuts_on_characters() {
        let text = "é".repeat(130);
        let cut = truncate(&text, COLUMN_DESCRIPTION_LIMIT);
        assert_eq!(cut.chars().count(), COLUMN_DESCRIPTION_LIMIT + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
    }
}
