//! Normalises raw LLM output into the plain text the layout engine reads.
//!
//! The classifier works line by line on plain prose, so anything the model
//! adds for a chat interface (quotes, escaped newlines, markdown markers)
//! is removed here before the text reaches `render::generate_document`.

/// Double quotation marks are dropped. A right single quote is kept as an
/// apostrophe; a left single quote is dropped.
fn normalize_quote(c: char) -> Option<char> {
    match c {
        '"' | '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2018}' => None,
        '\u{2019}' => Some('\''),
        other => Some(other),
    }
}

/// Turns literal `\n` sequences into newlines and drops every other backslash.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('r') => {
                chars.next();
            }
            Some('t') => {
                chars.next();
                out.push(' ');
            }
            _ => {}
        }
    }
    out
}

/// Strips heading markers and leading emphasis from one line.
fn strip_markdown(line: &str) -> String {
    let trimmed = line.trim_start();
    let without_heading = trimmed.trim_start_matches('#').trim_start();
    let without_heading = if without_heading.len() == trimmed.len() {
        line
    } else {
        without_heading
    };
    without_heading.replace("**", "").replace("__", "")
}

/// Cleans a raw draft. Idempotent: cleaning twice gives the same text.
pub fn clean_draft_text(raw: &str) -> String {
    let unescaped: String = unescape(raw).chars().filter_map(normalize_quote).collect();

    let lines: Vec<String> = unescaped
        .lines()
        .map(|line| strip_markdown(line).trim_end().to_string())
        .collect();

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_newlines_become_line_breaks() {
        assert_eq!(
            clean_draft_text(r"LEASE AGREEMENT\n1. PARTIES AND TERM"),
            "LEASE AGREEMENT\n1. PARTIES AND TERM"
        );
    }

    #[test]
    fn test_other_backslashes_vanish() {
        assert_eq!(clean_draft_text(r"Section \5 applies\."), "Section 5 applies.");
    }

    #[test]
    fn test_quotes_removed_apostrophes_kept() {
        assert_eq!(
            clean_draft_text("the \u{201C}Tenant\u{201D} and the \"Landlord\"; Tenant\u{2019}s deposit"),
            "the Tenant and the Landlord; Tenant's deposit"
        );
    }

    #[test]
    fn test_markdown_markers_removed() {
        let raw = "# NON-DISCLOSURE AGREEMENT\n## 1. DEFINITIONS\n**1.1 Confidential Information** means any data.";
        assert_eq!(
            clean_draft_text(raw),
            "NON-DISCLOSURE AGREEMENT\n1. DEFINITIONS\n1.1 Confidential Information means any data."
        );
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(clean_draft_text("\n\n  Body text.  \n\n"), "Body text.");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let raw = "\"# TITLE\"\\n**Body** with \\\\ slashes";
        let once = clean_draft_text(raw);
        assert_eq!(clean_draft_text(&once), once);
    }
}
