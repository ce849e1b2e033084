// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that keeps drafts in the plain-text shape the layout engine reads.
pub const PLAIN_TEXT_SYSTEM: &str = "You are a precise legal drafting assistant. \
    Respond with the document text only. \
    Do NOT use markdown formatting, tables, or code fences. \
    Do NOT include explanations, notes, or apologies before or after the document.";

/// Instruction appended to drafting prompts so headings classify correctly.
pub const STRUCTURE_INSTRUCTION: &str = "\
    FORMAT RULES: Put the document title alone on the first line in UPPER CASE. \
    Number each major section as `1. SECTION NAME` in UPPER CASE on its own line. \
    Number subsections as `1.1 Subsection Name` on their own line. \
    Write each paragraph as a single line of plain prose separated by a blank line.";

/// Fills `{name}` placeholders in a prompt template in a single pass.
/// Substituted values are never scanned again, so braces inside them survive verbatim.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_all_occurrences() {
        let out = fill_template("{a} and {b} and {a}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and y and x");
    }

    #[test]
    fn test_fill_template_leaves_unknown_placeholders() {
        assert_eq!(fill_template("{missing}", &[("a", "x")]), "{missing}");
        assert_eq!(fill_template("{ {a}", &[("a", "x")]), "{ x");
    }

    #[test]
    fn test_fill_template_does_not_expand_inside_values() {
        let out = fill_template(
            "Title: {title}\nNotes: {instructions}",
            &[("title", "Deed {instructions}"), ("instructions", "none")],
        );
        assert_eq!(out, "Title: Deed {instructions}\nNotes: none");
    }
}
