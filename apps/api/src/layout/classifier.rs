//! Block classification: turns raw draft lines into typed blocks.
//!
//! # Rules (first match wins)
//! 1. Title: first line only, longer than 10 chars, all upper-case, no leading digit
//! 2. MajorHeading: `1. DEFINITIONS` (number, dot, ≥5 upper-case/space chars)
//! 3. SubHeading: `2.1 Scope` (dotted number followed by a capital)
//! 4. Body: everything else
//!
//! A body sentence such as "2.1 Million dollars were paid" matches rule 3.
//! That is a known limit of the heuristic and is kept so existing drafts
//! lay out the same way.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MAJOR_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s+[A-Z\s]{5,}$").expect("valid major heading regex"));

static SUB_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\s+[A-Z]").expect("valid sub heading regex"));

const MIN_TITLE_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Title,
    MajorHeading,
    SubHeading,
    Body,
}

/// One classified unit of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Splits raw draft text into trimmed, non-blank lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Classifies a single line given its position in the document.
pub fn classify_line(index: usize, line: &str) -> BlockKind {
    if index == 0 && is_title(line) {
        BlockKind::Title
    } else if MAJOR_HEADING.is_match(line) {
        BlockKind::MajorHeading
    } else if SUB_HEADING.is_match(line) {
        BlockKind::SubHeading
    } else {
        BlockKind::Body
    }
}

/// Classifies an ordered sequence of lines. One block per line, order kept.
pub fn classify_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Block> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let line = line.as_ref();
            Block::new(classify_line(i, line), line)
        })
        .collect()
}

/// Convenience: split then classify.
pub fn classify_text(text: &str) -> Vec<Block> {
    classify_lines(&split_lines(text))
}

fn is_title(line: &str) -> bool {
    line.chars().count() > MIN_TITLE_CHARS
        && line.to_uppercase() == line
        && !line.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(blocks: &[Block]) -> Vec<BlockKind> {
        blocks.iter().map(|b| b.kind).collect()
    }

    #[test]
    fn test_nda_scenario() {
        let text = "NON-DISCLOSURE AGREEMENT\n\n1. DEFINITIONS\n\nThis is a short body paragraph.";
        let blocks = classify_text(text);
        assert_eq!(
            kinds(&blocks),
            vec![BlockKind::Title, BlockKind::MajorHeading, BlockKind::Body]
        );
        assert_eq!(blocks[0].text, "NON-DISCLOSURE AGREEMENT");
    }

    #[test]
    fn test_heading_variants() {
        assert_eq!(classify_line(3, "2.1 Scope of Work"), BlockKind::SubHeading);
        assert_eq!(classify_line(3, "2. SCOPE OF WORK"), BlockKind::MajorHeading);
        assert_eq!(
            classify_line(3, "Scope of work is described below."),
            BlockKind::Body
        );
    }

    #[test]
    fn test_title_only_on_first_line() {
        assert_eq!(classify_line(0, "SERVICES AGREEMENT"), BlockKind::Title);
        assert_eq!(classify_line(1, "SERVICES AGREEMENT"), BlockKind::Body);
    }

    #[test]
    fn test_short_or_numbered_first_line_is_not_title() {
        // Exactly 10 chars is too short.
        assert_eq!(classify_line(0, "AGREEMENTS"), BlockKind::Body);
        // Leading digit falls through to the heading rules.
        assert_eq!(classify_line(0, "1. DEFINITIONS"), BlockKind::MajorHeading);
        // Mixed case is not a title.
        assert_eq!(classify_line(0, "Services Agreement"), BlockKind::Body);
    }

    #[test]
    fn test_major_heading_needs_five_caps() {
        assert_eq!(classify_line(2, "4. TERM"), BlockKind::Body);
        assert_eq!(classify_line(2, "4. TERMS"), BlockKind::MajorHeading);
        assert_eq!(classify_line(2, "4. Terms and Conditions"), BlockKind::Body);
    }

    #[test]
    fn test_numbered_sentence_keeps_heuristic_result() {
        assert_eq!(
            classify_line(5, "2.1 Million dollars were paid at signing."),
            BlockKind::SubHeading
        );
        assert_eq!(
            classify_line(5, "2.1 million dollars were paid at signing."),
            BlockKind::Body
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let text = "MASTER SERVICES AGREEMENT\n1. SERVICES\n1.1 Delivery\nThe vendor shall deliver.\n2. FEES\nFees are due monthly.";
        assert_eq!(classify_text(text), classify_text(text));
    }

    #[test]
    fn test_blank_lines_dropped_and_trimmed() {
        let lines = split_lines("  first  \n\n   \n\tsecond\n");
        assert_eq!(lines, vec!["first", "second"]);
        assert!(classify_text("\n \n").is_empty());
    }
}
