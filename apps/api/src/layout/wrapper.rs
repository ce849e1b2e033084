//! Greedy word-wrap for body paragraphs. No hyphenation, no truncation.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{measure_text, FontWeight};

/// One visual line of a body block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedLine {
    pub words: Vec<String>,
    /// True iff this is not the block's last line and it holds at least 3 words.
    pub is_justifiable: bool,
}

impl WrappedLine {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

const MIN_JUSTIFIABLE_WORDS: usize = 3;

/// Wraps `text` into lines no wider than `max_width` points.
///
/// Before a word is appended, the candidate `buffer + " " + word` is measured;
/// if it is too wide and the buffer is non-empty the buffer becomes a line.
/// A single word wider than `max_width` therefore sits alone on its own line.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32, weight: FontWeight) -> Vec<WrappedLine> {
    let mut raw_lines: Vec<Vec<String>> = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        if buffer.is_empty() {
            buffer.push(word);
            continue;
        }

        let candidate = format!("{} {}", buffer.join(" "), word);
        if measure_text(&candidate, font_size, weight) > max_width {
            raw_lines.push(buffer.drain(..).map(str::to_string).collect());
        }
        buffer.push(word);
    }
    if !buffer.is_empty() {
        raw_lines.push(buffer.into_iter().map(str::to_string).collect());
    }

    let last = raw_lines.len().saturating_sub(1);
    raw_lines
        .into_iter()
        .enumerate()
        .map(|(i, words)| WrappedLine {
            is_justifiable: i != last && words.len() >= MIN_JUSTIFIABLE_WORDS,
            words,
        })
        .collect()
}
