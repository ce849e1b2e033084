//! Page rendering: the read-only second phase.
//!
//! `layout_page` turns a paginated `Page` into positioned text runs;
//! `encode_page` turns those runs into a PDF content stream over the
//! background template. Neither touches pagination state.
//!
//! # Footer guard
//! Estimated block heights are constants while glyph metrics are real, so the
//! renderer re-checks every line against the footer safe zone instead of
//! trusting the paginator. A trip stops drawing the page and is logged.

use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use serde::Serialize;
use tracing::warn;

use crate::layout::classifier::BlockKind;
use crate::layout::constraints::{LayoutConfig, LayoutConstraints};
use crate::layout::font_metrics::{encode_char, measure_text, FontWeight, DESCENT_RATIO};
use crate::layout::paginator::Page;
use crate::layout::wrapper::WrappedLine;

/// Name of the background image in the shared page resources.
pub const BACKGROUND_XOBJECT: &str = "Bg";

// ────────────────────────────────────────────────────────────────────────────
// Positioned output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TextColor {
    Body,
    Muted,
}

impl TextColor {
    fn rgb(&self) -> (f32, f32, f32) {
        match self {
            TextColor::Body => (0.1, 0.1, 0.1),
            TextColor::Muted => (0.5, 0.5, 0.5),
        }
    }
}

/// A piece of text at an absolute position (PDF coordinates, y up).
#[derive(Debug, Clone, Serialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub font_size: f32,
    pub weight: FontWeight,
    pub color: TextColor,
    pub width: f32,
    /// Index of the block within its page; `None` for the page marker.
    pub block_index: Option<usize>,
    /// Line number within the block.
    pub line_index: usize,
}

impl TextRun {
    /// Lowest point any glyph of this run reaches.
    pub fn bottom(&self) -> f32 {
        self.baseline - DESCENT_RATIO * self.font_size
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub number: usize,
    pub runs: Vec<TextRun>,
    /// The footer guard stopped this page early.
    pub truncated: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

struct PageCursor<'a> {
    constraints: &'a LayoutConstraints,
    number: usize,
    runs: Vec<TextRun>,
}

impl<'a> PageCursor<'a> {
    /// Records a run unless it would reach the footer safe zone.
    fn push(&mut self, run: TextRun) -> bool {
        let limit = self.constraints.footer_safe_zone_top();
        if run.bottom() <= limit {
            warn!(
                page = self.number,
                block = ?run.block_index,
                line = run.line_index,
                bottom = run.bottom(),
                footer_top = limit,
                "Footer guard tripped: stopping page render"
            );
            return false;
        }
        self.runs.push(run);
        true
    }
}

/// Positions every run on `page`.
pub fn layout_page(page: &Page, constraints: &LayoutConstraints, config: &LayoutConfig) -> RenderedPage {
    let mut cursor = PageCursor {
        constraints,
        number: page.number,
        runs: Vec::new(),
    };

    cursor.runs.push(page_marker(page, constraints, config));

    let footer_top = constraints.footer_safe_zone_top();
    let mut y = constraints.content_top();
    let mut truncated = false;

    'blocks: for (index, placed) in page.blocks.iter().enumerate() {
        if y <= footer_top {
            warn!(page = page.number, block = index, "Footer guard tripped before block start");
            truncated = true;
            break;
        }

        match placed.block.kind {
            BlockKind::Title => {
                let (size, width) = fit_title(&placed.block.text, constraints, config);
                let x = ((constraints.page_width - width) / 2.0).max(constraints.margin_left);
                let baseline = y - config.title_space_before - config.title_font_size;
                let run = heading_run(&placed.block.text, x, baseline, size, width, index);
                if !cursor.push(run) {
                    truncated = true;
                    break 'blocks;
                }
            }
            BlockKind::MajorHeading | BlockKind::SubHeading => {
                let (size, space_before) = if placed.block.kind == BlockKind::MajorHeading {
                    (config.heading_font_size, config.major_heading_space_before)
                } else {
                    (config.body_font_size, config.sub_heading_space_before)
                };
                let width = measure_text(&placed.block.text, size, FontWeight::Bold);
                let run = heading_run(
                    &placed.block.text,
                    constraints.margin_left,
                    y - space_before - size,
                    size,
                    width,
                    index,
                );
                if !cursor.push(run) {
                    truncated = true;
                    break 'blocks;
                }
            }
            BlockKind::Body => {
                for (line_index, line) in placed.lines.iter().enumerate() {
                    let baseline = y - line_index as f32 * config.line_height - config.body_font_size;
                    for run in body_line_runs(line, baseline, index, line_index, constraints, config) {
                        if !cursor.push(run) {
                            truncated = true;
                            break 'blocks;
                        }
                    }
                }
            }
        }

        y -= placed.height;
    }

    RenderedPage {
        number: page.number,
        runs: cursor.runs,
        truncated,
    }
}

fn page_marker(page: &Page, constraints: &LayoutConstraints, config: &LayoutConfig) -> TextRun {
    let text = format!("Page {} of {}", page.number, page.total);
    let size = config.marker_font_size;
    let width = measure_text(&text, size, FontWeight::Regular);
    TextRun {
        x: constraints.content_right() - width,
        baseline: constraints.page_height - constraints.margin_top / 2.0,
        font_size: size,
        weight: FontWeight::Regular,
        color: TextColor::Muted,
        width,
        block_index: None,
        line_index: 0,
        text,
    }
}

fn heading_run(text: &str, x: f32, baseline: f32, size: f32, width: f32, index: usize) -> TextRun {
    TextRun {
        text: text.to_string(),
        x,
        baseline,
        font_size: size,
        weight: FontWeight::Bold,
        color: TextColor::Body,
        width,
        block_index: Some(index),
        line_index: 0,
    }
}

/// Runs for one body line: one run per word when justified, one run otherwise.
fn body_line_runs(
    line: &WrappedLine,
    baseline: f32,
    block_index: usize,
    line_index: usize,
    constraints: &LayoutConstraints,
    config: &LayoutConfig,
) -> Vec<TextRun> {
    let size = config.body_font_size;
    let run = |text: String, x: f32, width: f32| TextRun {
        text,
        x,
        baseline,
        font_size: size,
        weight: FontWeight::Regular,
        color: TextColor::Body,
        width,
        block_index: Some(block_index),
        line_index,
    };

    if !line.is_justifiable {
        let text = line.text();
        let width = measure_text(&text, size, FontWeight::Regular);
        return vec![run(text, constraints.margin_left, width)];
    }

    let widths: Vec<f32> = line
        .words
        .iter()
        .map(|w| measure_text(w, size, FontWeight::Regular))
        .collect();
    let words_width: f32 = widths.iter().sum();
    let gap = (constraints.usable_width - words_width) / (line.words.len() - 1) as f32;

    let mut x = constraints.margin_left;
    line.words
        .iter()
        .zip(widths)
        .map(|(word, width)| {
            let r = run(word.clone(), x, width);
            x += width + gap;
            r
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Content stream
// ────────────────────────────────────────────────────────────────────────────

/// Encodes a rendered page: background at full page size, then every run.
pub fn encode_page(rendered: &RenderedPage, constraints: &LayoutConstraints) -> Content {
    let mut ops = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                constraints.page_width.into(),
                0.into(),
                0.into(),
                constraints.page_height.into(),
                0.into(),
                0.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(BACKGROUND_XOBJECT.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ];

    for run in &rendered.runs {
        let (r, g, b) = run.color.rgb();
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(run.weight.resource_name().as_bytes().to_vec()),
                run.font_size.into(),
            ],
        ));
        ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        ops.push(Operation::new("Td", vec![run.x.into(), run.baseline.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(&run.text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    Content { operations: ops }
}

/// Title font size and width, shrunk below `title_font_size` when the title
/// would overrun the text column. The baseline stays where the full size puts it.
fn fit_title(text: &str, constraints: &LayoutConstraints, config: &LayoutConfig) -> (f32, f32) {
    let size = config.title_font_size;
    let width = measure_text(text, size, FontWeight::Bold);
    if width <= constraints.usable_width || width <= 0.0 {
        return (size, width);
    }
    let fitted = size * constraints.usable_width / width;
    warn!(title_width = width, fitted_size = fitted, "Title shrunk to fit the text column");
    (fitted, measure_text(text, fitted, FontWeight::Bold))
}

/// Encodes text for the WinAnsiEncoding fonts; unencodable characters become '?'.
pub(crate) fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(encode_char).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
