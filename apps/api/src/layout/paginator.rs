//! Greedy pagination: distributes classified blocks across pages.
//!
//! # Two phases
//! Pagination runs to completion before anything is drawn, because every page
//! prints "Page i of N". `paginate` returns immutable pages with `total`
//! already stamped; the renderer only reads them.
//!
//! # Rules
//! - Single forward pass, no backtracking, blocks are never split.
//! - A block that does not fit closes the current page, unless the page is empty.
//! - A block taller than a whole page therefore gets a page of its own.

use serde::Serialize;
use tracing::{info, warn};

use crate::layout::classifier::{classify_text, Block, BlockKind};
use crate::layout::constraints::{LayoutConfig, LayoutConstraints};
use crate::layout::font_metrics::FontWeight;
use crate::layout::height::estimate_height;
use crate::layout::wrapper::{wrap_text, WrappedLine};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// A block together with its precomputed wrap and estimated height.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedBlock {
    pub block: Block,
    /// Wrapped lines for Body blocks; empty for titles and headings.
    pub lines: Vec<WrappedLine>,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub total: usize,
    pub blocks: Vec<PlacedBlock>,
}

/// The fully paginated document handed to the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub pages: Vec<Page>,
    pub title: String,
    pub constraints: LayoutConstraints,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

const FALLBACK_TITLE: &str = "Legal Document";

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

/// Wraps (for bodies) and measures a block.
pub fn place_block(block: Block, constraints: &LayoutConstraints, config: &LayoutConfig) -> PlacedBlock {
    let lines = match block.kind {
        BlockKind::Body => wrap_text(
            &block.text,
            constraints.usable_width,
            config.body_font_size,
            FontWeight::Regular,
        ),
        _ => Vec::new(),
    };
    let height = estimate_height(block.kind, lines.len(), config);
    PlacedBlock {
        block,
        lines,
        height,
    }
}

/// Assigns blocks to pages. Zero blocks yields zero pages.
pub fn paginate(blocks: Vec<Block>, constraints: &LayoutConstraints, config: &LayoutConfig) -> Vec<Page> {
    let mut pages: Vec<Vec<PlacedBlock>> = Vec::new();
    let mut current: Vec<PlacedBlock> = Vec::new();
    let mut current_height = 0.0_f32;

    for block in blocks {
        let placed = place_block(block, constraints, config);

        if placed.height > constraints.usable_height {
            warn!(
                kind = ?placed.block.kind,
                height = placed.height,
                usable_height = constraints.usable_height,
                "Oversized block: taller than a full page, it will be truncated"
            );
        }

        if current_height + placed.height > constraints.usable_height && !current.is_empty() {
            pages.push(std::mem::take(&mut current));
            current_height = 0.0;
        }

        current_height += placed.height;
        current.push(placed);
    }

    if !current.is_empty() {
        pages.push(current);
    }

    let total = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, blocks)| Page {
            number: i + 1,
            total,
            blocks,
        })
        .collect()
}

/// Classifies and paginates `text` into a `Document`.
///
/// Title resolution: first Title block, then each fallback in order, then a
/// fixed literal. A draft with no content still yields one (empty) page.
pub fn layout_document(
    text: &str,
    fallback_titles: &[&str],
    constraints: LayoutConstraints,
    config: &LayoutConfig,
) -> Document {
    let blocks = classify_text(text);

    let title = blocks
        .iter()
        .find(|b| b.kind == BlockKind::Title)
        .map(|b| b.text.clone())
        .or_else(|| {
            fallback_titles
                .iter()
                .map(|t| t.trim())
                .find(|t| !t.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    let mut pages = paginate(blocks, &constraints, config);
    if pages.is_empty() {
        info!("Empty input: producing a single template-only page");
        pages.push(Page {
            number: 1,
            total: 1,
            blocks: Vec::new(),
        });
    }

    Document {
        pages,
        title,
        constraints,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
