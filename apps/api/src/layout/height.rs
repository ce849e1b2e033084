//! Vertical extent of a classified block.

use crate::layout::classifier::BlockKind;
use crate::layout::constraints::LayoutConfig;

/// Height in points of a block of `kind`; `line_count` is only read for bodies.
pub fn estimate_height(kind: BlockKind, line_count: usize, config: &LayoutConfig) -> f32 {
    match kind {
        BlockKind::Title => config.title_height,
        BlockKind::MajorHeading => config.major_heading_height,
        BlockKind::SubHeading => config.sub_heading_height,
        BlockKind::Body => line_count as f32 * config.line_height + config.paragraph_spacing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::constraints::default_layout_config;

    #[test]
    fn test_fixed_heights_ignore_line_count() {
        let config = default_layout_config();
        assert_eq!(estimate_height(BlockKind::Title, 7, &config), config.title_height);
        assert_eq!(
            estimate_height(BlockKind::MajorHeading, 0, &config),
            config.major_heading_height
        );
        assert_eq!(
            estimate_height(BlockKind::SubHeading, 3, &config),
            config.sub_heading_height
        );
    }

    #[test]
    fn test_body_height_is_lines_times_leading_plus_gap() {
        let config = default_layout_config();
        let h = estimate_height(BlockKind::Body, 4, &config);
        assert!((h - (4.0 * config.line_height + config.paragraph_spacing)).abs() < 1e-4);
    }

    #[test]
    fn test_major_heading_taller_than_sub_heading() {
        let config = default_layout_config();
        assert!(config.major_heading_height > config.sub_heading_height);
    }
}
