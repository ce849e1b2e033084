//! Page geometry and the named spacing constants the estimator and renderer share.

use serde::{Deserialize, Serialize};

/// Named layout values, all in PDF points.
///
/// Block heights are fixed constants rather than values derived from font
/// metrics, which keeps height estimation O(1) once a body block is wrapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Reserved for the template's letterhead and the page marker.
    pub margin_top: f32,
    /// Height of the bottom band reserved for the template's footer artwork.
    pub footer_safe_zone: f32,

    pub title_font_size: f32,
    pub title_space_before: f32,
    pub title_height: f32,

    pub heading_font_size: f32,
    pub major_heading_space_before: f32,
    pub major_heading_height: f32,

    pub sub_heading_space_before: f32,
    pub sub_heading_height: f32,

    pub body_font_size: f32,
    pub line_height: f32,
    pub paragraph_spacing: f32,

    pub marker_font_size: f32,
}

/// Production layout: A4 portrait, 11pt body text.
pub fn default_layout_config() -> LayoutConfig {
    LayoutConfig {
        page_width: 595.28,
        page_height: 841.89,
        margin_left: 56.7,
        margin_right: 56.7,
        margin_top: 113.4,
        footer_safe_zone: 85.0,

        title_font_size: 16.0,
        title_space_before: 8.0,
        title_height: 40.0,

        heading_font_size: 13.0,
        major_heading_space_before: 14.0,
        major_heading_height: 34.0,

        sub_heading_space_before: 9.0,
        sub_heading_height: 24.0,

        body_font_size: 11.0,
        line_height: 15.5,
        paragraph_spacing: 8.0,

        marker_font_size: 9.0,
    }
}

/// Geometry fixed for one generation call.
///
/// PDF coordinates grow upward, so the footer boundary is a y-coordinate
/// measured from the bottom edge of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConstraints {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub footer_safe_zone: f32,
    pub usable_width: f32,
    pub usable_height: f32,
}

impl LayoutConstraints {
    /// Constraints for the configured page size.
    pub fn new(config: &LayoutConfig) -> Self {
        Self::with_page_size(config, config.page_width, config.page_height)
    }

    /// Constraints for a page shaped like the background template.
    ///
    /// The width stays `config.page_width`; the height follows the template's
    /// aspect ratio so the letterhead is drawn undistorted.
    pub fn from_template_size(config: &LayoutConfig, width_px: u32, height_px: u32) -> Self {
        if width_px == 0 || height_px == 0 {
            return Self::new(config);
        }
        let page_height = config.page_width * height_px as f32 / width_px as f32;
        Self::with_page_size(config, config.page_width, page_height)
    }

    fn with_page_size(config: &LayoutConfig, page_width: f32, page_height: f32) -> Self {
        Self {
            page_width,
            page_height,
            margin_left: config.margin_left,
            margin_right: config.margin_right,
            margin_top: config.margin_top,
            footer_safe_zone: config.footer_safe_zone,
            usable_width: page_width - config.margin_left - config.margin_right,
            usable_height: page_height - config.margin_top - config.footer_safe_zone,
        }
    }

    /// Y-coordinate where the first block on every page starts.
    pub fn content_top(&self) -> f32 {
        self.page_height - self.margin_top
    }

    /// No drawn glyph may reach this y-coordinate.
    pub fn footer_safe_zone_top(&self) -> f32 {
        self.footer_safe_zone
    }

    /// Right edge of the text column.
    pub fn content_right(&self) -> f32 {
        self.page_width - self.margin_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_dimensions_derived_from_margins() {
        let config = default_layout_config();
        let c = LayoutConstraints::new(&config);
        assert!((c.usable_width - (595.28 - 2.0 * 56.7)).abs() < 1e-3);
        assert!((c.usable_height - (841.89 - 113.4 - 85.0)).abs() < 1e-3);
        assert!((c.content_top() - c.footer_safe_zone_top() - c.usable_height).abs() < 1e-3);
    }

    #[test]
    fn test_page_follows_template_aspect() {
        let config = default_layout_config();

        let letter = LayoutConstraints::from_template_size(&config, 612, 792);
        assert_eq!(letter.page_width, config.page_width);
        assert!((letter.page_height / letter.page_width - 792.0 / 612.0).abs() < 1e-4);
        assert!((letter.usable_height - (letter.page_height - 113.4 - 85.0)).abs() < 1e-3);

        let a4 = LayoutConstraints::from_template_size(&config, 2480, 3508);
        assert!((a4.page_height - config.page_height).abs() < 0.5);

        assert_eq!(LayoutConstraints::from_template_size(&config, 0, 10), LayoutConstraints::new(&config));
    }

    #[test]
    fn test_default_heights_leave_room_for_descenders() {
        // Trailing space inside each fixed-height block must exceed the glyph descent.
        let config = default_layout_config();
        let d = crate::layout::font_metrics::DESCENT_RATIO;
        assert!(
            config.title_height - config.title_space_before - config.title_font_size
                > d * config.title_font_size
        );
        assert!(
            config.major_heading_height
                - config.major_heading_space_before
                - config.heading_font_size
                > d * config.heading_font_size
        );
        assert!(
            config.sub_heading_height - config.sub_heading_space_before - config.body_font_size
                > d * config.body_font_size
        );
        assert!(config.line_height > config.body_font_size);
    }
}
