//! Page geometry. All coordinates are in points with the origin at the top-left
//! corner of the page and y growing downward.

use serde::{Deserialize, Serialize};

/// Fixed geometry of a certificate page.
///
/// The page is split into a decorative sidebar column on the left and the main
/// content column; `column_gap` separates the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutFrame {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub sidebar_width: f32,
    pub column_gap: f32,
    /// Where the first section starts on every page (below the logo band).
    pub content_top: f32,
    /// Printable area kept clear at the bottom even without a footer image.
    pub safe_bottom_offset: f32,
    /// Content may not extend past this y coordinate.
    pub content_bottom_limit: f32,
    /// Vertical space between consecutive sections.
    pub section_gap: f32,
    /// Space kept between content and a reserved footer.
    pub footer_gap: f32,
}

/// A4 portrait, with a 90pt sidebar and a 435pt content column.
pub fn default_frame() -> LayoutFrame {
    let page_height = 841.89;
    let safe_bottom_offset = 24.0;
    LayoutFrame {
        page_width: 595.28,
        page_height,
        margin_top: 24.0,
        margin_right: 40.0,
        sidebar_width: 90.0,
        column_gap: 30.0,
        content_top: 96.0,
        safe_bottom_offset,
        content_bottom_limit: page_height - safe_bottom_offset,
        section_gap: 14.0,
        footer_gap: 8.0,
    }
}

impl LayoutFrame {
    /// Left edge of the content column.
    pub fn content_left(&self) -> f32 {
        self.sidebar_width + self.column_gap
    }

    pub fn content_width(&self) -> f32 {
        (self.page_width - self.content_left() - self.margin_right).max(0.0)
    }

    /// Returns a frame whose content limit leaves room for a footer of the given
    /// height. The limit only ever moves up.
    pub fn with_footer_reserved(&self, footer_height: f32) -> LayoutFrame {
        if footer_height <= 0.0 {
            return *self;
        }
        let footer_top = self.page_height - footer_height - self.footer_gap;
        LayoutFrame {
            content_bottom_limit: self.content_bottom_limit.min(footer_top),
            ..*self
        }
    }
}
