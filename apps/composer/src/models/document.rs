//! Output of the composer: a renderer-agnostic page description.
//!
//! Coordinates are absolute points, origin top-left, y downward. Within a page,
//! instructions are in paint order; later entries draw above earlier ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::SectionId;
use crate::models::certificate::ImageSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Background,
    Content,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRole {
    Background,
    Sidebar,
    Footer,
    Logo,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// One drawable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawInstruction {
    Image {
        layer: Layer,
        role: AssetRole,
        source: ImageSource,
        rect: Rect,
        /// True when the intrinsic size was unknown and the image was stretched
        /// to its box.
        degraded: bool,
    },
    /// Stands in for a missing asset.
    Placeholder {
        layer: Layer,
        role: AssetRole,
        rect: Rect,
    },
    Text {
        section: SectionId,
        rect: Rect,
        text: String,
        font_size: f32,
        line_height: f32,
        bold: bool,
    },
    /// A list item: the marker sits at `rect.x`, text starts at `rect.x + indent`.
    Bullet {
        section: SectionId,
        rect: Rect,
        text: String,
        font_size: f32,
        line_height: f32,
        indent: f32,
    },
}

impl DrawInstruction {
    pub fn layer(&self) -> Layer {
        match self {
            DrawInstruction::Image { layer, .. } | DrawInstruction::Placeholder { layer, .. } => {
                *layer
            }
            DrawInstruction::Text { .. } | DrawInstruction::Bullet { .. } => Layer::Content,
        }
    }

    pub fn rect(&self) -> &Rect {
        match self {
            DrawInstruction::Image { rect, .. }
            | DrawInstruction::Placeholder { rect, .. }
            | DrawInstruction::Text { rect, .. }
            | DrawInstruction::Bullet { rect, .. } => rect,
        }
    }

    /// Section a content instruction belongs to.
    pub fn section(&self) -> Option<SectionId> {
        match self {
            DrawInstruction::Text { section, .. } | DrawInstruction::Bullet { section, .. } => {
                Some(*section)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    pub instructions: Vec<DrawInstruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDescription {
    pub generation_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Page>,
}
