//! Content model consumed by the planner: sections made of paragraph, list and
//! group blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::styles::{Margins, StyleId};

/// Identifies a certificate section. Declaration order is layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Header,
    Recipient,
    Theory,
    Practice,
    Closing,
    Manual,
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionId::Header => "header",
            SectionId::Recipient => "recipient",
            SectionId::Theory => "theory",
            SectionId::Practice => "practice",
            SectionId::Closing => "closing",
            SectionId::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Whether a section must stay on the primary page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Mandatory,
    /// May be relocated to a secondary page when it does not fit.
    Optional,
}

/// A unit of content inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Paragraph {
        text: String,
        style: StyleId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        margin_override: Option<Margins>,
    },
    List {
        items: Vec<String>,
        style: StyleId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        margin_override: Option<Margins>,
    },
    /// Children stacked vertically. A group has no margin of its own.
    Group { children: Vec<ContentBlock> },
}

impl ContentBlock {
    pub fn paragraph(text: impl Into<String>, style: StyleId) -> Self {
        ContentBlock::Paragraph {
            text: text.into(),
            style,
            margin_override: None,
        }
    }

    pub fn list(items: Vec<String>, style: StyleId) -> Self {
        ContentBlock::List {
            items,
            style,
            margin_override: None,
        }
    }

    pub fn group(children: Vec<ContentBlock>) -> Self {
        ContentBlock::Group { children }
    }

    /// Replaces the style margin for this block. No effect on groups.
    pub fn with_margin(mut self, margin: Margins) -> Self {
        match &mut self {
            ContentBlock::Paragraph {
                margin_override, ..
            }
            | ContentBlock::List {
                margin_override, ..
            } => *margin_override = Some(margin),
            ContentBlock::Group { .. } => {}
        }
        self
    }
}

/// A named, ordered group of blocks laid out as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub requirement: Requirement,
    /// Column width available to every block in the section, in points.
    pub width: f32,
    /// The section never starts above this y coordinate.
    pub floor_y: Option<f32>,
    pub blocks: Vec<ContentBlock>,
}

impl Section {
    pub fn mandatory(id: SectionId, width: f32) -> Self {
        Self {
            id,
            requirement: Requirement::Mandatory,
            width,
            floor_y: None,
            blocks: Vec::new(),
        }
    }

    pub fn optional(id: SectionId, width: f32) -> Self {
        Self {
            requirement: Requirement::Optional,
            ..Self::mandatory(id, width)
        }
    }

    pub fn with_floor(mut self, floor_y: f32) -> Self {
        self.floor_y = Some(floor_y);
        self
    }

    pub fn block(mut self, block: ContentBlock) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn is_mandatory(&self) -> bool {
        self.requirement == Requirement::Mandatory
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_margin_sets_override() {
        let block = ContentBlock::paragraph("x", StyleId::Body).with_margin(Margins::vertical(2.0, 3.0));
        match block {
            ContentBlock::Paragraph {
                margin_override, ..
            } => assert_eq!(margin_override, Some(Margins::vertical(2.0, 3.0))),
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn test_optional_section_keeps_geometry() {
        let s = Section::optional(SectionId::Manual, 435.0).with_floor(90.0);
        assert!(!s.is_mandatory());
        assert_eq!(s.floor_y, Some(90.0));
        assert!(s.is_empty());
    }

    #[test]
    fn test_block_serializes_with_kind_tag() {
        let json = serde_json::to_value(ContentBlock::list(vec!["a".into()], StyleId::ListItem)).unwrap();
        assert_eq!(json["kind"], "list");
        assert_eq!(json["style"], "list_item");
        assert!(json.get("margin_override").is_none());
    }
}
