//! Style catalog: named typography for every semantic role on the certificate.
//!
//! Each role is registered once with its normal definition; the compact variant
//! is derived at registration time from a per-style `CompactionDelta` and floored
//! at legibility minimums. A catalog never changes after `build()`. Switching to
//! the compact variant produces a new catalog via `compacted()`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;

/// Smallest font size compaction may produce, in points.
pub const MIN_FONT_SIZE: f32 = 7.0;
/// Smallest line-height multiplier compaction may produce.
pub const MIN_LINE_HEIGHT: f32 = 1.0;

// ────────────────────────────────────────────────────────────────────────────
// Style identifiers
// ────────────────────────────────────────────────────────────────────────────

/// Semantic role of a text block. Sections reference styles only through this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleId {
    Title,
    DocumentNumber,
    Intro,
    RecipientName,
    Body,
    TrainingTitle,
    InfoLine,
    SectionHeading,
    ListItem,
    Signature,
    Manual,
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleId::Title => "title",
            StyleId::DocumentNumber => "document_number",
            StyleId::Intro => "intro",
            StyleId::RecipientName => "recipient_name",
            StyleId::Body => "body",
            StyleId::TrainingTitle => "training_title",
            StyleId::InfoLine => "info_line",
            StyleId::SectionHeading => "section_heading",
            StyleId::ListItem => "list_item",
            StyleId::Signature => "signature",
            StyleId::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Which variant of every style a catalog hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleVariant {
    Normal,
    Compact,
}

// ────────────────────────────────────────────────────────────────────────────
// Definitions
// ────────────────────────────────────────────────────────────────────────────

/// Outer spacing around a block, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const ZERO: Margins = Margins::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Vertical-only margins.
    pub const fn vertical(top: f32, bottom: f32) -> Self {
        Self::new(top, 0.0, bottom, 0.0)
    }

    fn scaled(&self, factor: f32) -> Self {
        Self {
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
            left: self.left * factor,
        }
    }
}

/// Typography for one semantic role.
///
/// `item_spacing` and `bullet_indent` only matter for list blocks; paragraph
/// styles leave them at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleDefinition {
    pub font_size: f32,
    /// Multiplier applied to `font_size` to get the line advance.
    pub line_height: f32,
    pub margin: Margins,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub item_spacing: f32,
    #[serde(default)]
    pub bullet_indent: f32,
}

impl StyleDefinition {
    pub const fn text(font_size: f32, line_height: f32, margin: Margins) -> Self {
        Self {
            font_size,
            line_height,
            margin,
            bold: false,
            item_spacing: 0.0,
            bullet_indent: 0.0,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn list(mut self, item_spacing: f32, bullet_indent: f32) -> Self {
        self.item_spacing = item_spacing;
        self.bullet_indent = bullet_indent;
        self
    }

    /// Applies a compaction delta. Every value is ≤ its normal counterpart, and
    /// font size / line height never drop below the legibility floors (a style
    /// already under a floor keeps its normal value).
    pub fn compact(&self, delta: &CompactionDelta) -> Self {
        let font_size = (self.font_size - delta.font_size)
            .max(MIN_FONT_SIZE)
            .min(self.font_size);
        let line_height = (self.line_height - delta.line_height)
            .max(MIN_LINE_HEIGHT)
            .min(self.line_height);
        let spacing = delta.spacing_scale.clamp(0.0, 1.0);

        Self {
            font_size,
            line_height,
            margin: self.margin.scaled(delta.margin_scale.clamp(0.0, 1.0)),
            bold: self.bold,
            item_spacing: self.item_spacing * spacing,
            bullet_indent: self.bullet_indent,
        }
    }

    fn validate(&self, style: StyleId) -> Result<(), LayoutError> {
        let invalid = |reason: &str| LayoutError::InvalidStyle {
            style,
            reason: reason.to_string(),
        };
        if !(self.font_size > 0.0) {
            return Err(invalid("font_size must be positive"));
        }
        if !(self.line_height > 0.0) {
            return Err(invalid("line_height must be positive"));
        }
        let m = &self.margin;
        if [m.top, m.right, m.bottom, m.left]
            .iter()
            .any(|v| !(*v >= 0.0))
        {
            return Err(invalid("margins must be non-negative"));
        }
        if !(self.item_spacing >= 0.0) || !(self.bullet_indent >= 0.0) {
            return Err(invalid("list spacing must be non-negative"));
        }
        Ok(())
    }
}

/// How much a style shrinks under compaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompactionDelta {
    /// Points subtracted from the font size.
    pub font_size: f32,
    /// Subtracted from the line-height multiplier.
    pub line_height: f32,
    /// Factor applied to every margin (0.0–1.0).
    pub margin_scale: f32,
    /// Factor applied to list item spacing (0.0–1.0).
    pub spacing_scale: f32,
}

pub const DEFAULT_DELTA: CompactionDelta = CompactionDelta {
    font_size: 1.5,
    line_height: 0.1,
    margin_scale: 0.6,
    spacing_scale: 0.6,
};

/// Display type shrinks harder than body copy.
pub const DISPLAY_DELTA: CompactionDelta = CompactionDelta {
    font_size: 4.0,
    line_height: 0.1,
    margin_scale: 0.5,
    spacing_scale: 0.5,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct StyleEntry {
    normal: StyleDefinition,
    compact: StyleDefinition,
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

/// Fallback for a style id that was never registered.
static FALLBACK_STYLE: StyleDefinition = StyleDefinition::text(11.0, 1.2, Margins::ZERO);

/// Immutable set of style definitions, handing out either the normal or the
/// compact variant of every style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleCatalog {
    variant: StyleVariant,
    entries: BTreeMap<StyleId, StyleEntry>,
}

impl StyleCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The certificate typography used by the service.
    pub fn standard() -> Result<Self, LayoutError> {
        Self::builder()
            .style_with(
                StyleId::Title,
                StyleDefinition::text(26.0, 1.15, Margins::vertical(0.0, 6.0)).bold(),
                DISPLAY_DELTA,
            )
            .style(
                StyleId::DocumentNumber,
                StyleDefinition::text(10.0, 1.2, Margins::vertical(0.0, 4.0)),
            )
            .style(
                StyleId::Intro,
                StyleDefinition::text(11.0, 1.2, Margins::vertical(0.0, 4.0)),
            )
            .style_with(
                StyleId::RecipientName,
                StyleDefinition::text(22.0, 1.15, Margins::vertical(0.0, 6.0)).bold(),
                DISPLAY_DELTA,
            )
            .style(
                StyleId::Body,
                StyleDefinition::text(11.0, 1.25, Margins::vertical(0.0, 4.0)),
            )
            .style(
                StyleId::TrainingTitle,
                StyleDefinition::text(15.0, 1.2, Margins::vertical(0.0, 8.0)).bold(),
            )
            .style(
                StyleId::InfoLine,
                StyleDefinition::text(10.0, 1.2, Margins::vertical(0.0, 2.0)),
            )
            .style(
                StyleId::SectionHeading,
                StyleDefinition::text(13.0, 1.2, Margins::vertical(4.0, 6.0)).bold(),
            )
            .style(
                StyleId::ListItem,
                StyleDefinition::text(10.5, 1.2, Margins::ZERO).list(3.0, 14.0),
            )
            .style(
                StyleId::Signature,
                StyleDefinition::text(11.0, 1.2, Margins::vertical(0.0, 2.0)).bold(),
            )
            .style(
                StyleId::Manual,
                StyleDefinition::text(12.5, 1.18, Margins::ZERO),
            )
            .build()
    }

    pub fn variant(&self) -> StyleVariant {
        self.variant
    }

    pub fn is_compact(&self) -> bool {
        self.variant == StyleVariant::Compact
    }

    /// Returns the active variant of a style.
    pub fn get(&self, id: StyleId) -> &StyleDefinition {
        match self.entries.get(&id) {
            Some(entry) => match self.variant {
                StyleVariant::Normal => &entry.normal,
                StyleVariant::Compact => &entry.compact,
            },
            None => {
                tracing::warn!(style = %id, "Style not registered, using fallback");
                &FALLBACK_STYLE
            }
        }
    }

    /// A new catalog handing out the compact variant of every style.
    pub fn compacted(&self) -> StyleCatalog {
        StyleCatalog {
            variant: StyleVariant::Compact,
            entries: self.entries.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: Vec<(StyleId, StyleDefinition, CompactionDelta)>,
}

impl CatalogBuilder {
    /// Registers a style with the default compaction delta.
    pub fn style(self, id: StyleId, normal: StyleDefinition) -> Self {
        self.style_with(id, normal, DEFAULT_DELTA)
    }

    pub fn style_with(mut self, id: StyleId, normal: StyleDefinition, delta: CompactionDelta) -> Self {
        self.entries.push((id, normal, delta));
        self
    }

    /// Validates every definition and derives the compact variants.
    /// A style registered twice keeps its last definition.
    pub fn build(self) -> Result<StyleCatalog, LayoutError> {
        let mut entries = BTreeMap::new();
        for (id, normal, delta) in self.entries {
            normal.validate(id)?;
            let compact = normal.compact(&delta);
            entries.insert(id, StyleEntry { normal, compact });
        }
        Ok(StyleCatalog {
            variant: StyleVariant::Normal,
            entries,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STYLES: [StyleId; 11] = [
        StyleId::Title,
        StyleId::DocumentNumber,
        StyleId::Intro,
        StyleId::RecipientName,
        StyleId::Body,
        StyleId::TrainingTitle,
        StyleId::InfoLine,
        StyleId::SectionHeading,
        StyleId::ListItem,
        StyleId::Signature,
        StyleId::Manual,
    ];

    #[test]
    fn test_standard_catalog_registers_every_style() {
        let catalog = StyleCatalog::standard().unwrap();
        assert_eq!(catalog.variant(), StyleVariant::Normal);
        assert_eq!(catalog.entries.len(), ALL_STYLES.len());
    }

    #[test]
    fn test_compact_variant_never_exceeds_normal() {
        let normal = StyleCatalog::standard().unwrap();
        let compact = normal.compacted();
        for id in ALL_STYLES {
            let n = normal.get(id);
            let c = compact.get(id);
            assert!(c.font_size <= n.font_size, "{id}: font grew");
            assert!(c.line_height <= n.line_height, "{id}: line height grew");
            assert!(c.margin.top <= n.margin.top && c.margin.bottom <= n.margin.bottom);
            assert!(c.item_spacing <= n.item_spacing);
            assert!(c.font_size >= MIN_FONT_SIZE.min(n.font_size));
            assert!(c.line_height >= MIN_LINE_HEIGHT.min(n.line_height));
        }
    }

    #[test]
    fn test_compacted_leaves_original_untouched() {
        let normal = StyleCatalog::standard().unwrap();
        let before = normal.clone();
        let compact = normal.compacted();
        assert_eq!(normal, before);
        assert!(compact.is_compact());
        assert!(!normal.is_compact());
        assert!(compact.get(StyleId::Manual).font_size < normal.get(StyleId::Manual).font_size);
    }

    #[test]
    fn test_compaction_floors_small_fonts() {
        let tiny = StyleDefinition::text(7.5, 1.05, Margins::ZERO);
        let c = tiny.compact(&DEFAULT_DELTA);
        assert_eq!(c.font_size, MIN_FONT_SIZE);
        assert_eq!(c.line_height, MIN_LINE_HEIGHT);

        let below_floor = StyleDefinition::text(6.0, 0.9, Margins::ZERO);
        let c = below_floor.compact(&DEFAULT_DELTA);
        assert_eq!(c.font_size, 6.0, "already below the floor keeps normal value");
        assert_eq!(c.line_height, 0.9);
    }

    #[test]
    fn test_build_rejects_non_positive_font_size() {
        let err = StyleCatalog::builder()
            .style(StyleId::Body, StyleDefinition::text(0.0, 1.2, Margins::ZERO))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidStyle {
                style: StyleId::Body,
                ..
            }
        ));
    }

    #[test]
    fn test_build_rejects_negative_margin() {
        let result = StyleCatalog::builder()
            .style(
                StyleId::Body,
                StyleDefinition::text(11.0, 1.2, Margins::vertical(-1.0, 0.0)),
            )
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_unregistered_style_uses_fallback() {
        let catalog = StyleCatalog::builder().build().unwrap();
        assert_eq!(*catalog.get(StyleId::Body), FALLBACK_STYLE);
    }
}
