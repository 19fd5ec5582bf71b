//! Layout planner: stacks sections top-to-bottom and measures them.
//!
//! Pure and deterministic: the same sections, catalog, anchor and frame always
//! produce the same results. Sections keep their input order, and each one starts
//! at `max(cursor, floor_y)`, so a floor can push a section down but never pull
//! it above the previous section's extent.

use serde::{Deserialize, Serialize};

use crate::layout::estimator::{estimate_list_height, estimate_paragraph_height};
use crate::layout::frame::LayoutFrame;
use crate::layout::section::{ContentBlock, Section, SectionId};
use crate::layout::styles::{Margins, StyleCatalog};

/// Placement of one section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub section: SectionId,
    pub start_y: f32,
    pub height: f32,
    /// True when the section extends past `content_bottom_limit`. A zero-height
    /// section never overflows.
    pub overflowed: bool,
}

impl LayoutResult {
    pub fn end_y(&self) -> f32 {
        self.start_y + self.height
    }
}

/// Plans every section in order, starting at `start_anchor_y`.
pub fn plan_layout(
    sections: &[Section],
    catalog: &StyleCatalog,
    start_anchor_y: f32,
    frame: &LayoutFrame,
) -> Vec<LayoutResult> {
    let mut cursor_y = start_anchor_y;

    sections
        .iter()
        .map(|section| {
            let height = section_height(section, catalog);
            let start_y = cursor_y.max(section.floor_y.unwrap_or(0.0));
            cursor_y = start_y + height + frame.section_gap;

            LayoutResult {
                section: section.id,
                start_y,
                height,
                overflowed: height > 0.0 && start_y + height > frame.content_bottom_limit,
            }
        })
        .collect()
}

/// Total height of a section: the sum of its blocks' outer extents.
pub fn section_height(section: &Section, catalog: &StyleCatalog) -> f32 {
    section
        .blocks
        .iter()
        .map(|block| block_extent(block, section.width, catalog))
        .sum()
}

/// Height of a block including its vertical margins.
pub fn block_extent(block: &ContentBlock, width: f32, catalog: &StyleCatalog) -> f32 {
    let margin = block_margin(block, catalog);
    margin.top + intrinsic_height(block, inner_width(width, &margin), catalog) + margin.bottom
}

/// Where one block sits inside its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockPlacement {
    /// Left edge of the block's content, relative to the container.
    pub offset_x: f32,
    /// Top of the block's content (below its top margin), relative to the
    /// container's top.
    pub offset_y: f32,
    /// Content width, with horizontal margins taken off.
    pub width: f32,
    /// Content height, without margins.
    pub height: f32,
}

/// Places `blocks` one under the other inside a container of `width` points.
/// The last placement's `offset_y + height + margin.bottom` equals the summed
/// block extents, so callers stay in step with `section_height`.
pub fn plan_blocks(blocks: &[ContentBlock], width: f32, catalog: &StyleCatalog) -> Vec<BlockPlacement> {
    let mut cursor_y = 0.0;

    blocks
        .iter()
        .map(|block| {
            let margin = block_margin(block, catalog);
            let width = inner_width(width, &margin);
            let height = intrinsic_height(block, width, catalog);
            let placement = BlockPlacement {
                offset_x: margin.left,
                offset_y: cursor_y + margin.top,
                width,
                height,
            };
            cursor_y = placement.offset_y + height + margin.bottom;
            placement
        })
        .collect()
}

fn inner_width(width: f32, margin: &Margins) -> f32 {
    (width - margin.left - margin.right).max(0.0)
}

/// The margin a block is laid out with: its override, else its style's margin.
pub fn block_margin(block: &ContentBlock, catalog: &StyleCatalog) -> Margins {
    match block {
        ContentBlock::Paragraph {
            style,
            margin_override,
            ..
        }
        | ContentBlock::List {
            style,
            margin_override,
            ..
        } => margin_override.unwrap_or(catalog.get(*style).margin),
        ContentBlock::Group { .. } => Margins::ZERO,
    }
}

/// Height of a block's content, without margins.
pub fn intrinsic_height(block: &ContentBlock, width: f32, catalog: &StyleCatalog) -> f32 {
    match block {
        ContentBlock::Paragraph { text, style, .. } => {
            let def = catalog.get(*style);
            estimate_paragraph_height(text, width, def.font_size, def.line_height)
        }
        ContentBlock::List { items, style, .. } => {
            let def = catalog.get(*style);
            estimate_list_height(
                items,
                width,
                def.font_size,
                def.line_height,
                def.item_spacing,
                def.bullet_indent,
            )
        }
        ContentBlock::Group { children } => children
            .iter()
            .map(|child| block_extent(child, width, catalog))
            .sum(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::frame::default_frame;
    use crate::layout::styles::{StyleDefinition, StyleId};

    fn catalog() -> StyleCatalog {
        StyleCatalog::builder()
            .style(
                StyleId::Body,
                StyleDefinition::text(10.0, 1.0, Margins::vertical(2.0, 3.0)),
            )
            .style(
                StyleId::ListItem,
                StyleDefinition::text(10.0, 1.0, Margins::ZERO).list(2.0, 10.0),
            )
            .build()
            .unwrap()
    }

    fn one_line(id: SectionId) -> Section {
        Section::mandatory(id, 400.0).block(ContentBlock::paragraph("short", StyleId::Body))
    }

    // ── block heights ───────────────────────────────────────────────────────

    #[test]
    fn test_paragraph_extent_includes_margins() {
        let block = ContentBlock::paragraph("short", StyleId::Body);
        assert_eq!(block_extent(&block, 400.0, &catalog()), 15.0);
    }

    #[test]
    fn test_margin_override_replaces_style_margin() {
        let block = ContentBlock::paragraph("short", StyleId::Body).with_margin(Margins::vertical(10.0, 0.0));
        assert_eq!(block_extent(&block, 400.0, &catalog()), 20.0);
    }

    #[test]
    fn test_group_sums_children() {
        let group = ContentBlock::group(vec![
            ContentBlock::paragraph("a", StyleId::Body),
            ContentBlock::list(vec!["b".into(), "c".into()], StyleId::ListItem),
        ]);
        // 15 + 2 × (10 + 2)
        assert_eq!(block_extent(&group, 400.0, &catalog()), 39.0);
    }

    #[test]
    fn test_empty_section_has_zero_height() {
        let section = Section::optional(SectionId::Manual, 400.0);
        assert_eq!(section_height(&section, &catalog()), 0.0);
    }

    #[test]
    fn test_horizontal_margins_narrow_the_block() {
        // 40 chars at 10pt: 76 per line at 400pt, 15 per line at 80pt
        let block = ContentBlock::paragraph("x".repeat(40), StyleId::Body)
            .with_margin(Margins::new(0.0, 200.0, 0.0, 120.0));
        assert_eq!(block_extent(&block, 400.0, &catalog()), 30.0);
    }

    // ── plan_blocks ─────────────────────────────────────────────────────────

    #[test]
    fn test_plan_blocks_stacks_with_margins() {
        let blocks = vec![
            ContentBlock::paragraph("a", StyleId::Body),
            ContentBlock::paragraph("b", StyleId::Body).with_margin(Margins::new(6.0, 10.0, 0.0, 20.0)),
        ];
        let placed = plan_blocks(&blocks, 400.0, &catalog());

        assert_eq!(placed[0].offset_y, 2.0);
        assert_eq!(placed[0].height, 10.0);
        assert_eq!(placed[0].width, 400.0);
        // 2 + 10 + 3, then the override's top margin
        assert_eq!(placed[1].offset_y, 21.0);
        assert_eq!(placed[1].offset_x, 20.0);
        assert_eq!(placed[1].width, 370.0);
    }

    #[test]
    fn test_plan_blocks_matches_section_height() {
        let section = Section::mandatory(SectionId::Theory, 400.0)
            .block(ContentBlock::paragraph("Theory", StyleId::Body))
            .block(ContentBlock::list(vec!["a".into(), "b".into()], StyleId::ListItem))
            .block(ContentBlock::group(vec![
                ContentBlock::paragraph("c", StyleId::Body),
                ContentBlock::paragraph("d".repeat(200), StyleId::Body),
            ]));
        let catalog = catalog();
        let placed = plan_blocks(&section.blocks, section.width, &catalog);
        let last_block = section.blocks.last().unwrap();
        let last = placed.last().unwrap();

        let bottom = last.offset_y + last.height + block_margin(last_block, &catalog).bottom;
        assert!((bottom - section_height(&section, &catalog)).abs() < 1e-3);
    }

    #[test]
    fn test_plan_blocks_empty() {
        assert!(plan_blocks(&[], 400.0, &catalog()).is_empty());
    }

    // ── plan_layout ─────────────────────────────────────────────────────────

    #[test]
    fn test_sections_stack_with_gap() {
        let frame = default_frame();
        let sections = vec![one_line(SectionId::Header), one_line(SectionId::Theory)];
        let results = plan_layout(&sections, &catalog(), 100.0, &frame);

        assert_eq!(results[0].start_y, 100.0);
        assert_eq!(results[0].height, 15.0);
        assert_eq!(results[1].start_y, 100.0 + 15.0 + frame.section_gap);
        assert!(results.iter().all(|r| !r.overflowed));
    }

    #[test]
    fn test_floor_pushes_section_down() {
        let frame = default_frame();
        let sections = vec![
            one_line(SectionId::Header),
            one_line(SectionId::Recipient).with_floor(300.0),
        ];
        let results = plan_layout(&sections, &catalog(), 100.0, &frame);
        assert_eq!(results[1].start_y, 300.0);
    }

    #[test]
    fn test_floor_never_pulls_section_up() {
        let frame = default_frame();
        let tall = Section::mandatory(SectionId::Header, 400.0)
            .block(ContentBlock::paragraph("x".repeat(2000), StyleId::Body));
        let sections = vec![tall, one_line(SectionId::Recipient).with_floor(110.0)];
        let results = plan_layout(&sections, &catalog(), 100.0, &frame);

        assert!(results[1].start_y >= results[0].end_y() + frame.section_gap);
    }

    #[test]
    fn test_results_keep_input_order_and_never_overlap() {
        let frame = default_frame();
        let sections = vec![
            one_line(SectionId::Header),
            one_line(SectionId::Recipient).with_floor(150.0),
            one_line(SectionId::Theory),
            one_line(SectionId::Practice).with_floor(120.0),
        ];
        let results = plan_layout(&sections, &catalog(), 100.0, &frame);

        let ids: Vec<SectionId> = results.iter().map(|r| r.section).collect();
        assert_eq!(
            ids,
            vec![
                SectionId::Header,
                SectionId::Recipient,
                SectionId::Theory,
                SectionId::Practice
            ]
        );
        for pair in results.windows(2) {
            assert!(pair[1].start_y >= pair[0].end_y());
        }
    }

    #[test]
    fn test_overflow_flagged_past_limit() {
        let frame = default_frame();
        let tall = Section::mandatory(SectionId::Theory, 400.0)
            .block(ContentBlock::paragraph("x".repeat(20_000), StyleId::Body));
        let results = plan_layout(&[tall], &catalog(), 100.0, &frame);
        assert!(results[0].overflowed);
    }

    #[test]
    fn test_empty_section_below_limit_is_not_overflow() {
        let frame = default_frame();
        let empty = Section::optional(SectionId::Manual, 400.0);
        let results = plan_layout(&[empty], &catalog(), frame.content_bottom_limit + 50.0, &frame);
        assert_eq!(results[0].height, 0.0);
        assert!(!results[0].overflowed);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let frame = default_frame();
        let sections = vec![one_line(SectionId::Header), one_line(SectionId::Theory)];
        let a = plan_layout(&sections, &catalog(), 100.0, &frame);
        let b = plan_layout(&sections, &catalog(), 100.0, &frame);
        assert_eq!(a, b);
    }
}
