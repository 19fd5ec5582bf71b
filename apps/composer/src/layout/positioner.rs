//! Page positioner: turns a resolved layout into absolute draw instructions.
//!
//! Each page is painted in three layers: background (page image, sidebar),
//! content (sections top-to-bottom), overlay (logo, footer). A deferred section
//! gets a page of its own carrying the same decorations.

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::layout::estimator::estimate_paragraph_height;
use crate::layout::frame::LayoutFrame;
use crate::layout::planner::{plan_blocks, LayoutResult};
use crate::layout::resolver::ResolvedLayout;
use crate::layout::section::{ContentBlock, Section, SectionId};
use crate::layout::styles::StyleCatalog;
use crate::models::certificate::{CertificateAssets, ImageAsset, IntrinsicSize};
use crate::models::document::{AssetRole, DocumentDescription, DrawInstruction, Layer, Page, Rect};

/// Tallest the footer band may get, in points.
pub const FOOTER_MAX_HEIGHT: f32 = 80.0;
/// Box the logo is fitted into, right-aligned under the top margin.
pub const LOGO_MAX_WIDTH: f32 = 140.0;
pub const LOGO_MAX_HEIGHT: f32 = 60.0;

// ────────────────────────────────────────────────────────────────────────────
// Image scaling
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledSize {
    pub width: f32,
    pub height: f32,
    /// The intrinsic size was unknown or unusable and the box was filled as-is.
    pub degraded: bool,
}

/// Fits an image into `(max_width, max_height)` keeping its aspect ratio.
///
/// Width is tried first; if the resulting height does not fit, the height
/// constrains instead.
pub fn scale_to_fit(intrinsic: Option<IntrinsicSize>, max_width: f32, max_height: f32) -> ScaledSize {
    match intrinsic {
        Some(size) if size.is_usable() => {
            let mut scale = max_width / size.width;
            if size.height * scale > max_height {
                scale = max_height / size.height;
            }
            ScaledSize {
                width: size.width * scale,
                height: size.height * scale,
                degraded: false,
            }
        }
        _ => ScaledSize {
            width: max_width,
            height: max_height,
            degraded: true,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Footer reservation
// ────────────────────────────────────────────────────────────────────────────

/// Where the footer goes: full page width, anchored to the bottom edge.
/// Without a footer image the slot is the safe-bottom strip.
pub fn footer_box(frame: &LayoutFrame, footer: Option<&ImageAsset>) -> (Rect, bool) {
    match footer {
        Some(asset) => {
            let size = scale_to_fit(asset.intrinsic, frame.page_width, FOOTER_MAX_HEIGHT);
            let rect = Rect::new(
                (frame.page_width - size.width) / 2.0,
                frame.page_height - size.height,
                size.width,
                size.height,
            );
            (rect, size.degraded)
        }
        None => (
            Rect::new(
                0.0,
                frame.page_height - frame.safe_bottom_offset,
                frame.page_width,
                frame.safe_bottom_offset,
            ),
            false,
        ),
    }
}

/// Lowers the content limit so sections stay clear of the footer image.
/// Must run before planning.
pub fn reserve_footer(frame: &LayoutFrame, footer: Option<&ImageAsset>) -> LayoutFrame {
    if footer.is_none() {
        return *frame;
    }
    let (rect, _) = footer_box(frame, footer);
    let reserved = frame.with_footer_reserved(rect.height);
    debug!(
        footer_height = rect.height,
        content_bottom_limit = reserved.content_bottom_limit,
        "Footer space reserved"
    );
    reserved
}

// ────────────────────────────────────────────────────────────────────────────
// Positioning
// ────────────────────────────────────────────────────────────────────────────

/// Produces the document description for a resolved layout.
///
/// `frame` must be the frame the layout was resolved against (footer already
/// reserved) and `sections` the same list handed to the resolver.
pub fn position(
    resolved: &ResolvedLayout,
    sections: &[Section],
    assets: &CertificateAssets,
    frame: &LayoutFrame,
) -> DocumentDescription {
    let mut pages = vec![build_page(0, &resolved.primary, resolved, sections, assets, frame)];

    if let Some(deferred) = &resolved.deferred {
        pages.push(build_page(
            1,
            std::slice::from_ref(deferred),
            resolved,
            sections,
            assets,
            frame,
        ));
    }

    DocumentDescription {
        generation_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        page_width: frame.page_width,
        page_height: frame.page_height,
        pages,
    }
}

fn build_page(
    index: usize,
    placed: &[LayoutResult],
    resolved: &ResolvedLayout,
    sections: &[Section],
    assets: &CertificateAssets,
    frame: &LayoutFrame,
) -> Page {
    let mut instructions = Vec::new();

    // Background layer
    let page_rect = Rect::new(0.0, 0.0, frame.page_width, frame.page_height);
    push_stretched(&mut instructions, Layer::Background, AssetRole::Background, assets.background.as_ref(), page_rect);
    let sidebar_slot = Rect::new(0.0, 0.0, frame.sidebar_width, frame.page_height);
    push_fitted(&mut instructions, Layer::Background, AssetRole::Sidebar, assets.sidebar.as_ref(), sidebar_slot);

    // Content layer
    for result in placed {
        match sections.iter().find(|s| s.id == result.section) {
            Some(section) => {
                push_section(&mut instructions, section, result, &resolved.catalog, frame);
            }
            None => warn!(section = %result.section, "Placed section missing from section list"),
        }
    }

    // Overlay layer
    let logo_slot = Rect::new(
        frame.page_width - frame.margin_right - LOGO_MAX_WIDTH,
        frame.margin_top,
        LOGO_MAX_WIDTH,
        LOGO_MAX_HEIGHT,
    );
    push_logo(&mut instructions, assets.logo.as_ref(), logo_slot);
    let (footer_rect, degraded) = footer_box(frame, assets.footer.as_ref());
    match assets.footer.as_ref() {
        Some(asset) => {
            if degraded {
                warn!(role = ?AssetRole::Footer, "Image size unknown; stretching to its box");
            }
            instructions.push(DrawInstruction::Image {
                layer: Layer::Overlay,
                role: AssetRole::Footer,
                source: asset.source.clone(),
                rect: footer_rect,
                degraded,
            });
        }
        None => push_placeholder(&mut instructions, Layer::Overlay, AssetRole::Footer, footer_rect),
    }

    debug_assert!(
        instructions.windows(2).all(|w| w[0].layer() <= w[1].layer()),
        "instructions out of paint order"
    );
    let content_bottom = instructions
        .iter()
        .filter(|i| i.section().is_some())
        .map(|i| i.rect().bottom())
        .fold(0.0_f32, f32::max);
    debug!(
        page = index,
        instructions = instructions.len(),
        content_bottom,
        "Page positioned"
    );
    Page { index, instructions }
}

/// Background images cover the whole slot regardless of aspect ratio.
fn push_stretched(
    out: &mut Vec<DrawInstruction>,
    layer: Layer,
    role: AssetRole,
    asset: Option<&ImageAsset>,
    slot: Rect,
) {
    match asset {
        Some(asset) => out.push(DrawInstruction::Image {
            layer,
            role,
            source: asset.source.clone(),
            rect: slot,
            degraded: false,
        }),
        None => push_placeholder(out, layer, role, slot),
    }
}

/// Fits the image into the slot, anchored at its top-left corner.
fn push_fitted(
    out: &mut Vec<DrawInstruction>,
    layer: Layer,
    role: AssetRole,
    asset: Option<&ImageAsset>,
    slot: Rect,
) {
    let Some(asset) = asset else {
        push_placeholder(out, layer, role, slot);
        return;
    };
    let size = scale_to_fit(asset.intrinsic, slot.width, slot.height);
    if size.degraded {
        warn!(role = ?role, "Image size unknown; stretching to its box");
    }
    out.push(DrawInstruction::Image {
        layer,
        role,
        source: asset.source.clone(),
        rect: Rect::new(slot.x, slot.y, size.width, size.height),
        degraded: size.degraded,
    });
}

/// The logo hugs the right edge of its slot.
fn push_logo(out: &mut Vec<DrawInstruction>, asset: Option<&ImageAsset>, slot: Rect) {
    let Some(asset) = asset else {
        push_placeholder(out, Layer::Overlay, AssetRole::Logo, slot);
        return;
    };
    let size = scale_to_fit(asset.intrinsic, slot.width, slot.height);
    if size.degraded {
        warn!(role = ?AssetRole::Logo, "Image size unknown; stretching to its box");
    }
    out.push(DrawInstruction::Image {
        layer: Layer::Overlay,
        role: AssetRole::Logo,
        source: asset.source.clone(),
        rect: Rect::new(slot.x + slot.width - size.width, slot.y, size.width, size.height),
        degraded: size.degraded,
    });
}

fn push_placeholder(out: &mut Vec<DrawInstruction>, layer: Layer, role: AssetRole, rect: Rect) {
    warn!(role = ?role, "Asset missing; drawing placeholder");
    out.push(DrawInstruction::Placeholder { layer, role, rect });
}

fn push_section(
    out: &mut Vec<DrawInstruction>,
    section: &Section,
    result: &LayoutResult,
    catalog: &StyleCatalog,
    frame: &LayoutFrame,
) {
    if section.is_empty() {
        return;
    }
    push_blocks(
        out,
        section.id,
        &section.blocks,
        frame.content_left(),
        result.start_y,
        section.width,
        catalog,
    );
}

/// Emits `blocks` inside a container whose top-left corner is `(x, y)`, at
/// the offsets the planner computed.
fn push_blocks(
    out: &mut Vec<DrawInstruction>,
    section: SectionId,
    blocks: &[ContentBlock],
    x: f32,
    y: f32,
    width: f32,
    catalog: &StyleCatalog,
) {
    for (block, placed) in blocks.iter().zip(plan_blocks(blocks, width, catalog)) {
        let left = x + placed.offset_x;
        let top = y + placed.offset_y;

        match block {
            ContentBlock::Paragraph { text, style, .. } => {
                let def = catalog.get(*style);
                out.push(DrawInstruction::Text {
                    section,
                    rect: Rect::new(left, top, placed.width, placed.height),
                    text: text.clone(),
                    font_size: def.font_size,
                    line_height: def.line_height,
                    bold: def.bold,
                });
            }
            ContentBlock::List { items, style, .. } => {
                let def = catalog.get(*style);
                let mut item_y = top;
                for item in items {
                    let item_height = estimate_paragraph_height(
                        item,
                        placed.width - def.bullet_indent,
                        def.font_size,
                        def.line_height,
                    );
                    out.push(DrawInstruction::Bullet {
                        section,
                        rect: Rect::new(left, item_y, placed.width, item_height),
                        text: item.clone(),
                        font_size: def.font_size,
                        line_height: def.line_height,
                        indent: def.bullet_indent,
                    });
                    item_y += item_height + def.item_spacing;
                }
            }
            ContentBlock::Group { children } => {
                push_blocks(out, section, children, left, top, placed.width, catalog);
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
