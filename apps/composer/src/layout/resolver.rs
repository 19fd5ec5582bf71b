//! Overflow resolution: decides how the sections end up on paper.
//!
//! # Passes
//! 1. Plan with the normal catalog.
//! 2. If a mandatory section crosses the content-bottom limit, compact every
//!    style at once and plan a second (and last) time.
//! 3. A mandatory section that still overflows is fatal; nothing else is tried.
//! 4. With the mandatory sections settled, the trailing optional section either
//!    fits, or is deferred to a secondary page and planned there on its own.
//!
//! At most two planning passes run over the full section list, plus one
//! single-section pass for a deferred section.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::LayoutError;
use crate::layout::frame::LayoutFrame;
use crate::layout::planner::{plan_layout, LayoutResult};
use crate::layout::section::{Section, SectionId};
use crate::layout::styles::{StyleCatalog, StyleVariant};

// ────────────────────────────────────────────────────────────────────────────
// Outcome types
// ────────────────────────────────────────────────────────────────────────────

/// A layout that satisfies the page limit for every mandatory section.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLayout {
    /// The catalog the mandatory sections were planned with. The positioner must
    /// draw with this same catalog.
    pub catalog: StyleCatalog,
    /// Sections on the primary page, in layout order. A deferred section is not
    /// listed here.
    pub primary: Vec<LayoutResult>,
    /// The relocated section, planned from the top of a secondary page.
    pub deferred: Option<LayoutResult>,
}

impl ResolvedLayout {
    pub fn variant(&self) -> StyleVariant {
        self.catalog.variant()
    }

    pub fn is_compacted(&self) -> bool {
        self.catalog.is_compact()
    }

    pub fn deferred_sections(&self) -> Vec<SectionId> {
        self.deferred.iter().map(|r| r.section).collect()
    }

    /// Primary-page placement of a section, if it stayed there.
    pub fn primary_result(&self, section: SectionId) -> Option<&LayoutResult> {
        self.primary.iter().find(|r| r.section == section)
    }
}

/// Terminal state of the resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Normal typography, every section on the primary page.
    Normal(ResolvedLayout),
    /// Compact typography, a deferred optional section, or both.
    Remediated(ResolvedLayout),
    /// A mandatory section does not fit even with compact typography.
    Fatal { section: SectionId, overflow_by: f32 },
}

/// Short outcome label used in logs and API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Normal,
    Remediated,
    Fatal,
}

impl Resolution {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Resolution::Normal(_) => OutcomeKind::Normal,
            Resolution::Remediated(_) => OutcomeKind::Remediated,
            Resolution::Fatal { .. } => OutcomeKind::Fatal,
        }
    }

    /// Converts the fatal outcome into `LayoutError::ContentOverflowFatal`.
    pub fn into_result(self) -> Result<ResolvedLayout, LayoutError> {
        match self {
            Resolution::Normal(layout) | Resolution::Remediated(layout) => Ok(layout),
            Resolution::Fatal {
                section,
                overflow_by,
            } => Err(LayoutError::ContentOverflowFatal {
                section,
                overflow_by,
            }),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver
// ────────────────────────────────────────────────────────────────────────────

/// Resolves the layout of `sections` on `frame`, starting at `frame.content_top`.
///
/// `catalog` must be the normal catalog; it is never modified. When compaction is
/// needed a compacted copy is derived and returned inside the resolved layout.
pub fn resolve(sections: &[Section], catalog: &StyleCatalog, frame: &LayoutFrame) -> Resolution {
    let relocatable = relocatable_index(sections);

    let normal = plan_layout(sections, catalog, frame.content_top, frame);
    let (active, layout) = match first_mandatory_overflow(&normal, relocatable) {
        None => (catalog.clone(), normal),
        Some(offender) => {
            info!(
                section = %offender.section,
                overflow_by = offender.end_y() - frame.content_bottom_limit,
                "Mandatory section overflows with normal styles; retrying with compact styles"
            );
            let compact = catalog.compacted();
            let layout = plan_layout(sections, &compact, frame.content_top, frame);

            if let Some(still) = first_mandatory_overflow(&layout, relocatable) {
                let overflow_by = still.end_y() - frame.content_bottom_limit;
                warn!(
                    section = %still.section,
                    overflow_by,
                    "Mandatory section overflows even with compact styles"
                );
                return Resolution::Fatal {
                    section: still.section,
                    overflow_by,
                };
            }
            (compact, layout)
        }
    };

    let deferred = relocatable
        .filter(|&idx| layout[idx].overflowed)
        .map(|idx| defer_section(&sections[idx], &active, frame));

    let primary: Vec<LayoutResult> = layout
        .into_iter()
        .enumerate()
        .filter(|(i, _)| deferred.is_none() || Some(*i) != relocatable)
        .map(|(_, r)| r)
        .collect();

    debug!(
        variant = ?active.variant(),
        sections = primary.len(),
        deferred = deferred.is_some(),
        "Layout resolved"
    );

    let resolved = ResolvedLayout {
        catalog: active,
        primary,
        deferred,
    };

    if resolved.is_compacted() || resolved.deferred.is_some() {
        Resolution::Remediated(resolved)
    } else {
        Resolution::Normal(resolved)
    }
}

/// Index of the section that may be relocated: the last one, if it is optional.
/// An optional section anywhere else is held to the mandatory rules.
fn relocatable_index(sections: &[Section]) -> Option<usize> {
    match sections.last() {
        Some(last) if !last.is_mandatory() => Some(sections.len() - 1),
        _ => None,
    }
}

fn first_mandatory_overflow(
    layout: &[LayoutResult],
    relocatable: Option<usize>,
) -> Option<LayoutResult> {
    layout
        .iter()
        .enumerate()
        .find(|(i, r)| r.overflowed && Some(*i) != relocatable)
        .map(|(_, r)| *r)
}

/// Plans a section alone on a secondary page, honoring its own floor.
fn defer_section(section: &Section, catalog: &StyleCatalog, frame: &LayoutFrame) -> LayoutResult {
    let placed = plan_layout(std::slice::from_ref(section), catalog, frame.content_top, frame);
    let result = placed.first().copied().unwrap_or(LayoutResult {
        section: section.id,
        start_y: frame.content_top,
        height: 0.0,
        overflowed: false,
    });

    warn!(
        section = %section.id,
        height = result.height,
        "Optional section does not fit the primary page; deferring to a secondary page"
    );
    if result.overflowed {
        warn!(
            section = %section.id,
            overflow_by = result.end_y() - frame.content_bottom_limit,
            "Deferred section exceeds the secondary page as well"
        );
    }
    result
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
