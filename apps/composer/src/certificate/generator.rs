//! Certificate generation pipeline.
//!
//! 1. Reserve footer space on the frame
//! 2. Build sections from the record
//! 3. Resolve overflow (compaction, deferral, or fatal)
//! 4. Position everything into a document description
//!
//! Synchronous and CPU-bound. Handlers run it inside `spawn_blocking`.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::certificate::sections::build_sections;
use crate::errors::LayoutError;
use crate::layout::frame::LayoutFrame;
use crate::layout::positioner::{position, reserve_footer};
use crate::layout::resolver::{resolve, OutcomeKind, ResolvedLayout};
use crate::layout::section::{Section, SectionId};
use crate::layout::styles::{StyleCatalog, StyleVariant};
use crate::models::certificate::{CertificateAssets, CertificateRecord};
use crate::models::document::DocumentDescription;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// Where one section ended up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionPlacement {
    pub section: SectionId,
    /// 0 for the primary page, 1 for a deferred section.
    pub page: usize,
    pub start_y: f32,
    pub height: f32,
}

/// How the layout was reached, for callers and logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub outcome: OutcomeKind,
    pub variant: StyleVariant,
    pub compacted: bool,
    pub deferred_sections: Vec<SectionId>,
    pub content_bottom_limit: f32,
    pub sections: Vec<SectionPlacement>,
}

impl LayoutSummary {
    /// Placements are listed in section order, whichever page they landed on.
    fn new(
        outcome: OutcomeKind,
        resolved: &ResolvedLayout,
        sections: &[Section],
        frame: &LayoutFrame,
    ) -> Self {
        let placements = sections
            .iter()
            .filter_map(|section| {
                let (page, result) = match resolved.primary_result(section.id) {
                    Some(result) => (0, result),
                    None => (1, resolved.deferred.as_ref().filter(|r| r.section == section.id)?),
                };
                Some(SectionPlacement {
                    section: section.id,
                    page,
                    start_y: result.start_y,
                    height: result.height,
                })
            })
            .collect();

        Self {
            outcome,
            variant: resolved.variant(),
            compacted: resolved.is_compacted(),
            deferred_sections: resolved.deferred_sections(),
            content_bottom_limit: frame.content_bottom_limit,
            sections: placements,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedCertificate {
    pub summary: LayoutSummary,
    pub document: DocumentDescription,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Lays out one certificate.
///
/// `catalog` is the shared normal catalog and `frame` the base page geometry;
/// neither is modified. A mandatory section that cannot fit even with compact
/// styles aborts with `LayoutError::ContentOverflowFatal`; no partial document
/// is produced.
pub fn compose_certificate(
    record: &CertificateRecord,
    assets: &CertificateAssets,
    catalog: &StyleCatalog,
    frame: &LayoutFrame,
) -> Result<ComposedCertificate, LayoutError> {
    let frame = reserve_footer(frame, assets.footer.as_ref());
    let sections = build_sections(record, &frame);

    let resolution = resolve(&sections, catalog, &frame);
    let outcome = resolution.kind();
    let resolved = resolution.into_result()?;

    let summary = LayoutSummary::new(outcome, &resolved, &sections, &frame);
    let document = position(&resolved, &sections, assets, &frame);

    info!(
        generation_id = %document.generation_id,
        outcome = ?summary.outcome,
        compacted = summary.compacted,
        deferred = summary.deferred_sections.len(),
        pages = document.pages.len(),
        "Certificate composed"
    );

    Ok(ComposedCertificate { summary, document })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::frame::default_frame;
    use crate::layout::styles::StyleId;
    use crate::models::certificate::ImageAsset;
    use crate::models::document::DrawInstruction;

    fn record(theory: usize, practice: usize, manual: Option<String>) -> CertificateRecord {
        CertificateRecord {
            student_full_name: Some("Ana Souza".into()),
            document_type_label: Some("Certificate".into()),
            document_number: Some("2024-0042".into()),
            primary_date: Some("2024-05-01".into()),
            secondary_date: Some("2026-05-01".into()),
            location_label: Some("Lisbon".into()),
            duration_label: Some("16 hours".into()),
            training_title: Some("Working at Heights".into()),
            theory_items: (0..theory).map(|i| format!("Theory module {i}")).collect(),
            practice_items: (0..practice).map(|i| format!("Practice drill {i}")).collect(),
            manual_text: manual,
            organization_name: Some("Safety Institute".into()),
            trainer_name: Some("J. Doe".into()),
        }
    }

    fn compose(record: &CertificateRecord) -> Result<ComposedCertificate, LayoutError> {
        let catalog = StyleCatalog::standard().unwrap();
        compose_certificate(record, &CertificateAssets::default(), &catalog, &default_frame())
    }

    fn placement(summary: &LayoutSummary, section: SectionId) -> SectionPlacement {
        *summary
            .sections
            .iter()
            .find(|p| p.section == section)
            .unwrap()
    }

    // ── outcomes ────────────────────────────────────────────────────────────

    #[test]
    fn test_short_certificate_is_normal() {
        let composed = compose(&record(4, 3, None)).unwrap();
        let summary = &composed.summary;

        assert_eq!(summary.outcome, OutcomeKind::Normal);
        assert!(!summary.compacted);
        assert!(summary.deferred_sections.is_empty());
        assert_eq!(placement(summary, SectionId::Manual).height, 0.0);
        assert_eq!(composed.document.pages.len(), 1);
    }

    #[test]
    fn test_long_manual_goes_to_second_page() {
        let manual = "Safety manual text. ".repeat(100);
        let composed = compose(&record(4, 3, Some(manual))).unwrap();
        let summary = &composed.summary;

        assert_eq!(summary.outcome, OutcomeKind::Remediated);
        assert!(!summary.compacted);
        assert_eq!(summary.deferred_sections, vec![SectionId::Manual]);
        assert_eq!(placement(summary, SectionId::Theory).page, 0);
        assert_eq!(placement(summary, SectionId::Practice).page, 0);
        assert_eq!(placement(summary, SectionId::Manual).page, 1);
        assert_eq!(composed.document.pages.len(), 2);
    }

    #[test]
    fn test_many_modules_trigger_compaction() {
        let composed = compose(&record(19, 3, None)).unwrap();
        let summary = &composed.summary;

        assert_eq!(summary.outcome, OutcomeKind::Remediated);
        assert!(summary.compacted);
        assert_eq!(summary.variant, StyleVariant::Compact);
        assert!(summary.deferred_sections.is_empty());
        for p in &summary.sections {
            assert!(p.start_y + p.height <= summary.content_bottom_limit);
        }
    }

    #[test]
    fn test_compacted_certificate_is_drawn_with_compact_styles() {
        let normal = StyleCatalog::standard().unwrap();
        let compact = normal.compacted();
        let composed = compose(&record(19, 3, None)).unwrap();
        assert!(composed.summary.compacted);

        let mut bullets = 0;
        for instruction in &composed.document.pages[0].instructions {
            match instruction {
                DrawInstruction::Bullet { font_size, .. } => {
                    bullets += 1;
                    assert_eq!(*font_size, compact.get(StyleId::ListItem).font_size);
                }
                DrawInstruction::Text { text, font_size, .. } if text == "CERTIFICATE" => {
                    assert_eq!(*font_size, compact.get(StyleId::Title).font_size);
                }
                DrawInstruction::Text { text, font_size, .. } if text == "Ana Souza" => {
                    assert_eq!(*font_size, compact.get(StyleId::RecipientName).font_size);
                }
                _ => {}
            }
        }
        assert_eq!(bullets, 22);
    }

    #[test]
    fn test_summary_lists_sections_in_layout_order() {
        let manual = "Safety manual text. ".repeat(100);
        let composed = compose(&record(4, 3, Some(manual))).unwrap();
        let ids: Vec<SectionId> = composed.summary.sections.iter().map(|p| p.section).collect();
        assert_eq!(
            ids,
            vec![
                SectionId::Header,
                SectionId::Recipient,
                SectionId::Theory,
                SectionId::Practice,
                SectionId::Closing,
                SectionId::Manual,
            ]
        );
    }

    #[test]
    fn test_too_many_modules_is_fatal() {
        let err = compose(&record(200, 3, None)).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::ContentOverflowFatal {
                section: SectionId::Theory,
                ..
            }
        ));
    }

    // ── pipeline details ────────────────────────────────────────────────────

    #[test]
    fn test_footer_lowers_content_limit() {
        let catalog = StyleCatalog::standard().unwrap();
        let frame = default_frame();
        let assets = CertificateAssets {
            footer: Some(ImageAsset::reference("footer.png", Some((1190.56, 160.0)))),
            ..Default::default()
        };
        let composed = compose_certificate(&record(4, 3, None), &assets, &catalog, &frame).unwrap();

        // 1190.56 × 160 scaled to the page width → 80pt tall
        let expected = frame.page_height - 80.0 - frame.footer_gap;
        assert!((composed.summary.content_bottom_limit - expected).abs() < 1e-2);
        assert!(composed.summary.content_bottom_limit < frame.content_bottom_limit);
    }

    #[test]
    fn test_recipient_respects_floor() {
        let composed = compose(&record(4, 3, None)).unwrap();
        let recipient = placement(&composed.summary, SectionId::Recipient);
        assert!(recipient.start_y >= crate::certificate::sections::RECIPIENT_FLOOR_Y);
    }

    #[test]
    fn test_each_call_gets_fresh_generation_id() {
        let a = compose(&record(4, 3, None)).unwrap();
        let b = compose(&record(4, 3, None)).unwrap();
        assert_ne!(a.document.generation_id, b.document.generation_id);
        assert_eq!(a.summary, b.summary);
    }
}
