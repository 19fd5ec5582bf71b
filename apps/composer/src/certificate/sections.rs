//! Maps a certificate record onto layout sections.

use crate::layout::frame::LayoutFrame;
use crate::layout::section::{ContentBlock, Section, SectionId};
use crate::layout::styles::{Margins, StyleId};
use crate::models::certificate::CertificateRecord;

/// Printed in place of a blank field so the document can be completed by hand.
pub const PLACEHOLDER: &str = "________________";

/// The recipient block never starts above this y, whatever the header height.
pub const RECIPIENT_FLOOR_Y: f32 = 190.0;
/// Floor of the manual section, on whichever page it lands.
pub const MANUAL_FLOOR_Y: f32 = 90.0;

/// Extra space above the place/date line, kept at full size under compaction.
pub const CLOSING_TOP_SPACING: f32 = 10.0;

pub const INTRO_TEXT: &str = "This is to certify that";
pub const COMPLETION_TEXT: &str = "has successfully completed the training";
pub const THEORY_HEADING: &str = "Theoretical modules";
pub const PRACTICE_HEADING: &str = "Practical modules";

/// Builds the certificate sections in layout order. Only the trailing manual
/// section is optional.
pub fn build_sections(record: &CertificateRecord, frame: &LayoutFrame) -> Vec<Section> {
    let width = frame.content_width();

    vec![
        header(record, width),
        recipient(record, width),
        module_list(SectionId::Theory, THEORY_HEADING, &record.theory_items, width),
        module_list(SectionId::Practice, PRACTICE_HEADING, &record.practice_items, width),
        closing(record, width),
        manual(record, width),
    ]
}

fn header(record: &CertificateRecord, width: f32) -> Section {
    Section::mandatory(SectionId::Header, width)
        .block(ContentBlock::paragraph(
            field(&record.document_type_label).to_uppercase(),
            StyleId::Title,
        ))
        .block(ContentBlock::paragraph(
            format!("No. {}", field(&record.document_number)),
            StyleId::DocumentNumber,
        ))
}

fn recipient(record: &CertificateRecord, width: f32) -> Section {
    let info = ContentBlock::group(vec![
        info_line("Completion date", &record.primary_date),
        info_line("Valid until", &record.secondary_date),
        info_line("Location", &record.location_label),
        info_line("Duration", &record.duration_label),
    ]);

    Section::mandatory(SectionId::Recipient, width)
        .with_floor(RECIPIENT_FLOOR_Y)
        .block(ContentBlock::paragraph(INTRO_TEXT, StyleId::Intro))
        .block(ContentBlock::paragraph(
            field(&record.student_full_name),
            StyleId::RecipientName,
        ))
        .block(ContentBlock::paragraph(COMPLETION_TEXT, StyleId::Body))
        .block(ContentBlock::paragraph(
            field(&record.training_title),
            StyleId::TrainingTitle,
        ))
        .block(info)
}

fn info_line(label: &str, value: &Option<String>) -> ContentBlock {
    ContentBlock::paragraph(format!("{label}: {}", field(value)), StyleId::InfoLine)
}

fn module_list(id: SectionId, heading: &str, items: &[String], width: f32) -> Section {
    let mut items: Vec<String> = items
        .iter()
        .map(|item| normalize(item))
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        items.push(PLACEHOLDER.to_string());
    }

    Section::mandatory(id, width)
        .block(ContentBlock::paragraph(heading, StyleId::SectionHeading))
        .block(ContentBlock::list(items, StyleId::ListItem))
}

fn closing(record: &CertificateRecord, width: f32) -> Section {
    let place_and_date = format!(
        "{}, {}",
        field(&record.location_label),
        field(&record.primary_date)
    );

    Section::mandatory(SectionId::Closing, width)
        .block(
            ContentBlock::paragraph(place_and_date, StyleId::Body)
                .with_margin(Margins::vertical(CLOSING_TOP_SPACING, 4.0)),
        )
        .block(ContentBlock::paragraph(
            field(&record.organization_name),
            StyleId::Signature,
        ))
        .block(ContentBlock::paragraph(
            format!("Trainer: {}", field(&record.trainer_name)),
            StyleId::InfoLine,
        ))
}

/// A blank manual yields a section with no blocks, which takes no height.
fn manual(record: &CertificateRecord, width: f32) -> Section {
    let section = Section::optional(SectionId::Manual, width).with_floor(MANUAL_FLOOR_Y);
    match record.manual_text.as_deref().map(normalize) {
        Some(text) if !text.is_empty() => {
            section.block(ContentBlock::paragraph(text, StyleId::Manual))
        }
        _ => section,
    }
}

/// Trimmed value of an optional field, or the placeholder when blank.
fn field(value: &Option<String>) -> String {
    match value.as_deref().map(normalize) {
        Some(text) if !text.is_empty() => text,
        _ => PLACEHOLDER.to_string(),
    }
}

/// Unifies line endings to `\n` and trims surrounding whitespace.
fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
