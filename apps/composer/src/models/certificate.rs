use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Canonical certificate data, already resolved from whatever record shape the
/// caller stores. Every scalar is optional here; blanks render as placeholders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateRecord {
    pub student_full_name: Option<String>,
    /// e.g. "Certificate of Completion".
    pub document_type_label: Option<String>,
    pub document_number: Option<String>,
    /// Completion date.
    pub primary_date: Option<String>,
    /// Validity or expiry date.
    pub secondary_date: Option<String>,
    pub location_label: Option<String>,
    pub duration_label: Option<String>,
    pub training_title: Option<String>,
    pub theory_items: Vec<String>,
    pub practice_items: Vec<String>,
    /// Free text printed after the closing block; may be relocated to a second page.
    pub manual_text: Option<String>,
    pub organization_name: Option<String>,
    pub trainer_name: Option<String>,
}

/// Where an image's bytes live. The composer never loads or decodes either form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Opaque reference resolved by the renderer (URL, storage key, asset id).
    Reference(String),
    /// Encoded image bytes passed through untouched.
    Inline(Bytes),
}

/// Native pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntrinsicSize {
    pub width: f32,
    pub height: f32,
}

impl IntrinsicSize {
    /// Both dimensions are finite and positive.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub source: ImageSource,
    /// Unknown when the loader could not read the header; scaling then degrades
    /// to filling the target box.
    #[serde(default)]
    pub intrinsic: Option<IntrinsicSize>,
}

#[cfg(test)]
impl ImageAsset {
    pub fn reference(reference: impl Into<String>, intrinsic: Option<(f32, f32)>) -> Self {
        Self {
            source: ImageSource::Reference(reference.into()),
            intrinsic: intrinsic.map(|(width, height)| IntrinsicSize { width, height }),
        }
    }
}

/// The decorative images of a certificate page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateAssets {
    pub background: Option<ImageAsset>,
    pub sidebar: Option<ImageAsset>,
    pub footer: Option<ImageAsset>,
    pub logo: Option<ImageAsset>,
}
