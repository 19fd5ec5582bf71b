//! Axum route handlers for the Certificate API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::debug;

use crate::certificate::generator::{compose_certificate, ComposedCertificate};
use crate::errors::AppError;
use crate::models::certificate::{CertificateAssets, CertificateRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub record: CertificateRecord,
    #[serde(default)]
    pub assets: CertificateAssets,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/certificates/layout
///
/// Lays out one certificate and returns the layout summary with the document
/// description. A certificate whose mandatory content cannot fit one page is
/// rejected with 422.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<ComposedCertificate>, AppError> {
    validate_record(&request.record)?;

    debug!(
        theory_items = request.record.theory_items.len(),
        practice_items = request.record.practice_items.len(),
        "Certificate layout requested"
    );

    // CPU-bound pipeline; spawn_blocking to avoid blocking the async executor.
    let catalog = state.catalog.clone();
    let frame = state.frame;
    let composed = tokio::task::spawn_blocking(move || {
        compose_certificate(&request.record, &request.assets, &catalog, &frame)
    })
    .await
    .map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "spawn_blocking failed in certificate layout: {e}"
        ))
    })??;

    Ok(Json(composed))
}

/// The core tolerates blanks, but a certificate without a recipient or a
/// number is not worth issuing.
fn validate_record(record: &CertificateRecord) -> Result<(), AppError> {
    let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

    if blank(&record.student_full_name) {
        return Err(AppError::Validation(
            "student_full_name cannot be empty".to_string(),
        ));
    }
    if blank(&record.document_number) {
        return Err(AppError::Validation(
            "document_number cannot be empty".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
