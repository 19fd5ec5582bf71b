use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::layout::{SectionId, StyleId};

/// Failures raised by the layout core. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// A mandatory section does not fit the page even with compact styles.
    /// The content has to be edited (for example, fewer module entries).
    #[error("Section '{section}' overflows the page by {overflow_by:.1}pt even with compact styles")]
    ContentOverflowFatal { section: SectionId, overflow_by: f32 },

    #[error("Invalid style '{style}': {reason}")]
    InvalidStyle { style: StyleId, reason: String },
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Layout(e @ LayoutError::ContentOverflowFatal { .. }) => {
                tracing::warn!("Certificate rejected: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "CONTENT_OVERFLOW",
                    e.to_string(),
                )
            }
            AppError::Layout(e @ LayoutError::InvalidStyle { .. }) => {
                tracing::error!("Style catalog error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STYLE_ERROR",
                    "The style catalog is misconfigured".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let AppError::Layout(LayoutError::ContentOverflowFatal { section, .. }) = &self {
            error["section"] = json!(section);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
