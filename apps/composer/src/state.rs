use std::sync::Arc;

use crate::config::Config;
use crate::layout::{LayoutFrame, StyleCatalog};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Normal-variant catalog, built once at startup. Compaction derives a
    /// private copy per request and never touches this one.
    pub catalog: Arc<StyleCatalog>,
    /// Base page geometry. Footer reservation is applied per request.
    pub frame: LayoutFrame,
}
