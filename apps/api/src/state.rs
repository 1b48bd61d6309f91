use std::sync::Arc;

use crate::config::Config;
use crate::corpus::catalog::Catalog;
use crate::corpus::loader::ChapterSource;
use crate::layout::canvas::CanvasSpec;
use crate::layout::font_metrics::TextMeasurer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Validated once at startup; every composition reads the same canvas.
    pub canvas: Arc<CanvasSpec>,
    pub catalog: Arc<Catalog>,
    pub measurer: Arc<dyn TextMeasurer>,
    /// Present only when `CORPUS_DIR` is configured.
    pub corpus_source: Option<Arc<dyn ChapterSource>>,
}
