mod config;
mod corpus;
mod errors;
mod layout;
mod pagination;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::corpus::loader::{ChapterSource, DirectorySource};
use crate::layout::font_metrics::{GlyphTableMeasurer, TextMeasurer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting mishnah-pages v{}", env!("CARGO_PKG_VERSION"));

    let canvas = config.load_canvas()?;
    info!(
        "Canvas {}x{}, text width {}px, safe zone bottom {}",
        canvas.width,
        canvas.height,
        canvas.text_width(),
        canvas.safe_zone_bottom
    );

    let catalog = config.load_catalog()?;
    info!(
        "Catalog loaded: {} divisions, {} tractates",
        catalog.divisions().len(),
        catalog.tractate_count()
    );

    let measurer: Arc<dyn TextMeasurer> = Arc::new(GlyphTableMeasurer::new(config.glyph_coverage));
    info!("Glyph coverage: {:?}", config.glyph_coverage);

    let corpus_source = config.corpus_dir.as_ref().map(|dir| {
        let source = DirectorySource::new(dir);
        info!("Corpus directory: {}", source.root().display());
        Arc::new(source) as Arc<dyn ChapterSource>
    });

    let state = AppState {
        config: config.clone(),
        canvas: Arc::new(canvas),
        catalog: Arc::new(catalog),
        measurer,
        corpus_source,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
