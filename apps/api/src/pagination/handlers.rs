use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::corpus::catalog::Catalog;
use crate::corpus::loader::load_corpus;
use crate::corpus::models::{Chapter, ChapterInput};
use crate::errors::AppError;
use crate::layout::canvas::CanvasSpec;
use crate::layout::numerals::encode;
use crate::pagination::driver::{paginate_parallel, PaginationRun};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PaginateRequest {
    pub chapters: Vec<ChapterInput>,
}

/// A run together with the canvas it was laid out on, so a renderer needs
/// nothing else.
#[derive(Serialize)]
pub struct PaginateResponse {
    pub canvas: CanvasSpec,
    #[serde(flatten)]
    pub run: PaginationRun,
}

#[derive(Serialize)]
pub struct NumeralResponse {
    pub n: i64,
    pub label: String,
}

/// GET /api/v1/catalog
pub async fn handle_get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}

/// GET /api/v1/numerals/:n
pub async fn handle_get_numeral(Path(n): Path<i64>) -> Json<NumeralResponse> {
    Json(NumeralResponse {
        n,
        label: encode(n),
    })
}

/// POST /api/v1/paginate
pub async fn handle_paginate(
    State(state): State<AppState>,
    Json(req): Json<PaginateRequest>,
) -> Result<Json<PaginateResponse>, AppError> {
    if req.chapters.is_empty() {
        return Err(AppError::Validation(
            "chapters must contain at least one chapter".to_string(),
        ));
    }
    let corpus: Vec<Chapter> = req.chapters.into_iter().map(Chapter::from).collect();
    Ok(Json(run(&state, corpus).await))
}

/// POST /api/v1/corpus/paginate
pub async fn handle_paginate_corpus(
    State(state): State<AppState>,
) -> Result<Json<PaginateResponse>, AppError> {
    let source = state
        .corpus_source
        .clone()
        .ok_or_else(|| AppError::NotFound("no corpus directory is configured".to_string()))?;

    let corpus = load_corpus(source.as_ref(), &state.catalog).await?;
    info!(
        root = ?state.config.corpus_dir,
        chapters = corpus.len(),
        "Loaded corpus for pagination"
    );
    Ok(Json(run(&state, corpus).await))
}

async fn run(state: &AppState, corpus: Vec<Chapter>) -> PaginateResponse {
    let run = paginate_parallel(
        corpus,
        Arc::clone(&state.catalog),
        Arc::clone(&state.canvas),
        Arc::clone(&state.measurer),
    )
    .await;
    PaginateResponse {
        canvas: state.canvas.as_ref().clone(),
        run,
    }
}
