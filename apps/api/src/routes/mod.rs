pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pagination::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(handlers::handle_get_catalog))
        .route("/api/v1/numerals/:n", get(handlers::handle_get_numeral))
        .route("/api/v1/paginate", post(handlers::handle_paginate))
        .route(
            "/api/v1/corpus/paginate",
            post(handlers::handle_paginate_corpus),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::corpus::catalog::Catalog;
    use crate::corpus::loader::{ChapterSource, DirectorySource};
    use crate::layout::canvas::CanvasSpec;
    use crate::layout::font_metrics::{GlyphCoverage, GlyphTableMeasurer};

    fn test_state(corpus_dir: Option<std::path::PathBuf>) -> AppState {
        let config = Config {
            canvas_spec_path: None,
            catalog_path: None,
            corpus_dir: corpus_dir.clone(),
            glyph_coverage: GlyphCoverage::Lenient,
            port: 0,
            rust_log: "info".to_string(),
        };
        AppState {
            config,
            canvas: Arc::new(CanvasSpec::default()),
            catalog: Arc::new(Catalog::standard()),
            measurer: Arc::new(GlyphTableMeasurer::default()),
            corpus_source: corpus_dir
                .map(|dir| Arc::new(DirectorySource::new(dir)) as Arc<dyn ChapterSource>),
        }
    }

    async fn call(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(
            test_state(None),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "mishnah-pages");
    }

    #[tokio::test]
    async fn test_numeral_endpoint() {
        let (status, body) = call(
            test_state(None),
            Request::get("/api/v1/numerals/15").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"n": 15, "label": "יה"}));
    }

    #[tokio::test]
    async fn test_catalog_endpoint_lists_six_divisions() {
        let (status, body) = call(
            test_state(None),
            Request::get("/api/v1/catalog").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["divisions"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_paginate_endpoint() {
        let request = post_json(
            "/api/v1/paginate",
            json!({"chapters": [
                {"tractate_id": "Mishnah_Berakhot", "chapter_number": 1,
                 "units": ["מאימתי קורין", "<i>את</i> שמע"]},
                {"tractate_id": "Mishnah_Berakhot", "chapter_number": 2, "units": []}
            ]}),
        );
        let (status, body) = call(test_state(None), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counters"], json!({"aggregate": 1, "single": 2}));
        assert_eq!(body["items"].as_array().unwrap().len(), 3);
        assert_eq!(body["items"][0]["mode"], "aggregate");
        assert_eq!(body["items"][0]["tractate_id"], "Mishnah_Berakhot");
        assert_eq!(body["items"][2]["layout"]["blocks"][0]["lines"][0]["text"], "את שמע");
        assert_eq!(body["skipped_chapters"][0]["chapter_number"], 2);
        assert_eq!(body["canvas"]["width"], 800);
    }

    #[tokio::test]
    async fn test_paginate_rejects_empty_request() {
        let (status, body) =
            call(test_state(None), post_json("/api/v1/paginate", json!({"chapters": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_corpus_paginate_without_directory_is_not_found() {
        let request = Request::post("/api/v1/corpus/paginate")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(test_state(None), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_corpus_paginate_reads_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("Mishnah_Peah");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("chapter_1.json"),
            json!({"versions": [{"language": "he", "text": ["אלו דברים", "שאין להם שיעור"]}]})
                .to_string(),
        )
        .unwrap();

        let request = Request::post("/api/v1/corpus/paginate")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(test_state(Some(tmp.path().to_path_buf())), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counters"], json!({"aggregate": 1, "single": 2}));
        assert_eq!(body["items"][0]["layout"]["title"], "מסכת פאה");
    }
}
