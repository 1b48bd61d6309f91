//! Chapter sources: where raw unit text comes from.
//!
//! Fetching from the remote corpus service and caching its responses happen
//! elsewhere. This module reads what that step left behind: one JSON document
//! per chapter under `<root>/<tractate_id>/chapter_<n>.json`, in the corpus
//! service's response shape.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::corpus::catalog::Catalog;
use crate::corpus::models::Chapter;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("chapter file name has no chapter number: {0}")]
    InvalidChapterFile(PathBuf),
}

/// Supplies the chapters of one tractate, in chapter order.
#[async_trait]
pub trait ChapterSource: Send + Sync {
    async fn chapters(&self, tractate_id: &str) -> Result<Vec<Chapter>, CorpusError>;
}

/// Loads every catalog tractate from `source`, in canonical order.
pub async fn load_corpus(
    source: &dyn ChapterSource,
    catalog: &Catalog,
) -> Result<Vec<Chapter>, CorpusError> {
    let mut corpus = Vec::new();
    for tractate in catalog.tractates() {
        let chapters = source.chapters(&tractate.id).await?;
        debug!(tractate = %tractate.id, chapters = chapters.len(), "Loaded tractate");
        corpus.extend(chapters);
    }
    Ok(corpus)
}

// ────────────────────────────────────────────────────────────────────────────
// Directory source
// ────────────────────────────────────────────────────────────────────────────

const CHAPTER_FILE_PREFIX: &str = "chapter_";
const CHAPTER_FILE_SUFFIX: &str = ".json";

#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ChapterSource for DirectorySource {
    async fn chapters(&self, tractate_id: &str) -> Result<Vec<Chapter>, CorpusError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| CorpusError::Io { path, source }
        };

        let dir = self.root.join(tractate_id);
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                warn!(tractate = tractate_id, path = %dir.display(), "Skipping tractate: not a directory");
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(tractate = tractate_id, path = %dir.display(), "Skipping tractate: directory not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(io_err(&dir)(e)),
        }

        let mut numbered = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(io_err(&dir))?;
        while let Some(entry) = entries.next_entry().await.map_err(io_err(&dir))? {
            let path = entry.path();
            if let Some(number) = chapter_number_of(&path)? {
                numbered.push((number, path));
            }
        }
        numbered.sort_by_key(|(number, _)| *number);

        let mut chapters = Vec::with_capacity(numbered.len());
        for (number, path) in numbered {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .map_err(io_err(&path))?;
            let doc: Value = serde_json::from_str(&raw).map_err(|source| CorpusError::Json {
                path: path.clone(),
                source,
            })?;
            chapters.push(Chapter::from_texts(tractate_id, number, extract_units(&doc)));
        }
        Ok(chapters)
    }
}

/// `Some(n)` for `chapter_<n>.json`, `None` for unrelated files.
fn chapter_number_of(path: &Path) -> Result<Option<u32>, CorpusError> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };
    let Some(stem) = name
        .strip_prefix(CHAPTER_FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(CHAPTER_FILE_SUFFIX))
    else {
        return Ok(None);
    };
    stem.parse::<u32>()
        .map(Some)
        .map_err(|_| CorpusError::InvalidChapterFile(path.to_path_buf()))
}

/// Pulls the Hebrew unit strings out of a chapter document.
///
/// Prefers the first `versions[]` entry with `language == "he"`, then a
/// top-level `he` array. Non-string entries become empty units so that
/// ordinals keep matching positions in the source array.
pub fn extract_units(doc: &Value) -> Vec<String> {
    let hebrew_version = doc
        .get("versions")
        .and_then(Value::as_array)
        .and_then(|versions| {
            versions
                .iter()
                .find(|v| v.get("language").and_then(Value::as_str) == Some("he"))
        });

    let texts = match hebrew_version {
        Some(version) => version.get("text"),
        None => doc.get("he"),
    };

    texts
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| item.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::catalog::{Division, TractateEntry};
    use serde_json::json;

    fn write_chapter(root: &Path, tractate: &str, n: u32, doc: &Value) {
        let dir = root.join(tractate);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("chapter_{n}.json")), doc.to_string()).unwrap();
    }

    fn two_tractate_catalog() -> Catalog {
        Catalog::new(vec![Division {
            name: "סדר".to_string(),
            tractates: vec![
                TractateEntry {
                    id: "Mishnah_Berakhot".to_string(),
                    label: "ברכות".to_string(),
                },
                TractateEntry {
                    id: "Mishnah_Peah".to_string(),
                    label: "פאה".to_string(),
                },
            ],
        }])
    }

    #[test]
    fn test_extract_prefers_hebrew_version() {
        let doc = json!({
            "versions": [
                {"language": "en", "text": ["english"]},
                {"language": "he", "text": ["א", "ב"]}
            ],
            "he": ["ignored"]
        });
        assert_eq!(extract_units(&doc), vec!["א", "ב"]);
    }

    #[test]
    fn test_extract_falls_back_to_he_key() {
        let doc = json!({"versions": [{"language": "en", "text": ["x"]}], "he": ["ג", "ד"]});
        assert_eq!(extract_units(&doc), vec!["ג", "ד"]);
    }

    #[test]
    fn test_non_string_entries_keep_their_position() {
        let doc = json!({"he": ["ג", 7, null, "ד"]});
        assert_eq!(extract_units(&doc), vec!["ג", "", "", "ד"]);

        let chapter = Chapter::from_texts("Mishnah_Peah", 1, extract_units(&doc));
        assert_eq!(chapter.units[3].ordinal, 4);
        assert_eq!(chapter.units[3].raw_text, "ד");
    }

    #[test]
    fn test_extract_missing_text_is_empty() {
        assert!(extract_units(&json!({"title": "nothing"})).is_empty());
    }

    #[test]
    fn test_chapter_file_names() {
        assert_eq!(chapter_number_of(Path::new("/x/chapter_12.json")).unwrap(), Some(12));
        assert_eq!(chapter_number_of(Path::new("/x/notes.txt")).unwrap(), None);
        assert!(chapter_number_of(Path::new("/x/chapter_one.json")).is_err());
    }

    #[tokio::test]
    async fn test_directory_source_orders_chapters_numerically() {
        let tmp = tempfile::tempdir().unwrap();
        for n in [10, 2, 1] {
            write_chapter(tmp.path(), "Mishnah_Berakhot", n, &json!({"he": [format!("פרק {n}")]}));
        }
        let source = DirectorySource::new(tmp.path());
        let chapters = source.chapters("Mishnah_Berakhot").await.unwrap();
        let numbers: Vec<u32> = chapters.iter().map(|c| c.chapter_number).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
        assert_eq!(chapters[2].units[0].raw_text, "פרק 10");
    }

    #[tokio::test]
    async fn test_missing_tractate_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(tmp.path());
        assert!(source.chapters("Mishnah_Peah").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_root_is_an_error_not_a_skip() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file as root: looking up a tractate under it fails with
        // something other than NotFound.
        let file_root = tmp.path().join("corpus.txt");
        std::fs::write(&file_root, "not a directory").unwrap();

        let err = DirectorySource::new(&file_root)
            .chapters("Mishnah_Peah")
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("Mishnah_Peah");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("chapter_1.json"), "{not json").unwrap();
        let err = DirectorySource::new(tmp.path())
            .chapters("Mishnah_Peah")
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::Json { .. }));
    }

    #[tokio::test]
    async fn test_load_corpus_follows_catalog_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_chapter(tmp.path(), "Mishnah_Peah", 1, &json!({"he": ["פאה"]}));
        write_chapter(tmp.path(), "Mishnah_Berakhot", 1, &json!({"he": ["ברכות"]}));
        let corpus = load_corpus(&DirectorySource::new(tmp.path()), &two_tractate_catalog())
            .await
            .unwrap();
        let ids: Vec<&str> = corpus.iter().map(|c| c.tractate_id.as_str()).collect();
        assert_eq!(ids, vec!["Mishnah_Berakhot", "Mishnah_Peah"]);
    }
}
