use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;

use crate::corpus::catalog::Catalog;
use crate::layout::canvas::CanvasSpec;
use crate::layout::font_metrics::GlyphCoverage;

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub canvas_spec_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub corpus_dir: Option<PathBuf>,
    pub glyph_coverage: GlyphCoverage,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            canvas_spec_path: optional_path("CANVAS_SPEC_PATH"),
            catalog_path: optional_path("CATALOG_PATH"),
            corpus_dir: optional_path("CORPUS_DIR"),
            glyph_coverage: parse_coverage(std::env::var("GLYPH_COVERAGE").ok().as_deref())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The canvas from `CANVAS_SPEC_PATH`, or the built-in default. Always validated.
    pub fn load_canvas(&self) -> Result<CanvasSpec> {
        let canvas = match &self.canvas_spec_path {
            Some(path) => read_json::<CanvasSpec>(path)?,
            None => CanvasSpec::default(),
        };
        canvas.validate().context("Invalid canvas spec")?;
        Ok(canvas)
    }

    /// The catalog from `CATALOG_PATH`, or the traditional six divisions.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => read_json(path),
            None => Ok(Catalog::standard()),
        }
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_coverage(value: Option<&str>) -> Result<GlyphCoverage> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("lenient") => Ok(GlyphCoverage::Lenient),
        Some("strict") => Ok(GlyphCoverage::Strict),
        Some(other) => bail!("GLYPH_COVERAGE must be 'lenient' or 'strict', got '{other}'"),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> Config {
        Config {
            canvas_spec_path: None,
            catalog_path: None,
            corpus_dir: None,
            glyph_coverage: GlyphCoverage::Lenient,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_parse_coverage() {
        assert_eq!(parse_coverage(None).unwrap(), GlyphCoverage::Lenient);
        assert_eq!(parse_coverage(Some(" Strict ")).unwrap(), GlyphCoverage::Strict);
        assert!(parse_coverage(Some("loose")).is_err());
    }

    #[test]
    fn test_defaults_without_paths() {
        let config = bare();
        assert_eq!(config.load_canvas().unwrap(), CanvasSpec::default());
        assert_eq!(config.load_catalog().unwrap().tractate_count(), 63);
    }

    #[test]
    fn test_canvas_file_is_validated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("canvas.json");
        let mut canvas = CanvasSpec::default();
        canvas.margins = 500;
        std::fs::write(&path, serde_json::to_string(&canvas).unwrap()).unwrap();

        let config = Config {
            canvas_spec_path: Some(path),
            ..bare()
        };
        assert!(config.load_canvas().is_err());
    }

    #[test]
    fn test_catalog_file_replaces_standard() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"divisions":[{"name":"A","tractates":[{"id":"t","label":"T"}]}]}"#,
        )
        .unwrap();

        let config = Config {
            catalog_path: Some(path),
            ..bare()
        };
        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.tractate_count(), 1);
        assert_eq!(catalog.label_for("t"), "T");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let config = Config {
            catalog_path: Some(PathBuf::from("/definitely/not/here.json")),
            ..bare()
        };
        assert!(config.load_catalog().is_err());
    }
}
