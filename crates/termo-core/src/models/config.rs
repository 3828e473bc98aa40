//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{OcrError, TermoError};
use crate::ocr::tools;

/// Main configuration for the termo pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TermoConfig {
    /// OCR fallback configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Mail spool configuration.
    pub mail: MailConfig,

    /// Document store configuration.
    pub store: StoreConfig,
}

/// External rendering and recognition tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Fall back to OCR when a PDF has no text layer.
    pub enabled: bool,

    /// Tesseract executable (name on PATH or absolute path).
    pub tesseract_path: PathBuf,

    /// Poppler `pdftoppm` executable.
    pub pdftoppm_path: PathBuf,

    /// Tesseract language code.
    pub language: String,

    /// Render resolution; `None` keeps the renderer's default.
    pub render_dpi: Option<u32>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tesseract_path: PathBuf::from("tesseract"),
            pdftoppm_path: PathBuf::from("pdftoppm"),
            language: "por".to_string(),
            render_dpi: None,
        }
    }
}

impl OcrConfig {
    /// Check that both tools run and the recognition language is installed.
    pub fn validate(&self) -> Result<(), OcrError> {
        tools::check_pdftoppm(&self.pdftoppm_path)?;
        tools::check_tesseract(&self.tesseract_path)?;
        let languages = tools::tesseract_languages(&self.tesseract_path)?;
        if !languages.iter().any(|l| l == &self.language) {
            return Err(OcrError::MissingLanguage(self.language.clone()));
        }
        Ok(())
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Left-pad single-digit days in the document date (`5` -> `05`).
    ///
    /// Set to `false` to keep the day as written, giving `5/03/2023`.
    pub zero_pad_day: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { zero_pad_day: true }
    }
}

/// Mail spool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Directory holding incoming `.eml` files.
    pub inbox_dir: PathBuf,

    /// Where PDF attachments are written before processing.
    pub attachments_dir: PathBuf,

    /// Accept only subjects containing one of these (normalized) phrases.
    pub subject_keywords: Vec<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            inbox_dir: PathBuf::from("inbox"),
            attachments_dir: PathBuf::from("attachments"),
            subject_keywords: vec![
                "termo de recebimento".to_string(),
                "termo de devolucao".to_string(),
            ],
        }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON-lines file holding processed documents.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("documents.jsonl"),
        }
    }
}

impl TermoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, TermoError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TermoError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), TermoError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| TermoError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: TermoConfig =
            serde_json::from_str(r#"{"ocr": {"language": "por+eng"}}"#).unwrap();

        assert_eq!(config.ocr.language, "por+eng");
        assert_eq!(config.ocr.pdftoppm_path, PathBuf::from("pdftoppm"));
        assert!(config.extraction.zero_pad_day);
        assert_eq!(config.mail.subject_keywords.len(), 2);
    }

    #[test]
    fn test_unpadded_day_setting() {
        let config: TermoConfig =
            serde_json::from_str(r#"{"extraction": {"zero_pad_day": false}}"#).unwrap();

        assert!(!config.extraction.zero_pad_day);
        assert!(config.ocr.enabled);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = TermoConfig::default();
        config.ocr.render_dpi = Some(200);
        config.save(&path).unwrap();

        let loaded = TermoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.ocr.render_dpi, Some(200));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            TermoConfig::from_file(&path),
            Err(TermoError::Config(_))
        ));
    }

    #[test]
    fn test_validate_reports_missing_tool() {
        let config = OcrConfig {
            pdftoppm_path: PathBuf::from("/nonexistent/pdftoppm"),
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(OcrError::ToolUnavailable { .. })
        ));
    }
}
