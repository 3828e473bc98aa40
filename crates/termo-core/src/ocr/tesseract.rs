//! Text recognition with the `tesseract` command-line engine.

use std::path::PathBuf;

use image::DynamicImage;
use tracing::debug;

use super::tools::run_tool;
use super::{Result, TextRecognizer};
use crate::error::OcrError;

/// Recognizes text by writing the page to a temporary PNG and running tesseract on it.
pub struct TesseractRecognizer {
    tesseract: PathBuf,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(tesseract: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            tesseract: tesseract.into(),
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| OcrError::Recognition(format!("failed to create temp dir: {}", e)))?;
        let png = temp_dir.path().join("page.png");
        image.save_with_format(&png, image::ImageFormat::Png)?;

        let png_arg = png.display().to_string();
        let output = run_tool(
            &self.tesseract,
            &[png_arg.as_str(), "stdout", "-l", self.language.as_str()],
        )?;

        if !output.status.success() {
            return Err(OcrError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("tesseract recognized {} chars", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary() {
        let recognizer = TesseractRecognizer::new("/nonexistent/tesseract", "por");
        let image = DynamicImage::new_rgb8(4, 4);

        let err = recognizer.recognize(&image).unwrap_err();
        assert!(matches!(err, OcrError::ToolUnavailable { .. }));
        assert_eq!(recognizer.language(), "por");
    }
}
