//! OCR fallback: page rendering and text recognition behind traits.

mod poppler;
mod tesseract;
pub mod tools;

pub use poppler::PopplerRenderer;
pub use tesseract::TesseractRecognizer;

use std::path::Path;

use image::DynamicImage;

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// Renders a single PDF page to an image.
pub trait PageRenderer {
    /// Number of pages, read by the renderer itself rather than the text-layer parser.
    fn page_count(&self, pdf: &Path) -> Result<u32>;

    /// Render a page (1-indexed).
    fn render_page(&self, pdf: &Path, page: u32) -> Result<DynamicImage>;
}

/// Recognizes text in a rendered page image.
pub trait TextRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String>;
}

/// A renderer paired with a recognizer.
pub struct OcrBackend {
    pub renderer: Box<dyn PageRenderer>,
    pub recognizer: Box<dyn TextRecognizer>,
}

impl OcrBackend {
    pub fn new(
        renderer: impl PageRenderer + 'static,
        recognizer: impl TextRecognizer + 'static,
    ) -> Self {
        Self {
            renderer: Box::new(renderer),
            recognizer: Box::new(recognizer),
        }
    }

    /// Build the Poppler + Tesseract backend from configuration.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(
            PopplerRenderer::new(&config.pdftoppm_path).with_dpi(config.render_dpi),
            TesseractRecognizer::new(&config.tesseract_path, &config.language),
        )
    }

    /// Page count as seen by the renderer.
    pub fn page_count(&self, pdf: &Path) -> Result<u32> {
        self.renderer.page_count(pdf)
    }

    /// Render one page and recognize its text. The image is dropped before returning.
    pub fn page_text(&self, pdf: &Path, page: u32) -> Result<String> {
        let image = self.renderer.render_page(pdf, page)?;
        self.recognizer.recognize(&image)
    }
}
