//! PDF text-layer extraction.

mod extractor;

pub use extractor::PdfExtractor;

#[cfg(test)]
pub(crate) use extractor::tests::build_pdf;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text-layer implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract the embedded text of every page, concatenated in page order.
    fn extract_text(&self) -> Result<String>;

    /// Extract embedded text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}
