//! Text acquisition: embedded text first, OCR per page when the text layer is blank
//! or the file cannot be parsed.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::ocr::OcrBackend;
use crate::pdf::{PdfExtractor, PdfProcessor};
use crate::text::RawText;

/// Produces the raw text of a PDF. Never fails; problems degrade to empty text.
pub struct TextAcquirer {
    ocr: Option<OcrBackend>,
}

impl TextAcquirer {
    /// Acquirer with OCR fallback.
    pub fn new(ocr: OcrBackend) -> Self {
        Self { ocr: Some(ocr) }
    }

    /// Acquirer that only reads the embedded text layer.
    pub fn text_only() -> Self {
        Self { ocr: None }
    }

    pub fn has_ocr(&self) -> bool {
        self.ocr.is_some()
    }

    /// Acquire the text of the PDF at `pdf_path`.
    pub fn acquire_text(&self, pdf_path: &Path) -> RawText {
        info!("Attempting to extract text from PDF: {}", pdf_path.display());

        let data = match std::fs::read(pdf_path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not read {}: {}", pdf_path.display(), e);
                return RawText::default();
            }
        };

        let mut extractor = PdfExtractor::new();
        let loaded = match extractor.load(&data) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Could not load {}: {}. Attempting OCR",
                    pdf_path.display(),
                    e
                );
                false
            }
        };

        if loaded {
            match extractor.extract_text() {
                Ok(text) if !text.trim().is_empty() => {
                    info!("Extracted embedded text from {}", pdf_path.display());
                    return RawText::new(text);
                }
                Ok(_) => debug!("No embedded text in {}, attempting OCR", pdf_path.display()),
                Err(e) => warn!(
                    "Direct text extraction failed for {}: {}. Attempting OCR",
                    pdf_path.display(),
                    e
                ),
            }
        }

        let Some(ocr) = &self.ocr else {
            warn!("OCR disabled, no text for {}", pdf_path.display());
            return RawText::default();
        };

        let page_count = if loaded {
            extractor.page_count()
        } else {
            match ocr.page_count(pdf_path) {
                Ok(count) => count,
                Err(e) => {
                    warn!("Could not count pages of {}: {}", pdf_path.display(), e);
                    return RawText::default();
                }
            }
        };

        RawText::new(ocr_pages(ocr, pdf_path, page_count))
    }
}

/// Recognize pages one by one, in order, each followed by a newline.
/// A failing page ends the pass; text gathered so far is kept.
fn ocr_pages(ocr: &OcrBackend, pdf_path: &Path, page_count: u32) -> String {
    let mut text = String::new();

    for page in 1..=page_count {
        debug!("Performing OCR on page {} of {}", page, pdf_path.display());
        match ocr.page_text(pdf_path, page) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => {
                warn!(
                    "OCR failed on page {} of {}: {}",
                    page,
                    pdf_path.display(),
                    e
                );
                break;
            }
        }
    }

    if text.trim().is_empty() {
        warn!("OCR produced no text for {}", pdf_path.display());
    } else {
        info!("Extracted text from {} using OCR", pdf_path.display());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use image::DynamicImage;
    use pretty_assertions::assert_eq;

    use crate::error::OcrError;
    use crate::ocr::{PageRenderer, Result as OcrResult, TextRecognizer};
    use crate::pdf::build_pdf;

    /// Encodes the page number in the image width.
    struct FakeRenderer {
        calls: Rc<RefCell<Vec<u32>>>,
        fail_on: Option<u32>,
        pages: Option<u32>,
    }

    impl PageRenderer for FakeRenderer {
        fn page_count(&self, _pdf: &Path) -> OcrResult<u32> {
            self.pages
                .ok_or_else(|| OcrError::Rendering("no page count".to_string()))
        }

        fn render_page(&self, _pdf: &Path, page: u32) -> OcrResult<DynamicImage> {
            self.calls.borrow_mut().push(page);
            if self.fail_on == Some(page) {
                return Err(OcrError::Rendering("boom".to_string()));
            }
            Ok(DynamicImage::new_rgb8(page, 1))
        }
    }

    struct FakeRecognizer;

    impl TextRecognizer for FakeRecognizer {
        fn recognize(&self, image: &DynamicImage) -> OcrResult<String> {
            Ok(format!("pagina {}", image.width()))
        }
    }

    fn write_pdf(dir: &tempfile::TempDir, pages: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, build_pdf(pages)).unwrap();
        path
    }

    fn acquirer(fail_on: Option<u32>) -> (TextAcquirer, Rc<RefCell<Vec<u32>>>) {
        acquirer_with_pages(fail_on, None)
    }

    fn acquirer_with_pages(
        fail_on: Option<u32>,
        pages: Option<u32>,
    ) -> (TextAcquirer, Rc<RefCell<Vec<u32>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let renderer = FakeRenderer {
            calls: Rc::clone(&calls),
            fail_on,
            pages,
        };
        (TextAcquirer::new(OcrBackend::new(renderer, FakeRecognizer)), calls)
    }

    #[test]
    fn test_embedded_text_skips_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, &["EMPREGADO: MARIA"]);
        let (acquirer, calls) = acquirer(None);

        let text = acquirer.acquire_text(&path);
        assert!(text.as_str().contains("EMPREGADO"));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_blank_pdf_falls_back_to_ocr_in_page_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, &["", "", ""]);
        let (acquirer, calls) = acquirer(None);

        let text = acquirer.acquire_text(&path);
        assert_eq!(text.as_str(), "pagina 1\npagina 2\npagina 3\n");
        assert_eq!(*calls.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_ocr_failure_keeps_earlier_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, &["", "", ""]);
        let (acquirer, calls) = acquirer(Some(2));

        let text = acquirer.acquire_text(&path);
        assert_eq!(text.as_str(), "pagina 1\n");
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_ocr_failure_on_first_page_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, &[""]);
        let (acquirer, _) = acquirer(Some(1));

        assert!(acquirer.acquire_text(&path).is_blank());
    }

    #[test]
    fn test_text_only_skips_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(&dir, &[""]);

        let acquirer = TextAcquirer::text_only();
        assert!(!acquirer.has_ocr());
        assert!(acquirer.acquire_text(&path).is_blank());
    }

    #[test]
    fn test_unparseable_pdf_falls_back_to_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let damaged = dir.path().join("damaged.pdf");
        std::fs::write(&damaged, b"%PDF-1.4 truncated").unwrap();
        let (acquirer, calls) = acquirer_with_pages(None, Some(2));

        let text = acquirer.acquire_text(&damaged);
        assert_eq!(text.as_str(), "pagina 1\npagina 2\n");
        assert_eq!(*calls.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unparseable_pdf_without_page_count_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let damaged = dir.path().join("damaged.pdf");
        std::fs::write(&damaged, b"not a pdf at all").unwrap();
        let (acquirer, calls) = acquirer_with_pages(None, None);

        assert!(acquirer.acquire_text(&damaged).is_blank());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (acquirer, calls) = acquirer_with_pages(None, Some(1));

        assert!(acquirer.acquire_text(&dir.path().join("missing.pdf")).is_blank());
        assert!(calls.borrow().is_empty());
    }
}
