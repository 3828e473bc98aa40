//! Page rendering with Poppler's `pdftoppm`.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{debug, trace};

use super::tools::run_tool;
use super::{PageRenderer, Result};
use crate::error::OcrError;

/// Renders pages by shelling out to `pdftoppm`; page counts come from `pdfinfo`.
pub struct PopplerRenderer {
    pdftoppm: PathBuf,
    pdfinfo: PathBuf,
    dpi: Option<u32>,
}

impl PopplerRenderer {
    /// `pdfinfo` is looked up next to `pdftoppm`.
    pub fn new(pdftoppm: impl Into<PathBuf>) -> Self {
        let pdftoppm = pdftoppm.into();
        let pdfinfo = sibling_tool(&pdftoppm, "pdfinfo");
        Self {
            pdftoppm,
            pdfinfo,
            dpi: None,
        }
    }

    pub fn with_pdfinfo(mut self, pdfinfo: impl Into<PathBuf>) -> Self {
        self.pdfinfo = pdfinfo.into();
        self
    }

    /// Set the render resolution. `None` uses the pdftoppm default.
    pub fn with_dpi(mut self, dpi: Option<u32>) -> Self {
        self.dpi = dpi;
        self
    }

    fn args(&self, pdf: &Path, page: u32, prefix: &Path) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            page.to_string(),
            "-l".to_string(),
            page.to_string(),
        ];
        if let Some(dpi) = self.dpi {
            args.push("-r".to_string());
            args.push(dpi.to_string());
        }
        args.push("-png".to_string());
        args.push("-singlefile".to_string());
        args.push(pdf.display().to_string());
        args.push(prefix.display().to_string());
        args
    }
}

impl PageRenderer for PopplerRenderer {
    fn page_count(&self, pdf: &Path) -> Result<u32> {
        let pdf_arg = pdf.display().to_string();
        let output = run_tool(&self.pdfinfo, &[pdf_arg.as_str()])?;

        if !output.status.success() {
            return Err(OcrError::Rendering(format!(
                "pdfinfo failed for {}: {}",
                pdf.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let pages = parse_page_count(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            OcrError::Rendering(format!("pdfinfo reported no page count for {}", pdf.display()))
        })?;
        debug!("pdfinfo reports {} pages in {}", pages, pdf.display());
        Ok(pages)
    }

    fn render_page(&self, pdf: &Path, page: u32) -> Result<DynamicImage> {
        let temp_dir = tempfile::tempdir()
            .map_err(|e| OcrError::Rendering(format!("failed to create temp dir: {}", e)))?;
        let prefix = temp_dir.path().join("page");

        let args = self.args(pdf, page, &prefix);
        trace!("pdftoppm {:?}", args);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = run_tool(&self.pdftoppm, &arg_refs)?;

        if !output.status.success() {
            return Err(OcrError::Rendering(format!(
                "pdftoppm failed for page {}: {}",
                page,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let png = prefix.with_extension("png");
        if !png.exists() {
            return Err(OcrError::Rendering(format!(
                "pdftoppm did not produce {}",
                png.display()
            )));
        }

        let image = image::open(&png)?;
        debug!(
            "Rendered page {} of {} ({}x{})",
            page,
            pdf.display(),
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

/// A tool from the same Poppler install: same directory, or bare name on PATH.
fn sibling_tool(tool: &Path, name: &str) -> PathBuf {
    match tool.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(name),
        _ => PathBuf::from(name),
    }
}

/// The `Pages:` line of `pdfinfo` output.
fn parse_page_count(info: &str) -> Option<u32> {
    info.lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|count| count.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_args_without_dpi() {
        let renderer = PopplerRenderer::new("pdftoppm");
        let args = renderer.args(Path::new("in.pdf"), 3, Path::new("/tmp/x/page"));

        assert_eq!(
            args,
            vec!["-f", "3", "-l", "3", "-png", "-singlefile", "in.pdf", "/tmp/x/page"]
        );
    }

    #[test]
    fn test_args_with_dpi() {
        let renderer = PopplerRenderer::new("pdftoppm").with_dpi(Some(200));
        let args = renderer.args(Path::new("in.pdf"), 1, Path::new("p"));

        assert!(args.windows(2).any(|w| w[0] == "-r" && w[1] == "200"));
    }

    #[test]
    fn test_parse_page_count() {
        let info = "Producer:       LibreOffice\nPages:          3\nEncrypted:      no\n";

        assert_eq!(parse_page_count(info), Some(3));
        assert_eq!(parse_page_count("Producer: x\n"), None);
        assert_eq!(parse_page_count("Pages: many\n"), None);
    }

    #[test]
    fn test_pdfinfo_next_to_pdftoppm() {
        assert_eq!(
            sibling_tool(Path::new("/opt/poppler/bin/pdftoppm"), "pdfinfo"),
            PathBuf::from("/opt/poppler/bin/pdfinfo")
        );
        assert_eq!(
            sibling_tool(Path::new("pdftoppm"), "pdfinfo"),
            PathBuf::from("pdfinfo")
        );
    }

    #[test]
    fn test_missing_pdfinfo() {
        let renderer = PopplerRenderer::new("pdftoppm").with_pdfinfo("/nonexistent/pdfinfo");
        let err = renderer.page_count(Path::new("in.pdf")).unwrap_err();

        assert!(matches!(err, OcrError::ToolUnavailable { .. }));
    }

    #[test]
    fn test_missing_binary() {
        let renderer = PopplerRenderer::new("/nonexistent/pdftoppm");
        let err = renderer.render_page(Path::new("in.pdf"), 1).unwrap_err();

        assert!(matches!(err, OcrError::ToolUnavailable { .. }));
    }
}
