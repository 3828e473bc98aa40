//! Startup checks for the external rendering and recognition tools.

use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, info};

use crate::error::OcrError;

/// Run a tool and capture its output, mapping spawn failures to `ToolUnavailable`.
pub(crate) fn run_tool(tool: &Path, args: &[&str]) -> Result<Output, OcrError> {
    Command::new(tool)
        .args(args)
        .output()
        .map_err(|e| OcrError::ToolUnavailable {
            tool: tool.display().to_string(),
            reason: e.to_string(),
        })
}

/// First non-empty line of stdout or stderr (tools disagree on where the version goes).
fn version_line(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    stdout
        .lines()
        .chain(stderr.lines())
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("unknown version")
        .to_string()
}

/// Check that `pdftoppm` runs, returning its version banner.
pub fn check_pdftoppm(path: &Path) -> Result<String, OcrError> {
    let output = run_tool(path, &["-v"])?;
    if !output.status.success() {
        return Err(OcrError::ToolUnavailable {
            tool: path.display().to_string(),
            reason: format!("exited with {}", output.status),
        });
    }
    let version = version_line(&output);
    info!("pdftoppm available: {}", version);
    Ok(version)
}

/// Check that `tesseract` runs, returning its version banner.
pub fn check_tesseract(path: &Path) -> Result<String, OcrError> {
    let output = run_tool(path, &["--version"])?;
    if !output.status.success() {
        return Err(OcrError::ToolUnavailable {
            tool: path.display().to_string(),
            reason: format!("exited with {}", output.status),
        });
    }
    let version = version_line(&output);
    info!("tesseract available: {}", version);
    Ok(version)
}

/// Languages reported by `tesseract --list-langs`.
pub fn tesseract_languages(path: &Path) -> Result<Vec<String>, OcrError> {
    let output = run_tool(path, &["--list-langs"])?;
    if !output.status.success() {
        return Err(OcrError::ToolUnavailable {
            tool: path.display().to_string(),
            reason: format!("--list-langs exited with {}", output.status),
        });
    }
    let languages = parse_language_list(&String::from_utf8_lossy(&output.stdout));
    debug!("tesseract languages: {:?}", languages);
    Ok(languages)
}

fn parse_language_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("List of available languages"))
        .map(str::to_string)
        .collect()
}
