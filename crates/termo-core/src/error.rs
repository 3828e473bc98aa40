//! Error types for the termo-core library.

use thiserror::Error;

/// Main error type for the termo library.
#[derive(Error, Debug)]
pub enum TermoError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Mail source error.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    /// Document store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to page rendering and text recognition.
#[derive(Error, Debug)]
pub enum OcrError {
    /// An external tool could not be started or is missing.
    #[error("tool unavailable: {tool}: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    /// Page rendering failed.
    #[error("rendering failed: {0}")]
    Rendering(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The recognition language is not installed.
    #[error("recognition language not installed: {0}")]
    MissingLanguage(String),

    /// Rendered image could not be decoded or encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors raised by mail sources.
#[derive(Error, Debug)]
pub enum MailError {
    /// The message could not be parsed.
    #[error("failed to parse message {id}: {reason}")]
    Parse { id: String, reason: String },

    /// Unknown message identifier.
    #[error("unknown message: {0}")]
    UnknownMessage(String),

    /// I/O error while reading the spool.
    #[error("spool I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by document stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A document could not be encoded.
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    /// I/O error on the backing file.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the termo library.
pub type Result<T> = std::result::Result<T, TermoError>;
