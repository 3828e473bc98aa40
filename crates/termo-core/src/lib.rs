//! Core library for equipment receipt processing.
//!
//! This crate provides:
//! - PDF text acquisition with an OCR fallback (Poppler + Tesseract)
//! - Diacritic-free text normalization
//! - Rule-based field extraction for receipt/return forms
//! - Mail spool ingestion and a JSON-lines document store

pub mod acquire;
pub mod error;
pub mod mail;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod receipt;
pub mod store;
pub mod text;

pub use acquire::TextAcquirer;
pub use error::{Result, TermoError};
pub use mail::{MailMessage, MailSource, SpoolSource};
pub use models::config::TermoConfig;
pub use models::record::{
    DocumentId, EquipmentItem, ExtractedRecord, MailOrigin, NewDocument, StoredDocument,
};
pub use ocr::{OcrBackend, PageRenderer, TextRecognizer};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use pipeline::{IngestSummary, Pipeline, ProcessedDocument, assemble, ingest_mailbox};
pub use receipt::{ExtractionResult, ReceiptParser, extract_fields};
pub use store::{DocumentStore, JsonLinesStore, MemoryStore};
pub use text::{NormalizedText, RawText, normalize};
