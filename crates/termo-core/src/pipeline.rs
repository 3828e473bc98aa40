//! End-to-end processing: acquire, normalize, extract, store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::acquire::TextAcquirer;
use crate::error::{Result, TermoError};
use crate::mail::{MailMessage, MailSource, PdfAttachment};
use crate::models::config::TermoConfig;
use crate::models::record::{DocumentId, ExtractedRecord, MailOrigin, NewDocument};
use crate::ocr::OcrBackend;
use crate::receipt::ReceiptParser;
use crate::store::DocumentStore;
use crate::text::RawText;

/// Output of processing one PDF.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Text as acquired, before normalization.
    pub raw_text: RawText,
    /// Extracted fields.
    pub record: ExtractedRecord,
    /// Extraction warnings.
    pub warnings: Vec<String>,
}

/// Text acquisition followed by field extraction.
pub struct Pipeline {
    acquirer: TextAcquirer,
    parser: ReceiptParser,
}

impl Pipeline {
    pub fn new(acquirer: TextAcquirer, parser: ReceiptParser) -> Self {
        Self { acquirer, parser }
    }

    /// Pipeline without OCR fallback.
    pub fn text_only() -> Self {
        Self::new(TextAcquirer::text_only(), ReceiptParser::new())
    }

    /// Build from configuration, checking the OCR tools when OCR is enabled.
    pub fn from_config(config: &TermoConfig) -> Result<Self> {
        let acquirer = if config.ocr.enabled {
            config
                .ocr
                .validate()
                .map_err(|e| TermoError::Config(e.to_string()))?;
            TextAcquirer::new(OcrBackend::from_config(&config.ocr))
        } else {
            TextAcquirer::text_only()
        };

        let parser = ReceiptParser::new().with_zero_pad_day(config.extraction.zero_pad_day);
        Ok(Self::new(acquirer, parser))
    }

    pub fn has_ocr(&self) -> bool {
        self.acquirer.has_ocr()
    }

    /// Process one PDF. Never fails; unreadable input yields an empty record.
    pub fn process_file(&self, pdf_path: &Path) -> ProcessedDocument {
        let raw_text = self.acquirer.acquire_text(pdf_path);
        let normalized = raw_text.normalize();
        let result = self.parser.parse(normalized.as_str());

        info!(
            "Processed {} ({} fields missing)",
            pdf_path.display(),
            result.record.missing_fields().len()
        );

        ProcessedDocument {
            raw_text,
            record: result.record,
            warnings: result.warnings,
        }
    }
}

/// Combine a processed document with its message metadata.
pub fn assemble(
    subject: &str,
    filename: &str,
    pdf_filepath: Option<PathBuf>,
    processed: ProcessedDocument,
    processed_at: DateTime<Utc>,
) -> NewDocument {
    NewDocument {
        subject: subject.to_string(),
        filename: filename.to_string(),
        pdf_filepath,
        extracted_text: processed.raw_text.into_string(),
        processed_at,
        record: processed.record,
        origin: None,
    }
}

/// Counters reported by [`ingest_mailbox`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub messages: usize,
    pub stored: Vec<DocumentId>,
    pub acknowledged: usize,
    /// Attachments already stored by an earlier run.
    pub skipped: usize,
    pub failures: usize,
}

enum Ingested {
    Stored(DocumentId),
    AlreadyStored(DocumentId),
}

/// Fetch messages, store every PDF attachment and acknowledge complete messages.
///
/// A message is acknowledged only when all its attachments were stored.
/// Attachments stored by an earlier run of an unacknowledged message are
/// skipped. Failures are logged and counted; the loop moves on to the next attachment.
pub fn ingest_mailbox(
    pipeline: &Pipeline,
    source: &mut dyn MailSource,
    store: &mut dyn DocumentStore,
    attachments_dir: &Path,
) -> Result<IngestSummary> {
    fs::create_dir_all(attachments_dir)?;
    let messages = source.fetch()?;
    let mut summary = IngestSummary {
        messages: messages.len(),
        ..Default::default()
    };

    for message in &messages {
        let mut complete = true;

        for (index, attachment) in message.attachments.iter().enumerate() {
            let origin = MailOrigin {
                message_id: message.id.0.clone(),
                attachment: index,
            };
            match ingest_attachment(pipeline, store, attachments_dir, message, attachment, origin)
            {
                Ok(Ingested::Stored(id)) => summary.stored.push(id),
                Ok(Ingested::AlreadyStored(id)) => {
                    debug!(
                        "Attachment {} of message {} already stored as {}",
                        attachment.filename, message.id, id
                    );
                    summary.skipped += 1;
                }
                Err(e) => {
                    warn!(
                        "Failed to ingest {} from message {}: {}",
                        attachment.filename, message.id, e
                    );
                    summary.failures += 1;
                    complete = false;
                }
            }
        }

        if !complete {
            warn!("Leaving message {} unacknowledged", message.id);
            continue;
        }

        match source.acknowledge(&message.id) {
            Ok(()) => summary.acknowledged += 1,
            Err(e) => {
                warn!("Failed to acknowledge message {}: {}", message.id, e);
                summary.failures += 1;
            }
        }
    }

    info!(
        "Ingested {} documents from {} messages ({} skipped, {} failures)",
        summary.stored.len(),
        summary.messages,
        summary.skipped,
        summary.failures
    );
    Ok(summary)
}

fn ingest_attachment(
    pipeline: &Pipeline,
    store: &mut dyn DocumentStore,
    attachments_dir: &Path,
    message: &MailMessage,
    attachment: &PdfAttachment,
    origin: MailOrigin,
) -> Result<Ingested> {
    if let Some(existing) = store.find_by_origin(&origin)? {
        return Ok(Ingested::AlreadyStored(existing.id));
    }

    let filename = sanitize_filename(&attachment.filename);
    let path = unique_path(attachments_dir, &filename);
    fs::write(&path, &attachment.data)?;

    let processed = pipeline.process_file(&path);
    let mut document = assemble(
        &message.subject,
        &filename,
        Some(path.clone()),
        processed,
        Utc::now(),
    );
    document.origin = Some(origin);

    match store.insert(document) {
        Ok(id) => Ok(Ingested::Stored(id)),
        Err(e) => {
            if let Err(remove) = fs::remove_file(&path) {
                debug!("Could not remove {}: {}", path.display(), remove);
            }
            Err(e.into())
        }
    }
}

/// Keep only the final path component, replacing unsafe characters.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "attachment.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}

fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{}", ext)),
        _ => (filename, String::new()),
    };
    (1..)
        .map(|n| dir.join(format!("{}-{}{}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
