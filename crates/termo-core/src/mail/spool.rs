//! Spool directory of `.eml` files acting as an inbox.
//!
//! Acknowledged messages are moved into a `seen/` subdirectory.

use std::fs;
use std::path::{Path, PathBuf};

use mailparse::{MailHeaderMap, ParsedMail};
use tracing::{debug, info, warn};

use super::{MailMessage, MailSource, MessageId, PdfAttachment, Result};
use crate::error::MailError;
use crate::text::normalize;

const SEEN_DIR: &str = "seen";

/// Mail source reading RFC 822 files from a directory.
pub struct SpoolSource {
    inbox: PathBuf,
    subject_keywords: Vec<String>,
}

impl SpoolSource {
    pub fn new(inbox: impl Into<PathBuf>) -> Self {
        Self {
            inbox: inbox.into(),
            subject_keywords: Vec::new(),
        }
    }

    /// Only accept subjects containing one of these phrases (accent and case insensitive).
    pub fn with_subject_keywords(mut self, keywords: &[String]) -> Self {
        self.subject_keywords = keywords.iter().map(|k| normalize(k)).collect();
        self
    }

    pub fn inbox(&self) -> &Path {
        &self.inbox
    }

    fn subject_matches(&self, subject: &str) -> bool {
        if self.subject_keywords.is_empty() {
            return true;
        }
        let subject = normalize(subject);
        self.subject_keywords.iter().any(|k| subject.contains(k.as_str()))
    }

    fn pending_files(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.inbox)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("eml"))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    fn read_message(&self, path: &Path) -> Result<Option<MailMessage>> {
        let name = path.file_name().unwrap_or_default();
        let id = name
            .to_str()
            .ok_or_else(|| MailError::Parse {
                id: name.to_string_lossy().into_owned(),
                reason: "file name is not valid UTF-8".to_string(),
            })?
            .to_string();
        let raw = fs::read(path)?;
        let parsed = mailparse::parse_mail(&raw).map_err(|e| MailError::Parse {
            id: id.clone(),
            reason: e.to_string(),
        })?;

        let subject = parsed
            .headers
            .get_first_value("Subject")
            .unwrap_or_default();
        if !self.subject_matches(&subject) {
            debug!("Skipping {}: subject {:?} does not match", id, subject);
            return Ok(None);
        }

        let mut attachments = Vec::new();
        collect_pdf_attachments(&parsed, &mut attachments);
        if attachments.is_empty() {
            debug!("Skipping {}: no PDF attachment", id);
            return Ok(None);
        }

        Ok(Some(MailMessage {
            id: MessageId(id),
            subject,
            attachments,
        }))
    }
}

impl MailSource for SpoolSource {
    fn fetch(&mut self) -> Result<Vec<MailMessage>> {
        let mut messages = Vec::new();

        for path in self.pending_files()? {
            match self.read_message(&path) {
                Ok(Some(message)) => messages.push(message),
                Ok(None) => {}
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        info!(
            "Found {} messages with PDF attachments in {}",
            messages.len(),
            self.inbox.display()
        );
        Ok(messages)
    }

    fn acknowledge(&mut self, id: &MessageId) -> Result<()> {
        let source = self.inbox.join(&id.0);
        if id.0.is_empty() || id.0.contains(['/', '\\']) || !source.is_file() {
            return Err(MailError::UnknownMessage(id.0.clone()));
        }

        let seen_dir = self.inbox.join(SEEN_DIR);
        fs::create_dir_all(&seen_dir)?;
        fs::rename(&source, seen_dir.join(&id.0))?;
        debug!("Marked {} as seen", id);
        Ok(())
    }
}

/// Walk the MIME tree collecting PDF parts.
fn collect_pdf_attachments(part: &ParsedMail<'_>, out: &mut Vec<PdfAttachment>) {
    if part.subparts.is_empty() {
        let disposition = part.get_content_disposition();
        let filename = disposition
            .params
            .get("filename")
            .or_else(|| part.ctype.params.get("name"))
            .cloned();

        let is_pdf = part.ctype.mimetype.eq_ignore_ascii_case("application/pdf")
            || filename
                .as_deref()
                .is_some_and(|f| f.to_ascii_lowercase().ends_with(".pdf"));

        if is_pdf {
            let fallback_name = format!("attachment-{}.pdf", out.len() + 1);
            match part.get_body_raw() {
                Ok(data) => out.push(PdfAttachment {
                    filename: filename.unwrap_or(fallback_name),
                    data,
                }),
                Err(e) => warn!("Could not decode attachment: {}", e),
            }
        }
        return;
    }

    for sub in &part.subparts {
        collect_pdf_attachments(sub, out);
    }
}
