//! Mail sources delivering receipt PDFs.

mod spool;

pub use spool::SpoolSource;

use std::fmt;

use crate::error::MailError;

/// Result type for mail operations.
pub type Result<T> = std::result::Result<T, MailError>;

/// Identifier of a message within its source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A PDF attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfAttachment {
    pub filename: String,
    pub data: Vec<u8>,
}

/// An unprocessed message carrying at least one PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub id: MessageId,
    pub subject: String,
    pub attachments: Vec<PdfAttachment>,
}

/// Source of incoming messages.
pub trait MailSource {
    /// Messages not yet acknowledged, oldest first.
    fn fetch(&mut self) -> Result<Vec<MailMessage>>;

    /// Mark a message as processed so it is not fetched again.
    fn acknowledge(&mut self, id: &MessageId) -> Result<()>;
}
