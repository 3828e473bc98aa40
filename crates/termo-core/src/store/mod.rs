//! Persistence of processed documents.

mod json;
mod memory;

pub use json::JsonLinesStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::record::{DocumentId, MailOrigin, NewDocument, StoredDocument};
use crate::text::normalize;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable home for processed documents.
pub trait DocumentStore {
    /// Persist a document and return its new identifier.
    fn insert(&mut self, document: NewDocument) -> Result<DocumentId>;

    /// Documents whose subject, filename, text, nome, matricula or cpf
    /// contain `query`, ignoring case and accents.
    fn find_by_substring(&self, query: &str) -> Result<Vec<StoredDocument>>;

    /// Look up a single document.
    fn get(&self, id: DocumentId) -> Result<Option<StoredDocument>>;

    /// Every stored document in insertion order.
    fn all(&self) -> Result<Vec<StoredDocument>>;

    /// The document ingested from the given message attachment, if any.
    fn find_by_origin(&self, origin: &MailOrigin) -> Result<Option<StoredDocument>> {
        Ok(self
            .all()?
            .into_iter()
            .find(|stored| stored.document.origin.as_ref() == Some(origin)))
    }
}

/// Prepared search term shared by the store implementations.
pub(crate) struct SearchQuery(String);

impl SearchQuery {
    /// `None` for a query that is blank after normalization.
    pub(crate) fn new(query: &str) -> Option<Self> {
        let query = normalize(query.trim());
        if query.is_empty() {
            None
        } else {
            Some(Self(query))
        }
    }

    pub(crate) fn matches(&self, stored: &StoredDocument) -> bool {
        let doc = &stored.document;
        let record = &doc.record;

        [
            Some(doc.subject.as_str()),
            Some(doc.filename.as_str()),
            Some(doc.extracted_text.as_str()),
            record.nome.as_deref(),
            record.matricula.as_deref(),
            record.cpf.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| normalize(field).contains(&self.0))
    }
}
