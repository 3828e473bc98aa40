//! In-memory document store.

use super::{DocumentStore, Result, SearchQuery};
use crate::models::record::{DocumentId, NewDocument, StoredDocument};

/// Store keeping documents in a vector. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Vec<StoredDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&mut self, document: NewDocument) -> Result<DocumentId> {
        let id = DocumentId(self.documents.len() as u64 + 1);
        self.documents.push(StoredDocument { id, document });
        Ok(id)
    }

    fn find_by_substring(&self, query: &str) -> Result<Vec<StoredDocument>> {
        let Some(query) = SearchQuery::new(query) else {
            return Ok(Vec::new());
        };
        Ok(self
            .documents
            .iter()
            .filter(|doc| query.matches(doc))
            .cloned()
            .collect())
    }

    fn get(&self, id: DocumentId) -> Result<Option<StoredDocument>> {
        Ok(self.documents.iter().find(|doc| doc.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<StoredDocument>> {
        Ok(self.documents.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::MailOrigin;
    use crate::store::tests::document;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut store = MemoryStore::new();

        assert_eq!(store.insert(document("a", None)).unwrap(), DocumentId(1));
        assert_eq!(store.insert(document("b", None)).unwrap(), DocumentId(2));
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get(DocumentId(2)).unwrap().unwrap().document.subject,
            "b"
        );
        assert!(store.get(DocumentId(3)).unwrap().is_none());
    }

    #[test]
    fn test_find_by_substring() {
        let mut store = MemoryStore::new();
        store.insert(document("termo de recebimento", Some("Maria"))).unwrap();
        store.insert(document("termo de devolução", Some("José"))).unwrap();

        let found = store.find_by_substring("jose").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, DocumentId(2));

        assert_eq!(store.find_by_substring("termo").unwrap().len(), 2);
        assert!(store.find_by_substring("").unwrap().is_empty());
    }

    #[test]
    fn test_find_by_origin() {
        let origin = MailOrigin {
            message_id: "m1.eml".to_string(),
            attachment: 1,
        };
        let mut store = MemoryStore::new();
        store.insert(document("a", None)).unwrap();
        let mut tagged = document("b", None);
        tagged.origin = Some(origin.clone());
        store.insert(tagged).unwrap();

        let found = store.find_by_origin(&origin).unwrap().unwrap();
        assert_eq!(found.id, DocumentId(2));

        let other = MailOrigin {
            attachment: 0,
            ..origin
        };
        assert!(store.find_by_origin(&other).unwrap().is_none());
    }
}
