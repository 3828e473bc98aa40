//! Append-only JSON-lines document store.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{DocumentStore, Result, SearchQuery};
use crate::models::record::{DocumentId, NewDocument, StoredDocument};

/// Store writing one JSON object per line.
///
/// Ids continue from the highest id found in the file when it is reopened.
#[derive(Debug)]
pub struct JsonLinesStore {
    path: PathBuf,
    next_id: u64,
}

impl JsonLinesStore {
    /// Open or create the store at `path`, creating parent directories.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut store = Self { path, next_id: 1 };
        let contents = store.read_contents()?;
        if !contents.is_empty() && !contents.ends_with(b"\n") {
            warn!(
                "Store {} ends with an incomplete record, starting a new line",
                store.path.display()
            );
            OpenOptions::new()
                .append(true)
                .open(&store.path)?
                .write_all(b"\n")?;
        }

        let last = parse_lines(&contents, &store.path)
            .iter()
            .map(|doc| doc.id.0)
            .max();
        store.next_id = last.map_or(1, |id| id + 1);

        info!(
            "Opened document store {} (next id {})",
            store.path.display(),
            store.next_id
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_contents(&self) -> Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_all(&self) -> Result<Vec<StoredDocument>> {
        Ok(parse_lines(&self.read_contents()?, &self.path))
    }
}

/// Decode every line; lines that do not decode are logged and skipped.
fn parse_lines(contents: &[u8], path: &Path) -> Vec<StoredDocument> {
    contents
        .split(|b| *b == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.trim_ascii().is_empty())
        .filter_map(|(index, line)| match serde_json::from_slice(line) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(
                    "Skipping corrupt record at {}:{}: {}",
                    path.display(),
                    index + 1,
                    e
                );
                None
            }
        })
        .collect()
}

impl DocumentStore for JsonLinesStore {
    fn insert(&mut self, document: NewDocument) -> Result<DocumentId> {
        let id = DocumentId(self.next_id);
        let stored = StoredDocument { id, document };
        let mut line = serde_json::to_string(&stored)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        self.next_id += 1;
        debug!("Stored document {} in {}", id, self.path.display());
        Ok(id)
    }

    fn find_by_substring(&self, query: &str) -> Result<Vec<StoredDocument>> {
        let Some(query) = SearchQuery::new(query) else {
            return Ok(Vec::new());
        };
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|doc| query.matches(doc))
            .collect())
    }

    fn get(&self, id: DocumentId) -> Result<Option<StoredDocument>> {
        Ok(self.read_all()?.into_iter().find(|doc| doc.id == id))
    }

    fn all(&self) -> Result<Vec<StoredDocument>> {
        self.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::document;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ids_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("documents.jsonl");

        let mut store = JsonLinesStore::open(&path).unwrap();
        assert_eq!(store.insert(document("a", None)).unwrap(), DocumentId(1));
        assert_eq!(store.insert(document("b", None)).unwrap(), DocumentId(2));

        let mut reopened = JsonLinesStore::open(&path).unwrap();
        assert_eq!(reopened.insert(document("c", None)).unwrap(), DocumentId(3));

        let subjects: Vec<String> = reopened
            .all()
            .unwrap()
            .into_iter()
            .map(|doc| doc.document.subject)
            .collect();
        assert_eq!(subjects, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_search_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonLinesStore::open(dir.path().join("docs.jsonl")).unwrap();
        store.insert(document("Termo de Devolução", Some("Ana"))).unwrap();
        let id = store.insert(document("Termo de Recebimento", Some("Bruno"))).unwrap();

        let found = store.find_by_substring("RECEBIMENTO").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(found[0].document.record.nome.as_deref(), Some("Bruno"));

        assert_eq!(store.find_by_substring("devolucao").unwrap().len(), 1);
        assert!(store.find_by_substring("").unwrap().is_empty());
        assert_eq!(store.get(id).unwrap().unwrap().document.subject, "Termo de Recebimento");
        assert!(store.get(DocumentId(99)).unwrap().is_none());
    }

    #[test]
    fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLinesStore::open(dir.path().join("docs.jsonl")).unwrap();

        assert!(store.all().unwrap().is_empty());
        assert!(store.find_by_substring("maria").unwrap().is_empty());
    }

    #[test]
    fn test_truncated_last_line_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.jsonl");
        let mut store = JsonLinesStore::open(&path).unwrap();
        store.insert(document("a", None)).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "{{\"id\":2,\"subj").unwrap();
        drop(file);

        let mut reopened = JsonLinesStore::open(&path).unwrap();
        assert_eq!(reopened.insert(document("b", None)).unwrap(), DocumentId(2));

        let subjects: Vec<String> = reopened
            .all()
            .unwrap()
            .into_iter()
            .map(|doc| doc.document.subject)
            .collect();
        assert_eq!(subjects, vec!["a", "b"]);
        assert_eq!(reopened.find_by_substring("b").unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_middle_line_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.jsonl");
        let mut store = JsonLinesStore::open(&path).unwrap();
        store.insert(document("a", None)).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{not json\n\xff\xfe\n").unwrap();
        drop(file);
        store.insert(document("c", None)).unwrap();

        let reopened = JsonLinesStore::open(&path).unwrap();
        let ids: Vec<DocumentId> = reopened.all().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![DocumentId(1), DocumentId(2)]);
    }
}
