//! The document registry: ordered document set, active pointer, persistence.

use crate::document::{initial_body, Document, DocumentId, DocumentRecord, DEFAULT_NAME};
use crate::error::{RegistryError, Result};
use snippet_store::{keys, Storage};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Single source of truth for the set of documents and which one is active.
///
/// Every mutation is synchronous and atomic from the caller's perspective:
/// the registry persists through [`Storage`] first and only then updates
/// in-memory state, so a failed write surfaces as an error with nothing
/// changed.
#[derive(Debug)]
pub struct DocumentRegistry<S: Storage> {
    storage: Arc<S>,
    documents: Vec<Document>,
    active_id: DocumentId,
    /// Highest flush sequence applied per document; stale flushes are dropped.
    flush_seqs: HashMap<DocumentId, u64>,
}

impl<S: Storage> DocumentRegistry<S> {
    /// Open the registry from persisted state, seeding a first document when
    /// the store is fresh.
    pub fn open(storage: Arc<S>) -> Result<Self> {
        let records = match storage.load(keys::DOCUMENT_LIST)? {
            Some(raw) => {
                serde_json::from_str::<Vec<DocumentRecord>>(&raw).map_err(|e| {
                    RegistryError::Corrupt {
                        key: keys::DOCUMENT_LIST.to_string(),
                        reason: e.to_string(),
                    }
                })?
            }
            None => Vec::new(),
        };

        if records.is_empty() {
            return Self::seed(storage);
        }

        let mut documents = Vec::with_capacity(records.len());
        for record in &records {
            let content = storage.load(&keys::content(&record.id))?.unwrap_or_default();
            documents.push(Document {
                id: DocumentId::from_string(record.id.clone()),
                name: record.name.clone(),
                content,
            });
        }

        // A missing or dangling pointer falls back to the first document.
        let persisted = storage.load(keys::ACTIVE_DOCUMENT)?;
        let active_id = persisted
            .map(DocumentId::from_string)
            .filter(|id| documents.iter().any(|d| &d.id == id));
        let active_id = match active_id {
            Some(id) => id,
            None => {
                let first = documents[0].id.clone();
                storage.save(keys::ACTIVE_DOCUMENT, first.as_str())?;
                first
            }
        };

        debug!(documents = documents.len(), active = %active_id, "registry opened");
        Ok(Self {
            storage,
            documents,
            active_id,
            flush_seqs: HashMap::new(),
        })
    }

    /// First-run state: one welcome document with id `"1"`, marked active.
    fn seed(storage: Arc<S>) -> Result<Self> {
        let doc = Document {
            id: DocumentId::from_string("1"),
            name: DEFAULT_NAME.to_string(),
            content: initial_body().to_string(),
        };

        let records = vec![DocumentRecord::from(&doc)];
        save_records(storage.as_ref(), &records)?;
        storage.save(&keys::content(doc.id.as_str()), &doc.content)?;
        storage.save(keys::ACTIVE_DOCUMENT, doc.id.as_str())?;

        info!(id = %doc.id, "registry seeded with welcome document");
        Ok(Self {
            active_id: doc.id.clone(),
            documents: vec![doc],
            storage,
            flush_seqs: HashMap::new(),
        })
    }

    // === Accessors ===

    /// Documents in user-significant order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.get(id).is_some()
    }

    pub fn active_id(&self) -> &DocumentId {
        &self.active_id
    }

    /// The active document.
    ///
    /// `NoActiveDocument` is unreachable while the never-empty invariant
    /// holds.
    pub fn active(&self) -> Result<&Document> {
        self.documents
            .iter()
            .find(|d| d.id == self.active_id)
            .ok_or(RegistryError::NoActiveDocument)
    }

    // === Mutations ===

    /// Create a new document with the default name and the welcome body,
    /// append it to the end of the order and make it active.
    pub fn create(&mut self) -> Result<Document> {
        let id = self.unique_id();
        let doc = Document {
            id: id.clone(),
            name: DEFAULT_NAME.to_string(),
            content: initial_body().to_string(),
        };

        let mut records: Vec<DocumentRecord> = self.records();
        records.push(DocumentRecord::from(&doc));
        save_records(self.storage.as_ref(), &records)?;
        self.storage.save(&keys::content(id.as_str()), &doc.content)?;
        self.storage.save(keys::ACTIVE_DOCUMENT, id.as_str())?;

        self.documents.push(doc.clone());
        self.active_id = id.clone();

        info!(id = %id, "document created");
        Ok(doc)
    }

    /// Rename a document in place. An empty name after trimming is a silent
    /// no-op, as is an unknown id. Content storage is untouched.
    pub fn rename(&mut self, id: &DocumentId, new_name: &str) -> Result<()> {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        let Some(index) = self.index_of(id) else {
            return Ok(());
        };

        let mut records = self.records();
        records[index].name = trimmed.to_string();
        save_records(self.storage.as_ref(), &records)?;

        self.documents[index].name = trimmed.to_string();
        debug!(id = %id, name = trimmed, "document renamed");
        Ok(())
    }

    /// Delete a document and its persisted content and chat history.
    ///
    /// Refused with `LastDocument` when only one document remains. Deleting
    /// the active document promotes the first remaining document.
    pub fn delete(&mut self, id: &DocumentId) -> Result<()> {
        let Some(index) = self.index_of(id) else {
            return Ok(());
        };
        if self.documents.len() == 1 {
            return Err(RegistryError::LastDocument);
        }

        let mut records = self.records();
        records.remove(index);
        save_records(self.storage.as_ref(), &records)?;
        self.storage.remove(&keys::content(id.as_str()))?;
        self.storage.remove(&keys::chat(id.as_str()))?;

        let was_active = &self.active_id == id;
        if was_active {
            if let Some(first) = records.first() {
                self.storage.save(keys::ACTIVE_DOCUMENT, &first.id)?;
                self.active_id = DocumentId::from_string(first.id.clone());
            }
        }

        self.documents.remove(index);
        self.flush_seqs.remove(id);
        info!(id = %id, promoted = was_active, "document deleted");
        Ok(())
    }

    /// Move `dragged` into `target`'s slot, preserving the relative order of
    /// every other document. No-op when the ids are equal or either is
    /// unknown.
    pub fn reorder(&mut self, dragged: &DocumentId, target: &DocumentId) -> Result<()> {
        if dragged == target {
            return Ok(());
        }
        let (Some(from), Some(to)) = (self.index_of(dragged), self.index_of(target)) else {
            return Ok(());
        };

        let mut reordered = self.documents.clone();
        let doc = reordered.remove(from);
        reordered.insert(to, doc);

        let records: Vec<DocumentRecord> = reordered.iter().map(DocumentRecord::from).collect();
        save_records(self.storage.as_ref(), &records)?;

        self.documents = reordered;
        debug!(dragged = %dragged, target = %target, "documents reordered");
        Ok(())
    }

    /// Point the active-document pointer at `id`. Unknown ids are a no-op.
    /// The pointer persists under its own key, independent of the list.
    pub fn set_active(&mut self, id: &DocumentId) -> Result<()> {
        if !self.contains(id) {
            return Ok(());
        }
        self.storage.save(keys::ACTIVE_DOCUMENT, id.as_str())?;
        self.active_id = id.clone();
        debug!(id = %id, "active document changed");
        Ok(())
    }

    /// Overwrite a document's content, in memory and in its content key.
    /// Order and name are untouched.
    pub fn update_content(&mut self, id: &DocumentId, content: &str) -> Result<()> {
        let seq = self.flush_seqs.get(id).copied().unwrap_or(0) + 1;
        self.flush_content(id, content, seq)
    }

    /// Sequence-guarded content write for debounced editors.
    ///
    /// Flushes carry a monotonically increasing per-document sequence number;
    /// a flush at or below the last applied sequence is dropped, so delayed
    /// or out-of-order flushes cannot regress content.
    pub fn flush_content(&mut self, id: &DocumentId, content: &str, seq: u64) -> Result<()> {
        let Some(index) = self.index_of(id) else {
            return Err(RegistryError::DocumentNotFound(id.to_string()));
        };

        let last = self.flush_seqs.get(id).copied().unwrap_or(0);
        if seq <= last {
            debug!(id = %id, seq, last, "stale content flush dropped");
            return Ok(());
        }

        self.storage.save(&keys::content(id.as_str()), content)?;
        self.documents[index].content = content.to_string();
        self.flush_seqs.insert(id.clone(), seq);
        Ok(())
    }

    /// The sequence number the next editor flush for `id` should carry.
    pub fn next_flush_seq(&self, id: &DocumentId) -> u64 {
        self.flush_seqs.get(id).copied().unwrap_or(0) + 1
    }

    // === Internals ===

    fn index_of(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|d| &d.id == id)
    }

    fn records(&self) -> Vec<DocumentRecord> {
        self.documents.iter().map(DocumentRecord::from).collect()
    }

    /// Timestamp id, bumped past any existing ids on collision.
    fn unique_id(&self) -> DocumentId {
        let mut candidate = DocumentId::now();
        while self.contains(&candidate) {
            let bumped = candidate.as_str().parse::<u128>().unwrap_or(0) + 1;
            candidate = DocumentId::from_string(bumped.to_string());
        }
        candidate
    }
}

fn save_records<S: Storage + ?Sized>(storage: &S, records: &[DocumentRecord]) -> Result<()> {
    let raw = serde_json::to_string(records).map_err(|e| RegistryError::Corrupt {
        key: keys::DOCUMENT_LIST.to_string(),
        reason: e.to_string(),
    })?;
    storage.save(keys::DOCUMENT_LIST, &raw)?;
    Ok(())
}
