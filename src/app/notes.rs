use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{DomainError, NewNote, Note};
use crate::ports::NoteStore;

/// Boundary service over the remote note collection.
///
/// Holds no cache: callers re-fetch via `list()` after every mutation, so
/// the displayed list always reflects the store. Store failures propagate
/// to the caller unchanged; this layer never masks them.
pub struct NotesService {
    store: Arc<dyn NoteStore>,
}

impl NotesService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Persist `content` as a new timestamped note.
    /// Empty or whitespace-only content is a no-op: nothing is inserted
    /// and no error is raised.
    pub async fn save(&self, content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            debug!("ignoring empty note");
            return Ok(());
        }

        let note = NewNote::now(content);
        let id = self.store.insert(&note).await?;
        info!(id = %id, chars = content.len(), "note saved");
        Ok(())
    }

    /// Delete a note by id. A nonexistent id surfaces the store's error.
    pub async fn remove(&self, id: &str) -> Result<(), DomainError> {
        self.store.delete(id).await
    }

    /// All notes, newest first.
    pub async fn list(&self) -> Result<Vec<Note>, DomainError> {
        self.store.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::note::format_timestamp;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// In-memory store double keeping insertion order; `list` returns
    /// newest first like the real collection.
    #[derive(Default)]
    struct InMemoryStore {
        records: Mutex<Vec<(String, NewNote)>>,
        next_id: Mutex<u64>,
        fail_inserts: bool,
    }

    impl InMemoryStore {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail_inserts: true,
                ..Self::default()
            })
        }

        fn len(&self) -> usize {
            self.records.lock().len()
        }
    }

    #[async_trait]
    impl NoteStore for InMemoryStore {
        async fn insert(&self, note: &NewNote) -> Result<String, DomainError> {
            if self.fail_inserts {
                return Err(DomainError::NoteStore("permission denied".to_string()));
            }
            let mut next_id = self.next_id.lock();
            *next_id += 1;
            let id = format!("note-{}", *next_id);
            self.records.lock().push((id.clone(), note.clone()));
            Ok(id)
        }

        async fn delete(&self, id: &str) -> Result<(), DomainError> {
            let mut records = self.records.lock();
            let before = records.len();
            records.retain(|(record_id, _)| record_id != id);
            if records.len() == before {
                return Err(DomainError::NoteStore(format!("no such note: {id}")));
            }
            Ok(())
        }

        async fn list(&self) -> Result<Vec<Note>, DomainError> {
            Ok(self
                .records
                .lock()
                .iter()
                .rev()
                .map(|(id, note)| Note {
                    id: id.clone(),
                    content: note.content.clone(),
                    timestamp: format_timestamp(&note.timestamp),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_save_then_list_roundtrip() {
        let store = InMemoryStore::new();
        let notes = NotesService::new(store);

        notes.save("hello").await.unwrap();
        let listed = notes.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "hello");
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = InMemoryStore::new();
        let notes = NotesService::new(store);

        notes.save("older").await.unwrap();
        notes.save("newer").await.unwrap();

        let listed = notes.list().await.unwrap();
        assert_eq!(listed[0].content, "newer");
        assert_eq!(listed[1].content, "older");
    }

    #[tokio::test]
    async fn test_remove_deletes_by_id() {
        let store = InMemoryStore::new();
        let notes = NotesService::new(store);

        notes.save("keep").await.unwrap();
        notes.save("drop").await.unwrap();

        let listed = notes.list().await.unwrap();
        let target = listed.iter().find(|n| n.content == "drop").unwrap();
        notes.remove(&target.id).await.unwrap();

        let listed = notes.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|n| n.content != "drop"));
    }

    #[tokio::test]
    async fn test_remove_nonexistent_id_surfaces_store_error() {
        let store = InMemoryStore::new();
        let notes = NotesService::new(store);

        let result = notes.remove("note-404").await;
        assert!(matches!(result, Err(DomainError::NoteStore(_))));
    }

    #[tokio::test]
    async fn test_empty_and_whitespace_saves_are_no_ops() {
        let store = InMemoryStore::new();
        let notes = NotesService::new(Arc::clone(&store) as Arc<dyn NoteStore>);

        notes.save("").await.unwrap();
        notes.save("   ").await.unwrap();
        notes.save("\n\t").await.unwrap();

        assert_eq!(store.len(), 0);
        assert!(notes.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_store_lists_empty_not_error() {
        let notes = NotesService::new(InMemoryStore::new());
        assert!(notes.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_propagates_unchanged() {
        let notes = NotesService::new(InMemoryStore::failing());
        let result = notes.save("hello").await;
        match result {
            Err(DomainError::NoteStore(message)) => assert_eq!(message, "permission denied"),
            other => panic!("expected NoteStore error, got {other:?}"),
        }
    }
}
