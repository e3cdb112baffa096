use async_trait::async_trait;

use crate::domain::{DomainError, NewNote, Note};

/// Port for the remote note collection.
///
/// The store is an opaque, already-consistent CRUD service. Failures are
/// surfaced to the caller unchanged; the core never masks them.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Insert a note; the store assigns and returns the id.
    async fn insert(&self, note: &NewNote) -> Result<String, DomainError>;

    /// Delete a note by id. Deleting a nonexistent id is a store error.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    /// All notes, ordered by creation time descending.
    /// An empty store yields an empty Vec, never an error.
    async fn list(&self) -> Result<Vec<Note>, DomainError>;
}
