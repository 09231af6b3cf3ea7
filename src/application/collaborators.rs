// src/application/collaborators.rs
use crate::domain::{DomainError, Note, NoteId, NoteInput};
use async_trait::async_trait;

/// Query/mutation side of the backend: the source of truth for note records.
#[async_trait]
pub trait NoteService: Send + Sync {
    /// Fetch the default page of notes, no filter or pagination
    async fn list(&self) -> Result<Vec<Note>, DomainError>;

    /// Create a note; the returned record carries the service-assigned id
    async fn create(&self, input: &NoteInput) -> Result<Note, DomainError>;

    /// Delete by id. A well-behaved service treats repeats as success.
    async fn delete(&self, id: &NoteId) -> Result<(), DomainError>;
}

/// Key-addressed object storage for image bytes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under `key`, overwriting any existing object
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), DomainError>;

    /// Fetchable locator for the object stored at `key`
    async fn get_url(&self, key: &str) -> Result<String, DomainError>;
}
