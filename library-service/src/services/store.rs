use crate::models::{Book, BookId, BookPatch};
use crate::services::StoreError;
use async_trait::async_trait;

/// Persistence primitives for the `library` collection.
///
/// Writes validate the resulting document before it is stored, so no
/// implementation ever persists a book with a negative quantity or an empty
/// title/author.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    /// Insert a new book. Fails with [`StoreError::DuplicateKey`] when the id is taken.
    async fn create(&self, book: &Book) -> Result<Book, StoreError>;

    /// Apply `patch` and return the document as it is after the update.
    async fn find_by_id_and_update(
        &self,
        id: BookId,
        patch: &BookPatch,
    ) -> Result<Option<Book>, StoreError>;

    async fn find_by_id_and_delete(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    /// Persist an in-memory modified book. Returns `false` when the document
    /// no longer exists.
    async fn save(&self, book: &Book) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
