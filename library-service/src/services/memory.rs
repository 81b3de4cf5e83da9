use crate::models::{Book, BookId, BookPatch};
use crate::services::{BookStore, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use validator::Validate;

/// Process-local [`BookStore`] used by tests and local runs without MongoDB.
///
/// Books are kept ordered by id, matching the sort order of the MongoDB store.
#[derive(Default)]
pub struct InMemoryBookStore {
    books: Mutex<BTreeMap<BookId, Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        Self {
            books: Mutex::new(books.into_iter().map(|b| (b.id, b)).collect()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<BookId, Book>>, StoreError> {
        self.books
            .lock()
            .map_err(|e| StoreError::Internal(format!("In-memory store mutex poisoned: {}", e)))
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn create(&self, book: &Book) -> Result<Book, StoreError> {
        book.validate()?;

        let mut books = self.lock()?;
        if books.contains_key(&book.id) {
            return Err(StoreError::DuplicateKey(book.id));
        }
        books.insert(book.id, book.clone());
        Ok(book.clone())
    }

    async fn find_by_id_and_update(
        &self,
        id: BookId,
        patch: &BookPatch,
    ) -> Result<Option<Book>, StoreError> {
        patch.validate()?;

        let mut books = self.lock()?;
        Ok(books.get_mut(&id).map(|book| {
            patch.apply(book);
            book.clone()
        }))
    }

    async fn find_by_id_and_delete(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.lock()?.remove(&id))
    }

    async fn save(&self, book: &Book) -> Result<bool, StoreError> {
        book.validate()?;

        let mut books = self.lock()?;
        match books.get_mut(&book.id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_rejects_duplicate_ids_and_keeps_the_original() {
        let store = InMemoryBookStore::new();
        store.create(&Book::new(1, "First", "A", 1)).await.unwrap();

        let err = store
            .create(&Book::new(1, "Second", "B", 9))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(1)));

        let stored = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.title, "First");
    }

    #[tokio::test]
    async fn update_revalidates_and_leaves_book_untouched_on_failure() {
        let store = InMemoryBookStore::with_books([Book::new(1, "T", "A", 4)]);
        let patch = BookPatch {
            quantity: Some(-1),
            ..Default::default()
        };

        let err = store.find_by_id_and_update(1, &patch).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.find_by_id(1).await.unwrap().unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn save_reports_missing_documents() {
        let store = InMemoryBookStore::new();
        assert!(!store.save(&Book::new(5, "T", "A", 1)).await.unwrap());
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_id() {
        let store = InMemoryBookStore::with_books([
            Book::new(3, "C", "A", 1),
            Book::new(1, "A", "A", 1),
            Book::new(2, "B", "A", 1),
        ]);
        let ids: Vec<BookId> = store.find_all().await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
