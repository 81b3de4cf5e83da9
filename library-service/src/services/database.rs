use crate::models::{Book, BookId, BookPatch};
use crate::services::{BookStore, StoreError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;
use validator::Validate;

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, collection = %collection, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self {
            client,
            db,
            collection: collection.to_string(),
        })
    }

    pub fn books(&self) -> Collection<Book> {
        self.db.collection(&self.collection)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[async_trait]
impl BookStore for MongoDb {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self.books().find(None, options).await.map_err(|e| {
            tracing::error!("Failed to list books: {}", e);
            StoreError::from(e)
        })?;

        let books: Vec<Book> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect books: {}", e);
            StoreError::from(e)
        })?;

        Ok(books)
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        self.books()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(book_id = id, "Failed to find book: {}", e);
                StoreError::from(e)
            })
    }

    async fn create(&self, book: &Book) -> Result<Book, StoreError> {
        book.validate()?;

        self.books().insert_one(book, None).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::DuplicateKey(book.id)
            } else {
                tracing::error!(book_id = book.id, "Failed to insert book: {}", e);
                StoreError::from(e)
            }
        })?;

        Ok(book.clone())
    }

    async fn find_by_id_and_update(
        &self,
        id: BookId,
        patch: &BookPatch,
    ) -> Result<Option<Book>, StoreError> {
        patch.validate()?;

        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let set = mongodb::bson::to_document(patch)
            .map_err(|e| StoreError::Internal(format!("Failed to encode update: {}", e)))?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.books()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await
            .map_err(|e| {
                tracing::error!(book_id = id, "Failed to update book: {}", e);
                StoreError::from(e)
            })
    }

    async fn find_by_id_and_delete(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        self.books()
            .find_one_and_delete(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(book_id = id, "Failed to delete book: {}", e);
                StoreError::from(e)
            })
    }

    async fn save(&self, book: &Book) -> Result<bool, StoreError> {
        book.validate()?;

        let result = self
            .books()
            .replace_one(doc! { "_id": book.id }, book, None)
            .await
            .map_err(|e| {
                tracing::error!(book_id = book.id, "Failed to save book: {}", e);
                StoreError::from(e)
            })?;

        Ok(result.matched_count > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }
}
