use crate::models::{parse_book_id, Book, BookId};
use crate::services::TakeOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use validator::Validate;

const MISSING_FIELDS: &str =
    "Missing required fields. Please provide _id, title, author, and quan";
const INVALID_QUANTITY: &str = "Quantity must be a non-negative number";

/// Body of `POST /postbook`.
///
/// Fields are loosely typed so presence and type problems are reported with
/// specific messages instead of a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookRequest {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, rename = "quan", alias = "quantity")]
    pub quantity: Option<Value>,
}

impl CreateBookRequest {
    pub fn into_book(self) -> Result<Book, AppError> {
        let (Some(id), Some(title), Some(author), Some(quantity)) = (
            self.id,
            self.title.filter(|t| !t.is_empty()),
            self.author.filter(|a| !a.is_empty()),
            self.quantity,
        ) else {
            return Err(AppError::BadRequest(anyhow::anyhow!(MISSING_FIELDS)));
        };

        let quantity = quantity
            .as_i64()
            .filter(|q| *q >= 0)
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!(INVALID_QUANTITY)))?;

        let book = Book::new(parse_body_id(&id)?, title, author, quantity);
        book.validate()?;
        Ok(book)
    }
}

/// Ids arrive as JSON integers, or as strings holding one.
fn parse_body_id(id: &Value) -> Result<BookId, AppError> {
    match id {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid book ID format"))),
        Value::String(s) => parse_book_id(s),
        _ => Err(AppError::BadRequest(anyhow::anyhow!("Invalid book ID format"))),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `GET /getBooks` answers with a bare array, or an explicit marker when empty.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BookListResponse {
    Empty { message: String, books: Vec<Book> },
    Books(Vec<Book>),
}

impl From<Vec<Book>> for BookListResponse {
    fn from(books: Vec<Book>) -> Self {
        if books.is_empty() {
            BookListResponse::Empty {
                message: "Library is empty".to_string(),
                books,
            }
        } else {
            BookListResponse::Books(books)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteBookResponse {
    pub message: String,
    pub book: Book,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeBooksResponse {
    pub updated: Vec<Book>,
    pub not_found: Vec<String>,
    pub out_of_stock: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

impl From<TakeOutcome> for TakeBooksResponse {
    fn from(outcome: TakeOutcome) -> Self {
        Self {
            updated: outcome.updated,
            not_found: outcome.not_found,
            out_of_stock: outcome.out_of_stock,
            failed: outcome.failed,
        }
    }
}

/// Body returned when no id in a bulk take could be taken.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeBooksRejection {
    pub error: String,
    pub not_found: Vec<String>,
    pub out_of_stock: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

impl From<TakeOutcome> for TakeBooksRejection {
    fn from(outcome: TakeOutcome) -> Self {
        Self {
            error: "No books were updated".to_string(),
            not_found: outcome.not_found,
            out_of_stock: outcome.out_of_stock,
            failed: outcome.failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> CreateBookRequest {
        serde_json::from_value(body).unwrap()
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::BadRequest(e) => e.to_string(),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn zero_quantity_is_present() {
        let book = request(json!({ "_id": 1, "title": "T", "author": "A", "quan": 0 }))
            .into_book()
            .unwrap();
        assert_eq!(book, Book::new(1, "T", "A", 0));
    }

    #[test]
    fn missing_fields_are_reported_together() {
        for body in [
            json!({ "title": "T", "author": "A", "quan": 1 }),
            json!({ "_id": 1, "author": "A", "quan": 1 }),
            json!({ "_id": 1, "title": "", "author": "A", "quan": 1 }),
            json!({ "_id": 1, "title": "T", "author": "A" }),
            json!({ "_id": 1, "title": "T", "author": "A", "quan": null }),
        ] {
            let err = request(body).into_book().unwrap_err();
            assert_eq!(message(err), MISSING_FIELDS);
        }
    }

    #[test]
    fn quantity_must_be_a_non_negative_integer() {
        for quan in [json!(-1), json!("3"), json!(1.5), json!(true)] {
            let err = request(json!({ "_id": 1, "title": "T", "author": "A", "quan": quan }))
                .into_book()
                .unwrap_err();
            assert_eq!(message(err), INVALID_QUANTITY);
        }
    }

    #[test]
    fn string_ids_are_cast_and_garbage_is_rejected() {
        let book = request(json!({ "_id": "12", "title": "T", "author": "A", "quan": 1 }))
            .into_book()
            .unwrap();
        assert_eq!(book.id, 12);

        for id in [json!("twelve"), json!(1.5), json!([1])] {
            let err = request(json!({ "_id": id, "title": "T", "author": "A", "quan": 1 }))
                .into_book()
                .unwrap_err();
            assert_eq!(message(err), "Invalid book ID format");
        }
    }

    #[test]
    fn empty_list_is_explicit() {
        let body = serde_json::to_value(BookListResponse::from(Vec::new())).unwrap();
        assert_eq!(body, json!({ "message": "Library is empty", "books": [] }));

        let body = serde_json::to_value(BookListResponse::from(vec![Book::new(1, "T", "A", 1)]))
            .unwrap();
        assert!(body.is_array());
    }

    #[test]
    fn failed_list_is_omitted_when_empty() {
        let body = serde_json::to_value(TakeBooksResponse::from(TakeOutcome::default())).unwrap();
        assert_eq!(body, json!({ "updated": [], "notFound": [], "outOfStock": [] }));
    }
}
