use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use service_core::error::AppError;
use validator::Validate;

/// Client-assigned primary key of a book.
pub type BookId = i64;

/// Parse a path segment into a [`BookId`].
pub fn parse_book_id(raw: &str) -> Result<BookId, AppError> {
    raw.trim()
        .parse::<BookId>()
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid book ID format")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Book {
    #[serde(rename = "_id", alias = "id")]
    pub id: BookId,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[serde(rename = "quan", alias = "quantity")]
    #[validate(range(min = 0, message = "Quantity must be a non-negative number"))]
    pub quantity: i64,
}

impl Book {
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>, quantity: i64) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            quantity,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Absent fields fall back to `None` through `#[serde(default)]`; an explicit
/// `null` for a required field is rejected.
fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)?
        .map(Some)
        .ok_or_else(|| D::Error::custom("value must not be null"))
}

/// Partial update of a book. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BookPatch {
    #[serde(
        default,
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: Option<String>,
    #[serde(
        default,
        rename = "quan",
        alias = "quantity",
        deserialize_with = "non_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 0, message = "Quantity must be a non-negative number"))]
    pub quantity: Option<i64>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.quantity.is_none()
    }

    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        if let Some(quantity) = self.quantity {
            book.quantity = quantity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_uses_stored_field_names_on_the_wire() {
        let json = serde_json::to_value(Book::new(7, "Dune", "Herbert", 2)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "_id": 7, "title": "Dune", "author": "Herbert", "quan": 2 })
        );
    }

    #[test]
    fn book_accepts_descriptive_aliases() {
        let book: Book = serde_json::from_value(serde_json::json!({
            "id": 7, "title": "Dune", "author": "Herbert", "quantity": 2
        }))
        .unwrap();
        assert_eq!(book, Book::new(7, "Dune", "Herbert", 2));
    }

    #[test]
    fn parse_book_id_rejects_non_integers() {
        assert_eq!(parse_book_id("42").unwrap(), 42);
        assert_eq!(parse_book_id(" 42 ").unwrap(), 42);
        for raw in ["abc", "4.2", "", "9999999999999999999999"] {
            let err = parse_book_id(raw).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{raw}");
        }
    }

    #[test]
    fn negative_quantity_fails_validation() {
        assert!(Book::new(1, "A", "B", -1).validate().is_err());
        assert!(Book::new(1, "A", "B", 0).validate().is_ok());
        assert!(Book::new(1, "", "B", 0).validate().is_err());
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut book = Book::new(1, "Old", "Author", 3);
        let patch = BookPatch {
            title: Some("New".to_string()),
            quantity: Some(0),
            ..Default::default()
        };
        patch.apply(&mut book);

        assert_eq!(book, Book::new(1, "New", "Author", 0));
        assert!(BookPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_rejects_negative_quantity() {
        let patch = BookPatch {
            quantity: Some(-5),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch: BookPatch = serde_json::from_value(serde_json::json!({ "quan": 4 })).unwrap();
        assert_eq!(patch.quantity, Some(4));
        assert!(patch.title.is_none());

        for body in [
            serde_json::json!({ "title": null }),
            serde_json::json!({ "author": null }),
            serde_json::json!({ "quan": null }),
        ] {
            assert!(serde_json::from_value::<BookPatch>(body.clone()).is_err(), "{body}");
        }
    }
}
