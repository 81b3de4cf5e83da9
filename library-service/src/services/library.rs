//! Bulk "take" of books: decrement stock for several ids in one request.

use crate::models::{parse_book_id, Book};
use crate::services::{BookStore, StoreError};
use metrics::counter;

/// Per-id results of a bulk take, in request order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TakeOutcome {
    pub updated: Vec<Book>,
    pub not_found: Vec<String>,
    pub out_of_stock: Vec<String>,
    /// Ids whose lookup or save hit a store fault.
    pub failed: Vec<String>,
}

impl TakeOutcome {
    /// Nothing was taken but at least one id was identifiably unavailable.
    pub fn nothing_taken(&self) -> bool {
        self.updated.is_empty() && (!self.not_found.is_empty() || !self.out_of_stock.is_empty())
    }

    /// Every id that was processed hit a store fault.
    pub fn only_failures(&self) -> bool {
        self.updated.is_empty()
            && self.not_found.is_empty()
            && self.out_of_stock.is_empty()
            && !self.failed.is_empty()
    }
}

enum TakeResult {
    Taken(Book),
    NotFound,
    OutOfStock,
}

/// Split the `ids` path segment: comma separated, trimmed, empty entries dropped.
pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

async fn take_one(store: &dyn BookStore, raw_id: &str) -> Result<TakeResult, StoreError> {
    let Ok(id) = parse_book_id(raw_id) else {
        return Ok(TakeResult::NotFound);
    };

    let Some(mut book) = store.find_by_id(id).await? else {
        return Ok(TakeResult::NotFound);
    };

    if !book.is_in_stock() {
        return Ok(TakeResult::OutOfStock);
    }

    book.quantity -= 1;
    if !store.save(&book).await? {
        return Ok(TakeResult::NotFound);
    }

    Ok(TakeResult::Taken(book))
}

/// Take one copy of each listed book.
///
/// Ids are processed one after another with an independent read-modify-write
/// each; nothing is rolled back when a later id fails. A store fault on one id
/// is logged and recorded in [`TakeOutcome::failed`], and processing continues.
pub async fn take_books(store: &dyn BookStore, ids: &[String]) -> TakeOutcome {
    let mut outcome = TakeOutcome::default();

    for raw_id in ids {
        match take_one(store, raw_id).await {
            Ok(TakeResult::Taken(book)) => {
                tracing::info!(book_id = book.id, remaining = book.quantity, "Book taken");
                outcome.updated.push(book);
            }
            Ok(TakeResult::NotFound) => outcome.not_found.push(raw_id.clone()),
            Ok(TakeResult::OutOfStock) => outcome.out_of_stock.push(raw_id.clone()),
            Err(e) => {
                tracing::error!(book_id = %raw_id, error = %e, "Error processing book");
                outcome.failed.push(raw_id.clone());
            }
        }
    }

    counter!("library_books_taken_total").increment(outcome.updated.len() as u64);

    outcome
}
