pub mod book;

pub use book::{parse_book_id, Book, BookId, BookPatch};
