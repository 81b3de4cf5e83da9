pub mod books;
pub mod health;

pub use books::{create_book, delete_book, get_book, list_books, take_books, update_book, welcome};
pub use health::{health_check, metrics_endpoint, readiness_check};
