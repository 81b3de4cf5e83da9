pub mod database;
pub mod error;
pub mod library;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::MongoDb;
pub use error::StoreError;
pub use library::{split_ids, take_books, TakeOutcome};
pub use memory::InMemoryBookStore;
pub use self::metrics::{get_metrics, init_metrics};
pub use store::BookStore;
