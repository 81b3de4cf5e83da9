pub mod books;

pub use books::{
    BookListResponse, CreateBookRequest, DeleteBookResponse, MessageResponse, TakeBooksRejection,
    TakeBooksResponse,
};
