use axum::async_trait;

use crate::book::Book;

pub mod memory;
pub mod postgres;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("There is no book with an isbn '{isbn}'")]
    NotFound { isbn: String },
    #[error("A book with an isbn '{isbn}' already exists")]
    AlreadyExists { isbn: String },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage for books, keyed by isbn.
///
/// Uniqueness and existence of isbns are enforced here, not by the callers.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Returns all books ordered by title.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    async fn get(&self, isbn: &str) -> Result<Book, StoreError>;

    /// Fails with [`StoreError::AlreadyExists`] if the isbn is taken.
    async fn create(&self, book: Book) -> Result<Book, StoreError>;

    /// Replaces the book stored under `isbn`. The isbn of `book` is ignored.
    async fn update(&self, isbn: &str, book: Book) -> Result<Book, StoreError>;

    async fn remove(&self, isbn: &str) -> Result<(), StoreError>;
}
