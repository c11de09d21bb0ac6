use std::collections::HashMap;

use axum::async_trait;
use tokio::sync::RwLock;

use crate::book::Book;

use super::{BookStore, StoreError};

/// A [`BookStore`] that keeps books in memory. Used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<HashMap<String, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let mut books: Vec<Book> = self.books.read().await.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.isbn.cmp(&b.isbn)));

        Ok(books)
    }

    async fn get(&self, isbn: &str) -> Result<Book, StoreError> {
        self.books
            .read()
            .await
            .get(isbn)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                isbn: isbn.to_string(),
            })
    }

    async fn create(&self, book: Book) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;

        if books.contains_key(&book.isbn) {
            return Err(StoreError::AlreadyExists { isbn: book.isbn });
        }

        books.insert(book.isbn.clone(), book.clone());

        Ok(book)
    }

    async fn update(&self, isbn: &str, book: Book) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;

        let stored = books.get_mut(isbn).ok_or_else(|| StoreError::NotFound {
            isbn: isbn.to_string(),
        })?;

        *stored = Book {
            isbn: isbn.to_string(),
            ..book
        };

        Ok(stored.clone())
    }

    async fn remove(&self, isbn: &str) -> Result<(), StoreError> {
        self.books
            .write()
            .await
            .remove(isbn)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                isbn: isbn.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            amazon_url: String::from("http://a.co/eobPtX2"),
            author: String::from("test author"),
            language: String::from("english"),
            pages: 300,
            publisher: String::from("test publisher"),
            title: title.to_string(),
            year: 2020,
        }
    }

    #[tokio::test]
    async fn list_is_ordered_by_title() {
        let store = MemoryBookStore::new();
        store.create(book("2", "b")).await.unwrap();
        store.create(book("1", "c")).await.unwrap();
        store.create(book("3", "a")).await.unwrap();

        let isbns: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.isbn)
            .collect();

        assert_eq!(isbns, ["3", "2", "1"]);
    }

    #[tokio::test]
    async fn duplicate_isbn_is_rejected() {
        let store = MemoryBookStore::new();
        store.create(book("12", "test book")).await.unwrap();

        let err = store.create(book("12", "other")).await.unwrap_err();

        assert!(matches!(err, StoreError::AlreadyExists { isbn } if isbn == "12"));
        assert_eq!(store.get("12").await.unwrap().title, "test book");
    }

    #[tokio::test]
    async fn update_keeps_the_isbn_of_the_stored_book() {
        let store = MemoryBookStore::new();
        store.create(book("12", "test book")).await.unwrap();

        let updated = store.update("12", book("99", "new title")).await.unwrap();

        assert_eq!(updated, book("12", "new title"));
        assert_eq!(store.get("12").await.unwrap(), updated);
        assert!(matches!(
            store.get("99").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn missing_books_are_not_found() {
        let store = MemoryBookStore::new();

        assert!(matches!(
            store.get("11111111").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.update("1011111111", book("1011111111", "t")).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.remove("11111111").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn removed_books_are_gone() {
        let store = MemoryBookStore::new();
        store.create(book("12", "test book")).await.unwrap();

        store.remove("12").await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
    }
}
