use std::{ops::Deref, sync::Arc};

use crate::{error::ErrorVerbosity, schema::Schema, store::BookStore, traits::StateProvider};

#[derive(Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    pub fn new(
        error_verbosity: ErrorVerbosity,
        book_schema: Schema,
        books: Arc<dyn BookStore>,
    ) -> Self {
        Self {
            inner: Arc::new(ApiStateInner {
                error_verbosity,
                book_schema,
                books,
            }),
        }
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct ApiStateInner {
    error_verbosity: ErrorVerbosity,
    book_schema: Schema,
    books: Arc<dyn BookStore>,
}

impl StateProvider for ApiState {
    fn error_verbosity(&self) -> ErrorVerbosity {
        self.error_verbosity
    }

    fn book_schema(&self) -> &Schema {
        &self.book_schema
    }

    fn books(&self) -> &dyn BookStore {
        self.books.as_ref()
    }
}
