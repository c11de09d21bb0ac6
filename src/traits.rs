use crate::{error::ErrorVerbosity, schema::Schema, store::BookStore};

pub trait StateProvider {
    /// Returns the error verbosity.
    fn error_verbosity(&self) -> ErrorVerbosity;

    /// Returns the schema book payloads are validated against.
    fn book_schema(&self) -> &Schema;

    /// Returns the book storage.
    fn books(&self) -> &dyn BookStore;
}
