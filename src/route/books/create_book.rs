use axum::extract::State;

use crate::{
    error::ApiError,
    extractor::valid_book::ValidBook,
    state::ApiState,
    traits::StateProvider,
};

use super::{BookCreatedResponse, BookResponse};

/// Add a book to the catalog.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 201, description = "The created book", body = BookResponse),
        (status = 400, description = "The body does not describe a book", body = ApplicationErrorResponse),
        (status = 409, description = "A book with this isbn exists", body = ApplicationErrorResponse),
    )
)]
pub async fn create_book(
    State(state): State<ApiState>,
    ValidBook(book): ValidBook,
) -> Result<BookCreatedResponse, ApiError> {
    let book = state
        .books()
        .create(book)
        .await
        .map_err(|err| ApiError::from_store_error(state.error_verbosity(), err))?;

    tracing::info!(isbn = %book.isbn, "Book created");

    Ok(BookCreatedResponse(BookResponse { book }))
}
