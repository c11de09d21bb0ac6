use axum::extract::State;

use crate::{
    error::ApiError,
    extractor::{path::ApiPath, valid_book::ValidBook},
    state::ApiState,
    traits::StateProvider,
};

use super::BookResponse;

/// Replace a book.
///
/// The isbn in the path identifies the book; the isbn in the body is validated but not applied.
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Isbn of the book")),
    request_body = Book,
    responses(
        (status = 200, description = "The updated book", body = BookResponse),
        (status = 400, description = "The body does not describe a book", body = ApplicationErrorResponse),
        (status = 404, description = "No book with this isbn", body = ApplicationErrorResponse),
    )
)]
pub async fn update_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
    ValidBook(book): ValidBook,
) -> Result<BookResponse, ApiError> {
    let book = state
        .books()
        .update(&isbn, book)
        .await
        .map_err(|err| ApiError::from_store_error(state.error_verbosity(), err))?;

    tracing::info!(%isbn, "Book updated");

    Ok(BookResponse { book })
}
