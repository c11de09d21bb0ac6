use axum::extract::State;

use crate::{error::ApiError, extractor::path::ApiPath, state::ApiState, traits::StateProvider};

use super::BookDeletedResponse;

/// Remove a book from the catalog.
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Isbn of the book")),
    responses(
        (status = 200, description = "The book was deleted", body = BookDeletedResponse),
        (status = 404, description = "No book with this isbn", body = ApplicationErrorResponse),
    )
)]
pub async fn delete_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
) -> Result<BookDeletedResponse, ApiError> {
    state
        .books()
        .remove(&isbn)
        .await
        .map_err(|err| ApiError::from_store_error(state.error_verbosity(), err))?;

    tracing::info!(%isbn, "Book deleted");

    Ok(BookDeletedResponse {
        message: String::from("Book deleted"),
    })
}
