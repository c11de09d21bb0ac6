use axum::extract::State;

use crate::{error::ApiError, extractor::path::ApiPath, state::ApiState, traits::StateProvider};

use super::BookResponse;

/// Get a book by its isbn.
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Isbn of the book")),
    responses(
        (status = 200, description = "The book", body = BookResponse),
        (status = 404, description = "No book with this isbn", body = ApplicationErrorResponse),
    )
)]
pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
) -> Result<BookResponse, ApiError> {
    let book = state
        .books()
        .get(&isbn)
        .await
        .map_err(|err| ApiError::from_store_error(state.error_verbosity(), err))?;

    Ok(BookResponse { book })
}
