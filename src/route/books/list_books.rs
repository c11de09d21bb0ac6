use axum::extract::State;

use crate::{error::ApiError, state::ApiState, traits::StateProvider};

use super::BooksResponse;

/// List all books, ordered by title.
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = BooksResponse),
        (status = 500, description = "Storage failure", body = ApplicationErrorResponse),
    )
)]
pub async fn list_books(State(state): State<ApiState>) -> Result<BooksResponse, ApiError> {
    let books = state
        .books()
        .list()
        .await
        .map_err(|err| ApiError::from_store_error(state.error_verbosity(), err))?;

    tracing::debug!(count = books.len(), "Listed books");

    Ok(BooksResponse { books })
}
