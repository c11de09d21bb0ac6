use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use crate::{
    book::Book,
    error::{ApiError, BodyError, ValidationError},
    traits::StateProvider,
};

use super::json::ApiJson;

/// Gate for endpoints that create or replace a book.
///
/// Extracts the body as untyped JSON, validates it against [`StateProvider::book_schema`]
/// and only then converts it into a [`Book`]. Rejects with every schema violation at once,
/// so the handler only ever runs for valid payloads.
pub struct ValidBook(pub Book);

#[async_trait]
impl<S> FromRequest<S> for ValidBook
where
    S: Send + Sync + StateProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "valid_book_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ApiJson(payload) = ApiJson::<Value>::from_request(req, state).await?;

        if let Err(violations) = state.book_schema().validate(&payload) {
            tracing::warn!(descriptors=?violations.descriptors(), "Validation errors");

            return Err(ValidationError::new(violations).into());
        }

        tracing::trace!("Validated");

        // The schema admits integers a `Book` can not hold, e.g. `i64::MAX` pages.
        let book = serde_json::from_value::<Book>(payload).map_err(|err| {
            tracing::warn!(%err, "Conversion failed");

            BodyError::new(format!("Failed to convert the request body into a book: {err}"))
        })?;

        Ok(ValidBook(book))
    }
}
