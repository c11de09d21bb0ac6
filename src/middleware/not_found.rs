use crate::error::{ApiError, RouteNotFoundError};

/// Fallback for requests that match no route.
pub async fn not_found() -> ApiError {
    RouteNotFoundError.into()
}
