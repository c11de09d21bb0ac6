use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

use crate::{store::StoreError, validation::SchemaViolations};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ErrorVerbosity {
    /// Internal server errors are reported with a generic message.
    #[default]
    Message,
    /// Internal server errors are reported with their cause.
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

/// The message of an [`ApplicationError`]: a single message or a list of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl From<String> for ErrorMessage {
    fn from(message: String) -> Self {
        ErrorMessage::One(message)
    }
}

impl From<&str> for ErrorMessage {
    fn from(message: &str) -> Self {
        ErrorMessage::One(message.to_string())
    }
}

impl From<Vec<String>> for ErrorMessage {
    fn from(messages: Vec<String>) -> Self {
        ErrorMessage::Many(messages)
    }
}

/// A message and the HTTP status it is reported with.
///
/// Every [`ApiError`] ends up as an [`ApplicationError`] before it is written to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ApplicationError {
    #[schema(value_type = Object)]
    message: ErrorMessage,
    #[serde(serialize_with = "serialize_status")]
    #[schema(value_type = u16, example = 400)]
    status: StatusCode,
}

impl ApplicationError {
    pub fn new(message: impl Into<ErrorMessage>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    pub fn message(&self) -> &ErrorMessage {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

#[derive(Debug, Serialize, ToSchema)]
/// Body of every error response.
pub struct ApplicationErrorResponse {
    error: ApplicationError,
    #[schema(value_type = Object)]
    message: ErrorMessage,
}

impl From<ApplicationError> for ApplicationErrorResponse {
    fn from(error: ApplicationError) -> Self {
        let message = error.message.clone();

        ApplicationErrorResponse { error, message }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = self.status;

        (status, Json(ApplicationErrorResponse::from(self))).into_response()
    }
}

#[derive(Debug, From)]
/// API error
pub enum ApiError {
    /// The request body does not satisfy the schema.
    Validation(ValidationError),
    /// The request body could not be read or parsed.
    Body(BodyError),
    /// The path parameters could not be parsed.
    Path(PathError),
    /// The requested book does not exist.
    NotFound(NotFoundError),
    /// The book to create already exists.
    Conflict(ConflictError),
    /// No route matches the request.
    RouteNotFound(RouteNotFoundError),
    /// The route exists, but not for this method.
    MethodNotAllowed(MethodNotAllowedError),
    /// Something went wrong on our side.
    InternalServerError(InternalServerError),
}

impl ApiError {
    /// Maps a storage failure to the error reported to the client.
    pub fn from_store_error(verbosity: ErrorVerbosity, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { isbn } => NotFoundError::book(&isbn).into(),
            StoreError::AlreadyExists { isbn } => ConflictError::book(&isbn).into(),
            err @ StoreError::Database(_) => {
                InternalServerError::from_generic_error(verbosity, err).into()
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Body(err) => err.status,
            ApiError::Path(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_message(self) -> ErrorMessage {
        match self {
            ApiError::Validation(err) => err.violations.descriptors().into(),
            ApiError::Body(err) => err.body_error_reason.into(),
            ApiError::Path(err) => err.path_error_reason.into(),
            ApiError::NotFound(err) => err.message.into(),
            ApiError::Conflict(err) => err.message.into(),
            ApiError::RouteNotFound(_) => "Not Found".into(),
            ApiError::MethodNotAllowed(_) => "Method Not Allowed".into(),
            ApiError::InternalServerError(err) => err
                .internal_server_error
                .unwrap_or_else(|| String::from("An internal server error has occurred"))
                .into(),
        }
    }

    pub fn into_application_error(self) -> ApplicationError {
        let status = self.status_code();

        ApplicationError::new(self.into_message(), status)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_application_error().into_response()
    }
}

#[derive(Debug)]
pub struct ValidationError {
    violations: SchemaViolations,
}

impl ValidationError {
    pub fn new(violations: SchemaViolations) -> Self {
        ValidationError { violations }
    }

    pub fn violations(&self) -> &SchemaViolations {
        &self.violations
    }
}

#[derive(Debug)]
pub struct BodyError {
    status: StatusCode,
    body_error_reason: String,
}

impl BodyError {
    pub fn new(body_error_reason: String) -> Self {
        BodyError {
            status: StatusCode::BAD_REQUEST,
            body_error_reason,
        }
    }

    /// Keeps the status axum chose for the rejection, e.g. `415` for a missing `Content-Type`.
    pub fn from_json_rejection(rejection: JsonRejection) -> Self {
        BodyError {
            status: rejection.status(),
            body_error_reason: rejection.body_text(),
        }
    }
}

#[derive(Debug)]
pub struct PathError {
    path_error_reason: String,
}

impl PathError {
    pub fn from_path_rejection(rejection: PathRejection) -> Self {
        PathError {
            path_error_reason: rejection.body_text(),
        }
    }
}

#[derive(Debug)]
pub struct NotFoundError {
    message: String,
}

impl NotFoundError {
    pub fn book(isbn: &str) -> Self {
        NotFoundError {
            message: format!("There is no book with an isbn '{isbn}'"),
        }
    }
}

#[derive(Debug)]
pub struct ConflictError {
    message: String,
}

impl ConflictError {
    pub fn book(isbn: &str) -> Self {
        ConflictError {
            message: format!("A book with an isbn '{isbn}' already exists"),
        }
    }
}

#[derive(Debug)]
pub struct RouteNotFoundError;

#[derive(Debug)]
pub struct MethodNotAllowedError;

#[derive(Debug)]
pub struct InternalServerError {
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            internal_server_error,
        }
    }
}
