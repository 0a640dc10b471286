use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_postgres::error::SqlState;

/// A single validation violation tied to one input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Field errors in the order the validator reported them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailure {
    errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collapse into `Ok(())` when nothing was reported
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Builds `"<field> : <message>, "` for every error, trailing separator included.
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{} : {}, ", e.field, e.message))
            .collect()
    }
}

impl From<Vec<FieldError>> for ValidationFailure {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

/// JSON body returned for every handled failure: `{"message": ...}`.
/// `message` stays `null` when the failure carried no text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    message: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: Option<String>) -> Self {
        Self { message }
    }

    /// Uses the failure's own message text as-is
    pub fn from_error(error: &ApiError) -> Self {
        Self::new(error.message())
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid argument: {}", .0.as_deref().unwrap_or("<none>"))]
    InvalidArgument(Option<String>),

    #[error("No such element: {}", .0.as_deref().unwrap_or("<none>"))]
    NoSuchElement(Option<String>),

    #[error("Validation failed: {}", .0.message())]
    Validation(ValidationFailure),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(Some(message.into()))
    }

    pub fn no_such_element(message: impl Into<String>) -> Self {
        Self::NoSuchElement(Some(message.into()))
    }

    pub fn validation(failure: impl Into<ValidationFailure>) -> Self {
        Self::Validation(failure.into())
    }

    /// Message text exposed to clients for this failure
    pub fn message(&self) -> Option<String> {
        match self {
            ApiError::InvalidArgument(message) | ApiError::NoSuchElement(message) => message.clone(),
            ApiError::Validation(failure) => Some(failure.message()),
            ApiError::Database(err) => {
                // Keep driver details out of the response
                let user_message = if err.contains("timeout") {
                    "Database operation timed out, please try again"
                } else if err.contains("unavailable") || err.contains("connection") {
                    "Database service is temporarily unavailable"
                } else {
                    "A database error occurred"
                };
                Some(user_message.to_string())
            }
            ApiError::Internal(_) => Some("An internal server error occurred".to_string()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            // Lookup misses share 400 with client input errors
            ApiError::InvalidArgument(_) | ApiError::NoSuchElement(_) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            ApiError::InvalidArgument(message) => {
                tracing::warn!(detail = ?message, "Invalid argument");
            }
            ApiError::NoSuchElement(message) => {
                tracing::warn!(detail = ?message, "No such element");
            }
            ApiError::Validation(failure) => {
                for error in failure.errors() {
                    tracing::error!(
                        field = %error.field,
                        "Request validation failed: {}: {}",
                        error.field,
                        error.message
                    );
                }
            }
            ApiError::Database(err) => {
                if err.contains("timeout") {
                    tracing::warn!("PostgreSQL operation timeout: {}", err);
                } else {
                    tracing::error!("PostgreSQL database error: {}", err);
                }
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal server error: {:#}", err);
            }
        }
    }
}

impl From<ValidationFailure> for ApiError {
    fn from(failure: ValidationFailure) -> Self {
        ApiError::Validation(failure)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let body = Json(ErrorResponse::from_error(&self));

        (status, body).into_response()
    }
}

// PostgreSQL error mapping
impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        match err.code() {
            Some(&SqlState::CHECK_VIOLATION) => {
                ApiError::invalid_argument("Data validation constraint violated")
            }
            Some(&SqlState::INVALID_TEXT_REPRESENTATION) => {
                ApiError::invalid_argument("Invalid data format provided")
            }
            Some(&SqlState::NUMERIC_VALUE_OUT_OF_RANGE) => {
                ApiError::invalid_argument("Numeric value is out of range")
            }
            Some(&SqlState::STRING_DATA_RIGHT_TRUNCATION) => {
                ApiError::invalid_argument("Text data exceeds maximum length")
            }
            Some(&SqlState::CONNECTION_EXCEPTION)
            | Some(&SqlState::CONNECTION_DOES_NOT_EXIST)
            | Some(&SqlState::CONNECTION_FAILURE) => {
                tracing::error!("PostgreSQL connection error: {}", err);
                ApiError::Database("Database connection unavailable".to_string())
            }
            Some(&SqlState::INSUFFICIENT_PRIVILEGE) => {
                tracing::error!("PostgreSQL privilege error: {}", err);
                ApiError::Database("Database access denied".to_string())
            }
            _ => {
                tracing::error!("Unhandled PostgreSQL error: {} (code: {:?})", err, err.code());
                ApiError::Database("Database operation failed".to_string())
            }
        }
    }
}

// Connection pool error mapping
impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        match err {
            deadpool_postgres::PoolError::Timeout(_) => {
                tracing::warn!("Database connection pool timeout: {}", err);
                ApiError::Database("Database connection timeout".to_string())
            }
            deadpool_postgres::PoolError::Closed => {
                tracing::error!("Database connection pool is closed: {}", err);
                ApiError::Database("Database service unavailable".to_string())
            }
            deadpool_postgres::PoolError::NoRuntimeSpecified => {
                tracing::error!("Database pool runtime error: {}", err);
                ApiError::Internal(anyhow::anyhow!("Database configuration error"))
            }
            _ => {
                tracing::error!("Database connection pool error: {}", err);
                ApiError::Database("Database connection unavailable".to_string())
            }
        }
    }
}

// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_parts(error: ApiError) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        (status, String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8"))
    }

    #[tokio::test]
    async fn test_invalid_argument_uses_own_message() {
        let (status, body) = response_parts(ApiError::invalid_argument("age must be positive")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"message":"age must be positive"}"#);
    }

    #[tokio::test]
    async fn test_no_such_element_is_bad_request() {
        let (status, body) = response_parts(ApiError::no_such_element("Board with id 7 not found")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"message":"Board with id 7 not found"}"#);
    }

    #[tokio::test]
    async fn test_absent_message_serializes_as_null() {
        let (status, body) = response_parts(ApiError::InvalidArgument(None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"message":null}"#);

        let (status, body) = response_parts(ApiError::NoSuchElement(None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"message":null}"#);
    }

    #[tokio::test]
    async fn test_validation_message_concatenates_field_errors() {
        let failure = ValidationFailure::from(vec![
            FieldError::new("f1", "m1"),
            FieldError::new("f2", "m2"),
        ]);

        let (status, body) = response_parts(ApiError::validation(failure)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"message":"f1 : m1, f2 : m2, "}"#);
    }

    #[tokio::test]
    async fn test_validation_single_field_scenario() {
        let mut failure = ValidationFailure::new();
        failure.push("title", "must not be blank");

        let (status, body) = response_parts(failure.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"message":"title : must not be blank, "}"#);
    }

    #[tokio::test]
    async fn test_validation_without_field_errors_yields_empty_message() {
        let (status, body) = response_parts(ApiError::validation(ValidationFailure::new())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"message":""}"#);
    }

    #[tokio::test]
    async fn test_responder_is_idempotent() {
        let first = response_parts(ApiError::invalid_argument("same input")).await;
        let second = response_parts(ApiError::invalid_argument("same input")).await;
        assert_eq!(first, second);

        let failure = ValidationFailure::from(vec![FieldError::new("name", "must not be blank")]);
        let first = response_parts(ApiError::validation(failure.clone())).await;
        let second = response_parts(ApiError::validation(failure)).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unrecognized_failures_are_server_errors() {
        let (status, body) = response_parts(ApiError::Database("connection refused".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"message":"Database service is temporarily unavailable"}"#);

        let (status, body) = response_parts(ApiError::Internal(anyhow::anyhow!("boom"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"message":"An internal server error occurred"}"#);
    }

    #[test]
    fn test_error_response_equality_by_message() {
        assert_eq!(
            ErrorResponse::new(Some("a".to_string())),
            ErrorResponse::from_error(&ApiError::invalid_argument("a"))
        );
        assert_ne!(
            ErrorResponse::new(Some("a".to_string())),
            ErrorResponse::new(None)
        );
        assert_eq!(ErrorResponse::new(None).message(), None);
    }

    #[test]
    fn test_validation_failure_into_result() {
        assert!(ValidationFailure::new().into_result().is_ok());

        let mut failure = ValidationFailure::new();
        failure.push("content", "must not be blank");
        let err = failure.into_result().unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.message(), "content : must not be blank, ");
    }
}
