//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use surveyscope::SurveyError;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// Error from the survey library.
    Survey(SurveyError),
}

impl ApiError {
    /// No survey has been uploaded yet.
    pub fn no_survey() -> Self {
        ApiError::NotFound("No survey loaded. Upload a CSV first.".to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Survey(e) => {
                let (status, error) = match e {
                    SurveyError::Schema { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "schema_error"),
                    SurveyError::Csv(_)
                    | SurveyError::InvalidDelimiter(_)
                    | SurveyError::EmptyData(_) => (StatusCode::BAD_REQUEST, "invalid_survey"),
                    SurveyError::Render(_) => (StatusCode::UNPROCESSABLE_ENTITY, "render_error"),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
                };
                (status, error, e.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<SurveyError> for ApiError {
    fn from(err: SurveyError) -> Self {
        ApiError::Survey(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Survey(e) => write!(f, "Survey error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
