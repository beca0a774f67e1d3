//! API error types and handling

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skillforge_cascade::CascadeError;
use skillforge_skills::SkillError;
use skillforge_validation::UnknownSection;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    UnknownSection(#[from] UnknownSection),

    #[error("{0}")]
    InvalidSkill(#[from] SkillError),

    #[error("Cascade error: {0}")]
    Cascade(#[from] CascadeError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Required body field absent
    pub fn missing(field: &str) -> Self {
        ApiError::BadRequest(format!("Missing required field '{}'", field))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::UnknownSection(_) => (StatusCode::BAD_REQUEST, "unknown_section"),
            ApiError::InvalidSkill(_) => (StatusCode::BAD_REQUEST, "invalid_skill"),
            ApiError::Cascade(CascadeError::InvalidIssues(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_issues")
            }
            ApiError::Cascade(_) => (StatusCode::INTERNAL_SERVER_ERROR, "cascade_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "ok": false,
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// JSON body extractor whose rejections render as [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
