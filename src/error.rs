use crate::source::SourceError;
use chrono::{SecondsFormat, Utc};
use ntex::http::StatusCode;
use ntex::web::{HttpResponse, WebResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Source(SourceError),
    Config(String),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Source(e) => write!(f, "Data source error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl WebResponseError for AppError {
    fn error_response(&self, _: &ntex::web::HttpRequest) -> HttpResponse {
        match self {
            AppError::Source(e) => HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR).json(
                &serde_json::json!({
                    "error": "Failed to fetch leaderboard data",
                    "details": e.to_string(),
                    "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                }),
            ),
            AppError::Config(msg) => HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
                .json(&serde_json::json!({ "error": msg })),
            AppError::BadRequest(msg) => {
                HttpResponse::build(StatusCode::BAD_REQUEST).json(&serde_json::json!({ "error": msg }))
            }
            AppError::Internal(_) => HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
                .json(&serde_json::json!({ "error": "Internal error" })),
        }
    }
}

impl From<SourceError> for AppError {
    fn from(e: SourceError) -> Self {
        AppError::Source(e)
    }
}
