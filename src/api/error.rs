use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{ArchiveError, SearchError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ExternalApiError { service: String, message: String },

    ValidationError(String),

    Conflict(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            ApiError::ExternalApiError { service, message } => {
                write!(f, "{service} error: {message}")
            }
            ApiError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            ApiError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            ApiError::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ExternalApiError { .. } => StatusCode::BAD_GATEWAY,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                "A database error occurred".to_string()
            }
            ApiError::ExternalApiError { service, message } => {
                tracing::warn!("{} failed: {}", service, message);
                format!("{service} failed: {message}")
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            ApiError::NotFound(msg) | ApiError::ValidationError(msg) | ApiError::Conflict(msg) => {
                msg
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<ArchiveError> for ApiError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::InvalidUrl(msg) => ApiError::ValidationError(msg),
            ArchiveError::DuplicateUrl(url) => {
                ApiError::Conflict(format!("URL is already saved: {url}"))
            }
            ArchiveError::NotFound(id) => ApiError::site_not_found(id),
            ArchiveError::Archival(message) => ApiError::ExternalApiError {
                service: "Archiver".to_string(),
                message,
            },
            ArchiveError::Extraction(message) => ApiError::ExternalApiError {
                service: "Extractor".to_string(),
                message,
            },
            ArchiveError::SnapshotMissing { id, path } => {
                ApiError::InternalError(format!("Snapshot for site {id} is missing at {path}"))
            }
            ArchiveError::Database(msg) => ApiError::DatabaseError(msg),
            ArchiveError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{resource} {id} not found"))
    }

    #[must_use]
    pub fn site_not_found(id: i32) -> Self {
        Self::not_found("Site", id)
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_error_status_mapping() {
        let cases = [
            (ArchiveError::InvalidUrl("x".into()), StatusCode::BAD_REQUEST),
            (ArchiveError::DuplicateUrl("x".into()), StatusCode::CONFLICT),
            (ArchiveError::NotFound(7), StatusCode::NOT_FOUND),
            (ArchiveError::Archival("x".into()), StatusCode::BAD_GATEWAY),
            (ArchiveError::Extraction("x".into()), StatusCode::BAD_GATEWAY),
            (
                ArchiveError::SnapshotMissing {
                    id: 1,
                    path: "gone.html".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ArchiveError::Database("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let label = err.to_string();
            assert_eq!(ApiError::from(err).status(), expected, "{label}");
        }
    }

    #[test]
    fn test_search_error_is_server_error() {
        let err = ApiError::from(SearchError::Database("locked".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
