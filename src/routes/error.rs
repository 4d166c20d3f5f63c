use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;
use crate::core::SearchError;
use crate::models::ErrorResponse;
use crate::services::DataLoadError;

/// Errors returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Failed to load data files: {0}")]
    DataLoad(Arc<DataLoadError>),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Session {0} not found or expired")]
    SessionNotFound(Uuid),
}

impl From<Arc<DataLoadError>> for ApiError {
    fn from(err: Arc<DataLoadError>) -> Self {
        ApiError::DataLoad(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Search(e) => e.code(),
            ApiError::DataLoad(_) => "data_load_error",
            ApiError::Validation(_) => "validation_failed",
            ApiError::SessionNotFound(_) => "session_not_found",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Search(SearchError::Input(_)) => StatusCode::BAD_REQUEST,
            ApiError::Search(SearchError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Search(SearchError::DatasetNotLoaded(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Search(_) => StatusCode::CONFLICT,
            ApiError::DataLoad(e) if matches!(e.as_ref(), DataLoadError::InvalidRegion(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::DataLoad(_) => StatusCode::BAD_GATEWAY,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
