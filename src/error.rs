use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{store::StoreError, tmdb::MetadataError};

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    source: anyhow::Error,
}

impl AppError {
    pub fn new(status: StatusCode, source: impl Into<anyhow::Error>) -> Self {
        Self { status, source: source.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, anyhow::anyhow!(message.into()))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.source.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::DuplicateTitle(_) => StatusCode::CONFLICT,
            StoreError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err)
    }
}

impl From<MetadataError> for AppError {
    fn from(err: MetadataError) -> Self {
        let status = match &err {
            MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
            MetadataError::Unavailable(_) | MetadataError::Request(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.source, "request failed");
        } else {
            tracing::debug!(status = %self.status, error = %self.source, "request rejected");
        }
        let body = crate::templates::error_page(self.status, self.to_string());
        (self.status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
