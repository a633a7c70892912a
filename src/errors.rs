// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request ke store gagal: {0}")]
    Http(#[source] reqwest::Error),

    #[error("store membalas status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("data family tidak valid: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store tidak merespon dalam {0} detik")]
    Timeout(u64),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error saat render: {0}")]
    Io(#[from] std::io::Error),

    #[error("gagal menjalankan {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("graphviz keluar dengan status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("File not found: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("render melebihi batas waktu {0} detik")]
    Timeout(u64),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Field '{field}' is required")]
    Validation { field: String },

    #[error("Member not found")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ApiError {
    pub fn validation(field: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Timeout(_)) | ApiError::Render(RenderError::Timeout(_)) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ApiError::Store(_) | ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_the_field() {
        let err = ApiError::validation("name");
        assert_eq!(err.to_string(), "Field 'name' is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn timeouts_are_distinguishable_from_failures() {
        assert_eq!(
            ApiError::Store(StoreError::Timeout(10)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::Render(RenderError::Timeout(20)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::Render(RenderError::MissingOutput(PathBuf::from("/tmp/x.png")))
                .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(ApiError::NotFound(9).status_code(), StatusCode::NOT_FOUND);
    }
}
