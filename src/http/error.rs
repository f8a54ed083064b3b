//! HTTP error responses

use crate::error::Error;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Errors a handler can return
#[derive(Debug)]
pub enum ApiError {
    /// Library error, mapped by kind
    Pdf(Error),
    /// The multipart body could not be read
    BadUpload(String),
    /// The body exceeded the configured upload limit
    PayloadTooLarge,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pdf(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Pdf(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Pdf(e) => e.kind(),
            ApiError::BadUpload(_) => "INVALID_UPLOAD",
            ApiError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Pdf(e) => e.client_message(),
            ApiError::BadUpload(msg) => msg.clone(),
            ApiError::PayloadTooLarge => "upload exceeds the maximum allowed size".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            if let ApiError::Pdf(e) = &self {
                tracing::error!(kind = e.kind(), error = %e, "request failed");
            }
        } else {
            tracing::warn!(code = self.code(), error = %self.message(), "request rejected");
        }

        let body = ErrorResponse {
            success: false,
            error: self.message(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Pdf(err)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Pdf(Error::Io(err))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadUpload(format!("failed to read upload: {}", err.body_text()))
        }
    }
}
