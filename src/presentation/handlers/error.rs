use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::TranscriptionServiceError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every way a transcription request can fail, as seen by the client.
#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("No audio file provided")]
    MissingFile,
    #[error("No file selected")]
    EmptyFilename,
    #[error("Audio file exceeds the upload limit")]
    UploadTooLarge,
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("Server error: {0}")]
    ServerError(String),
}

impl TranscribeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::EmptyFilename => StatusCode::BAD_REQUEST,
            Self::UploadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TranscriptionFailed(_) | Self::ServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<TranscriptionServiceError> for TranscribeError {
    fn from(err: TranscriptionServiceError) -> Self {
        match err {
            TranscriptionServiceError::Provider(e) => Self::TranscriptionFailed(e.to_string()),
            TranscriptionServiceError::Staging(e) => Self::ServerError(e.to_string()),
        }
    }
}

impl IntoResponse for TranscribeError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Turns a panic caught in the handler stack into a `ServerError` body.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unexpected panic".to_string()
    };

    tracing::error!(panic = %detail, "Request handler panicked");
    TranscribeError::ServerError(detail).into_response()
}
