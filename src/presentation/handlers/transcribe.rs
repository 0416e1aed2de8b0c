use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;

use crate::application::ports::TranscriptionEngine;
use crate::domain::{TranscriptionResult, UploadedAudio};
use crate::presentation::handlers::error::TranscribeError;
use crate::presentation::state::AppState;

pub const FILE_FIELD: &str = "file";

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler<E>(
    State(state): State<AppState<E>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptionResult>, TranscribeError>
where
    E: TranscriptionEngine + 'static,
{
    tracing::info!("Received transcription request");

    let audio = read_audio_upload(multipart).await?;
    tracing::info!(
        filename = %audio.filename,
        bytes = audio.size_bytes(),
        "Processing audio file"
    );

    match state.transcription_service.transcribe(&audio).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            let err = TranscribeError::from(e);
            tracing::error!(error = %err, "Transcription request failed");
            Err(err)
        }
    }
}

async fn read_audio_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadedAudio, TranscribeError> {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, "Transcription request is not multipart");
            return Err(TranscribeError::MissingFile);
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            tracing::error!("Empty filename");
            return Err(TranscribeError::EmptyFilename);
        }

        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadedAudio::new(filename, content_type, data));
    }

    tracing::error!("No file found in request");
    Err(TranscribeError::MissingFile)
}

fn multipart_error(e: MultipartError) -> TranscribeError {
    tracing::error!(error = %e, "Failed to read multipart body");
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        TranscribeError::UploadTooLarge
    } else {
        TranscribeError::ServerError(e.body_text())
    }
}
