use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{ModelReference, ProviderOutput, WhisperOptions};

pub const DEFAULT_REPLICATE_BASE_URL: &str = "https://api.replicate.com/v1";

/// Audio up to this size is sent inline as a data URI; larger files go
/// through the files endpoint first.
pub const DEFAULT_INLINE_AUDIO_LIMIT: usize = 256 * 1024;

pub struct ReplicateWhisperEngine {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
    model: ModelReference,
    poll_interval: Duration,
    inline_audio_limit: usize,
}

impl ReplicateWhisperEngine {
    pub fn new(
        api_token: String,
        base_url: Option<String>,
        model: ModelReference,
        poll_interval: Duration,
        request_timeout: Duration,
    ) -> Result<Self, TranscriptionError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("client: {}", e)))?;

        Ok(Self {
            client,
            api_token,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_REPLICATE_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model,
            poll_interval,
            inline_audio_limit: DEFAULT_INLINE_AUDIO_LIMIT,
        })
    }

    pub fn with_inline_audio_limit(mut self, limit: usize) -> Self {
        self.inline_audio_limit = limit;
        self
    }

    async fn audio_input(&self, path: &Path, audio: Vec<u8>) -> Result<String, TranscriptionError> {
        if audio.len() <= self.inline_audio_limit {
            return Ok(data_uri(path, &audio));
        }
        self.upload_file(path, audio).await
    }

    async fn upload_file(&self, path: &Path, audio: Vec<u8>) -> Result<String, TranscriptionError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("audio")
            .to_string();

        let part = multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str(audio_mime(path))
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;
        let form = multipart::Form::new().part("content", part);

        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("upload: {}", e)))?;

        let file: ReplicateFile = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(format!("parse file: {}", e)))?;

        tracing::debug!(file_id = %file.id, "Uploaded audio to Replicate files");

        file.urls.and_then(|urls| urls.get).ok_or_else(|| {
            TranscriptionError::InvalidResponse(format!("file {} has no url", file.id))
        })
    }

    async fn fetch_prediction(&self, url: &str) -> Result<Prediction, TranscriptionError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        read_prediction(response).await
    }
}

#[derive(Serialize)]
struct PredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Serialize)]
struct PredictionInput<'a> {
    audio: String,
    #[serde(flatten)]
    options: &'a WhisperOptions,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: PredictionStatus,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<ResourceUrls>,
}

#[derive(Debug, Deserialize)]
struct ReplicateFile {
    id: String,
    #[serde(default)]
    urls: Option<ResourceUrls>,
}

#[derive(Debug, Deserialize)]
struct ResourceUrls {
    get: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    Aborted,
}

impl PredictionStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Aborted => "aborted",
        }
    }
}

#[async_trait]
impl TranscriptionEngine for ReplicateWhisperEngine {
    async fn transcribe(
        &self,
        audio_path: &Path,
        options: &WhisperOptions,
    ) -> Result<ProviderOutput, TranscriptionError> {
        let audio = tokio::fs::read(audio_path)
            .await
            .map_err(|e| TranscriptionError::AudioUnreadable(e.to_string()))?;

        let bytes = audio.len();

        let body = PredictionRequest {
            version: self.model.version(),
            input: PredictionInput {
                audio: self.audio_input(audio_path, audio).await?,
                options,
            },
        };

        let url = format!("{}/predictions", self.base_url);

        tracing::debug!(model = %self.model, bytes, "Creating Replicate prediction");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        let mut prediction = read_prediction(response).await?;

        loop {
            match prediction.status {
                PredictionStatus::Succeeded => {
                    tracing::info!(prediction_id = %prediction.id, "Replicate prediction succeeded");
                    let output = prediction.output.unwrap_or(Value::Null);
                    return Ok(ProviderOutput::from(output));
                }
                PredictionStatus::Failed
                | PredictionStatus::Canceled
                | PredictionStatus::Aborted => {
                    let detail = match prediction.error {
                        Some(Value::String(message)) => message,
                        Some(Value::Null) | None => {
                            format!("prediction {} {}", prediction.id, prediction.status.as_str())
                        }
                        Some(other) => other.to_string(),
                    };
                    return Err(TranscriptionError::PredictionFailed(detail));
                }
                PredictionStatus::Starting | PredictionStatus::Processing => {
                    let poll_url = prediction
                        .urls
                        .as_ref()
                        .and_then(|urls| urls.get.clone())
                        .unwrap_or_else(|| {
                            format!("{}/predictions/{}", self.base_url, prediction.id)
                        });

                    tracing::debug!(
                        prediction_id = %prediction.id,
                        status = prediction.status.as_str(),
                        "Waiting for Replicate prediction"
                    );

                    tokio::time::sleep(self.poll_interval).await;
                    prediction = self.fetch_prediction(&poll_url).await?;
                }
            }
        }
    }
}

async fn read_prediction(response: reqwest::Response) -> Result<Prediction, TranscriptionError> {
    ensure_success(response)
        .await?
        .json()
        .await
        .map_err(|e| TranscriptionError::InvalidResponse(format!("parse prediction: {}", e)))
}

async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, TranscriptionError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(TranscriptionError::ApiRequestFailed(format!(
            "status {}: {}",
            status, body
        )));
    }

    Ok(response)
}

fn data_uri(path: &Path, audio: &[u8]) -> String {
    format!("data:{};base64,{}", audio_mime(path), STANDARD.encode(audio))
}

pub fn audio_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("webm") => "audio/webm",
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}
