use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use whisper_relay::application::ports::{TranscriptionEngine, TranscriptionError};
use whisper_relay::domain::{ProviderOutput, WhisperOptions};
use whisper_relay::infrastructure::audio::ReplicateWhisperEngine;
use whisper_relay::presentation::config::DEFAULT_MODEL;

const TEST_TOKEN: &str = "r8_test_token";

type UploadedPart = (Option<String>, Option<String>, Vec<u8>);

#[derive(Clone)]
struct ReplicateStub {
    base_url: String,
    create_status: StatusCode,
    create_body: Value,
    poll_body: Value,
    captured: Arc<Mutex<Option<(Option<String>, Value)>>>,
    polls: Arc<AtomicUsize>,
    uploads: Arc<Mutex<Vec<UploadedPart>>>,
}

async fn create_prediction(
    State(stub): State<ReplicateStub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *stub.captured.lock().unwrap() = Some((auth, body));
    (stub.create_status, Json(stub.create_body.clone()))
}

async fn create_file(
    State(stub): State<ReplicateStub>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        stub.uploads.lock().unwrap().push((name, content_type, data));
    }
    (
        StatusCode::CREATED,
        Json(json!({"id": "f1", "urls": {"get": format!("{}/files/f1", stub.base_url)}})),
    )
}

async fn get_prediction(State(stub): State<ReplicateStub>) -> impl IntoResponse {
    stub.polls.fetch_add(1, Ordering::SeqCst);
    Json(stub.poll_body.clone())
}

async fn start_replicate_stub(
    create_status: u16,
    create_body: impl FnOnce(&str) -> Value,
    poll_body: impl FnOnce(&str) -> Value,
) -> (String, ReplicateStub, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let stub = ReplicateStub {
        base_url: base_url.clone(),
        create_status: StatusCode::from_u16(create_status).unwrap(),
        create_body: create_body(&base_url),
        poll_body: poll_body(&base_url),
        captured: Arc::new(Mutex::new(None)),
        polls: Arc::new(AtomicUsize::new(0)),
        uploads: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/predictions", post(create_prediction))
        .route("/predictions/{id}", get(get_prediction))
        .route("/files", post(create_file))
        .with_state(stub.clone());

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, stub, shutdown_tx)
}

fn engine_for(base_url: &str) -> ReplicateWhisperEngine {
    ReplicateWhisperEngine::new(
        TEST_TOKEN.to_string(),
        Some(format!("{}/", base_url)),
        DEFAULT_MODEL.parse().unwrap(),
        Duration::from_millis(10),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn staged_wav(contents: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
    file.write_all(contents).unwrap();
    file
}

fn no_poll(_: &str) -> Value {
    json!({})
}

#[tokio::test]
async fn given_prediction_succeeds_immediately_when_transcribing_then_returns_mapping() {
    let (base_url, stub, shutdown_tx) = start_replicate_stub(
        201,
        |_| {
            json!({
                "id": "p1",
                "status": "succeeded",
                "output": {"transcription": "hello", "detected_language": "english"}
            })
        },
        no_poll,
    )
    .await;
    let audio = staged_wav(b"RIFF fake");

    let output = engine_for(&base_url)
        .transcribe(audio.path(), &WhisperOptions::default())
        .await
        .unwrap();

    assert_eq!(
        output,
        ProviderOutput::from(json!({"transcription": "hello", "detected_language": "english"}))
    );
    assert_eq!(stub.polls.load(Ordering::SeqCst), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_prediction_request_when_transcribing_then_sends_version_options_and_audio() {
    let (base_url, stub, shutdown_tx) = start_replicate_stub(
        201,
        |_| json!({"id": "p1", "status": "succeeded", "output": "ok"}),
        no_poll,
    )
    .await;
    let audio = staged_wav(b"abc");

    engine_for(&base_url)
        .transcribe(audio.path(), &WhisperOptions::default())
        .await
        .unwrap();

    let (auth, body) = stub.captured.lock().unwrap().take().unwrap();
    assert_eq!(auth.as_deref(), Some("Bearer r8_test_token"));
    assert_eq!(
        body["version"],
        "4d50797290df275329f202e48c76360b3f22b08d28c196cbc54600319435f8d2"
    );
    assert_eq!(body["input"]["audio"], "data:audio/wav;base64,YWJj");
    assert_eq!(body["input"]["model"], "large-v3");
    assert_eq!(body["input"]["language"], "auto");
    assert_eq!(body["input"]["translate"], false);
    assert_eq!(body["input"]["suppress_tokens"], "-1");
    assert_eq!(body["input"]["no_speech_threshold"], 0.6);
    assert_eq!(body["input"]["condition_on_previous_text"], true);
    assert!(stub.uploads.lock().unwrap().is_empty());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_audio_over_inline_limit_when_transcribing_then_uploads_file_and_passes_url() {
    let (base_url, stub, shutdown_tx) = start_replicate_stub(
        201,
        |_| json!({"id": "p5", "status": "succeeded", "output": "from file"}),
        no_poll,
    )
    .await;
    let audio = staged_wav(b"longer than the inline limit");

    let output = engine_for(&base_url)
        .with_inline_audio_limit(8)
        .transcribe(audio.path(), &WhisperOptions::default())
        .await
        .unwrap();

    assert_eq!(output, ProviderOutput::Text("from file".to_string()));

    let uploads = stub.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    let (name, content_type, data) = &uploads[0];
    assert_eq!(name.as_deref(), Some("content"));
    assert_eq!(content_type.as_deref(), Some("audio/wav"));
    assert_eq!(data.as_slice(), b"longer than the inline limit");

    let (_, body) = stub.captured.lock().unwrap().take().unwrap();
    assert_eq!(body["input"]["audio"], format!("{}/files/f1", base_url));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_prediction_processing_when_transcribing_then_polls_until_succeeded() {
    let (base_url, stub, shutdown_tx) = start_replicate_stub(
        201,
        |base| {
            json!({
                "id": "p2",
                "status": "processing",
                "urls": {"get": format!("{}/predictions/p2", base)}
            })
        },
        |_| json!({"id": "p2", "status": "succeeded", "output": "polled text"}),
    )
    .await;
    let audio = staged_wav(b"audio");

    let output = engine_for(&base_url)
        .transcribe(audio.path(), &WhisperOptions::default())
        .await
        .unwrap();

    assert_eq!(output, ProviderOutput::Text("polled text".to_string()));
    assert_eq!(stub.polls.load(Ordering::SeqCst), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_prediction_failed_when_transcribing_then_returns_prediction_error() {
    let (base_url, _stub, shutdown_tx) = start_replicate_stub(
        201,
        |_| json!({"id": "p3", "status": "failed", "error": "audio could not be decoded"}),
        no_poll,
    )
    .await;
    let audio = staged_wav(b"garbage");

    let result = engine_for(&base_url)
        .transcribe(audio.path(), &WhisperOptions::default())
        .await;

    match result {
        Err(TranscriptionError::PredictionFailed(detail)) => {
            assert_eq!(detail, "audio could not be decoded")
        }
        other => panic!("unexpected result: {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_canceled_prediction_without_error_when_transcribing_then_reports_status() {
    let (base_url, _stub, shutdown_tx) = start_replicate_stub(
        201,
        |_| json!({"id": "p4", "status": "canceled", "error": null}),
        no_poll,
    )
    .await;
    let audio = staged_wav(b"audio");

    let result = engine_for(&base_url)
        .transcribe(audio.path(), &WhisperOptions::default())
        .await;

    match result {
        Err(TranscriptionError::PredictionFailed(detail)) => {
            assert_eq!(detail, "prediction p4 canceled")
        }
        other => panic!("unexpected result: {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unauthorized_response_when_transcribing_then_returns_api_error() {
    let (base_url, _stub, shutdown_tx) = start_replicate_stub(
        401,
        |_| json!({"detail": "Invalid token."}),
        no_poll,
    )
    .await;
    let audio = staged_wav(b"audio");

    let result = engine_for(&base_url)
        .transcribe(audio.path(), &WhisperOptions::default())
        .await;

    match result {
        Err(TranscriptionError::ApiRequestFailed(detail)) => {
            assert!(detail.starts_with("status 401"));
            assert!(detail.contains("Invalid token."));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unreachable_provider_when_transcribing_then_returns_api_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let audio = staged_wav(b"audio");

    let result = engine_for(&base_url)
        .transcribe(audio.path(), &WhisperOptions::default())
        .await;

    assert!(matches!(result, Err(TranscriptionError::ApiRequestFailed(_))));
}

#[tokio::test]
async fn given_missing_audio_file_when_transcribing_then_returns_audio_unreadable() {
    let engine = engine_for("http://127.0.0.1:9");

    let result = engine
        .transcribe(
            Path::new("/nonexistent/whisper-relay/audio.wav"),
            &WhisperOptions::default(),
        )
        .await;

    assert!(matches!(result, Err(TranscriptionError::AudioUnreadable(_))));
}
