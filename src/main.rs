use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use whisper_relay::application::services::TranscriptionService;
use whisper_relay::domain::ModelReference;
use whisper_relay::infrastructure::audio::ReplicateWhisperEngine;
use whisper_relay::infrastructure::observability::{TracingConfig, init_tracing};
use whisper_relay::infrastructure::storage::TempFileStaging;
use whisper_relay::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::new(environment, &settings.logging));

    if settings.replicate.api_token.trim().is_empty() {
        anyhow::bail!("replicate.api_token is not configured; set REPLICATE_API_TOKEN");
    }

    let model: ModelReference = settings.replicate.model.parse()?;
    let engine = Arc::new(ReplicateWhisperEngine::new(
        settings.replicate.api_token.clone(),
        Some(settings.replicate.base_url.clone()),
        model,
        settings.replicate.poll_interval(),
        settings.replicate.request_timeout(),
    )?
    .with_inline_audio_limit(settings.replicate.inline_audio_max_bytes));

    let staging = Arc::new(TempFileStaging::new(
        settings.storage.temp_dir(),
        settings.storage.default_suffix.clone(),
    )?);

    let state = AppState {
        transcription_service: Arc::new(TranscriptionService::new(engine, staging)),
        max_upload_size_bytes: settings.storage.max_upload_size_bytes,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!(
        %addr,
        environment = %environment,
        model = %settings.replicate.model,
        "Listening"
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
