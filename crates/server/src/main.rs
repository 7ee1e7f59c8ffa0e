use anyhow::Context;
use mkvconv_transcoder::ConverterConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let defaults = ConverterConfig::default();

    let ffmpeg_path = std::env::var("MKVCONV_FFMPEG")
        .map(Into::into)
        .unwrap_or(defaults.ffmpeg_path);
    let temp_dir: std::path::PathBuf = std::env::var("MKVCONV_TEMP_DIR")
        .map(Into::into)
        .unwrap_or(defaults.temp_dir);
    std::fs::create_dir_all(&temp_dir).context("failed to create temp dir")?;
    info!(temp_dir = %temp_dir.display(), "scratch files go here");

    // Missing ffmpeg is not fatal: each conversion will report it instead.
    mkvconv_transcoder::probe::detect(&ffmpeg_path).await;

    let state = mkvconv_server::state::AppState::new(ConverterConfig {
        ffmpeg_path,
        temp_dir,
    });
    let app = mkvconv_server::routes::build_router(state);

    let bind_addr = std::env::var("MKVCONV_BIND").unwrap_or_else(|_| "0.0.0.0:8501".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %bind_addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
