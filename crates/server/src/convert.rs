//! Upload → ffmpeg → download.
//!
//! Each request stages the upload in its own scratch pair, runs ffmpeg on it
//! and returns the result. Both scratch files are gone by the time the
//! handler returns, whatever the outcome.

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use mkvconv_core::error::ApiError;
use mkvconv_core::naming::{self, INPUT_EXTENSION, OUTPUT_EXTENSION};
use mkvconv_core::types::{Artifact, Upload};
use mkvconv_transcoder::scratch::ScratchPair;
use mkvconv_transcoder::{ConvertError, ConverterConfig, remux};
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Convert an uploaded MKV file and return it as an MP4 attachment.
/// POST /api/v1/convert
pub async fn convert_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = read_upload(&mut multipart).await?;

    if !upload.has_accepted_extension() {
        return Err(ApiError::BadRequest(format!(
            "only .{INPUT_EXTENSION} files are accepted, got {:?}",
            upload.file_name
        ))
        .into());
    }

    info!(file_name = %upload.file_name, bytes = upload.bytes.len(), "conversion requested");

    let artifact = run(&state.converter, &upload).await.map_err(|e| {
        warn!(file_name = %upload.file_name, error = %e, "conversion failed");
        AppError::from(e)
    })?;

    info!(download = %artifact.file_name, bytes = artifact.len(), "conversion completed");

    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                naming::attachment_disposition(&artifact.file_name),
            ),
        ],
        artifact.bytes,
    )
        .into_response())
}

/// Stage `upload`, run ffmpeg, and read the result back into memory.
/// The scratch files are removed before this returns.
pub async fn run(config: &ConverterConfig, upload: &Upload) -> Result<Artifact, ConvertError> {
    let dir = config.temp_dir.clone();
    let mut scratch = tokio::task::spawn_blocking(move || {
        ScratchPair::create(&dir, INPUT_EXTENSION, OUTPUT_EXTENSION)
    })
    .await
    .map_err(|e| ConvertError::ExecutionError(format!("scratch setup task failed: {e}")))??;

    let result = stage_and_convert(config, upload, &scratch).await;

    if let Err(e) = tokio::task::spawn_blocking(move || scratch.cleanup()).await {
        warn!(error = %e, "scratch cleanup task failed");
    }
    result
}

async fn stage_and_convert(
    config: &ConverterConfig,
    upload: &Upload,
    scratch: &ScratchPair,
) -> Result<Artifact, ConvertError> {
    tokio::fs::write(scratch.input.path(), &upload.bytes).await?;

    remux::convert(&config.ffmpeg_path, scratch.input.path(), scratch.output.path()).await?;

    let bytes = tokio::fs::read(scratch.output.path()).await?;
    Ok(Artifact::mp4(upload.download_name(), bytes))
}

/// Pull the single file part out of the form. Other fields are ignored.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e.body_text())))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(ApiError::BadRequest("no file selected".into()).into()),
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e.body_text())))?;

        return Ok(Upload::new(file_name, bytes));
    }

    Err(ApiError::BadRequest(format!("missing '{FILE_FIELD}' field")).into())
}
