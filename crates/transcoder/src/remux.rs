//! MKV → MP4 conversion through the ffmpeg CLI.

use std::path::Path;
use std::process::Stdio;

use tracing::{info, warn};

use crate::ConvertError;

/// Arguments passed to ffmpeg: copy the video stream, re-encode audio to AAC.
pub fn build_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        "aac".into(),
        "-strict".into(),
        "experimental".into(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Run ffmpeg to convert `input` into `output` and wait for it to exit.
///
/// A non-zero exit becomes [`ConvertError::ConversionFailed`] with ffmpeg's
/// stderr; failing to spawn becomes [`ConvertError::ExecutionError`]. The
/// output file is left for the caller to clean up. If the returned future is
/// dropped before ffmpeg exits, the process is killed.
pub async fn convert(ffmpeg_path: &Path, input: &Path, output: &Path) -> Result<(), ConvertError> {
    let args = build_args(input, output);
    info!(?ffmpeg_path, ?args, "running ffmpeg");

    let result = tokio::process::Command::new(ffmpeg_path)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            ConvertError::ExecutionError(format!("failed to run {}: {e}", ffmpeg_path.display()))
        })?;

    let stderr = String::from_utf8_lossy(&result.stderr).into_owned();

    if !result.status.success() {
        warn!(status = %result.status, "ffmpeg exited with failure");
        return Err(ConvertError::ConversionFailed(stderr));
    }

    // ffmpeg can exit 0 without writing anything useful, e.g. when every
    // stream was filtered out.
    let written = match tokio::fs::metadata(output).await {
        Ok(meta) => meta.len(),
        Err(_) => 0,
    };
    if written == 0 {
        let detail = if stderr.trim().is_empty() {
            "ffmpeg produced no output file".to_string()
        } else {
            stderr
        };
        return Err(ConvertError::ConversionFailed(detail));
    }

    info!(bytes = written, output = %output.display(), "ffmpeg finished");
    Ok(())
}
