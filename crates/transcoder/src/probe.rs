//! ffmpeg availability check.
//!
//! Runs `ffmpeg -version` and keeps the first line of its output.

use std::path::Path;

use tracing::{info, warn};

use crate::ConvertError;

/// Return the first line of `ffmpeg -version`, e.g. `ffmpeg version 6.1.1 ...`.
pub async fn version(ffmpeg_path: &Path) -> Result<String, ConvertError> {
    let output = tokio::process::Command::new(ffmpeg_path)
        .arg("-version")
        .stdin(std::process::Stdio::null())
        .output()
        .await
        .map_err(|e| {
            ConvertError::ExecutionError(format!("failed to run {}: {e}", ffmpeg_path.display()))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ConvertError::ExecutionError(format!(
            "ffmpeg -version failed: {}",
            stderr.trim()
        )));
    }

    Ok(first_line(&String::from_utf8_lossy(&output.stdout)))
}

/// Probe ffmpeg once and log the outcome. Returns the version line if found.
pub async fn detect(ffmpeg_path: &Path) -> Option<String> {
    match version(ffmpeg_path).await {
        Ok(v) => {
            info!(version = %v, "ffmpeg available");
            Some(v)
        }
        Err(e) => {
            warn!(?ffmpeg_path, error = %e, "ffmpeg not usable, conversions will fail");
            None
        }
    }
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or("").trim().to_string()
}
