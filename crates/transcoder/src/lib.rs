pub mod probe;
pub mod remux;
pub mod scratch;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// ffmpeg ran and exited unsuccessfully. Holds its stderr verbatim.
    #[error("ffmpeg error:\n{0}")]
    ConversionFailed(String),
    /// ffmpeg could not be run, or staging the files failed.
    #[error("{0}")]
    ExecutionError(String),
}

impl From<std::io::Error> for ConvertError {
    fn from(e: std::io::Error) -> Self {
        Self::ExecutionError(format!("file I/O failed: {e}"))
    }
}

/// Global converter configuration.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub ffmpeg_path: PathBuf,
    pub temp_dir: PathBuf,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            temp_dir: std::env::temp_dir(),
        }
    }
}
