//! Scoped temporary files for one conversion request.
//!
//! The input is created exclusively by `tempfile` under the configured
//! directory; the output path is the same name with the extension swapped.
//! Both are [`TempPath`]s, so they disappear on every exit path of a handler.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

/// A temporary path that is deleted (if it exists) at the latest on drop.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    guard: Option<TempPath>,
}

impl ScratchFile {
    fn new(guard: TempPath) -> Self {
        Self {
            path: guard.to_path_buf(),
            guard: Some(guard),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now. Later calls, and the eventual drop, are no-ops.
    /// A missing file counts as removed; other failures are logged and
    /// swallowed.
    pub fn remove(&mut self) {
        let Some(guard) = self.guard.take() else {
            return;
        };
        match guard.close() {
            Ok(()) => debug!(path = %self.path.display(), "removed scratch file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove scratch file"),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.remove();
    }
}

/// The input/output pair for one request, e.g. `mkvconv-Ab3xYz.mkv` and
/// `mkvconv-Ab3xYz.mp4`.
#[derive(Debug)]
pub struct ScratchPair {
    pub input: ScratchFile,
    pub output: ScratchFile,
}

impl ScratchPair {
    /// Create an empty, uniquely named input file under `dir` and reserve
    /// the matching output path. The output file is not created.
    pub fn create(dir: &Path, input_ext: &str, output_ext: &str) -> io::Result<Self> {
        let input = tempfile::Builder::new()
            .prefix("mkvconv-")
            .suffix(&format!(".{input_ext}"))
            .tempfile_in(dir)?
            .into_temp_path();
        let output = TempPath::from_path(input.with_extension(output_ext));
        Ok(Self {
            input: ScratchFile::new(input),
            output: ScratchFile::new(output),
        })
    }

    /// Remove both files. Safe to call more than once.
    pub fn cleanup(&mut self) {
        self.input.remove();
        self.output.remove();
    }
}
