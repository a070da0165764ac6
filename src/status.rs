// src/status.rs

//! The status log: a single file holding the stdout of the most recent
//! script invocation and nothing else.
//!
//! Every failure here is logged and swallowed. A broken status log must never
//! stop the supervision loop.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::types::SPAWN_FAILURE_DIAGNOSTIC;

#[derive(Debug, Clone)]
pub struct StatusLog {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl StatusLog {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the log and return a writer for this iteration's output.
    ///
    /// Call only once the script has actually started, so a spawn failure
    /// leaves the previous iteration's content for [`record_spawn_failure`]
    /// to replace.
    ///
    /// [`record_spawn_failure`]: StatusLog::record_spawn_failure
    pub fn begin_iteration(&self) -> StatusWriter {
        match self.fs.create_truncate(&self.path) {
            Ok(inner) => StatusWriter {
                inner: Some(inner),
                path: self.path.clone(),
                bytes: 0,
            },
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "could not open status log; this iteration's output is discarded"
                );
                StatusWriter {
                    inner: None,
                    path: self.path.clone(),
                    bytes: 0,
                }
            }
        }
    }

    /// Replace the log content with the fixed spawn-failure diagnostic.
    pub fn record_spawn_failure(&self) {
        if let Err(err) = self
            .fs
            .write(&self.path, SPAWN_FAILURE_DIAGNOSTIC.as_bytes())
        {
            warn!(
                path = %self.path.display(),
                error = %err,
                "could not write spawn-failure diagnostic to status log"
            );
        }
    }
}

/// Streams one iteration's stdout into the status log.
///
/// After the first write error the writer goes quiet. The caller keeps
/// draining the pipe so the script never blocks on a full buffer.
pub struct StatusWriter {
    inner: Option<Box<dyn Write + Send>>,
    path: PathBuf,
    bytes: usize,
}

impl StatusWriter {
    /// Append one line (including its terminator, if any) verbatim.
    pub fn write_line(&mut self, line: &[u8]) {
        let Some(inner) = self.inner.as_mut() else {
            return;
        };

        if let Err(err) = inner.write_all(line) {
            warn!(
                path = %self.path.display(),
                error = %err,
                "write to status log failed; dropping the rest of this iteration's output"
            );
            self.inner = None;
            return;
        }
        self.bytes += line.len();
    }

    /// Bytes successfully written so far.
    pub fn bytes_written(&self) -> usize {
        self.bytes
    }

    /// Flush and close the log file.
    pub fn finish(mut self) {
        if let Some(mut inner) = self.inner.take() {
            if let Err(err) = inner.flush() {
                warn!(path = %self.path.display(), error = %err, "flushing status log failed");
            }
        }
        debug!(path = %self.path.display(), bytes = self.bytes, "status log updated");
    }
}
