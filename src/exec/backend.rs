// src/exec/backend.rs

//! Pluggable script backend abstraction.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::status::StatusLog;

/// Result of one attempt to run the supervised script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// The script started, its stdout was drained into the status log and
    /// the child was reaped.
    ///
    /// `exit_code` is `None` when the child died from a signal or could not
    /// be waited on. It is reported, never acted on.
    Completed {
        exit_code: Option<i32>,
        bytes: usize,
    },
    /// The script could not be started at all.
    SpawnFailed { error: String },
}

/// Trait abstracting how the script is run.
///
/// Contract for implementations:
/// - on a successful start, call [`StatusLog::begin_iteration`] exactly once
///   and write every stdout line to it verbatim;
/// - on a spawn failure, leave the status log alone (the loop writes the
///   diagnostic);
/// - only resolve once the child has exited and been reaped, so invocations
///   never overlap.
pub trait ScriptBackend: Send {
    fn invoke<'a>(
        &'a mut self,
        script: &'a Path,
        status: &'a StatusLog,
    ) -> Pin<Box<dyn Future<Output = Invocation> + Send + 'a>>;
}
