// src/exec/script_runner.rs

//! Production script backend.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::exec::backend::{Invocation, ScriptBackend};
use crate::status::StatusLog;

/// Runs the script as a direct child process (no shell), with no arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessScriptBackend;

impl ProcessScriptBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptBackend for ProcessScriptBackend {
    fn invoke<'a>(
        &'a mut self,
        script: &'a Path,
        status: &'a StatusLog,
    ) -> Pin<Box<dyn Future<Output = Invocation> + Send + 'a>> {
        Box::pin(run_script(script, status))
    }
}

async fn run_script(script: &Path, status: &StatusLog) -> Invocation {
    info!(script = %script.display(), "starting script");

    let mut cmd = Command::new(script);
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            error!(script = %script.display(), error = %err, "failed to start script");
            return Invocation::SpawnFailed {
                error: err.to_string(),
            };
        }
    };

    // Consume stderr so the script never blocks on it; relay at debug.
    if let Some(stderr) = child.stderr.take() {
        let script_name = script.display().to_string();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                debug!(script = %script_name, "stderr: {}", line);
            }
        });
    }

    let mut writer = status.begin_iteration();

    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => writer.write_line(&line),
                Err(err) => {
                    warn!(
                        script = %script.display(),
                        error = %err,
                        "reading script stdout failed; closing pipe early"
                    );
                    break;
                }
            }
        }
        // `reader` drops here: the pipe is closed before we wait.
    }

    let bytes = writer.bytes_written();
    writer.finish();

    let exit_code = match child.wait().await {
        Ok(exit) => {
            let code = exit.code();
            info!(
                script = %script.display(),
                exit_code = ?code,
                success = exit.success(),
                bytes,
                "script exited"
            );
            code
        }
        Err(err) => {
            warn!(script = %script.display(), error = %err, "waiting for script failed");
            None
        }
    };

    Invocation::Completed { exit_code, bytes }
}
