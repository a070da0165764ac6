use std::collections::VecDeque;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use sohd::exec::{Invocation, ScriptBackend};
use sohd::status::StatusLog;

/// What the fake "script" does on one invocation.
#[derive(Debug, Clone)]
pub enum ScriptedRun {
    /// Start, print these lines, exit with this code.
    Output { lines: Vec<Vec<u8>>, exit_code: i32 },
    /// Fail to start.
    SpawnFailure,
}

impl ScriptedRun {
    /// Convenience: one run whose stdout is `text`, split after each newline.
    pub fn prints(text: &str) -> Self {
        ScriptedRun::Output {
            lines: text
                .split_inclusive('\n')
                .map(|l| l.as_bytes().to_vec())
                .collect(),
            exit_code: 0,
        }
    }
}

/// Start/end of each fake invocation, for ordering assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    Started(usize),
    Finished(usize),
}

#[derive(Debug, Default)]
pub struct BackendLog {
    pub events: Vec<BackendEvent>,
    pub started_at: Vec<Instant>,
    pub finished_at: Vec<Instant>,
}

/// A fake backend that plays back `ScriptedRun`s in order.
///
/// When the script is exhausted it reports a spawn failure, so a loop driven
/// by it always terminates.
pub struct ScriptedBackend {
    runs: VecDeque<ScriptedRun>,
    invoked: usize,
    log: Arc<Mutex<BackendLog>>,
}

impl ScriptedBackend {
    pub fn new(runs: impl IntoIterator<Item = ScriptedRun>) -> (Self, Arc<Mutex<BackendLog>>) {
        let log = Arc::new(Mutex::new(BackendLog::default()));
        (
            Self {
                runs: runs.into_iter().collect(),
                invoked: 0,
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl ScriptBackend for ScriptedBackend {
    fn invoke<'a>(
        &'a mut self,
        _script: &'a Path,
        status: &'a StatusLog,
    ) -> Pin<Box<dyn Future<Output = Invocation> + Send + 'a>> {
        let n = self.invoked;
        self.invoked += 1;
        let run = self.runs.pop_front().unwrap_or(ScriptedRun::SpawnFailure);
        let log = Arc::clone(&self.log);

        Box::pin(async move {
            {
                let mut guard = log.lock().unwrap();
                guard.events.push(BackendEvent::Started(n));
                guard.started_at.push(Instant::now());
            }

            let invocation = match run {
                ScriptedRun::SpawnFailure => Invocation::SpawnFailed {
                    error: "No such file or directory (os error 2)".to_string(),
                },
                ScriptedRun::Output { lines, exit_code } => {
                    let mut writer = status.begin_iteration();
                    for line in &lines {
                        // Let other tasks observe partial output.
                        tokio::task::yield_now().await;
                        writer.write_line(line);
                    }
                    let bytes = writer.bytes_written();
                    writer.finish();
                    Invocation::Completed {
                        exit_code: Some(exit_code),
                        bytes,
                    }
                }
            };

            {
                let mut guard = log.lock().unwrap();
                guard.events.push(BackendEvent::Finished(n));
                guard.finished_at.push(Instant::now());
            }

            invocation
        })
    }
}
