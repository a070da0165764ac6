// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::exec::ScriptBackend;
use crate::fs::FileSystem;
use crate::notify::{self, Mailer, Notification};
use crate::status::StatusLog;
use crate::types::StopReason;

use super::core::SupervisorCore;
use super::{CoreCommand, LoopEvent, RuntimeOptions};

/// Async shell around [`SupervisorCore`].
///
/// Runs the script through a [`ScriptBackend`], sleeps between invocations,
/// and on a spawn failure writes the diagnostic and mails the operator
/// through a [`Mailer`]. A message on `shutdown_rx` interrupts either the
/// running script (the child is killed on drop) or the pause.
pub struct Supervisor<B: ScriptBackend, M: Mailer> {
    core: SupervisorCore,
    backend: B,
    mailer: M,
    fs: Arc<dyn FileSystem>,
    script: PathBuf,
    status: StatusLog,
    notification: Notification,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<B: ScriptBackend, M: Mailer> fmt::Debug for Supervisor<B, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("core", &self.core)
            .field("script", &self.script)
            .field("status", &self.status.path())
            .finish_non_exhaustive()
    }
}

impl<B: ScriptBackend, M: Mailer> Supervisor<B, M> {
    pub fn new(
        cfg: &ConfigFile,
        max_iterations: Option<u64>,
        fs: Arc<dyn FileSystem>,
        backend: B,
        mailer: M,
        shutdown_rx: mpsc::Receiver<()>,
    ) -> Self {
        let options = RuntimeOptions {
            interval: cfg.script.interval,
            max_iterations,
        };

        Self {
            core: SupervisorCore::new(options),
            backend,
            mailer,
            status: StatusLog::new(Arc::clone(&fs), cfg.script.status_log.clone()),
            fs,
            script: cfg.script.path.clone(),
            notification: Notification::daemon_stopped(&cfg.notify),
            shutdown_rx,
        }
    }

    /// Main loop. Returns once the core reaches `Stopped`.
    pub async fn run(mut self) -> StopReason {
        info!(
            script = %self.script.display(),
            status_log = %self.status.path().display(),
            "supervisor started"
        );

        loop {
            let iteration = self.core.completed_iterations() + 1;
            debug!(iteration, "invoking script");

            let event = tokio::select! {
                invocation = self.backend.invoke(&self.script, &self.status) => {
                    LoopEvent::InvocationFinished(invocation)
                }
                _ = wait_for_shutdown(&mut self.shutdown_rx) => {
                    info!(iteration, "shutdown requested while script was running");
                    LoopEvent::ShutdownRequested
                }
            };

            if let LoopEvent::InvocationFinished(invocation) = &event {
                debug!(iteration, ?invocation, "invocation finished");
            }

            let step = self.core.step(event);
            let mut keep_running = step.keep_running;

            for command in step.commands {
                if !self.execute_command(command).await {
                    keep_running = false;
                }
            }

            if !keep_running {
                break;
            }
        }

        // Every path out of the loop goes through a stopping transition.
        let reason = self
            .core
            .stop_reason()
            .unwrap_or(StopReason::ShutdownRequested);

        info!(
            %reason,
            iterations = self.core.completed_iterations(),
            "supervisor stopped"
        );
        reason
    }

    /// Execute one command from the core. Returns `false` if the loop must
    /// stop (a pause was cut short by shutdown).
    async fn execute_command(&mut self, command: CoreCommand) -> bool {
        match command {
            CoreCommand::Pause(interval) => {
                debug!(?interval, "pausing before next invocation");
                tokio::select! {
                    _ = sleep(interval) => true,
                    _ = wait_for_shutdown(&mut self.shutdown_rx) => {
                        info!("shutdown requested during pause");
                        self.core.step(LoopEvent::ShutdownRequested);
                        false
                    }
                }
            }
            CoreCommand::RecordSpawnFailure => {
                warn!(
                    script = %self.script.display(),
                    "script could not be started; supervision loop ends"
                );
                self.status.record_spawn_failure();
                true
            }
            CoreCommand::NotifyOperator => {
                let report =
                    notify::dispatch(self.fs.as_ref(), &mut self.mailer, &self.notification).await;
                debug!(?report, "operator notification dispatched");
                true
            }
        }
    }
}

/// Resolves on the first shutdown message. If every sender is gone, shutdown
/// can no longer be requested and this never resolves.
async fn wait_for_shutdown(rx: &mut mpsc::Receiver<()>) {
    if rx.recv().await.is_none() {
        std::future::pending::<()>().await;
    }
}
