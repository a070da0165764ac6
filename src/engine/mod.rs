// src/engine/mod.rs

//! Supervision engine.
//!
//! The loop has two states, `Running` and `Stopped(reason)`. The pure core
//! state machine lives in [`core`]; the async/IO shell that runs the script,
//! sleeps, writes the diagnostic and mails the operator is [`runtime`].

use std::time::Duration;

use crate::exec::Invocation;

/// Events fed into the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    /// One script invocation finished (or failed to start).
    InvocationFinished(Invocation),
    /// SIGTERM / SIGINT, or the embedding code closed the loop.
    ShutdownRequested,
}

/// Command produced by the core, to be executed by the IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Overwrite the status log with the spawn-failure diagnostic.
    RecordSpawnFailure,
    /// Wait before the next invocation.
    Pause(Duration),
    /// Draft and mail the "daemon stopped" notification.
    NotifyOperator,
}

/// Decision returned by the core after handling a single [`LoopEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands to execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether another invocation should follow.
    pub keep_running: bool,
}

/// Options shared by the core and the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Pause between the end of one invocation and the start of the next.
    pub interval: Duration,
    /// Stop after this many completed invocations (`--once` is `Some(1)`).
    pub max_iterations: Option<u64>,
}

pub mod core;
pub mod runtime;

pub use self::core::SupervisorCore;
pub use runtime::Supervisor;
