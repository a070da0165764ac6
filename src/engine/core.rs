// src/engine/core.rs

//! Pure core state machine for the supervision loop.
//!
//! Synchronous and deterministic: no Tokio, no processes, no filesystem.

use crate::engine::{CoreCommand, CoreStep, LoopEvent, RuntimeOptions};
use crate::exec::Invocation;
use crate::types::{LoopState, StopReason};

#[derive(Debug, Clone)]
pub struct SupervisorCore {
    state: LoopState,
    options: RuntimeOptions,
    completed: u64,
}

impl SupervisorCore {
    pub fn new(options: RuntimeOptions) -> Self {
        Self {
            state: LoopState::Running,
            options,
            completed: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            LoopState::Running => None,
            LoopState::Stopped(reason) => Some(reason),
        }
    }

    /// Number of invocations that started and ran to completion.
    pub fn completed_iterations(&self) -> u64 {
        self.completed
    }

    /// Handle one event, updating state and returning what the shell must do.
    ///
    /// Once stopped, every further event is a no-op.
    pub fn step(&mut self, event: LoopEvent) -> CoreStep {
        if !self.state.is_running() {
            return CoreStep {
                commands: Vec::new(),
                keep_running: false,
            };
        }

        match event {
            LoopEvent::InvocationFinished(Invocation::Completed { .. }) => {
                self.completed += 1;

                let limit_reached = self
                    .options
                    .max_iterations
                    .is_some_and(|max| self.completed >= max);

                if limit_reached {
                    self.stop(StopReason::IterationLimitReached, Vec::new())
                } else {
                    CoreStep {
                        commands: vec![CoreCommand::Pause(self.options.interval)],
                        keep_running: true,
                    }
                }
            }
            LoopEvent::InvocationFinished(Invocation::SpawnFailed { .. }) => self.stop(
                StopReason::SpawnFailed,
                vec![CoreCommand::RecordSpawnFailure, CoreCommand::NotifyOperator],
            ),
            LoopEvent::ShutdownRequested => self.stop(StopReason::ShutdownRequested, Vec::new()),
        }
    }

    fn stop(&mut self, reason: StopReason, commands: Vec<CoreCommand>) -> CoreStep {
        self.state = LoopState::Stopped(reason);
        CoreStep {
            commands,
            keep_running: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn options(max_iterations: Option<u64>) -> RuntimeOptions {
        RuntimeOptions {
            interval: Duration::from_secs(180),
            max_iterations,
        }
    }

    fn completed(exit_code: i32) -> LoopEvent {
        LoopEvent::InvocationFinished(Invocation::Completed {
            exit_code: Some(exit_code),
            bytes: 3,
        })
    }

    fn spawn_failed() -> LoopEvent {
        LoopEvent::InvocationFinished(Invocation::SpawnFailed {
            error: "No such file or directory (os error 2)".into(),
        })
    }

    #[test]
    fn completed_invocation_pauses_and_keeps_running() {
        let mut core = SupervisorCore::new(options(None));

        let step = core.step(completed(0));

        assert!(step.keep_running);
        assert_eq!(step.commands, vec![CoreCommand::Pause(Duration::from_secs(180))]);
        assert_eq!(core.state(), LoopState::Running);
        assert_eq!(core.completed_iterations(), 1);
    }

    #[test]
    fn nonzero_exit_is_treated_like_success() {
        let mut core = SupervisorCore::new(options(None));

        let ok = core.step(completed(0));
        let failed = core.step(completed(2));

        assert_eq!(ok, failed);
        assert!(core.state().is_running());
    }

    #[test]
    fn spawn_failure_records_diagnostic_then_notifies() {
        let mut core = SupervisorCore::new(options(None));
        core.step(completed(0));

        let step = core.step(spawn_failed());

        assert!(!step.keep_running);
        assert_eq!(
            step.commands,
            vec![CoreCommand::RecordSpawnFailure, CoreCommand::NotifyOperator]
        );
        assert_eq!(core.stop_reason(), Some(StopReason::SpawnFailed));
    }

    #[test]
    fn shutdown_stops_without_notifying() {
        let mut core = SupervisorCore::new(options(None));

        let step = core.step(LoopEvent::ShutdownRequested);

        assert!(!step.keep_running);
        assert!(step.commands.is_empty());
        assert_eq!(core.stop_reason(), Some(StopReason::ShutdownRequested));
    }

    #[test]
    fn iteration_limit_stops_without_final_pause() {
        let mut core = SupervisorCore::new(options(Some(2)));

        assert!(core.step(completed(0)).keep_running);
        let last = core.step(completed(0));

        assert!(!last.keep_running);
        assert!(last.commands.is_empty());
        assert_eq!(core.stop_reason(), Some(StopReason::IterationLimitReached));
    }

    #[test]
    fn stopped_core_ignores_further_events() {
        let mut core = SupervisorCore::new(options(None));
        core.step(spawn_failed());

        let step = core.step(completed(0));

        assert!(!step.keep_running);
        assert!(step.commands.is_empty());
        assert_eq!(core.completed_iterations(), 0);
        assert_eq!(core.stop_reason(), Some(StopReason::SpawnFailed));
    }
}
