// src/exec/mod.rs

//! Script execution layer.
//!
//! - [`backend`] provides the `ScriptBackend` trait the supervision loop
//!   talks to, and the [`Invocation`] result it gets back.
//! - [`script_runner`] is the production backend: it spawns the script with
//!   `tokio::process::Command`, streams stdout into the status log and reaps
//!   the child.
//!
//! Tests swap in a scripted backend that never spawns anything.

pub mod backend;
pub mod script_runner;

pub use backend::{Invocation, ScriptBackend};
pub use script_runner::ProcessScriptBackend;
