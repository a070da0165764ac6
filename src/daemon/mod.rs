// src/daemon/mod.rs

//! Process-level plumbing: detaching from the terminal and the pid file.
//!
//! Everything here must run before the Tokio runtime exists; forking a
//! process that already has runtime threads is not safe.

pub mod detach;
pub mod pidfile;

pub use detach::{detach, DetachMode};
pub use pidfile::{is_process_alive, read_pid_file, remove_pid_file, write_pid_file};
