// src/check.rs

//! One-shot liveness check (`sohd --check`), meant to be run from cron.
//!
//! Reads the pid file, probes the pid, and mails the operator when no
//! supervisor is alive. A missing, stale or unreadable pid file all count as
//! "not running".

use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::ConfigFile;
use crate::daemon::read_pid_file;
use crate::errors::{Result, SohdError};
use crate::fs::FileSystem;
use crate::notify::{self, Mailer, Notification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Running(u32),
    NotRunning,
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Liveness::Running(pid) => write!(f, "running (pid {pid})"),
            Liveness::NotRunning => f.write_str("not running"),
        }
    }
}

/// Determine whether the supervisor is alive, notifying the operator if not.
///
/// `probe` decides whether a pid belongs to a live process;
/// production passes [`crate::daemon::is_process_alive`].
pub async fn check_liveness<M>(
    cfg: &ConfigFile,
    fs: &dyn FileSystem,
    mailer: &mut M,
    probe: fn(u32) -> bool,
    draft: PathBuf,
) -> Result<Liveness>
where
    M: Mailer + ?Sized,
{
    let pid_path = cfg.pid_file_path().ok_or_else(|| {
        SohdError::ConfigError("--check needs [daemon].pid_file to be set".to_string())
    })?;

    let pid = match read_pid_file(fs, &pid_path) {
        Ok(pid) => pid,
        Err(err) => {
            warn!(pid_file = %pid_path.display(), error = %err, "unreadable pid file");
            None
        }
    };

    let liveness = match pid {
        Some(pid) if probe(pid) => Liveness::Running(pid),
        Some(pid) => {
            warn!(pid, pid_file = %pid_path.display(), "stale pid file");
            Liveness::NotRunning
        }
        None => Liveness::NotRunning,
    };

    info!(%liveness, pid_file = %pid_path.display(), "liveness check");

    if liveness == Liveness::NotRunning {
        let notification = Notification::daemon_missing(cfg, draft);
        notify::dispatch(fs, mailer, &notification).await;
    }

    Ok(liveness)
}
