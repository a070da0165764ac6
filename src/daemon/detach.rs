// src/daemon/detach.rs

//! Classic double-fork daemonization.
//!
//! Order matters:
//! 1. fork, parent exits 0
//! 2. `setsid` (new session, no controlling terminal)
//! 3. ignore SIGHUP
//! 4. fork again, parent exits 0 (never a session leader, so a terminal can't
//!    be reacquired)
//! 5. `umask`
//! 6. `chdir` into the workdir
//!
//! Inherited descriptors and the standard streams are left alone, and syslog
//! is not opened.
//!
//! SIGCHLD keeps its default disposition. Setting it to `SIG_IGN` would make
//! the kernel auto-reap children, and the script runner's explicit `wait`
//! would then fail with `ECHILD`.

use tracing::{debug, info};

use crate::config::DaemonSection;
use crate::errors::{Result, SohdError};

/// How far to detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachMode {
    /// Full double fork + `setsid`.
    Background,
    /// Stay attached (systemd, a terminal, tests). SIGHUP, umask and chdir
    /// still apply.
    Foreground,
}

/// Turn the calling process into a daemon according to `mode`.
///
/// Only returns in the final process. Any error is fatal to the caller.
#[cfg(unix)]
pub fn detach(cfg: &DaemonSection, mode: DetachMode) -> Result<()> {
    use nix::sys::stat::{umask, Mode};
    use nix::unistd::{chdir, setsid};

    if mode == DetachMode::Background {
        fork_and_exit_parent("first fork")?;
        setsid().map_err(|e| daemonize_error("setsid", e))?;
    }

    ignore_hangup()?;

    if mode == DetachMode::Background {
        fork_and_exit_parent("second fork")?;
    }

    umask(Mode::from_bits_truncate(cfg.umask as nix::libc::mode_t));
    chdir(cfg.workdir.as_path()).map_err(|e| daemonize_error("chdir", e))?;

    info!(
        pid = std::process::id(),
        workdir = %cfg.workdir.display(),
        umask = %format!("{:#o}", cfg.umask),
        ?mode,
        "detached"
    );
    Ok(())
}

#[cfg(not(unix))]
pub fn detach(_cfg: &DaemonSection, _mode: DetachMode) -> Result<()> {
    Err(SohdError::UnsupportedPlatform(
        "detaching requires a unix platform".to_string(),
    ))
}

#[cfg(unix)]
fn fork_and_exit_parent(step: &'static str) -> Result<()> {
    use nix::unistd::{fork, ForkResult};

    // SAFETY: called before any runtime or helper thread is started, so the
    // child is single-threaded and may keep running arbitrary code.
    match unsafe { fork() }.map_err(|e| daemonize_error(step, e))? {
        ForkResult::Parent { child } => {
            debug!(step, child = child.as_raw(), "parent exiting");
            std::process::exit(0);
        }
        ForkResult::Child => Ok(()),
    }
}

#[cfg(unix)]
fn ignore_hangup() -> Result<()> {
    use nix::sys::signal::{signal, SigHandler, Signal};

    // SAFETY: SIG_IGN installs no handler code.
    unsafe { signal(Signal::SIGHUP, SigHandler::SigIgn) }
        .map_err(|e| daemonize_error("ignoring SIGHUP", e))?;
    Ok(())
}

#[cfg(unix)]
fn daemonize_error(step: &'static str, errno: nix::errno::Errno) -> SohdError {
    SohdError::Daemonize {
        step,
        source: std::io::Error::from(errno),
    }
}
