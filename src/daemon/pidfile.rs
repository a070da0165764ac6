// src/daemon/pidfile.rs

//! Pid file used by `--check` to find the running daemon.

use std::path::Path;

use anyhow::{anyhow, Context};

use crate::errors::Result;
use crate::fs::FileSystem;

pub fn write_pid_file(fs: &dyn FileSystem, path: &Path, pid: u32) -> Result<()> {
    fs.write(path, format!("{pid}\n").as_bytes())?;
    Ok(())
}

/// Read a pid back. A missing file is `Ok(None)`; garbage is an error.
pub fn read_pid_file(fs: &dyn FileSystem, path: &Path) -> Result<Option<u32>> {
    if !fs.exists(path) {
        return Ok(None);
    }

    let contents = fs.read_to_string(path)?;
    let trimmed = contents.trim();
    let pid = trimmed
        .parse::<u32>()
        .with_context(|| format!("parsing pid file {:?}", path))?;

    if pid == 0 {
        return Err(anyhow!("pid file {:?} contains pid 0", path).into());
    }

    Ok(Some(pid))
}

pub fn remove_pid_file(fs: &dyn FileSystem, path: &Path) -> Result<()> {
    fs.remove_file(path)?;
    Ok(())
}

/// Signal-0 probe. `EPERM` still means the process exists.
#[cfg(unix)]
pub fn is_process_alive(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };

    match kill(Pid::from_raw(raw), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
pub fn is_process_alive(_pid: u32) -> bool {
    false
}
