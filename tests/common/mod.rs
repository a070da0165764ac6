#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub use sohd_test_utils::{init_tracing, with_timeout};

static SERIAL: Mutex<()> = Mutex::new(());

/// Serialise tests that write and then exec scripts.
///
/// A fork in one test thread while another still holds a script open for
/// writing makes the exec fail with ETXTBSY.
pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// Write an executable `/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// The `sohd` binary under test, with `$SOHD_CONFIG` cleared and its output
/// captured.
pub fn sohd_command() -> std::process::Command {
    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_sohd"));
    cmd.env_remove("SOHD_CONFIG").env_remove("SOHD_LOG");
    cmd
}

/// Write `dir/sohd.toml` for a daemon working in `root`, running `script`
/// every 10ms.
pub fn write_config(dir: &Path, root: &Path, script: &Path) -> PathBuf {
    let path = dir.join("sohd.toml");
    let body = format!(
        "[daemon]\n\
         workdir = '{root}'\n\
         pid_file = 'sohd.pid'\n\
         \n\
         [script]\n\
         path = '{script}'\n\
         status_log = '{root}/status.log'\n\
         interval = '10ms'\n\
         \n\
         [notify]\n\
         recipient = 'ops@example.com'\n\
         mail_command = 'true'\n",
        root = root.display(),
        script = script.display(),
    );
    fs::write(&path, body).unwrap();
    path
}
