// src/config/validate.rs

use std::path::Path;

use crate::config::model::RawConfigFile;
use crate::errors::{Result, SohdError};
use crate::types::parse_duration;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `[daemon].workdir` is absolute and `umask` fits in permission bits
/// - the script and status log paths are set
/// - `[script].interval` parses and is non-zero
/// - the notification fields needed to build a mail command are non-empty
///
/// It does **not** check that any of the paths exist: the workdir is checked
/// by `chdir` at startup and the script by each spawn.
pub fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_daemon(cfg)?;
    validate_script(cfg)?;
    validate_notify(cfg)?;
    Ok(())
}

fn validate_daemon(cfg: &RawConfigFile) -> Result<()> {
    if !cfg.daemon.workdir.is_absolute() {
        return Err(SohdError::ConfigError(format!(
            "[daemon].workdir must be an absolute path (got {:?})",
            cfg.daemon.workdir
        )));
    }

    if cfg.daemon.umask > 0o777 {
        return Err(SohdError::ConfigError(format!(
            "[daemon].umask must be <= 0o777 (got {:#o})",
            cfg.daemon.umask
        )));
    }

    if let Some(pid_file) = &cfg.daemon.pid_file {
        ensure_path_set(pid_file, "[daemon].pid_file")?;
    }

    Ok(())
}

fn validate_script(cfg: &RawConfigFile) -> Result<()> {
    ensure_path_set(&cfg.script.path, "[script].path")?;
    ensure_path_set(&cfg.script.status_log, "[script].status_log")?;

    let interval = parse_duration(&cfg.script.interval)
        .map_err(|e| SohdError::ConfigError(format!("invalid [script].interval: {e}")))?;

    if interval.is_zero() {
        return Err(SohdError::ConfigError(
            "[script].interval must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_notify(cfg: &RawConfigFile) -> Result<()> {
    ensure_path_set(&cfg.notify.draft, "[notify].draft")?;

    for (value, field) in [
        (&cfg.notify.recipient, "[notify].recipient"),
        (&cfg.notify.subject, "[notify].subject"),
        (&cfg.notify.mail_command, "[notify].mail_command"),
    ] {
        if value.trim().is_empty() {
            return Err(SohdError::ConfigError(format!("{field} must not be empty")));
        }
    }

    Ok(())
}

fn ensure_path_set(path: &Path, field: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(SohdError::ConfigError(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn expect_config_error(cfg: &RawConfigFile, needle: &str) {
        match validate_raw_config(cfg) {
            Err(SohdError::ConfigError(msg)) => {
                assert!(msg.contains(needle), "unexpected message: {msg}")
            }
            other => panic!("expected ConfigError containing {needle:?}, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_raw_config(&RawConfigFile::default()).is_ok());
    }

    #[test]
    fn relative_workdir_is_rejected() {
        let mut cfg = RawConfigFile::default();
        cfg.daemon.workdir = PathBuf::from("relative/dir");
        expect_config_error(&cfg, "workdir");
    }

    #[test]
    fn oversized_umask_is_rejected() {
        let mut cfg = RawConfigFile::default();
        cfg.daemon.umask = 0o1777;
        expect_config_error(&cfg, "umask");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut cfg = RawConfigFile::default();
        cfg.script.interval = "0s".to_string();
        expect_config_error(&cfg, "greater than zero");
    }

    #[test]
    fn bad_interval_unit_is_rejected() {
        let mut cfg = RawConfigFile::default();
        cfg.script.interval = "3 days".to_string();
        expect_config_error(&cfg, "interval");
    }

    #[test]
    fn blank_recipient_is_rejected() {
        let mut cfg = RawConfigFile::default();
        cfg.notify.recipient = "  ".to_string();
        expect_config_error(&cfg, "recipient");
    }
}
