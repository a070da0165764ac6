// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::config::validate::validate_raw_config;
use crate::errors::SohdError;
use crate::types::parse_duration;

pub const DEFAULT_WORKDIR: &str = "/data/mta/Script/SOH";
pub const DEFAULT_PID_FILE: &str = "sohd.pid";
pub const DEFAULT_SCRIPT_PATH: &str =
    "/data/mta4/Space_Weather/EPHEM/Scripts/interpolate_script.sh";
pub const DEFAULT_STATUS_LOG: &str = "/data/mta4/Space_Weather/EPHEM/Scripts/interpolate_log";
pub const DEFAULT_INTERVAL: &str = "180s";
pub const DEFAULT_DRAFT: &str = "./zspace";
pub const DEFAULT_RECIPIENT: &str = "mta@localhost";
pub const DEFAULT_SUBJECT: &str = "Ephem Interpolate daemon stopped";
pub const DEFAULT_MAIL_COMMAND: &str = "mailx";
pub const DEFAULT_MESSAGE: &str = "Ephem Interpolate daemon stopped. Restart the process:\n\n\
     \t\tnohup /data/mta4/Space_Weather/EPHEM/Scripts/interpolate_daemonize &\n\n\
     This process should be run on luke-v as mta.\n";
pub const DEFAULT_CHECK_SUBJECT: &str = "EPHEM Daemon Process Problem";
pub const DEFAULT_CHECK_MESSAGE: &str =
    "daemon process of /data/mta4/Space_Weather/EPHEM/Scripts/ page is not running.\n\
     Please check mta/c3po-v daemon process.\n";

/// Configuration exactly as read from TOML.
///
/// ```toml
/// [daemon]
/// workdir = "/data/mta/Script/SOH"
/// umask = 0
///
/// [script]
/// path = "/data/mta4/Space_Weather/EPHEM/Scripts/interpolate_script.sh"
/// status_log = "/data/mta4/Space_Weather/EPHEM/Scripts/interpolate_log"
/// interval = "180s"
///
/// [notify]
/// recipient = "mta@localhost"
/// ```
///
/// Every section and field is optional; the defaults reproduce the
/// deployment this daemon was written for.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub daemon: DaemonSection,

    #[serde(default)]
    pub script: RawScriptSection,

    #[serde(default)]
    pub notify: NotifySection,

    #[serde(default)]
    pub check: CheckSection,
}

/// `[daemon]` section: how the process detaches.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonSection {
    /// Absolute directory the daemon `chdir`s into. Relative paths elsewhere
    /// in the config (draft, pid file) resolve against it.
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,

    /// File-creation mask applied after detaching. TOML accepts `0o022`.
    #[serde(default)]
    pub umask: u32,

    /// Where the running daemon records its pid. `pid_file = ""` disables
    /// the pid file (and with it, `--check`).
    #[serde(
        default = "default_pid_file",
        deserialize_with = "deserialize_pid_file"
    )]
    pub pid_file: Option<PathBuf>,
}

fn default_workdir() -> PathBuf {
    PathBuf::from(DEFAULT_WORKDIR)
}

fn default_pid_file() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_PID_FILE))
}

fn deserialize_pid_file<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let path = PathBuf::deserialize(deserializer)?;
    Ok((!path.as_os_str().is_empty()).then_some(path))
}

impl Default for DaemonSection {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            umask: 0,
            pid_file: default_pid_file(),
        }
    }
}

/// `[script]` section before the interval string is parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScriptSection {
    #[serde(default = "default_script_path")]
    pub path: PathBuf,

    #[serde(default = "default_status_log")]
    pub status_log: PathBuf,

    /// Pause between invocations, e.g. `"180s"`.
    #[serde(default = "default_interval")]
    pub interval: String,
}

fn default_script_path() -> PathBuf {
    PathBuf::from(DEFAULT_SCRIPT_PATH)
}

fn default_status_log() -> PathBuf {
    PathBuf::from(DEFAULT_STATUS_LOG)
}

fn default_interval() -> String {
    DEFAULT_INTERVAL.to_string()
}

impl Default for RawScriptSection {
    fn default() -> Self {
        Self {
            path: default_script_path(),
            status_log: default_status_log(),
            interval: default_interval(),
        }
    }
}

/// `[notify]` section: the mail sent when the script can no longer start.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifySection {
    #[serde(default = "default_draft")]
    pub draft: PathBuf,

    #[serde(default = "default_recipient")]
    pub recipient: String,

    #[serde(default = "default_subject")]
    pub subject: String,

    /// Program invoked as `<mail_command> -s <subject> <recipient>` with the
    /// draft on stdin.
    #[serde(default = "default_mail_command")]
    pub mail_command: String,

    #[serde(default = "default_message")]
    pub message: String,
}

fn default_draft() -> PathBuf {
    PathBuf::from(DEFAULT_DRAFT)
}

fn default_recipient() -> String {
    DEFAULT_RECIPIENT.to_string()
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_mail_command() -> String {
    DEFAULT_MAIL_COMMAND.to_string()
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

impl Default for NotifySection {
    fn default() -> Self {
        Self {
            draft: default_draft(),
            recipient: default_recipient(),
            subject: default_subject(),
            mail_command: default_mail_command(),
            message: default_message(),
        }
    }
}

/// `[check]` section: the mail sent by `--check` when no daemon is alive.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckSection {
    #[serde(default = "default_check_subject")]
    pub subject: String,

    #[serde(default = "default_check_message")]
    pub message: String,
}

fn default_check_subject() -> String {
    DEFAULT_CHECK_SUBJECT.to_string()
}

fn default_check_message() -> String {
    DEFAULT_CHECK_MESSAGE.to_string()
}

impl Default for CheckSection {
    fn default() -> Self {
        Self {
            subject: default_check_subject(),
            message: default_check_message(),
        }
    }
}

/// `[script]` after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    pub path: PathBuf,
    pub status_log: PathBuf,
    pub interval: Duration,
}

/// Validated configuration used by the rest of the crate.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub daemon: DaemonSection,
    pub script: ScriptConfig,
    pub notify: NotifySection,
    pub check: CheckSection,
}

impl ConfigFile {
    /// Resolve a possibly-relative path against `daemon.workdir`.
    ///
    /// Inside the detached daemon the cwd already is the workdir; this is for
    /// callers that never detach (`--check`).
    pub fn resolve(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.daemon.workdir.join(path)
        }
    }

    /// Absolute pid file location, if one is configured.
    pub fn pid_file_path(&self) -> Option<PathBuf> {
        self.daemon.pid_file.as_deref().map(|p| self.resolve(p))
    }
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SohdError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        validate_raw_config(&raw)?;

        let interval = parse_duration(&raw.script.interval).map_err(|e| {
            SohdError::ConfigError(format!("invalid [script].interval: {e}"))
        })?;

        Ok(Self {
            daemon: raw.daemon,
            script: ScriptConfig {
                path: raw.script.path,
                status_log: raw.script.status_log,
                interval,
            },
            notify: raw.notify,
            check: raw.check,
        })
    }
}
