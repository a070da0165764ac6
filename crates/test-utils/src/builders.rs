#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sohd::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults with every path rooted under `root`,
/// so nothing in a test touches the production locations.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut config = RawConfigFile::default();
        config.daemon.workdir = root.to_path_buf();
        config.daemon.pid_file = Some(root.join("sohd.pid"));
        config.script.path = root.join("script.sh");
        config.script.status_log = root.join("status.log");
        config.script.interval = "10ms".to_string();
        config.notify.draft = root.join("zspace");
        config.notify.recipient = "ops@example.com".to_string();
        Self { config }
    }

    pub fn script(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.script.path = path.into();
        self
    }

    pub fn status_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.script.status_log = path.into();
        self
    }

    pub fn interval(mut self, interval: &str) -> Self {
        self.config.script.interval = interval.to_string();
        self
    }

    pub fn draft(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.notify.draft = path.into();
        self
    }

    pub fn mail_command(mut self, command: impl Into<String>) -> Self {
        self.config.notify.mail_command = command.into();
        self
    }

    pub fn pid_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.daemon.pid_file = path;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
