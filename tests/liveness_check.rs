mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use sohd::check::{Liveness, check_liveness};
use sohd::config::model::DEFAULT_CHECK_MESSAGE;
use sohd::errors::SohdError;
use sohd::fs::FileSystem;
use sohd::fs::mock::MockFileSystem;
use sohd_test_utils::builders::ConfigFileBuilder;
use sohd_test_utils::recording_mailer::RecordingMailer;

type TestResult = Result<(), Box<dyn Error>>;

const PID_FILE: &str = "/srv/soh/sohd.pid";

fn alive(_pid: u32) -> bool {
    true
}

fn dead(_pid: u32) -> bool {
    false
}

fn draft() -> PathBuf {
    PathBuf::from("/tmp/sohd-check-test")
}

#[tokio::test]
async fn live_pid_reports_running_without_mail() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(PID_FILE, "1234\n");
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let (mut mailer, sent) = RecordingMailer::new(shared);
    let cfg = ConfigFileBuilder::new("/srv/soh").build();

    let liveness = check_liveness(&cfg, &fs, &mut mailer, alive, draft()).await?;

    assert_eq!(liveness, Liveness::Running(1234));
    assert!(sent.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn missing_pid_file_mails_the_check_message() -> TestResult {
    let fs = MockFileSystem::new();
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let (mut mailer, sent) = RecordingMailer::new(shared);
    let cfg = ConfigFileBuilder::new("/srv/soh").build();

    let liveness = check_liveness(&cfg, &fs, &mut mailer, alive, draft()).await?;

    assert_eq!(liveness, Liveness::NotRunning);
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].mail.subject, "EPHEM Daemon Process Problem");
    assert_eq!(sent[0].mail.recipient, "ops@example.com");
    assert_eq!(sent[0].body.as_deref(), Some(DEFAULT_CHECK_MESSAGE));
    assert!(!fs.exists(&draft()));
    Ok(())
}

#[tokio::test]
async fn stale_pid_counts_as_not_running() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(PID_FILE, "99999\n");
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let (mut mailer, sent) = RecordingMailer::new(shared);
    let cfg = ConfigFileBuilder::new("/srv/soh").build();

    let liveness = check_liveness(&cfg, &fs, &mut mailer, dead, draft()).await?;

    assert_eq!(liveness, Liveness::NotRunning);
    assert_eq!(sent.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn garbage_pid_file_counts_as_not_running() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(PID_FILE, "sohd\n");
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let (mut mailer, sent) = RecordingMailer::new(shared);
    let cfg = ConfigFileBuilder::new("/srv/soh").build();

    let liveness = check_liveness(&cfg, &fs, &mut mailer, alive, draft()).await?;

    assert_eq!(liveness, Liveness::NotRunning);
    assert_eq!(sent.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn check_without_pid_file_is_a_config_error() {
    let fs = MockFileSystem::new();
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    let (mut mailer, sent) = RecordingMailer::new(shared);
    let cfg = ConfigFileBuilder::new("/srv/soh").pid_file(None).build();

    let result = check_liveness(&cfg, &fs, &mut mailer, alive, draft()).await;

    assert!(matches!(result, Err(SohdError::ConfigError(_))));
    assert!(sent.lock().unwrap().is_empty());
}
