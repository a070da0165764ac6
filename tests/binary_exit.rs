// Runs the built `sohd` binary: detaching, exit codes and the pid file.
#![cfg(unix)]

mod common;
use crate::common::{serial, sohd_command, write_config, write_script};

use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::Stdio;
use std::thread::sleep;
use std::time::{Duration, Instant};

type TestResult = Result<(), Box<dyn Error>>;

/// Poll until `done` holds or five seconds pass.
fn eventually(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        sleep(Duration::from_millis(20));
    }
    done()
}

#[test]
fn foreground_once_runs_the_script_and_exits_zero() -> TestResult {
    let _guard = serial();
    let dir = tempfile::tempdir()?;
    let script = write_script(dir.path(), "health.sh", "echo OK\n");
    let config = write_config(dir.path(), dir.path(), &script);

    let output = sohd_command()
        .args(["--foreground", "--once", "--config"])
        .arg(&config)
        .output()?;

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert_eq!(fs::read_to_string(dir.path().join("status.log"))?, "OK\n");
    assert!(!dir.path().join("sohd.pid").exists());
    Ok(())
}

#[test]
fn missing_workdir_is_fatal_and_exits_one() -> TestResult {
    let _guard = serial();
    let dir = tempfile::tempdir()?;
    let script = write_script(dir.path(), "health.sh", "echo OK\n");
    let config = write_config(dir.path(), &dir.path().join("gone"), &script);

    let output = sohd_command()
        .args(["--foreground", "--once", "--config"])
        .arg(&config)
        .output()?;

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("chdir"), "{stderr}");
    assert!(!dir.path().join("gone").exists());
    Ok(())
}

#[test]
fn invalid_config_exits_one_before_detaching() -> TestResult {
    let _guard = serial();
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("sohd.toml");
    fs::write(&config, "[script]\ninterval = \"0s\"\n")?;

    let output = sohd_command().arg("--config").arg(&config).output()?;

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("interval"), "{stderr}");
    Ok(())
}

#[test]
fn background_parent_returns_and_grandchild_does_the_work() -> TestResult {
    let _guard = serial();
    let dir = tempfile::tempdir()?;
    let script = write_script(dir.path(), "health.sh", "echo OK\n");
    let config = write_config(dir.path(), dir.path(), &script);
    let status_log = dir.path().join("status.log");
    let pid_file = dir.path().join("sohd.pid");

    // The detached grandchild keeps inherited pipes open, so don't capture.
    let status = sohd_command()
        .args(["--once", "--config"])
        .arg(&config)
        .arg("--log-file")
        .arg(dir.path().join("sohd.log"))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    assert_eq!(status.code(), Some(0));
    assert!(
        eventually(|| fs::read_to_string(&status_log).is_ok_and(|s| s == "OK\n")),
        "status log never filled"
    );
    assert!(
        eventually(|| !Path::new(&pid_file).exists()),
        "pid file left behind"
    );
    Ok(())
}
