// Config lookup order, observed through `sohd --dry-run` so the environment
// of the test process itself is never touched.
#![cfg(unix)]

mod common;
use crate::common::sohd_command;

use std::error::Error;
use std::fs;
use std::path::Path;

use sohd::config::model::DEFAULT_SCRIPT_PATH;

type TestResult = Result<(), Box<dyn Error>>;

fn config_naming(path: &Path, script: &str) -> Result<(), std::io::Error> {
    fs::write(path, format!("[script]\npath = \"{script}\"\n"))
}

fn dry_run_in(cwd: &Path, env_config: Option<&Path>) -> Result<String, Box<dyn Error>> {
    let mut cmd = sohd_command();
    cmd.arg("--dry-run").current_dir(cwd);
    if let Some(path) = env_config {
        cmd.env("SOHD_CONFIG", path);
    }

    let output = cmd.output()?;
    assert!(output.status.success(), "{output:?}");
    Ok(String::from_utf8(output.stdout)?)
}

#[test]
fn sohd_toml_in_cwd_is_picked_up() -> TestResult {
    let dir = tempfile::tempdir()?;
    config_naming(&dir.path().join("Sohd.toml"), "/opt/from-cwd.sh")?;

    let printed = dry_run_in(dir.path(), None)?;

    assert!(printed.contains("/opt/from-cwd.sh"), "{printed}");
    Ok(())
}

#[test]
fn env_var_wins_over_sohd_toml() -> TestResult {
    let dir = tempfile::tempdir()?;
    config_naming(&dir.path().join("Sohd.toml"), "/opt/from-cwd.sh")?;
    let env_config = dir.path().join("elsewhere.toml");
    config_naming(&env_config, "/opt/from-env.sh")?;

    let printed = dry_run_in(dir.path(), Some(&env_config))?;

    assert!(printed.contains("/opt/from-env.sh"), "{printed}");
    assert!(!printed.contains("/opt/from-cwd.sh"), "{printed}");
    Ok(())
}

#[test]
fn explicit_flag_wins_over_env_var() -> TestResult {
    let dir = tempfile::tempdir()?;
    let env_config = dir.path().join("env.toml");
    config_naming(&env_config, "/opt/from-env.sh")?;
    let flag_config = dir.path().join("flag.toml");
    config_naming(&flag_config, "/opt/from-flag.sh")?;

    let output = sohd_command()
        .arg("--dry-run")
        .arg("--config")
        .arg(&flag_config)
        .env("SOHD_CONFIG", &env_config)
        .current_dir(dir.path())
        .output()?;

    assert!(output.status.success(), "{output:?}");
    let printed = String::from_utf8(output.stdout)?;
    assert!(printed.contains("/opt/from-flag.sh"), "{printed}");
    Ok(())
}

#[test]
fn defaults_apply_when_nothing_is_found() -> TestResult {
    let dir = tempfile::tempdir()?;

    let printed = dry_run_in(dir.path(), None)?;

    assert!(printed.contains(DEFAULT_SCRIPT_PATH), "{printed}");
    Ok(())
}

#[test]
fn env_var_pointing_nowhere_is_an_error() -> TestResult {
    let dir = tempfile::tempdir()?;

    let output = sohd_command()
        .arg("--dry-run")
        .env("SOHD_CONFIG", dir.path().join("missing.toml"))
        .current_dir(dir.path())
        .output()?;

    assert_eq!(output.status.code(), Some(1), "{output:?}");
    Ok(())
}
