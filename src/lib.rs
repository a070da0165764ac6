// src/lib.rs

pub mod check;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod notify;
pub mod status;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::check::{check_liveness, Liveness};
use crate::config::ConfigFile;
use crate::daemon::{is_process_alive, remove_pid_file, write_pid_file};
use crate::engine::Supervisor;
use crate::exec::ProcessScriptBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::notify::CommandMailer;
use crate::types::StopReason;

/// High-level supervision entry point used by `main.rs`, after detaching.
///
/// This wires together:
/// - the pid file
/// - SIGTERM / Ctrl-C handling
/// - the real script backend and mail command
/// - the supervision loop
///
/// Always returns `Ok` once the loop stops, whatever the reason; the process
/// exit status does not distinguish a spawn failure from a clean stop.
pub async fn run(cfg: &ConfigFile, max_iterations: Option<u64>) -> Result<StopReason> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let pid_path = cfg.pid_file_path();
    if let Some(path) = &pid_path {
        match write_pid_file(fs.as_ref(), path, std::process::id()) {
            Ok(()) => debug!(pid_file = %path.display(), "pid file written"),
            Err(err) => warn!(pid_file = %path.display(), error = %err, "could not write pid file"),
        }
    }

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    spawn_shutdown_listener(shutdown_tx);

    let mailer = CommandMailer::new(cfg.notify.mail_command.clone(), Arc::clone(&fs));
    let supervisor = Supervisor::new(
        cfg,
        max_iterations,
        Arc::clone(&fs),
        ProcessScriptBackend::new(),
        mailer,
        shutdown_rx,
    );

    let reason = supervisor.run().await;

    if let Some(path) = &pid_path {
        if let Err(err) = remove_pid_file(fs.as_ref(), path) {
            debug!(pid_file = %path.display(), error = %err, "could not remove pid file");
        }
    }

    Ok(reason)
}

/// `--check` entry point: probe the pid file and mail the operator if no
/// supervisor is alive.
pub async fn run_check(cfg: &ConfigFile) -> Result<Liveness> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let mut mailer = CommandMailer::new(cfg.notify.mail_command.clone(), Arc::clone(&fs));
    let draft = std::env::temp_dir().join(format!("sohd-check-{}", std::process::id()));

    let liveness = check_liveness(cfg, fs.as_ref(), &mut mailer, is_process_alive, draft).await?;
    Ok(liveness)
}

/// Forward SIGTERM / Ctrl-C as a single shutdown message.
///
/// If a listener cannot be installed it is skipped; if none can, the sender
/// is dropped and the loop simply can't be asked to stop.
fn spawn_shutdown_listener(tx: mpsc::Sender<()>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut term) => {
                    term.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("received Ctrl+C"),
            _ = terminate => info!("received SIGTERM"),
        }

        let _ = tx.send(()).await;
    });
}

/// Dry-run output: print the effective configuration.
pub fn print_dry_run(cfg: &ConfigFile) {
    println!("sohd dry-run");
    println!("  daemon.workdir    = {}", cfg.daemon.workdir.display());
    println!("  daemon.umask      = {:#o}", cfg.daemon.umask);
    match cfg.pid_file_path() {
        Some(path) => println!("  daemon.pid_file   = {}", path.display()),
        None => println!("  daemon.pid_file   = (disabled)"),
    }
    println!();
    println!("  script.path       = {}", cfg.script.path.display());
    println!("  script.status_log = {}", cfg.script.status_log.display());
    println!("  script.interval   = {:?}", cfg.script.interval);
    println!();
    println!("  notify.draft      = {}", cfg.resolve(&cfg.notify.draft).display());
    println!("  notify.recipient  = {}", cfg.notify.recipient);
    println!("  notify.subject    = {}", cfg.notify.subject);
    println!("  notify.command    = {}", cfg.notify.mail_command);
    println!("  check.subject     = {}", cfg.check.subject);

    debug!("dry-run complete (no execution)");
}
