// src/main.rs

use sohd::daemon::{self, DetachMode};
use sohd::{cli, config, logging};

fn main() {
    if let Err(err) = run_main() {
        eprintln!("sohd error: {err:?}");
        std::process::exit(1);
    }
}

fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level, args.log_file.as_deref())?;
    let cfg = config::resolve_config(args.config.as_deref())?;

    if args.dry_run {
        sohd::print_dry_run(&cfg);
        return Ok(());
    }

    if args.check {
        let liveness = build_runtime()?.block_on(sohd::run_check(&cfg))?;
        println!("sohd {liveness}");
        return Ok(());
    }

    let mode = if args.foreground {
        DetachMode::Foreground
    } else {
        DetachMode::Background
    };

    // Must happen before the runtime exists: forking a threaded process is unsafe.
    daemon::detach(&cfg.daemon, mode)?;

    let max_iterations = args.once.then_some(1);
    let reason = build_runtime()?.block_on(sohd::run(&cfg, max_iterations))?;
    tracing::info!(%reason, "sohd exiting");

    Ok(())
}

/// Single-threaded: the loop is strictly sequential and there is nothing to
/// run in parallel.
fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
