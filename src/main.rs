//! factlens binary entrypoint kept minimal. The session runtime lives in `app`.

use std::fmt;
use std::sync::OnceLock;

use clap::Parser;

use factlens::{app, args, config};

struct FactlensTimer;

impl tracing_subscriber::fmt::time::FormatTime for FactlensTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let ts = chrono::Local::now().format("%Y-%m-%d-T %H:%M:%S").to_string(); // "YYYY-MM-DD-T HH:MM:SS"
        w.write_str(&ts)
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// What: Initialize tracing to `<config_dir>/logs/factlens.log`, or stderr when that fails.
///
/// Inputs:
/// - `level`: Default filter when `RUST_LOG` is unset
fn init_logging(level: &str) {
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
    };
    let mut log_path = config::logs_dir();
    log_path.push("factlens.log");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(FactlensTimer)
                .init();
            let _ = LOG_GUARD.set(guard);
            tracing::info!(path = %log_path.display(), "logging initialized");
        }
        Err(e) => {
            // Fallback: init stderr logger to avoid blocking startup
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .with_timer(FactlensTimer)
                .init();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

#[tokio::main]
async fn main() {
    let args = args::Args::parse();
    init_logging(&args::determine_log_level(&args));

    let settings = config::load_settings(&config::settings_path());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "factlens starting");

    if let Some(code) = args::process_args(&args, &settings).await {
        std::process::exit(code);
    }

    let code = match app::run(&args, &settings).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = ?err, "Application error");
            eprintln!("factlens: {err}");
            1
        }
    };
    tracing::info!(code, "factlens exited");
    if code != 0 {
        std::process::exit(code);
    }
}
