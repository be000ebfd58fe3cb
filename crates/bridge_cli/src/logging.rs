//! Tracing setup: terminal output plus a daily rolling log file.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE: &str = "bridge.log";

fn terminal_filter(debug: bool) -> EnvFilter {
    // RUST_LOG wins when set
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new(
                "bridge_core=debug,bridge_server=debug,bridge_discord=debug,bridge=debug,tower_http=debug,serenity=warn,info",
            )
        } else {
            EnvFilter::new(
                "bridge_core=info,bridge_server=info,bridge_discord=info,bridge=info,serenity=warn,warn",
            )
        }
    })
}

pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clean-bridge")
        .join("logs")
}

/// Install the global subscriber. Keep the returned guard alive for the
/// life of the process or buffered file output is lost.
pub fn init_tracing(debug: bool) -> WorkerGuard {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let terminal_layer = if debug {
        fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .pretty()
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .compact()
            .boxed()
    };

    let file_env_filter = EnvFilter::new(
        "bridge_core=debug,bridge_server=debug,bridge_discord=debug,bridge=debug,tower_http=debug,info",
    );

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(terminal_layer.with_filter(terminal_filter(debug)))
        .with(file_layer.with_filter(file_env_filter))
        .init();

    tracing::debug!(path = ?log_dir.join(LOG_FILE), "logging initialized");
    guard
}
