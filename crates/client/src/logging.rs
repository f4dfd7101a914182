use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use botshell_core::config::ShellConfig;
use botshell_core::sink::{ConsoleLayer, SinkHandle};

/// Keeps the file writer alive; dropping it flushes pending records.
pub struct LoggingGuard {
    pub sink: SinkHandle,
    _file: WorkerGuard,
}

/// Install the global subscriber: a rolling file plus the detachable console layer.
///
/// The console layer does nothing until the shell attaches a sink to the
/// returned handle.
pub fn init(config: &ShellConfig) -> Result<LoggingGuard> {
    let dir = config.log_directory();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix("botshell")
        .filename_suffix("log")
        .max_log_files(config.logging.max_files.max(1))
        .build(&dir)
        .context("creating rolling log file")?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("invalid log filter")?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter);
    let (console_layer, sink) = ConsoleLayer::new();

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(LoggingGuard {
        sink,
        _file: guard,
    })
}
