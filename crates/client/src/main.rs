mod app;
mod bot;
mod demo;
mod dialog;
mod event;
mod logging;
mod status;
mod theme;
mod tui;
mod view;
mod widgets;
mod window;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use botshell_core::config::ShellConfig;
use botshell_core::severity::Severity;
use botshell_core::streams::StdStreams;

use app::AppInit;
use bot::ShutdownHandle;
use demo::TickerBot;
use window::TerminalWindow;

#[derive(Parser)]
#[command(name = "botshell", about = "Terminal console shell for a long-running bot")]
struct Cli {
    #[arg(long, help = "Path to config file (default: ~/.config/botshell/config.toml)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Window poll interval in milliseconds")]
    poll_interval: Option<u64>,

    #[arg(long, help = "Lines kept by the console (log and output)")]
    capacity: Option<usize>,

    #[arg(long, help = "Lowest log severity shown in the console (debug, info, warning, error, critical)")]
    min_severity: Option<Severity>,

    #[arg(long, default_value = "1000", help = "Demo bot tick interval in milliseconds")]
    tick_ms: u64,

    #[arg(long, help = "Stop the demo bot after this many ticks")]
    ticks: Option<u64>,

    #[arg(long, help = "Make the demo bot fail on this tick")]
    fail_after: Option<u64>,
}

fn apply_overrides(config: &mut ShellConfig, cli: &Cli) {
    if let Some(ms) = cli.poll_interval {
        config.shell.poll_interval_ms = ms;
    }
    if let Some(capacity) = cli.capacity {
        config.console.log_capacity = capacity;
        config.console.stream_capacity = capacity;
    }
    if let Some(severity) = cli.min_severity {
        config.console.min_severity = severity;
    }
}

fn open_mirror(config: &ShellConfig) -> Result<Box<dyn Write + Send>> {
    let Some(path) = &config.console.mirror_file else {
        return Ok(Box::new(io::sink()));
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening mirror file {}", path.display()))?;
    Ok(Box::new(file))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // --config flag > default platform path
    let (mut config, source) = botshell_core::config::load(cli.config.as_deref());
    apply_overrides(&mut config, &cli);

    let logging = logging::init(&config)?;
    source.log();
    info!("Log directory: {}", config.log_directory().display());

    let mirror = open_mirror(&config)?;
    let window = TerminalWindow::open(&config.window.title).context("opening terminal")?;

    let shutdown = ShutdownHandle::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received");
            on_signal.trigger();
        }
    });

    let bot = TickerBot::new(Duration::from_millis(cli.tick_ms.max(1)))
        .with_ticks(cli.ticks)
        .with_fail_after(cli.fail_after);

    app::run_app_with_bot(
        Box::new(bot),
        AppInit {
            config,
            window,
            sink: logging.sink.clone(),
            streams: StdStreams::process(),
            mirror,
            shutdown,
        },
    )
    .await?;

    let failures = logging.sink.failures();
    if failures > 0 {
        warn!(failures, "Console refused some log records");
    }
    info!("Goodbye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "botshell",
            "--poll-interval",
            "25",
            "--capacity",
            "7",
            "--min-severity",
            "Error",
        ]);
        let mut config = ShellConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.shell.poll_interval_ms, 25);
        assert_eq!(config.console.log_capacity, 7);
        assert_eq!(config.console.stream_capacity, 7);
        assert_eq!(config.console.min_severity, Severity::Error);
        assert_eq!(cli.tick_ms, 1000);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["botshell"]);
        let mut config = ShellConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.shell.poll_interval_ms, 10);
        assert_eq!(config.console.log_capacity, 50);
        assert!(cli.ticks.is_none());
    }

    #[test]
    fn test_unknown_severity_is_rejected() {
        assert!(Cli::try_parse_from(["botshell", "--min-severity", "loud"]).is_err());
    }
}
