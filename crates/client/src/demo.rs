use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::bot::{Bot, BotContext};

/// Sample bot: prints a heartbeat on stdout until told to stop.
pub struct TickerBot {
    interval: Duration,
    /// Stop after this many ticks; `None` runs until shutdown.
    ticks: Option<u64>,
    /// Fail with an error on this tick.
    fail_after: Option<u64>,
    /// Every n-th tick also logs a warning.
    warn_every: u64,
}

impl TickerBot {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ticks: None,
            fail_after: None,
            warn_every: 5,
        }
    }

    #[must_use]
    pub fn with_ticks(mut self, ticks: Option<u64>) -> Self {
        self.ticks = ticks;
        self
    }

    #[must_use]
    pub fn with_fail_after(mut self, tick: Option<u64>) -> Self {
        self.fail_after = tick;
        self
    }
}

#[async_trait]
impl Bot for TickerBot {
    fn name(&self) -> &str {
        "Ticker"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    async fn start(&mut self, mut ctx: BotContext) -> anyhow::Result<()> {
        info!(interval_ms = self.interval.as_millis() as u64, "Ticker starting");
        writeln!(ctx.stdout, "{} online", self.name())?;

        let mut tick = 0u64;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = ctx.shutdown.changed() => {
                    if changed.is_err() || *ctx.shutdown.borrow() {
                        debug!("Ticker saw shutdown");
                        return Ok(());
                    }
                }
            }

            tick += 1;
            writeln!(ctx.stdout, "tick {}", tick)?;
            ctx.ui.set_status_text(format!("Bot running... tick {}", tick));

            if self.warn_every > 0 && tick % self.warn_every == 0 {
                warn!(tick, "Ticker is still going");
            }
            if self.fail_after == Some(tick) {
                writeln!(ctx.stderr, "ticker giving up at {}", tick)?;
                anyhow::bail!("ticker failed on tick {}", tick);
            }
            if self.ticks == Some(tick) {
                info!(tick, "Ticker done");
                ctx.ui
                    .show_info(self.name(), format!("Finished after {} ticks.", tick));
                return Ok(());
            }
        }
    }
}
