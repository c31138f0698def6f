//! Blocking wait for a rate limit reset.
//!
//! The countdown ticks once per second and draws its progress on stderr so
//! it never mixes with CSV written to stdout.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// Quota below which the exporter waits for the reset.
pub const RATE_LIMIT_RESET_THRESHOLD: u32 = 10;

const TICK: Duration = Duration::from_secs(1);

/// Whole seconds from `now` until `reset_at`, rounded to the nearest second.
/// Zero when the reset is already in the past.
pub fn seconds_until(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (reset_at - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    ((millis + 500) / 1000) as u64
}

/// Something that can block until a reset timestamp has passed.
#[async_trait]
pub trait Waiter: Send + Sync {
    async fn wait_until(&self, reset_at: DateTime<Utc>);
}

/// Sleeps second by second with an `indicatif` countdown.
#[derive(Debug, Clone, Default)]
pub struct CountdownWaiter {
    hidden: bool,
}

impl CountdownWaiter {
    /// Countdown drawn on stderr.
    pub fn new() -> Self {
        Self { hidden: false }
    }

    /// Countdown that draws nothing.
    pub fn hidden() -> Self {
        Self { hidden: true }
    }

    fn progress_bar(&self, seconds: u64) -> ProgressBar {
        if self.hidden {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::with_draw_target(Some(seconds), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template("{msg}: {bar:40} {pos}/{len}s [{elapsed}<{eta}]")
        {
            bar.set_style(style);
        }
        bar.set_message("Waiting for rate limit reset");
        bar
    }

    /// Sleep until `reset_at` and return the number of one-second ticks taken.
    pub async fn countdown(&self, reset_at: DateTime<Utc>) -> u64 {
        let seconds = seconds_until(reset_at, Utc::now());
        if seconds == 0 {
            return 0;
        }

        info!(%reset_at, seconds, "Waiting for rate limit reset");

        let bar = self.progress_bar(seconds);
        for _ in 0..seconds {
            sleep(TICK).await;
            bar.inc(1);
        }
        bar.finish_and_clear();

        seconds
    }
}

#[async_trait]
impl Waiter for CountdownWaiter {
    async fn wait_until(&self, reset_at: DateTime<Utc>) {
        self.countdown(reset_at).await;
    }
}
