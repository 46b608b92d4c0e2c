//! Fixed-period refresh scheduling
//!
//! A [`Scheduler`] holds the refresh interval. Each streaming session takes a
//! [`Ticker`] from it; changing the interval through any scheduler handle
//! restarts every ticker's phase, so the next tick comes one new interval
//! after the change, even when the ticker only notices the change later.
//!
//! Ticks are aligned to the ticker's start. A consumer that falls behind
//! finds at most one tick waiting; the missed ones are skipped.

use std::sync::Arc;
use std::time::Duration;

use netwatch_core::prelude::*;
use tokio::sync::watch;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Default refresh interval
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest interval accepted; shorter requests are clamped to it.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Longest interval accepted; longer requests are clamped to it.
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// An interval and the moment it was set
#[derive(Debug, Clone, Copy)]
struct Cadence {
    period: Duration,
    since: Instant,
}

impl Cadence {
    fn starting_now(period: Duration) -> Self {
        Self {
            period: clamp_interval(period),
            since: Instant::now(),
        }
    }
}

/// Shared refresh interval setting
#[derive(Debug, Clone)]
pub struct Scheduler {
    cadence: Arc<watch::Sender<Cadence>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        let (tx, _) = watch::channel(Cadence::starting_now(interval));
        Self {
            cadence: Arc::new(tx),
        }
    }

    /// Current refresh interval
    pub fn interval(&self) -> Duration {
        self.cadence.borrow().period
    }

    /// Change the interval; running tickers tick one new interval from now.
    ///
    /// Intervals outside [`MIN_REFRESH_INTERVAL`]..=[`MAX_REFRESH_INTERVAL`]
    /// are clamped.
    pub fn every(&self, interval: Duration) {
        let cadence = Cadence::starting_now(interval);
        self.cadence.send_replace(cadence);
        debug!("Refresh interval set to {:?}", cadence.period);
    }

    /// Start a tick source, first tick one interval from now
    pub fn ticker(&self) -> Ticker {
        let mut config = self.cadence.subscribe();
        let period = config.borrow_and_update().period;
        Ticker {
            timer: fixed_interval(Instant::now(), period),
            period,
            config,
            config_closed: false,
            ticks: 0,
        }
    }
}

fn clamp_interval(interval: Duration) -> Duration {
    let clamped = interval.clamp(MIN_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL);
    if clamped != interval {
        warn!(
            "Refresh interval {:?} out of range, using {:?}",
            interval, clamped
        );
    }
    clamped
}

/// Timer whose first tick is one `period` after `since`
fn fixed_interval(since: Instant, period: Duration) -> Interval {
    let mut timer = time::interval_at(since + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

/// Single-consumer tick source for one streaming session
#[derive(Debug)]
pub struct Ticker {
    timer: Interval,
    period: Duration,
    config: watch::Receiver<Cadence>,
    config_closed: bool,
    ticks: u64,
}

impl Ticker {
    /// Wait for the next tick. Cancel safe.
    ///
    /// A pending interval change always wins over a tick of the old timer.
    pub async fn tick(&mut self) {
        loop {
            tokio::select! {
                biased;

                changed = self.config.changed(), if !self.config_closed => match changed {
                    Ok(()) => {
                        let cadence = *self.config.borrow_and_update();
                        self.restart(cadence);
                    }
                    // Scheduler gone: keep the last interval
                    Err(_) => self.config_closed = true,
                },
                _ = self.timer.tick() => break,
            }
        }
        self.ticks += 1;
    }

    /// Interval currently in effect
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks delivered so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn restart(&mut self, cadence: Cadence) {
        trace!("Ticker phase reset, period {:?}", cadence.period);
        self.period = cadence.period;
        self.timer = fixed_interval(cadence.since, cadence.period);
    }
}
