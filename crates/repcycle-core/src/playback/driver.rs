//! Async driver feeding wall-clock ticks into a [`PlaybackEngine`].

use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::engine::PlaybackEngine;
use super::session::Session;
use crate::error::PlaybackError;
use crate::events::Event;
use crate::storage::{PlaybackConfig, SessionStore};

/// Why [`TickDriver::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveOutcome {
    /// The session was stopped or finished, here or elsewhere.
    Stopped,
    /// No actionable block remains; the user should finish.
    Exhausted,
    /// The countdown is not running (a set is active or the rest is paused).
    AwaitingUser,
    /// The shutdown signal fired.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDriver {
    period: Duration,
}

impl TickDriver {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(Duration::from_millis(config.tick_interval_ms.max(1)))
    }

    /// Tick the engine once per period while its rest countdown runs.
    ///
    /// Returns as soon as the countdown needs the user, the session goes
    /// away (the store's change feed is watched), or `shutdown` becomes `true`.
    pub async fn run<S, F>(
        &self,
        engine: &mut PlaybackEngine<S>,
        mut shutdown: watch::Receiver<bool>,
        mut on_event: F,
    ) -> Result<DriveOutcome, PlaybackError>
    where
        S: SessionStore,
        F: FnMut(&Event),
    {
        if let Some(outcome) = settled(engine.refresh()?) {
            return Ok(outcome);
        }

        let mut feed = engine.subscribe();
        let mut feed_open = true;
        let mut shutdown_open = true;
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed(), if shutdown_open => {
                    match changed {
                        Ok(()) if *shutdown.borrow_and_update() => {
                            tracing::debug!("tick driver cancelled");
                            return Ok(DriveOutcome::Cancelled);
                        }
                        Ok(()) => {}
                        Err(_) => shutdown_open = false,
                    }
                }
                changed = feed.changed(), if feed_open => {
                    if changed.is_err() {
                        feed_open = false;
                        continue;
                    }
                    let document = feed.borrow_and_update().clone();
                    engine.apply_remote(document);
                    if engine.snapshot().is_none() {
                        return Ok(DriveOutcome::Stopped);
                    }
                }
                _ = interval.tick() => {
                    for event in engine.tick()? {
                        on_event(&event);
                    }
                    if let Some(outcome) = settled(engine.snapshot()) {
                        return Ok(outcome);
                    }
                }
            }
        }
    }
}

fn settled(session: Option<&Session>) -> Option<DriveOutcome> {
    match session {
        None => Some(DriveOutcome::Stopped),
        Some(s) if s.is_exhausted() => Some(DriveOutcome::Exhausted),
        Some(s) if !s.timer.running => Some(DriveOutcome::AwaitingUser),
        Some(_) => None,
    }
}
