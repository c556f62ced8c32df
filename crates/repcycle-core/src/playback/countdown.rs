//! Rest countdown and elapsed-time display clock.
//!
//! The countdown has no thread or interval of its own. A caller feeds it one
//! discrete tick per second; at zero the tick advances the session. This is
//! the only automatic transition in playback.

use chrono::{DateTime, Utc};

use super::machine::{self, Transition};
use super::session::{RestTimer, Session};
use crate::error::PlaybackError;

/// View of the countdown, derived only from the persisted timer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub seconds_left: u32,
    pub running: bool,
}

impl Countdown {
    pub fn from_timer(timer: &RestTimer) -> Self {
        Self {
            seconds_left: timer.seconds_left,
            running: timer.running,
        }
    }

    /// Whether a tick would change anything.
    pub fn is_ticking(&self) -> bool {
        self.running
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running; nothing changed.
    Idle,
    /// One second elapsed.
    Ticked { seconds_left: u32 },
    /// The rest ran out and the session advanced.
    Expired(Transition),
}

/// Apply one second to the session's rest timer.
pub fn tick(session: &mut Session) -> Result<TickOutcome, PlaybackError> {
    if !Countdown::from_timer(&session.timer).is_ticking() {
        return Ok(TickOutcome::Idle);
    }

    session.timer.seconds_left = session.timer.seconds_left.saturating_sub(1);
    if session.timer.seconds_left > 0 {
        return Ok(TickOutcome::Ticked {
            seconds_left: session.timer.seconds_left,
        });
    }

    session.timer.running = false;
    machine::advance(session).map(TickOutcome::Expired)
}

/// Seconds since the session started. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedClock {
    started_at: DateTime<Utc>,
}

impl ElapsedClock {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self { started_at }
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        (now - self.started_at).num_seconds().max(0) as u64
    }

    pub fn display(&self, now: DateTime<Utc>) -> String {
        format_elapsed(self.elapsed_secs(now))
    }
}

/// `HH:MM:SS`.
pub fn format_elapsed(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserId;
    use crate::plan::{PlannedSet, Template, TemplateBlock};
    use crate::playback::block::{BlockStatus, PlaybackBlock};
    use crate::playback::flatten::flatten;
    use chrono::Duration;

    fn rest_then_set(rest: u32) -> Session {
        let mut tpl = Template::new("Tick").unwrap();
        tpl.blocks = vec![
            TemplateBlock::Rest { duration: rest },
            TemplateBlock::PlannedSet(PlannedSet::new("Dip", 1, 10, 0.0, 0).unwrap()),
        ];
        let flat = flatten(&tpl, &()).unwrap();
        Session::new(UserId::new("u").unwrap(), "Tick", flat, Utc::now())
    }

    #[test]
    fn ticks_down_then_expires_into_next_block() {
        let mut s = rest_then_set(3);
        assert_eq!(tick(&mut s).unwrap(), TickOutcome::Ticked { seconds_left: 2 });
        assert_eq!(tick(&mut s).unwrap(), TickOutcome::Ticked { seconds_left: 1 });

        let outcome = tick(&mut s).unwrap();
        assert!(matches!(
            outcome,
            TickOutcome::Expired(Transition::Advanced {
                completed: 0,
                actual_duration: Some(3),
                next: Some(1),
                ..
            })
        ));
        assert_eq!(s.active_index(), Some(1));
        assert!(!s.timer.running);
    }

    #[test]
    fn paused_timer_does_not_tick() {
        let mut s = rest_then_set(30);
        machine::pause(&mut s);
        assert_eq!(tick(&mut s).unwrap(), TickOutcome::Idle);
        assert_eq!(s.timer.seconds_left, 30);
    }

    #[test]
    fn tick_resumes_from_persisted_value() {
        let mut s = rest_then_set(30);
        s.timer.seconds_left = 12;
        let mut reloaded: Session =
            serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
        assert_eq!(
            tick(&mut reloaded).unwrap(),
            TickOutcome::Ticked { seconds_left: 11 }
        );
    }

    #[test]
    fn skip_after_partial_countdown_records_difference() {
        let mut s = rest_then_set(30);
        for _ in 0..20 {
            tick(&mut s).unwrap();
        }
        assert_eq!(s.timer.seconds_left, 10);
        machine::skip_rest(&mut s).unwrap();
        match &s.blocks[0] {
            PlaybackBlock::Rest {
                actual_duration,
                status,
                ..
            } => {
                assert_eq!(*actual_duration, Some(20));
                assert_eq!(*status, BlockStatus::Completed);
            }
            other => panic!("expected rest, got {other:?}"),
        }
    }

    #[test]
    fn elapsed_clock_formats_hours() {
        let start = Utc::now();
        let clock = ElapsedClock::new(start);
        let later = start + Duration::seconds(3_725);
        assert_eq!(clock.elapsed_secs(later), 3_725);
        assert_eq!(clock.display(later), "01:02:05");
        assert_eq!(clock.elapsed_secs(start - Duration::seconds(5)), 0);
    }
}
