use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::playback::{BlockKind, ElapsedClock, Session, Transition};

/// Every committed change to a session produces one or more Events.
/// The CLI prints them; observers may log or render them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        template_name: String,
        total_blocks: usize,
        active_index: Option<usize>,
        at: DateTime<Utc>,
    },
    BlockCompleted {
        index: usize,
        kind: BlockKind,
        actual_duration: Option<u32>,
        at: DateTime<Utc>,
    },
    /// A rest was ended early by the user.
    RestSkipped {
        index: usize,
        actual_duration: Option<u32>,
        at: DateTime<Utc>,
    },
    /// A rest ran out on its own.
    RestExpired {
        index: usize,
        at: DateTime<Utc>,
    },
    BlockActivated {
        index: usize,
        kind: BlockKind,
        label: String,
        at: DateTime<Utc>,
    },
    /// No actionable block remains; the user should finish the session.
    SessionExhausted {
        at: DateTime<Utc>,
    },
    TimerTicked {
        seconds_left: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        seconds_left: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        seconds_left: u32,
        at: DateTime<Utc>,
    },
    SessionStopped {
        at: DateTime<Utc>,
    },
    SessionFinished {
        history_id: Option<String>,
        completed_blocks: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        template_name: String,
        active_index: Option<usize>,
        active_label: Option<String>,
        seconds_left: u32,
        initial_rest_duration: u32,
        timer_running: bool,
        completed: usize,
        total: usize,
        elapsed: String,
        at: DateTime<Utc>,
    },
}

/// How an advance was triggered; only changes the first event emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cause {
    User,
    Skip,
    Expiry,
}

impl Event {
    /// Events describing `transition`, which has already been applied to `session`.
    pub(crate) fn from_transition(
        transition: &Transition,
        session: &Session,
        cause: Cause,
        at: DateTime<Utc>,
    ) -> Vec<Event> {
        match *transition {
            Transition::Advanced {
                completed,
                kind,
                actual_duration,
                next,
            } => {
                let first = match cause {
                    Cause::User => Event::BlockCompleted {
                        index: completed,
                        kind,
                        actual_duration,
                        at,
                    },
                    Cause::Skip => Event::RestSkipped {
                        index: completed,
                        actual_duration,
                        at,
                    },
                    Cause::Expiry => Event::RestExpired {
                        index: completed,
                        at,
                    },
                };
                let second = match next.and_then(|i| session.blocks.get(i).map(|b| (i, b))) {
                    Some((index, block)) => Event::BlockActivated {
                        index,
                        kind: block.kind(),
                        label: block.label(),
                        at,
                    },
                    None => Event::SessionExhausted { at },
                };
                vec![first, second]
            }
            Transition::Paused { seconds_left } => vec![Event::TimerPaused { seconds_left, at }],
            Transition::Resumed { seconds_left } => vec![Event::TimerResumed { seconds_left, at }],
            Transition::Unchanged => Vec::new(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(session: &Session, at: DateTime<Utc>) -> Event {
        let progress = session.progress();
        Event::StateSnapshot {
            template_name: session.template_name.clone(),
            active_index: session.active_index(),
            active_label: session.active_block().map(|b| b.label()),
            seconds_left: session.timer.seconds_left,
            initial_rest_duration: session.timer.initial_rest_duration,
            timer_running: session.timer.running,
            completed: progress.completed,
            total: progress.total,
            elapsed: ElapsedClock::new(session.started_at).display(at),
            at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserId;
    use crate::plan::{PlannedSet, Template, TemplateBlock};
    use crate::playback::{flatten, machine};

    fn session() -> Session {
        let mut tpl = Template::new("Events").unwrap();
        tpl.blocks = vec![TemplateBlock::PlannedSet(
            PlannedSet::new("Squat", 2, 5, 100.0, 90).unwrap(),
        )];
        let flat = flatten(&tpl, &()).unwrap();
        Session::new(UserId::new("u").unwrap(), "Events", flat, Utc::now())
    }

    #[test]
    fn advance_yields_completed_then_activated() {
        let mut s = session();
        let t = machine::advance(&mut s).unwrap();
        let at = Utc::now();
        let events = Event::from_transition(&t, &s, Cause::User, at);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::BlockCompleted { index: 0, .. }));
        match &events[1] {
            Event::BlockActivated { index, kind, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(*kind, BlockKind::Rest);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unchanged_yields_nothing() {
        let s = session();
        assert!(Event::from_transition(&Transition::Unchanged, &s, Cause::User, Utc::now()).is_empty());
    }

    #[test]
    fn snapshot_reports_progress() {
        let s = session();
        match Event::snapshot(&s, s.started_at) {
            Event::StateSnapshot {
                active_index,
                completed,
                total,
                elapsed,
                ..
            } => {
                assert_eq!(active_index, Some(0));
                assert_eq!(completed, 0);
                assert_eq!(total, 3);
                assert_eq!(elapsed, "00:00:00");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Event::SessionStopped { at: Utc::now() }).unwrap();
        assert_eq!(json["type"], "SessionStopped");
    }
}
