//! Playback engine.
//!
//! The engine owns no authoritative state. Every mutating operation:
//!
//! ```text
//! load latest -> copy -> transition -> save(expected revision) -> cache
//! ```
//!
//! The cached snapshot is only for display and is replaced after the store
//! confirms a write. A failed write leaves the cache where it was.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::countdown::{self, TickOutcome};
use super::flatten::flatten;
use super::machine;
use super::session::{observe, Session};
use crate::error::{CoreError, PlaybackError};
use crate::events::{Cause, Event};
use crate::history::finalize;
use crate::identity::UserId;
use crate::plan::{PlannedSetLookup, Template};
use crate::storage::{HistoryStore, SessionStore};

/// Drives one user's session against a [`SessionStore`].
pub struct PlaybackEngine<S> {
    store: S,
    user: UserId,
    cached: Option<Session>,
    clock: fn() -> DateTime<Utc>,
}

impl<S: SessionStore> PlaybackEngine<S> {
    /// Create an engine for `user`. Call [`refresh`](Self::refresh) to load
    /// any session already in the store.
    pub fn new(store: S, user: UserId) -> Self {
        Self {
            store,
            user,
            cached: None,
            clock: Utc::now,
        }
    }

    /// Like [`new`](Self::new), failing when no identity is known.
    pub fn for_identity(store: S, user: Option<UserId>) -> Result<Self, CoreError> {
        user.map(|u| Self::new(store, u)).ok_or(CoreError::NoIdentity)
    }

    /// Replace the wall clock used for timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Last session seen by this engine. Display only.
    pub fn snapshot(&self) -> Option<&Session> {
        self.cached.as_ref()
    }

    /// Full state snapshot event, if a session is running.
    pub fn state(&self) -> Option<Event> {
        self.cached
            .as_ref()
            .map(|session| Event::snapshot(session, (self.clock)()))
    }

    /// Reload the cache from the store.
    pub fn refresh(&mut self) -> Result<Option<&Session>, PlaybackError> {
        self.cached = self.latest()?;
        Ok(self.cached.as_ref())
    }

    /// Change feed for this user's session document.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.store.subscribe(&self.user)
    }

    /// Adopt a document delivered by the change feed.
    pub fn apply_remote(&mut self, document: Option<Session>) {
        self.cached = observe(document).filter(|s| s.user_id == self.user);
    }

    fn latest(&self) -> Result<Option<Session>, PlaybackError> {
        Ok(observe(self.store.load_session(&self.user)?))
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Flatten `template` and persist a new running session.
    ///
    /// # Errors
    /// [`PlaybackError::SessionAlreadyActive`] if one is running,
    /// [`PlaybackError::EmptyTemplate`] if nothing is actionable.
    pub fn start<L>(&mut self, template: &Template, lookup: &L) -> Result<Vec<Event>, PlaybackError>
    where
        L: PlannedSetLookup + ?Sized,
    {
        let stored = self.store.load_session(&self.user)?;
        if let Some(running) = stored.as_ref().filter(|s| s.active) {
            tracing::warn!(user = %self.user, template = %running.template_name, "start rejected: session already active");
            self.cached = Some(running.clone());
            return Err(PlaybackError::SessionAlreadyActive);
        }
        // An inactive leftover is overwritten in place.
        let expected = stored.map(|s| s.revision);

        let flattened = flatten(template, lookup)?;
        let now = (self.clock)();
        let mut session = Session::new(self.user.clone(), template.name.clone(), flattened, now);
        session.revision = self.store.save_session(&session, expected)?;

        tracing::info!(
            user = %self.user,
            template = %session.template_name,
            blocks = session.blocks.len(),
            "session started"
        );
        let event = Event::SessionStarted {
            template_name: session.template_name.clone(),
            total_blocks: session.blocks.len(),
            active_index: session.active_index(),
            at: now,
        };
        self.cached = Some(session);
        Ok(vec![event])
    }

    /// Complete the active block, whatever it is.
    ///
    /// Without a running session or an active block this is a logged no-op.
    pub fn advance(&mut self) -> Result<Vec<Event>, PlaybackError> {
        let result = self.mutate("advance", |session, at| {
            let transition = machine::advance(session)?;
            Ok(Event::from_transition(&transition, session, Cause::User, at))
        });
        match result {
            Err(PlaybackError::NoActiveBlock) => Ok(Vec::new()),
            other => other,
        }
    }

    /// End the active rest early.
    pub fn skip(&mut self) -> Result<Vec<Event>, PlaybackError> {
        self.mutate("skip", |session, at| {
            let transition = machine::skip_rest(session)?;
            Ok(Event::from_transition(&transition, session, Cause::Skip, at))
        })
    }

    pub fn pause(&mut self) -> Result<Vec<Event>, PlaybackError> {
        self.mutate("pause", |session, at| {
            let transition = machine::pause(session);
            Ok(Event::from_transition(&transition, session, Cause::User, at))
        })
    }

    pub fn resume(&mut self) -> Result<Vec<Event>, PlaybackError> {
        self.mutate("resume", |session, at| {
            let transition = machine::resume(session);
            Ok(Event::from_transition(&transition, session, Cause::User, at))
        })
    }

    /// Confirm the active set.
    pub fn complete_active_non_rest(&mut self) -> Result<Vec<Event>, PlaybackError> {
        self.mutate("complete", |session, at| {
            let transition = machine::complete_active_non_rest(session)?;
            Ok(Event::from_transition(&transition, session, Cause::User, at))
        })
    }

    /// Confirm block `expected`, which the caller saw as active.
    pub fn complete_block(&mut self, expected: usize) -> Result<Vec<Event>, PlaybackError> {
        self.mutate("complete_block", |session, at| {
            let transition = machine::complete_block(session, expected)?;
            Ok(Event::from_transition(&transition, session, Cause::User, at))
        })
    }

    /// Feed one second into the rest countdown.
    pub fn tick(&mut self) -> Result<Vec<Event>, PlaybackError> {
        self.mutate("tick", |session, at| {
            Ok(match countdown::tick(session)? {
                TickOutcome::Idle => Vec::new(),
                TickOutcome::Ticked { seconds_left } => {
                    vec![Event::TimerTicked { seconds_left, at }]
                }
                TickOutcome::Expired(transition) => {
                    Event::from_transition(&transition, session, Cause::Expiry, at)
                }
            })
        })
    }

    /// Discard the session. Safe to call when nothing is running.
    pub fn stop(&mut self) -> Result<Vec<Event>, PlaybackError> {
        let existed = self.store.delete_session(&self.user)?;
        self.cached = None;
        if !existed {
            tracing::debug!(user = %self.user, "stop: no session");
            return Ok(Vec::new());
        }
        tracing::info!(user = %self.user, "session stopped");
        Ok(vec![Event::SessionStopped { at: (self.clock)() }])
    }

    /// Re-fetch, apply `op` to a copy, persist it, then cache it.
    ///
    /// `op` returns the events it caused; no events means nothing changed
    /// and nothing is written.
    fn mutate<F>(&mut self, name: &'static str, op: F) -> Result<Vec<Event>, PlaybackError>
    where
        F: FnOnce(&mut Session, DateTime<Utc>) -> Result<Vec<Event>, PlaybackError>,
    {
        let Some(latest) = self.latest()? else {
            tracing::warn!(user = %self.user, op = name, "no running session");
            self.cached = None;
            return Ok(Vec::new());
        };

        let mut next = latest.clone();
        let events = match op(&mut next, (self.clock)()) {
            Ok(events) => events,
            Err(e) => {
                if e.is_warning() {
                    tracing::warn!(user = %self.user, op = name, "{e}");
                }
                self.cached = Some(latest);
                return Err(e);
            }
        };
        if events.is_empty() {
            self.cached = Some(latest);
            return Ok(events);
        }

        next.revision = self.store.save_session(&next, Some(latest.revision))?;
        tracing::debug!(
            user = %self.user,
            op = name,
            revision = next.revision,
            active = ?next.active_index(),
            "transition committed"
        );
        self.cached = Some(next);
        Ok(events)
    }
}

impl<S: SessionStore + HistoryStore> PlaybackEngine<S> {
    /// Record the completed blocks in history and end the session.
    ///
    /// The history entry and the removal of the session commit together,
    /// guarded by the revision that was finalized. A session with nothing
    /// completed ends without a history entry.
    pub fn finish(&mut self) -> Result<Vec<Event>, PlaybackError> {
        let Some(latest) = self.latest()? else {
            tracing::warn!(user = %self.user, op = "finish", "no running session");
            self.cached = None;
            return Ok(Vec::new());
        };

        let at = (self.clock)();
        let entry = finalize(&latest, at);
        if let Err(e) = self
            .store
            .finish_session(&self.user, entry.as_ref(), latest.revision)
        {
            tracing::warn!(user = %self.user, op = "finish", "{e}");
            self.cached = Some(latest);
            return Err(e.into());
        }
        self.cached = None;
        tracing::info!(
            user = %self.user,
            template = %latest.template_name,
            recorded = entry.is_some(),
            "session finished"
        );

        Ok(vec![
            Event::SessionFinished {
                history_id: entry.map(|e| e.id),
                completed_blocks: latest.completed_count(),
                at,
            },
            Event::SessionStopped { at },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::history::{HistoryEntry, HistoryFilter};
    use crate::plan::{PlannedSet, TemplateBlock};
    use crate::playback::{BlockKind, BlockStatus, PlaybackBlock};
    use crate::storage::Database;
    use chrono::TimeZone;
    use std::cell::Cell;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap()
    }

    fn user() -> UserId {
        UserId::new("athlete").unwrap()
    }

    fn template(blocks: Vec<TemplateBlock>) -> Template {
        let mut tpl = Template::new("Test Day").unwrap();
        tpl.blocks = blocks;
        tpl
    }

    fn planned(sets: u32, rest: u32) -> TemplateBlock {
        TemplateBlock::PlannedSet(PlannedSet::new("Press", sets, 5, 40.0, rest).unwrap())
    }

    fn engine(db: &Database) -> PlaybackEngine<&Database> {
        PlaybackEngine::new(db, user()).with_clock(fixed_clock)
    }

    #[test]
    fn start_persists_and_caches() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        let events = e.start(&template(vec![planned(2, 30)]), &()).unwrap();

        assert!(matches!(
            events[0],
            Event::SessionStarted {
                total_blocks: 3,
                active_index: Some(0),
                ..
            }
        ));
        let stored = db.load_session(&user()).unwrap().unwrap();
        assert_eq!(e.snapshot(), Some(&stored));
        assert_eq!(stored.started_at, fixed_clock());
    }

    #[test]
    fn second_start_is_rejected() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(&template(vec![planned(1, 0)]), &()).unwrap();
        let err = e.start(&template(vec![planned(3, 0)]), &()).unwrap_err();
        assert!(matches!(err, PlaybackError::SessionAlreadyActive));
        assert!(err.is_warning());
        assert_eq!(e.snapshot().unwrap().blocks.len(), 1);
    }

    #[test]
    fn empty_template_does_not_start() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        let notes = template(vec![TemplateBlock::Note { text: "hi".into() }]);
        assert!(matches!(
            e.start(&notes, &()),
            Err(PlaybackError::EmptyTemplate)
        ));
        assert!(db.load_session(&user()).unwrap().is_none());
    }

    #[test]
    fn advance_walks_sets_and_rests() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(&template(vec![planned(2, 30)]), &()).unwrap();

        let events = e.advance().unwrap();
        assert!(matches!(
            events[1],
            Event::BlockActivated {
                index: 1,
                kind: BlockKind::Rest,
                ..
            }
        ));
        let s = e.snapshot().unwrap();
        assert!(s.timer.running);
        assert_eq!(s.timer.seconds_left, 30);
    }

    #[test]
    fn engine_uses_fresh_store_state_not_its_cache() {
        let db = Database::open_memory().unwrap();
        let mut first = engine(&db);
        let mut second = engine(&db);
        first.start(&template(vec![planned(3, 0)]), &()).unwrap();
        second.refresh().unwrap();

        first.advance().unwrap();
        // second's cache still shows block 0 active
        assert_eq!(second.snapshot().unwrap().active_index(), Some(0));
        second.advance().unwrap();

        let stored = db.load_session(&user()).unwrap().unwrap();
        assert_eq!(stored.active_index(), Some(2));
    }

    #[test]
    fn stale_completion_is_a_noop() {
        let db = Database::open_memory().unwrap();
        let mut a = engine(&db);
        let mut b = engine(&db);
        a.start(&template(vec![planned(3, 0)]), &()).unwrap();

        a.complete_block(0).unwrap();
        let err = b.complete_block(0).unwrap_err();
        assert!(matches!(
            err,
            PlaybackError::StaleBlock {
                expected: 0,
                actual: Some(1)
            }
        ));
        assert_eq!(
            db.load_session(&user()).unwrap().unwrap().active_index(),
            Some(1)
        );
        assert_eq!(b.snapshot().unwrap().active_index(), Some(1));
    }

    #[test]
    fn advance_without_session_or_active_block_is_noop() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        assert!(e.advance().unwrap().is_empty());

        e.start(&template(vec![planned(1, 0)]), &()).unwrap();
        e.advance().unwrap();
        let exhausted = db.load_session(&user()).unwrap().unwrap();
        assert!(exhausted.is_exhausted());

        assert!(e.advance().unwrap().is_empty());
        assert_eq!(db.load_session(&user()).unwrap().unwrap(), exhausted);
    }

    #[test]
    fn skip_after_ticks_records_rested_time() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(
            &template(vec![TemplateBlock::Rest { duration: 30 }, planned(1, 0)]),
            &(),
        )
        .unwrap();
        for _ in 0..20 {
            e.tick().unwrap();
        }
        assert_eq!(e.snapshot().unwrap().timer.seconds_left, 10);

        let events = e.skip().unwrap();
        assert!(matches!(
            events[0],
            Event::RestSkipped {
                index: 0,
                actual_duration: Some(20),
                ..
            }
        ));
        match &e.snapshot().unwrap().blocks[0] {
            PlaybackBlock::Rest {
                actual_duration, ..
            } => assert_eq!(*actual_duration, Some(20)),
            other => panic!("expected rest, got {other:?}"),
        }
    }

    #[test]
    fn rest_expires_on_last_tick() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(
            &template(vec![TemplateBlock::Rest { duration: 2 }, planned(1, 0)]),
            &(),
        )
        .unwrap();
        assert!(matches!(e.tick().unwrap()[0], Event::TimerTicked { seconds_left: 1, .. }));
        let events = e.tick().unwrap();
        assert!(matches!(events[0], Event::RestExpired { index: 0, .. }));
        assert!(matches!(events[1], Event::BlockActivated { index: 1, .. }));
        assert!(e.tick().unwrap().is_empty());
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(
            &template(vec![TemplateBlock::Rest { duration: 10 }, planned(1, 0)]),
            &(),
        )
        .unwrap();
        e.tick().unwrap();
        assert!(matches!(e.pause().unwrap()[0], Event::TimerPaused { seconds_left: 9, .. }));
        let revision = db.load_session(&user()).unwrap().unwrap().revision;

        assert!(e.tick().unwrap().is_empty());
        assert!(e.pause().unwrap().is_empty());
        assert_eq!(db.load_session(&user()).unwrap().unwrap().revision, revision);

        assert!(matches!(e.resume().unwrap()[0], Event::TimerResumed { seconds_left: 9, .. }));
        e.tick().unwrap();
        assert_eq!(e.snapshot().unwrap().timer.seconds_left, 8);
    }

    #[test]
    fn resume_without_rest_is_noop() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(&template(vec![planned(1, 0)]), &()).unwrap();
        assert!(e.resume().unwrap().is_empty());
    }

    #[test]
    fn skip_and_complete_guards() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(&template(vec![planned(2, 15)]), &()).unwrap();
        assert!(matches!(e.skip(), Err(PlaybackError::IllegalSkip)));
        e.complete_active_non_rest().unwrap();
        assert!(matches!(
            e.complete_active_non_rest(),
            Err(PlaybackError::IllegalComplete)
        ));
    }

    #[test]
    fn stop_is_idempotent() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(&template(vec![planned(1, 0)]), &()).unwrap();
        assert_eq!(e.stop().unwrap().len(), 1);
        assert!(e.stop().unwrap().is_empty());
        assert!(e.snapshot().is_none());
        assert!(db.load_session(&user()).unwrap().is_none());
    }

    #[test]
    fn finish_records_history_and_stops() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(&template(vec![planned(2, 30)]), &()).unwrap();
        e.advance().unwrap();
        e.skip().unwrap();

        let events = e.finish().unwrap();
        let id = match &events[0] {
            Event::SessionFinished {
                history_id: Some(id),
                completed_blocks: 2,
                ..
            } => id.clone(),
            other => panic!("unexpected {other:?}"),
        };
        assert!(matches!(events[1], Event::SessionStopped { .. }));
        assert!(db.load_session(&user()).unwrap().is_none());

        let entry = db.get_history(&user(), &id).unwrap().unwrap();
        assert_eq!(entry.blocks.len(), 2);
        assert_eq!(entry.completed_sets, 1);
    }

    #[test]
    fn finish_with_nothing_completed_still_stops() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(&template(vec![planned(1, 0)]), &()).unwrap();
        let events = e.finish().unwrap();
        assert!(matches!(
            events[0],
            Event::SessionFinished {
                history_id: None,
                ..
            }
        ));
        assert!(db.load_session(&user()).unwrap().is_none());
        assert!(db
            .list_history(&user(), &HistoryFilter::default(), None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn inactive_document_reads_as_stopped() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(&template(vec![planned(1, 0)]), &()).unwrap();

        let mut doc = db.load_session(&user()).unwrap().unwrap();
        let revision = doc.revision;
        doc.active = false;
        db.save_session(&doc, Some(revision)).unwrap();

        assert!(e.refresh().unwrap().is_none());
        assert!(e.advance().unwrap().is_empty());
        // an inactive leftover does not block a new start
        e.start(&template(vec![planned(2, 0)]), &()).unwrap();
        assert_eq!(e.snapshot().unwrap().blocks.len(), 2);
    }

    #[test]
    fn apply_remote_ignores_other_users() {
        let db = Database::open_memory().unwrap();
        let mut e = engine(&db);
        e.start(&template(vec![planned(1, 0)]), &()).unwrap();
        let mut foreign = e.snapshot().unwrap().clone();
        foreign.user_id = UserId::new("someone-else").unwrap();
        e.apply_remote(Some(foreign));
        assert!(e.snapshot().is_none());
    }

    #[test]
    fn for_identity_requires_user() {
        let db = Database::open_memory().unwrap();
        assert!(matches!(
            PlaybackEngine::for_identity(&db, None),
            Err(CoreError::NoIdentity)
        ));
    }

    /// Store whose writes can be switched off.
    struct FlakyStore {
        inner: Database,
        fail_writes: Cell<bool>,
    }

    impl SessionStore for FlakyStore {
        fn load_session(&self, user: &UserId) -> Result<Option<Session>, StoreError> {
            self.inner.load_session(user)
        }

        fn save_session(
            &self,
            session: &Session,
            expected_revision: Option<u64>,
        ) -> Result<u64, StoreError> {
            if self.fail_writes.get() {
                return Err(StoreError::Locked);
            }
            self.inner.save_session(session, expected_revision)
        }

        fn delete_session(&self, user: &UserId) -> Result<bool, StoreError> {
            self.inner.delete_session(user)
        }

        fn subscribe(&self, user: &UserId) -> watch::Receiver<Option<Session>> {
            self.inner.subscribe(user)
        }
    }

    impl HistoryStore for FlakyStore {
        fn insert_history(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
            self.inner.insert_history(entry)
        }

        fn finish_session(
            &self,
            user: &UserId,
            entry: Option<&HistoryEntry>,
            expected_revision: u64,
        ) -> Result<(), StoreError> {
            if self.fail_writes.get() {
                return Err(StoreError::Locked);
            }
            self.inner.finish_session(user, entry, expected_revision)
        }

        fn list_history(
            &self,
            user: &UserId,
            filter: &HistoryFilter,
            limit: Option<usize>,
        ) -> Result<Vec<HistoryEntry>, StoreError> {
            self.inner.list_history(user, filter, limit)
        }

        fn get_history(
            &self,
            user: &UserId,
            id: &str,
        ) -> Result<Option<HistoryEntry>, StoreError> {
            self.inner.get_history(user, id)
        }

        fn delete_history(&self, user: &UserId, id: &str) -> Result<bool, StoreError> {
            self.inner.delete_history(user, id)
        }
    }

    #[test]
    fn failed_write_does_not_advance_cache() {
        let store = FlakyStore {
            inner: Database::open_memory().unwrap(),
            fail_writes: Cell::new(false),
        };
        let mut e = PlaybackEngine::new(&store, user());
        e.start(&template(vec![planned(2, 0)]), &()).unwrap();

        store.fail_writes.set(true);
        assert!(matches!(
            e.advance(),
            Err(PlaybackError::Persistence(StoreError::Locked))
        ));
        let cached = e.snapshot().unwrap();
        assert_eq!(cached.active_index(), Some(0));
        assert_eq!(cached.blocks[0].status(), BlockStatus::Active);

        store.fail_writes.set(false);
        e.advance().unwrap();
        assert_eq!(e.snapshot().unwrap().active_index(), Some(1));
    }

    #[test]
    fn failed_finish_keeps_session_and_retry_records_once() {
        let store = FlakyStore {
            inner: Database::open_memory().unwrap(),
            fail_writes: Cell::new(false),
        };
        let mut e = PlaybackEngine::new(&store, user()).with_clock(fixed_clock);
        e.start(&template(vec![planned(2, 0)]), &()).unwrap();
        e.advance().unwrap();

        store.fail_writes.set(true);
        assert!(matches!(
            e.finish(),
            Err(PlaybackError::Persistence(StoreError::Locked))
        ));
        assert!(store.inner.load_session(&user()).unwrap().is_some());
        assert_eq!(e.snapshot().unwrap().completed_count(), 1);
        assert!(store
            .list_history(&user(), &HistoryFilter::default(), None)
            .unwrap()
            .is_empty());

        store.fail_writes.set(false);
        assert_eq!(e.finish().unwrap().len(), 2);
        assert_eq!(
            store
                .list_history(&user(), &HistoryFilter::default(), None)
                .unwrap()
                .len(),
            1
        );
        assert!(e.snapshot().is_none());
    }

    #[test]
    fn second_client_finishing_records_nothing() {
        let db = Database::open_memory().unwrap();
        let mut a = engine(&db);
        let mut b = engine(&db);
        a.start(&template(vec![planned(2, 0)]), &()).unwrap();
        a.advance().unwrap();
        b.refresh().unwrap();

        assert_eq!(a.finish().unwrap().len(), 2);
        assert!(b.finish().unwrap().is_empty());
        assert!(b.snapshot().is_none());
        assert_eq!(
            db.list_history(&user(), &HistoryFilter::default(), None)
                .unwrap()
                .len(),
            1
        );
    }
}
