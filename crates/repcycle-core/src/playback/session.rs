use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::block::{BlockStatus, PlaybackBlock};
use super::flatten::Flattened;
use crate::identity::UserId;

/// Rest countdown fields persisted with the session.
///
/// Everything a client needs to resume ticking lives here, so a freshly
/// attached observer continues from `seconds_left` instead of the full rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestTimer {
    pub seconds_left: u32,
    pub initial_rest_duration: u32,
    pub running: bool,
}

impl RestTimer {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Running timer for a rest block, idle for anything else.
    pub fn for_block(block: &PlaybackBlock) -> Self {
        match block.rest_duration() {
            Some(duration) => Self {
                seconds_left: duration,
                initial_rest_duration: duration,
                running: true,
            },
            None => Self::idle(),
        }
    }

    /// Seconds consumed so far of the current rest.
    pub fn elapsed(&self) -> u32 {
        self.initial_rest_duration.saturating_sub(self.seconds_left)
    }
}

/// Completed vs. total actionable (non-note) blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

/// The single running workout of a user. Mirrored 1:1 to one stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub template_name: String,
    pub started_at: DateTime<Utc>,
    pub blocks: Vec<PlaybackBlock>,
    #[serde(default)]
    pub timer: RestTimer,
    /// Stored documents with `active = false` are treated as stopped.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Bumped by the store on every committed write.
    #[serde(default)]
    pub revision: u64,
}

fn default_true() -> bool {
    true
}

impl Session {
    pub fn new(
        user_id: UserId,
        template_name: impl Into<String>,
        flattened: Flattened,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            template_name: template_name.into(),
            started_at,
            blocks: flattened.blocks,
            timer: flattened.timer,
            active: true,
            revision: 0,
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.blocks
            .iter()
            .position(|b| b.status() == BlockStatus::Active)
    }

    pub fn active_block(&self) -> Option<&PlaybackBlock> {
        self.active_index().map(|i| &self.blocks[i])
    }

    /// No active block and nothing actionable left: only finish/stop remain.
    pub fn is_exhausted(&self) -> bool {
        self.active_index().is_none()
            && !self
                .blocks
                .iter()
                .any(|b| !b.is_note() && b.status() == BlockStatus::Pending)
    }

    pub fn completed_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.status() == BlockStatus::Completed)
            .count()
    }

    pub fn progress(&self) -> Progress {
        let actionable = self.blocks.iter().filter(|b| !b.is_note());
        let (completed, total) = actionable.fold((0, 0), |(done, all), b| {
            let done = done + usize::from(b.status() == BlockStatus::Completed);
            (done, all + 1)
        });
        Progress { completed, total }
    }
}

/// Interpret a document delivered by the store.
///
/// Absent documents and documents flagged inactive both mean "stopped".
pub fn observe(document: Option<Session>) -> Option<Session> {
    document.filter(|s| s.active)
}
