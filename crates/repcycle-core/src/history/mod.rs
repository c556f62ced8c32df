//! Finished-workout records.
//!
//! A [`HistoryEntry`] is produced once, by [`finalize`], and never changes
//! afterwards. Entries can be searched and deleted by their owner.

mod filter;
mod finalize;

pub use filter::HistoryFilter;
pub use finalize::finalize;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// A completed block reduced to the fields worth keeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryBlock {
    Set {
        exercise: String,
        reps: u32,
        weight: f64,
    },
    Rest {
        duration: u32,
        actual_duration: u32,
    },
    Note {
        text: String,
    },
}

impl HistoryBlock {
    pub fn describe(&self) -> String {
        match self {
            HistoryBlock::Set {
                exercise,
                reps,
                weight,
            } => format!("{exercise}: {reps} reps @ {weight}kg"),
            HistoryBlock::Rest {
                duration,
                actual_duration,
            } => format!("Rest: {actual_duration}s (planned: {duration}s)"),
            HistoryBlock::Note { text } => format!("Note: \"{text}\""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub user_id: UserId,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_secs: u64,
    pub completed_sets: usize,
    pub blocks: Vec<HistoryBlock>,
}
