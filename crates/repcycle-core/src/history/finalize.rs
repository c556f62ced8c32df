use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{HistoryBlock, HistoryEntry};
use crate::playback::{BlockStatus, PlaybackBlock, Session};

/// Reduce the completed blocks of `session` into a history entry.
///
/// Returns `None` when nothing was completed. The session is not modified.
pub fn finalize(session: &Session, completed_at: DateTime<Utc>) -> Option<HistoryEntry> {
    let blocks: Vec<HistoryBlock> = session
        .blocks
        .iter()
        .filter(|b| b.status() == BlockStatus::Completed)
        .map(reduce)
        .collect();

    if blocks.is_empty() {
        return None;
    }

    let completed_sets = blocks
        .iter()
        .filter(|b| matches!(b, HistoryBlock::Set { .. }))
        .count();

    Some(HistoryEntry {
        id: Uuid::new_v4().to_string(),
        user_id: session.user_id.clone(),
        name: session.template_name.clone(),
        started_at: session.started_at,
        completed_at,
        duration_secs: (completed_at - session.started_at).num_seconds().max(0) as u64,
        completed_sets,
        blocks,
    })
}

fn reduce(block: &PlaybackBlock) -> HistoryBlock {
    match block {
        PlaybackBlock::SetInstance {
            exercise,
            reps,
            weight,
            ..
        } => HistoryBlock::Set {
            exercise: exercise.clone(),
            reps: *reps,
            weight: *weight,
        },
        PlaybackBlock::Rest {
            duration,
            actual_duration,
            ..
        } => HistoryBlock::Rest {
            duration: *duration,
            actual_duration: actual_duration.unwrap_or(0),
        },
        PlaybackBlock::Note { text, .. } => HistoryBlock::Note { text: text.clone() },
    }
}
