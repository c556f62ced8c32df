//! Pure block-lifecycle transitions.
//!
//! ```text
//! pending -> active -> completed
//! pending (note) ----> completed
//! ```
//!
//! Functions here only mutate the [`Session`] they are handed. Persistence and
//! re-fetching are the caller's job (see [`super::PlaybackEngine`]).

use super::block::{BlockKind, BlockStatus, PlaybackBlock};
use super::session::{RestTimer, Session};
use crate::error::PlaybackError;

/// What a transition did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The active block completed. `next` is the newly active block, or
    /// `None` when nothing actionable remains.
    Advanced {
        completed: usize,
        kind: BlockKind,
        actual_duration: Option<u32>,
        next: Option<usize>,
    },
    Paused {
        seconds_left: u32,
    },
    Resumed {
        seconds_left: u32,
    },
    Unchanged,
}

/// Activate the first pending non-note block at or after `from`.
///
/// Pending notes passed on the way are completed. Returns the index of the
/// newly active block.
pub(crate) fn activate_next(blocks: &mut [PlaybackBlock], from: usize) -> Option<usize> {
    for (index, block) in blocks.iter_mut().enumerate().skip(from) {
        if block.status() != BlockStatus::Pending {
            continue;
        }
        if block.is_note() {
            block.set_status(BlockStatus::Completed);
            continue;
        }
        block.set_status(BlockStatus::Active);
        return Some(index);
    }
    None
}

/// Complete the active block and activate the next actionable one.
///
/// A completed rest records how long was actually rested. When no actionable
/// block remains the timer is stopped; the session is not finalized.
pub fn advance(session: &mut Session) -> Result<Transition, PlaybackError> {
    let rested = session.timer.elapsed();
    complete_active(session, rested)
}

fn complete_active(session: &mut Session, rested: u32) -> Result<Transition, PlaybackError> {
    let index = session.active_index().ok_or(PlaybackError::NoActiveBlock)?;

    let block = &mut session.blocks[index];
    let actual_duration = match block {
        PlaybackBlock::Rest {
            actual_duration, ..
        } => {
            *actual_duration = Some(rested);
            Some(rested)
        }
        _ => None,
    };
    let kind = block.kind();
    block.set_status(BlockStatus::Completed);

    let next = activate_next(&mut session.blocks, index + 1);
    session.timer = match next {
        Some(i) => RestTimer::for_block(&session.blocks[i]),
        None => RestTimer::idle(),
    };

    Ok(Transition::Advanced {
        completed: index,
        kind,
        actual_duration,
        next,
    })
}

/// End the active rest early.
pub fn skip_rest(session: &mut Session) -> Result<Transition, PlaybackError> {
    let active = session.active_block().ok_or(PlaybackError::NoActiveBlock)?;
    if !active.is_rest() {
        return Err(PlaybackError::IllegalSkip);
    }
    // Rested time is measured before the countdown is forced to zero.
    let rested = session.timer.elapsed();
    session.timer.seconds_left = 0;
    complete_active(session, rested)
}

/// User confirmation of an active set (anything but a rest).
pub fn complete_active_non_rest(session: &mut Session) -> Result<Transition, PlaybackError> {
    let active = session.active_block().ok_or(PlaybackError::NoActiveBlock)?;
    if active.is_rest() {
        return Err(PlaybackError::IllegalComplete);
    }
    advance(session)
}

/// Like [`complete_active_non_rest`], but only if `expected` is still the
/// active block. A second confirmation of the same block is rejected.
pub fn complete_block(session: &mut Session, expected: usize) -> Result<Transition, PlaybackError> {
    let actual = session.active_index();
    if actual != Some(expected) {
        return Err(PlaybackError::StaleBlock { expected, actual });
    }
    complete_active_non_rest(session)
}

/// Freeze the countdown at its current value.
pub fn pause(session: &mut Session) -> Transition {
    if !session.timer.running {
        return Transition::Unchanged;
    }
    session.timer.running = false;
    Transition::Paused {
        seconds_left: session.timer.seconds_left,
    }
}

/// Restart a paused countdown. No-op when there is no rest to resume.
pub fn resume(session: &mut Session) -> Transition {
    let timer = &mut session.timer;
    if timer.initial_rest_duration == 0 || timer.running || timer.seconds_left == 0 {
        return Transition::Unchanged;
    }
    timer.running = true;
    Transition::Resumed {
        seconds_left: timer.seconds_left,
    }
}

/// At most one active block, and it is never a note.
pub fn invariants_hold(blocks: &[PlaybackBlock]) -> bool {
    let active: Vec<&PlaybackBlock> = blocks
        .iter()
        .filter(|b| b.status() == BlockStatus::Active)
        .collect();
    active.len() <= 1 && active.iter().all(|b| !b.is_note())
}
