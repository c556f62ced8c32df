use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

/// Discriminant of [`PlaybackBlock`], for events and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    SetInstance,
    Rest,
    Note,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SetInstance => "set",
            Self::Rest => "rest",
            Self::Note => "note",
        };
        write!(f, "{}", s)
    }
}

/// Which planned set inserted a rest, and after which set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestOrigin {
    pub exercise: String,
    pub set_num: u32,
}

/// Runtime unit of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackBlock {
    SetInstance {
        exercise: String,
        reps: u32,
        weight: f64,
        current_set_num: u32,
        total_sets: u32,
        status: BlockStatus,
    },
    Rest {
        duration: u32,
        /// Seconds actually rested; set when the rest completes.
        #[serde(default)]
        actual_duration: Option<u32>,
        #[serde(default)]
        origin: Option<RestOrigin>,
        status: BlockStatus,
    },
    Note {
        text: String,
        status: BlockStatus,
    },
}

impl PlaybackBlock {
    pub fn status(&self) -> BlockStatus {
        match self {
            PlaybackBlock::SetInstance { status, .. }
            | PlaybackBlock::Rest { status, .. }
            | PlaybackBlock::Note { status, .. } => *status,
        }
    }

    pub fn set_status(&mut self, next: BlockStatus) {
        match self {
            PlaybackBlock::SetInstance { status, .. }
            | PlaybackBlock::Rest { status, .. }
            | PlaybackBlock::Note { status, .. } => *status = next,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            PlaybackBlock::SetInstance { .. } => BlockKind::SetInstance,
            PlaybackBlock::Rest { .. } => BlockKind::Rest,
            PlaybackBlock::Note { .. } => BlockKind::Note,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, PlaybackBlock::Note { .. })
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, PlaybackBlock::Rest { .. })
    }

    /// Planned duration if this is a rest.
    pub fn rest_duration(&self) -> Option<u32> {
        match self {
            PlaybackBlock::Rest { duration, .. } => Some(*duration),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            PlaybackBlock::SetInstance {
                exercise,
                reps,
                weight,
                current_set_num,
                total_sets,
                ..
            } => format!(
                "{exercise} - Set {current_set_num} of {total_sets} ({reps} reps @ {weight}kg)"
            ),
            PlaybackBlock::Rest {
                duration,
                origin: Some(origin),
                ..
            } => format!(
                "Rest {duration}s (after {} set {})",
                origin.exercise, origin.set_num
            ),
            PlaybackBlock::Rest { duration, .. } => format!("Rest {duration}s"),
            PlaybackBlock::Note { text, .. } => format!("Note: {text}"),
        }
    }
}
