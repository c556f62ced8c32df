use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::non_empty;
use crate::error::ValidationError;

/// A reusable exercise prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSet {
    pub id: String,
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    /// Load in kilograms.
    pub weight: f64,
    /// Rest between consecutive sets, in seconds. 0 inserts no rest.
    pub rest_time: u32,
    pub created_at: DateTime<Utc>,
}

impl PlannedSet {
    /// Build a validated planned set with a fresh id.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a blank exercise, zero sets or reps,
    /// or a negative/non-finite weight.
    pub fn new(
        exercise: &str,
        sets: u32,
        reps: u32,
        weight: f64,
        rest_time: u32,
    ) -> Result<Self, ValidationError> {
        let set = Self {
            id: Uuid::new_v4().to_string(),
            exercise: non_empty("exercise", exercise)?,
            sets,
            reps,
            weight,
            rest_time,
            created_at: Utc::now(),
        };
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        non_empty("exercise", &self.exercise)?;
        if self.sets == 0 {
            return Err(ValidationError::InvalidValue {
                field: "sets",
                message: "must be a positive number".into(),
            });
        }
        if self.reps == 0 {
            return Err(ValidationError::InvalidValue {
                field: "reps",
                message: "must be a positive number".into(),
            });
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "weight",
                message: "must be a non-negative number".into(),
            });
        }
        Ok(())
    }
}

/// Resolves the latest version of a planned set by id.
///
/// Templates embed a snapshot of each planned set; a lookup lets playback pick
/// up edits made after the template was saved.
pub trait PlannedSetLookup {
    fn planned_set(&self, id: &str) -> Option<PlannedSet>;
}

impl PlannedSetLookup for [PlannedSet] {
    fn planned_set(&self, id: &str) -> Option<PlannedSet> {
        self.iter().find(|s| s.id == id).cloned()
    }
}

impl PlannedSetLookup for Vec<PlannedSet> {
    fn planned_set(&self, id: &str) -> Option<PlannedSet> {
        self.as_slice().planned_set(id)
    }
}

impl PlannedSetLookup for HashMap<String, PlannedSet> {
    fn planned_set(&self, id: &str) -> Option<PlannedSet> {
        self.get(id).cloned()
    }
}

/// Uses the embedded snapshots only.
impl PlannedSetLookup for () {
    fn planned_set(&self, _id: &str) -> Option<PlannedSet> {
        None
    }
}

/// Case-insensitive substring match on the exercise name.
pub fn search_planned_sets<'a>(sets: &'a [PlannedSet], query: &str) -> Vec<&'a PlannedSet> {
    let needle = query.trim().to_lowercase();
    sets.iter()
        .filter(|s| s.exercise.to_lowercase().contains(&needle))
        .collect()
}
