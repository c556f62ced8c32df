use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{non_empty, PlannedSet};
use crate::error::ValidationError;

/// One entry of a template, in user-defined order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateBlock {
    /// Snapshot of the planned set at the time it was added.
    PlannedSet(PlannedSet),
    Rest { duration: u32 },
    Note { text: String },
}

impl TemplateBlock {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            TemplateBlock::PlannedSet(set) => set.validate(),
            TemplateBlock::Rest { duration } => {
                if *duration == 0 {
                    return Err(ValidationError::InvalidValue {
                        field: "rest",
                        message: "must be a positive number of seconds".into(),
                    });
                }
                Ok(())
            }
            TemplateBlock::Note { text } => non_empty("note", text).map(|_| ()),
        }
    }

    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            TemplateBlock::PlannedSet(set) => format!(
                "{}: {} x {} @ {}kg, rest {}s",
                set.exercise, set.sets, set.reps, set.weight, set.rest_time
            ),
            TemplateBlock::Rest { duration } => format!("Rest {duration}s"),
            TemplateBlock::Note { text } => format!("Note: {text}"),
        }
    }
}

/// A named, ordered workout built from planned sets, rests and notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub blocks: Vec<TemplateBlock>,
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// Start an empty template. Blocks must be added before it can be saved.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: non_empty("template name", name)?,
            blocks: Vec::new(),
            created_at: Utc::now(),
        })
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = non_empty("template name", name)?;
        Ok(())
    }

    pub fn push(&mut self, block: TemplateBlock) -> Result<(), ValidationError> {
        block.validate()?;
        self.blocks.push(block);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<TemplateBlock, ValidationError> {
        self.check_index(index)?;
        Ok(self.blocks.remove(index))
    }

    /// Move the block at `from` so that it ends up at position `to`.
    pub fn move_block(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from != to {
            let block = self.blocks.remove(from);
            self.blocks.insert(to, block);
        }
        Ok(())
    }

    /// Checks required before the template is persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_empty("template name", &self.name)?;
        if self.blocks.is_empty() {
            return Err(ValidationError::Empty {
                field: "template blocks",
            });
        }
        self.blocks.iter().try_for_each(TemplateBlock::validate)
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        if index >= self.blocks.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "template blocks",
                index,
                len: self.blocks.len(),
            });
        }
        Ok(())
    }
}
