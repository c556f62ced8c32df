//! Planning types: reusable exercise sets and the templates built from them.

mod planned_set;
mod template;

pub use planned_set::{search_planned_sets, PlannedSet, PlannedSetLookup};
pub use template::{Template, TemplateBlock};

use crate::error::ValidationError;

/// Reject `name` if another record (other than `editing_id`) already uses it.
///
/// Names compare case-insensitively after trimming.
pub fn ensure_unique_name<'a>(
    kind: &'static str,
    existing: impl IntoIterator<Item = (&'a str, &'a str)>,
    name: &str,
    editing_id: Option<&str>,
) -> Result<(), ValidationError> {
    let wanted = name.trim().to_lowercase();
    let clash = existing
        .into_iter()
        .any(|(id, other)| Some(id) != editing_id && other.trim().to_lowercase() == wanted);
    if clash {
        return Err(ValidationError::DuplicateName {
            kind,
            name: name.trim().to_string(),
        });
    }
    Ok(())
}

/// Trimmed, non-empty text or a validation error naming `field`.
pub(crate) fn non_empty(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}
