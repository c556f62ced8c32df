//! User identity used to namespace planned sets, templates, sessions and history.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::storage::Config;

/// Opaque owner id supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for blank ids.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pick the explicit id if given, else the configured one.
    ///
    /// # Errors
    /// Returns [`CoreError::NoIdentity`] when neither yields a usable id.
    pub fn resolve(explicit: Option<&str>, config: &Config) -> Result<Self, CoreError> {
        explicit
            .and_then(UserId::new)
            .or_else(|| config.identity.user_id.as_deref().and_then(UserId::new))
            .ok_or(CoreError::NoIdentity)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
