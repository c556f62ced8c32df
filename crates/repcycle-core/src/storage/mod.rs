mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, HistoryConfig, IdentityConfig, PlaybackConfig};
pub use database::Database;

use std::path::PathBuf;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::history::{HistoryEntry, HistoryFilter};
use crate::identity::UserId;
use crate::playback::Session;

/// Returns the data directory, creating it if needed.
///
/// `REPCYCLE_DATA_DIR` overrides the location. Otherwise
/// `~/.config/repcycle[-dev]/`, with `REPCYCLE_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var_os("REPCYCLE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("REPCYCLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("repcycle-dev")
            } else {
                base_dir.join("repcycle")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StoreError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Persistence for the single session document of each user.
pub trait SessionStore {
    /// The stored document, including ones flagged inactive.
    fn load_session(&self, user: &UserId) -> Result<Option<Session>, StoreError>;

    /// Write `session` if the stored revision still equals `expected_revision`
    /// (`None`: no document may exist). Returns the new revision.
    ///
    /// # Errors
    /// [`StoreError::Conflict`] if another writer got there first.
    fn save_session(
        &self,
        session: &Session,
        expected_revision: Option<u64>,
    ) -> Result<u64, StoreError>;

    /// Remove the document. Returns whether one existed.
    fn delete_session(&self, user: &UserId) -> Result<bool, StoreError>;

    /// Change feed for the user's document; `None` means absent.
    fn subscribe(&self, user: &UserId) -> watch::Receiver<Option<Session>>;
}

/// Persistence for finished workouts.
pub trait HistoryStore {
    fn insert_history(&self, entry: &HistoryEntry) -> Result<(), StoreError>;

    /// Record `entry` (if any) and delete the user's session in one commit.
    ///
    /// # Errors
    /// [`StoreError::Conflict`] if the stored session is no longer at
    /// `expected_revision`; nothing is written then.
    fn finish_session(
        &self,
        user: &UserId,
        entry: Option<&HistoryEntry>,
        expected_revision: u64,
    ) -> Result<(), StoreError>;

    /// Entries of `user` matching `filter`, newest first, at most `limit`.
    fn list_history(
        &self,
        user: &UserId,
        filter: &HistoryFilter,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryEntry>, StoreError>;

    fn get_history(&self, user: &UserId, id: &str) -> Result<Option<HistoryEntry>, StoreError>;

    /// Returns whether an entry owned by `user` was removed.
    fn delete_history(&self, user: &UserId, id: &str) -> Result<bool, StoreError>;
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn load_session(&self, user: &UserId) -> Result<Option<Session>, StoreError> {
        (**self).load_session(user)
    }

    fn save_session(
        &self,
        session: &Session,
        expected_revision: Option<u64>,
    ) -> Result<u64, StoreError> {
        (**self).save_session(session, expected_revision)
    }

    fn delete_session(&self, user: &UserId) -> Result<bool, StoreError> {
        (**self).delete_session(user)
    }

    fn subscribe(&self, user: &UserId) -> watch::Receiver<Option<Session>> {
        (**self).subscribe(user)
    }
}

impl<T: HistoryStore + ?Sized> HistoryStore for &T {
    fn insert_history(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        (**self).insert_history(entry)
    }

    fn finish_session(
        &self,
        user: &UserId,
        entry: Option<&HistoryEntry>,
        expected_revision: u64,
    ) -> Result<(), StoreError> {
        (**self).finish_session(user, entry, expected_revision)
    }

    fn list_history(
        &self,
        user: &UserId,
        filter: &HistoryFilter,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        (**self).list_history(user, filter, limit)
    }

    fn get_history(&self, user: &UserId, id: &str) -> Result<Option<HistoryEntry>, StoreError> {
        (**self).get_history(user, id)
    }

    fn delete_history(&self, user: &UserId, id: &str) -> Result<bool, StoreError> {
        (**self).delete_history(user, id)
    }
}
