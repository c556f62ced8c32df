//! SQLite-based storage.
//!
//! Provides persistent storage for:
//! - Planned sets and templates (per user)
//! - The single active session document of each user
//! - Finished-workout history
//!
//! Session writes are revision-checked, and every committed session write is
//! published to in-process subscribers.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

use super::{data_dir, migrations, HistoryStore, SessionStore};
use crate::error::{Result, StoreError, ValidationError};
use crate::history::{HistoryBlock, HistoryEntry, HistoryFilter};
use crate::identity::UserId;
use crate::plan::{ensure_unique_name, PlannedSet, Template, TemplateBlock};
use crate::playback::Session;

type Watchers = HashMap<UserId, watch::Sender<Option<Session>>>;

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Build a PlannedSet from a database row
fn row_to_planned_set(row: &rusqlite::Row) -> rusqlite::Result<PlannedSet> {
    let created_at: String = row.get(6)?;
    Ok(PlannedSet {
        id: row.get(0)?,
        exercise: row.get(1)?,
        sets: row.get(2)?,
        reps: row.get(3)?,
        weight: row.get(4)?,
        rest_time: row.get(5)?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// Raw template columns; blocks are decoded outside the row callback.
type TemplateRow = (String, String, String, String);

fn row_to_template(row: &rusqlite::Row) -> rusqlite::Result<TemplateRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode_template(row: TemplateRow) -> Result<Template, StoreError> {
    let (id, name, blocks_json, created_at) = row;
    let blocks: Vec<TemplateBlock> = serde_json::from_str(&blocks_json)?;
    Ok(Template {
        id,
        name,
        blocks,
        created_at: parse_datetime_fallback(&created_at),
    })
}

type HistoryRow = (String, String, String, String, String, u64, u64, String);

fn decode_history(row: HistoryRow) -> Result<HistoryEntry, StoreError> {
    let (id, user_id, name, started_at, completed_at, duration_secs, completed_sets, blocks) =
        row;
    let blocks: Vec<HistoryBlock> = serde_json::from_str(&blocks)?;
    let user_id = UserId::new(user_id)
        .ok_or_else(|| StoreError::QueryFailed(format!("history {id} has no owner")))?;
    Ok(HistoryEntry {
        id,
        user_id,
        name,
        started_at: parse_datetime_fallback(&started_at),
        completed_at: parse_datetime_fallback(&completed_at),
        duration_secs,
        completed_sets: completed_sets as usize,
        blocks,
    })
}

fn row_to_history(row: &rusqlite::Row) -> rusqlite::Result<HistoryRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

const HISTORY_COLUMNS: &str =
    "id, user_id, name, started_at, completed_at, duration_secs, completed_sets, blocks";

/// SQLite database for all repcycle data.
pub struct Database {
    conn: Connection,
    watchers: Mutex<Watchers>,
}

impl Database {
    /// Open the database at `<data_dir>/repcycle.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        Self::open_at(data_dir()?.join("repcycle.db"))
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        // Two CLI processes may touch the same file.
        conn.busy_timeout(Duration::from_secs(2))?;
        Self::from_conn(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_conn(conn)
    }

    fn from_conn(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn)?;
        Ok(Self {
            conn,
            watchers: Mutex::new(HashMap::new()),
        })
    }

    fn watchers(&self) -> MutexGuard<'_, Watchers> {
        self.watchers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send to the user's subscribers; a sender nobody listens to is dropped.
    fn publish(&self, user: &UserId, document: Option<Session>) {
        let mut watchers = self.watchers();
        if let Some(tx) = watchers.get(user) {
            if tx.receiver_count() == 0 {
                watchers.remove(user);
            } else {
                tx.send_replace(document);
            }
        }
    }

    // === PlannedSet CRUD ===

    /// Create a planned set. Exercise names are unique per user, ignoring case.
    pub fn create_planned_set(&self, user: &UserId, set: &PlannedSet) -> Result<()> {
        set.validate()?;
        let existing = self.list_planned_sets(user)?;
        ensure_unique_name(
            "planned set",
            existing.iter().map(|s| (s.id.as_str(), s.exercise.as_str())),
            &set.exercise,
            None,
        )?;
        self.conn.execute(
            "INSERT INTO planned_sets (id, user_id, exercise, sets, reps, weight, rest_time, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                set.id,
                user.as_str(),
                set.exercise,
                set.sets,
                set.reps,
                set.weight,
                set.rest_time,
                set.created_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(user = %user, exercise = %set.exercise, "planned set created");
        Ok(())
    }

    pub fn list_planned_sets(&self, user: &UserId) -> Result<Vec<PlannedSet>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, exercise, sets, reps, weight, rest_time, created_at
             FROM planned_sets
             WHERE user_id = ?1
             ORDER BY exercise COLLATE NOCASE",
        )?;
        let rows = stmt.query_map(params![user.as_str()], row_to_planned_set)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_planned_set(&self, user: &UserId, id: &str) -> Result<Option<PlannedSet>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, exercise, sets, reps, weight, rest_time, created_at
                 FROM planned_sets
                 WHERE user_id = ?1 AND id = ?2",
                params![user.as_str(), id],
                row_to_planned_set,
            )
            .optional()?)
    }

    /// Resolve a planned set by id or by exercise name (case-insensitive).
    pub fn find_planned_set(&self, user: &UserId, reference: &str) -> Result<PlannedSet> {
        let wanted = reference.trim().to_lowercase();
        self.list_planned_sets(user)?
            .into_iter()
            .find(|s| s.id == reference || s.exercise.to_lowercase() == wanted)
            .ok_or_else(|| {
                ValidationError::NotFound {
                    kind: "planned set",
                    reference: reference.to_string(),
                }
                .into()
            })
    }

    /// Overwrite a planned set. Sessions already started keep their blocks.
    pub fn update_planned_set(&self, user: &UserId, set: &PlannedSet) -> Result<()> {
        set.validate()?;
        let existing = self.list_planned_sets(user)?;
        ensure_unique_name(
            "planned set",
            existing.iter().map(|s| (s.id.as_str(), s.exercise.as_str())),
            &set.exercise,
            Some(&set.id),
        )?;
        let changed = self.conn.execute(
            "UPDATE planned_sets
             SET exercise = ?1, sets = ?2, reps = ?3, weight = ?4, rest_time = ?5
             WHERE user_id = ?6 AND id = ?7",
            params![
                set.exercise,
                set.sets,
                set.reps,
                set.weight,
                set.rest_time,
                user.as_str(),
                set.id,
            ],
        )?;
        if changed == 0 {
            return Err(ValidationError::NotFound {
                kind: "planned set",
                reference: set.id.clone(),
            }
            .into());
        }
        Ok(())
    }

    pub fn delete_planned_set(&self, user: &UserId, id: &str) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM planned_sets WHERE user_id = ?1 AND id = ?2",
            params![user.as_str(), id],
        )?;
        Ok(changed > 0)
    }

    // === Template CRUD ===

    /// Save a new template. It must have at least one block and a unique name.
    pub fn create_template(&self, user: &UserId, template: &Template) -> Result<()> {
        template.validate()?;
        let existing = self.list_templates(user)?;
        ensure_unique_name(
            "template",
            existing.iter().map(|t| (t.id.as_str(), t.name.as_str())),
            &template.name,
            None,
        )?;
        let blocks_json = serde_json::to_string(&template.blocks)?;
        self.conn.execute(
            "INSERT INTO templates (id, user_id, name, blocks, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                template.id,
                user.as_str(),
                template.name,
                blocks_json,
                template.created_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(user = %user, name = %template.name, "template created");
        Ok(())
    }

    pub fn list_templates(&self, user: &UserId) -> Result<Vec<Template>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, blocks, created_at
             FROM templates
             WHERE user_id = ?1
             ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![user.as_str()], row_to_template)?;
        rows.map(|row| decode_template(row?)).collect()
    }

    pub fn get_template(&self, user: &UserId, id: &str) -> Result<Option<Template>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, blocks, created_at
                 FROM templates
                 WHERE user_id = ?1 AND id = ?2",
                params![user.as_str(), id],
                row_to_template,
            )
            .optional()?;
        row.map(decode_template).transpose()
    }

    /// Resolve a template by id or by name (case-insensitive).
    pub fn find_template(&self, user: &UserId, reference: &str) -> Result<Template> {
        let wanted = reference.trim().to_lowercase();
        self.list_templates(user)?
            .into_iter()
            .find(|t| t.id == reference || t.name.to_lowercase() == wanted)
            .ok_or_else(|| {
                ValidationError::NotFound {
                    kind: "template",
                    reference: reference.to_string(),
                }
                .into()
            })
    }

    pub fn update_template(&self, user: &UserId, template: &Template) -> Result<()> {
        template.validate()?;
        let existing = self.list_templates(user)?;
        ensure_unique_name(
            "template",
            existing.iter().map(|t| (t.id.as_str(), t.name.as_str())),
            &template.name,
            Some(&template.id),
        )?;
        let blocks_json = serde_json::to_string(&template.blocks)?;
        let changed = self.conn.execute(
            "UPDATE templates SET name = ?1, blocks = ?2 WHERE user_id = ?3 AND id = ?4",
            params![template.name, blocks_json, user.as_str(), template.id],
        )?;
        if changed == 0 {
            return Err(ValidationError::NotFound {
                kind: "template",
                reference: template.id.clone(),
            }
            .into());
        }
        Ok(())
    }

    pub fn delete_template(&self, user: &UserId, id: &str) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM templates WHERE user_id = ?1 AND id = ?2",
            params![user.as_str(), id],
        )?;
        Ok(changed > 0)
    }
}

impl SessionStore for Database {
    fn load_session(&self, user: &UserId) -> Result<Option<Session>, StoreError> {
        let document: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM sessions WHERE user_id = ?1",
                params![user.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(document
            .map(|json| serde_json::from_str::<Session>(&json))
            .transpose()?)
    }

    fn save_session(
        &self,
        session: &Session,
        expected_revision: Option<u64>,
    ) -> Result<u64, StoreError> {
        let user = &session.user_id;
        let tx = self.conn.unchecked_transaction()?;
        let found: Option<u64> = tx
            .query_row(
                "SELECT revision FROM sessions WHERE user_id = ?1",
                params![user.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if found != expected_revision {
            return Err(StoreError::Conflict {
                expected: expected_revision,
                found,
            });
        }

        let revision = found.map_or(1, |r| r + 1);
        let mut document = session.clone();
        document.revision = revision;
        let json = serde_json::to_string(&document)?;
        tx.execute(
            "INSERT OR REPLACE INTO sessions (user_id, revision, document, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user.as_str(), revision, json, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;

        self.publish(user, Some(document));
        Ok(revision)
    }

    fn delete_session(&self, user: &UserId) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM sessions WHERE user_id = ?1",
            params![user.as_str()],
        )?;
        self.publish(user, None);
        Ok(changed > 0)
    }

    fn subscribe(&self, user: &UserId) -> watch::Receiver<Option<Session>> {
        let mut watchers = self.watchers();
        if let Some(tx) = watchers.get(user) {
            return tx.subscribe();
        }
        let current = self.load_session(user).unwrap_or_else(|e| {
            tracing::warn!(user = %user, "could not load session for subscriber: {e}");
            None
        });
        let (tx, rx) = watch::channel(current);
        watchers.insert(user.clone(), tx);
        rx
    }
}

fn insert_history_row(conn: &Connection, entry: &HistoryEntry) -> Result<(), StoreError> {
    let blocks = serde_json::to_string(&entry.blocks)?;
    conn.execute(
        "INSERT INTO history (id, user_id, name, started_at, completed_at, duration_secs, completed_sets, blocks)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.id,
            entry.user_id.as_str(),
            entry.name,
            entry.started_at.to_rfc3339(),
            entry.completed_at.to_rfc3339(),
            entry.duration_secs,
            entry.completed_sets as u64,
            blocks,
        ],
    )?;
    Ok(())
}

impl HistoryStore for Database {
    fn insert_history(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        insert_history_row(&self.conn, entry)
    }

    fn finish_session(
        &self,
        user: &UserId,
        entry: Option<&HistoryEntry>,
        expected_revision: u64,
    ) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let found: Option<u64> = tx
            .query_row(
                "SELECT revision FROM sessions WHERE user_id = ?1",
                params![user.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if found != Some(expected_revision) {
            return Err(StoreError::Conflict {
                expected: Some(expected_revision),
                found,
            });
        }

        if let Some(entry) = entry {
            insert_history_row(&tx, entry)?;
        }
        tx.execute(
            "DELETE FROM sessions WHERE user_id = ?1",
            params![user.as_str()],
        )?;
        tx.commit()?;

        self.publish(user, None);
        Ok(())
    }

    fn list_history(
        &self,
        user: &UserId,
        filter: &HistoryFilter,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let limit = limit.unwrap_or(usize::MAX);
        let (lower, upper) = filter.completed_at_bounds();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HISTORY_COLUMNS} FROM history
             WHERE user_id = ?1 AND completed_at >= ?2 AND completed_at < ?3
             ORDER BY completed_at DESC"
        ))?;
        let rows = stmt.query_map(params![user.as_str(), lower, upper], row_to_history)?;

        // Name matching is Unicode-aware, so it stays out of SQL; rows stream
        // in order and reading stops at the limit.
        let mut hits = Vec::new();
        for row in rows {
            if hits.len() >= limit {
                break;
            }
            let entry = decode_history(row?)?;
            if filter.matches(&entry) {
                hits.push(entry);
            }
        }
        Ok(hits)
    }

    fn get_history(&self, user: &UserId, id: &str) -> Result<Option<HistoryEntry>, StoreError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {HISTORY_COLUMNS} FROM history WHERE user_id = ?1 AND id = ?2"),
                params![user.as_str(), id],
                row_to_history,
            )
            .optional()?;
        row.map(decode_history).transpose()
    }

    fn delete_history(&self, user: &UserId, id: &str) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "DELETE FROM history WHERE user_id = ?1 AND id = ?2",
            params![user.as_str(), id],
        )?;
        Ok(changed > 0)
    }
}
