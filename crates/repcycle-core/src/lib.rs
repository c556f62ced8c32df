//! # repcycle Core Library
//!
//! This library provides the core business logic for repcycle, a workout
//! planner and player. Planned exercise sets are composed into templates,
//! and a template is played back as a timed, step-by-step session whose
//! progress is persisted after every transition.
//!
//! ## Architecture
//!
//! - **Plan**: planned sets and templates, with validation
//! - **Playback**: flattening, the block state machine, the rest countdown
//!   and the engine that persists each transition
//! - **History**: finalizing sessions into history entries and querying them
//! - **Storage**: SQLite-backed store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PlaybackEngine`]: re-fetch, transition, persist
//! - [`flatten`]: template to playback blocks
//! - [`finalize`]: completed blocks to a [`HistoryEntry`]
//! - [`Database`]: planned sets, templates, sessions and history
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod history;
pub mod identity;
pub mod plan;
pub mod playback;
pub mod storage;

pub use error::{ConfigError, CoreError, PlaybackError, StoreError, ValidationError};
pub use events::Event;
pub use history::{finalize, HistoryBlock, HistoryEntry, HistoryFilter};
pub use identity::UserId;
pub use plan::{PlannedSet, PlannedSetLookup, Template, TemplateBlock};
pub use playback::{
    flatten, BlockKind, BlockStatus, DriveOutcome, Flattened, PlaybackBlock, PlaybackEngine,
    RestTimer, Session, TickDriver,
};
pub use storage::{Config, Database, HistoryStore, SessionStore};
