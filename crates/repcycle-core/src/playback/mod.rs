mod block;
mod countdown;
mod driver;
mod engine;
mod flatten;
pub mod machine;
mod session;

pub use block::{BlockKind, BlockStatus, PlaybackBlock, RestOrigin};
pub use countdown::{format_elapsed, tick, Countdown, ElapsedClock, TickOutcome};
pub use driver::{DriveOutcome, TickDriver};
pub use engine::PlaybackEngine;
pub use flatten::{flatten, Flattened};
pub use machine::Transition;
pub use session::{observe, Progress, RestTimer, Session};
