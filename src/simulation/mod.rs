//! Match simulation
//!
//! Each tick runs, in order: deferred transitions, phase gate and intents,
//! physics integration, separation, hit detection both ways, round flow,
//! then landing-impact cues. Single threaded; nothing blocks mid-tick.

pub mod duel;
pub mod summary;

pub use duel::Duel;
pub use summary::{DuelStats, DuelSummary};
