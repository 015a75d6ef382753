//! Cross-fighter interaction: hit resolution and body separation
//!
//! These are the only two places one fighter's state is written from
//! outside its own update.

pub mod hit;
pub mod separation;

pub use hit::{check_hit, HitOutcome};
pub use separation::separate;
