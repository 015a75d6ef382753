//! Opponent AI
//!
//! A think-timer driven state machine (Approach / Pressure / Evade) with
//! per-tick overrides. Randomness comes from a seeded `StdRng`, so a run is
//! reproducible for a given seed.

pub mod behavior;
pub mod controller;

pub use behavior::{AiFacts, Behavior, BehaviorKind};
pub use controller::{AiController, AttackReason};
