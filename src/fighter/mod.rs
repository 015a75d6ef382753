//! Fighter entity and everything it owns
//!
//! A `Combatant` is mutated only by its own `update()` and intents, except
//! for the fields hit resolution and separation write.

pub mod combatant;
pub mod constants;
pub mod geometry;
pub mod state;

pub use combatant::Combatant;
pub use geometry::{configured_hitbox, heuristic_hitbox, heuristic_hurtbox, meta_box_to_local, normalize_meta_box};
pub use state::{AttackPhase, AttackState, DefeatState, LandingEvent, MovementState};
