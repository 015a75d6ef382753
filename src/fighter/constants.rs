//! Fighter tuning constants - every fixed physics number in one place
//!
//! Knockback magnitudes are given at physics scale 1.0 and multiplied by
//! `StageConfig::physics_scale` where they are applied.

// Grounding
pub const GROUND_EPSILON: f32 = 0.5;
pub const RUNNING_SPEED_THRESHOLD: f32 = 1.0;
pub const VERTICAL_REST_EPSILON: f32 = 1e-3;

// Hit reaction
pub const HIT_KNOCKBACK: f32 = 620.0;
pub const DEFEAT_KNOCKBACK: f32 = 1800.0;
pub const HITSTUN_SECONDS: f32 = 0.24;
/// Per-tick multiplier on knockback while in hitstun
pub const HITSTUN_KNOCKBACK_FRICTION: f32 = 0.85;

// Defeat sequence
/// Per-tick multiplier on knockback while defeated
pub const DEFEAT_KNOCKBACK_FRICTION: f32 = 0.9;
pub const DEFEAT_GRAVITY_MULTIPLIER: f32 = 0.4;
/// How far below the normal floor a defeated body comes to rest
pub const DEFEAT_FLOOR_DROP: f32 = 10.0;
/// Initial downward push on defeat, as a fraction of jump speed
pub const DEFEAT_DROP_IMPULSE: f32 = 0.1;
/// Bounce after the first impact, as a fraction of jump speed
pub const FIRST_IMPACT_REBOUND: f32 = 0.42;
pub const SECOND_IMPACT_KNOCKBACK: f32 = 900.0;
/// Defeat clip frames shown on each impact
pub const FIRST_IMPACT_FRAME: usize = 2;
pub const SECOND_IMPACT_FRAME: usize = 4;
pub const MAX_DEFEAT_IMPACTS: u8 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frictions_decay() {
        assert!(HITSTUN_KNOCKBACK_FRICTION > 0.0 && HITSTUN_KNOCKBACK_FRICTION < 1.0);
        assert!(DEFEAT_KNOCKBACK_FRICTION > 0.0 && DEFEAT_KNOCKBACK_FRICTION < 1.0);
    }

    #[test]
    fn test_knockback_ordering() {
        assert!(DEFEAT_KNOCKBACK > SECOND_IMPACT_KNOCKBACK);
        assert!(SECOND_IMPACT_KNOCKBACK > HIT_KNOCKBACK);
    }

    #[test]
    fn test_defeat_fall_is_lighter() {
        assert!(DEFEAT_GRAVITY_MULTIPLIER < 1.0);
        assert!(FIRST_IMPACT_FRAME < SECOND_IMPACT_FRAME);
    }
}
