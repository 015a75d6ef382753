//! Fighter sub-states: the attack timeline and the defeat sequence

use serde::{Deserialize, Serialize};

use crate::core::config::AttackConfig;

/// What a fighter is visibly doing this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementState {
    Idle,
    Running,
    Jumping,
    Attacking,
    Hitstun,
    Defeated,
    Victorious,
}

/// Phase of an attack, without its timing payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPhase {
    Startup,
    Active,
    Recovery,
}

/// An attack in progress
///
/// Absent (`None` on the fighter) when no attack is running; there is no
/// idle phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackState {
    Startup { elapsed: f32 },
    Active { elapsed: f32, has_connected: bool },
    Recovery { elapsed: f32 },
}

impl AttackState {
    pub fn begin() -> Self {
        AttackState::Startup { elapsed: 0.0 }
    }

    pub fn phase(&self) -> AttackPhase {
        match self {
            AttackState::Startup { .. } => AttackPhase::Startup,
            AttackState::Active { .. } => AttackPhase::Active,
            AttackState::Recovery { .. } => AttackPhase::Recovery,
        }
    }

    pub fn elapsed(&self) -> f32 {
        match *self {
            AttackState::Startup { elapsed }
            | AttackState::Active { elapsed, .. }
            | AttackState::Recovery { elapsed } => elapsed,
        }
    }

    /// Only an Active attack that has not landed can still deal damage
    pub fn can_connect(&self) -> bool {
        matches!(self, AttackState::Active { has_connected: false, .. })
    }

    pub fn has_connected(&self) -> bool {
        matches!(self, AttackState::Active { has_connected: true, .. })
    }

    /// Record a landed hit; returns false if this attack cannot connect
    pub fn mark_connected(&mut self) -> bool {
        match self {
            AttackState::Active { has_connected, .. } if !*has_connected => {
                *has_connected = true;
                true
            }
            _ => false,
        }
    }

    /// Is the attacker still committed before or during the hit window?
    pub fn is_threatening(&self) -> bool {
        matches!(self, AttackState::Startup { .. } | AttackState::Active { .. })
    }

    fn phase_duration(&self, config: &AttackConfig) -> f32 {
        match self {
            AttackState::Startup { .. } => config.startup,
            AttackState::Active { .. } => config.active,
            AttackState::Recovery { .. } => config.recovery,
        }
    }

    /// Advance the timeline by `dt`
    ///
    /// At most one phase boundary is crossed per call; time past the
    /// boundary carries into the next phase. Returns `None` once Recovery
    /// has run out.
    pub fn advanced(self, dt: f32, config: &AttackConfig) -> Option<Self> {
        let elapsed = self.elapsed() + dt;
        let limit = self.phase_duration(config);
        if elapsed < limit {
            return Some(match self {
                AttackState::Startup { .. } => AttackState::Startup { elapsed },
                AttackState::Active { has_connected, .. } => {
                    AttackState::Active { elapsed, has_connected }
                }
                AttackState::Recovery { .. } => AttackState::Recovery { elapsed },
            });
        }

        let carry = elapsed - limit;
        match self {
            AttackState::Startup { .. } => Some(AttackState::Active {
                elapsed: carry,
                has_connected: false,
            }),
            AttackState::Active { .. } => Some(AttackState::Recovery { elapsed: carry }),
            AttackState::Recovery { .. } => None,
        }
    }
}

/// Which floor impact of the defeat sequence happened this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingEvent {
    First,
    Second,
}

/// Bookkeeping for the defeat fall; only meaningful once defeated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefeatState {
    /// Resting height of the body, slightly below the normal floor
    pub floor_y: f32,
    pub gravity_multiplier: f32,
    pub impact_count: u8,
    /// Set only on the tick an impact happens
    pub last_landing_event: Option<LandingEvent>,
    /// +1 or -1: direction the body slides after the second impact
    pub knock_dir: f32,
}

impl DefeatState {
    pub fn new(floor_y: f32, gravity_multiplier: f32, knock_dir: f32) -> Self {
        Self {
            floor_y,
            gravity_multiplier,
            impact_count: 0,
            last_landing_event: None,
            knock_dir,
        }
    }
}
