//! AI behavior states and the facts decisions are made from

use serde::{Deserialize, Serialize};

use crate::core::config::AiConfig;
use crate::fighter::Combatant;

/// Current high-level plan of the AI fighter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    /// Close the distance; may jump in from far away
    Approach { target_x: f32, jumped: bool },
    /// Hold just outside the foe and attack on cooldown
    Pressure { target_x: f32 },
    /// Get out of a corner toward stage centre
    Evade { target_x: f32, jumped: bool },
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior::Approach { target_x: 0.0, jumped: false }
    }
}

/// Discriminant of `Behavior`, for comparisons and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorKind {
    Approach,
    Pressure,
    Evade,
}

impl Behavior {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Approach { .. } => BehaviorKind::Approach,
            Behavior::Pressure { .. } => BehaviorKind::Pressure,
            Behavior::Evade { .. } => BehaviorKind::Evade,
        }
    }

    pub fn target_x(&self) -> f32 {
        match *self {
            Behavior::Approach { target_x, .. }
            | Behavior::Pressure { target_x }
            | Behavior::Evade { target_x, .. } => target_x,
        }
    }
}

/// Snapshot of the situation, taken once per AI tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiFacts {
    pub my_x: f32,
    pub foe_x: f32,
    pub distance: f32,
    /// +1 when the foe is to the right
    pub dir_to_foe: f32,
    /// Foe is in the Startup or Active part of an attack
    pub foe_threatening: bool,
    /// Foe's height above its floor
    pub foe_height: f32,
    pub cornered: bool,
    /// Centre distance at which the two hurtboxes touch
    pub contact_distance: f32,
    /// Position that puts the AI fighter in the middle of the stage
    pub center_x: f32,
}

impl AiFacts {
    pub fn observe(me: &Combatant, foe: &Combatant, config: &AiConfig) -> Self {
        let distance = (foe.x() - me.x()).abs();
        let cornered =
            me.x() - me.min_x() < config.corner_margin || me.max_x() - me.x() < config.corner_margin;
        let (mine, theirs) = (me.hurtbox(), foe.hurtbox());
        let contact_distance = if foe.x() > me.x() {
            (mine.right() - me.x()) - (theirs.x - foe.x())
        } else {
            (theirs.right() - foe.x()) - (mine.x - me.x())
        };
        Self {
            my_x: me.x(),
            foe_x: foe.x(),
            distance,
            dir_to_foe: if foe.x() > me.x() { 1.0 } else { -1.0 },
            foe_threatening: foe.attack.is_some_and(|a| a.is_threatening()),
            foe_height: foe.height_above_floor(),
            cornered,
            contact_distance: contact_distance.max(0.0),
            center_x: (me.min_x() + me.max_x()) / 2.0,
        }
    }

    /// Foe is off the ground and close enough to swat
    pub fn anti_air_window(&self, config: &AiConfig) -> bool {
        self.foe_height > config.anti_air_height && self.distance < config.anti_air_range
    }
}
