//! Per-tick control intents derived from held actions

use serde::{Deserialize, Serialize};

use crate::fighter::Combatant;
use crate::input::manager::{Action, ActionSource};

/// Horizontal steering for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Horizontal {
    Left,
    Right,
    #[default]
    Neutral,
}

/// What the player asked for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlIntent {
    pub horizontal: Horizontal,
    /// Up was pressed this tick
    pub jump: bool,
    /// Attack was pressed this tick
    pub attack: bool,
}

/// Turns level-triggered actions into intents
///
/// Movement follows the held state; jump and attack fire once per press.
#[derive(Debug, Clone, Default)]
pub struct IntentReader {
    up_held: bool,
    attack_held: bool,
}

impl IntentReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&mut self, source: &dyn ActionSource) -> ControlIntent {
        let left = source.is_action_active(Action::Left);
        let right = source.is_action_active(Action::Right);
        let up = source.is_action_active(Action::Up);
        let attack = source.is_action_active(Action::Attack);

        let horizontal = match (left, right) {
            (true, false) => Horizontal::Left,
            (false, true) => Horizontal::Right,
            _ => Horizontal::Neutral,
        };
        let intent = ControlIntent {
            horizontal,
            jump: up && !self.up_held,
            attack: attack && !self.attack_held,
        };
        self.up_held = up;
        self.attack_held = attack;
        intent
    }

    /// Forget held state, so a key still down after a reset fires again
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Drive a fighter from an intent
///
/// Jump and attack are dropped while the fighter is in hitstun.
pub fn apply_intent(fighter: &mut Combatant, intent: ControlIntent) {
    if !fighter.is_in_play() {
        return;
    }
    let stunned = fighter.hitstun_remaining > 0.0;
    if intent.jump && !stunned {
        fighter.jump();
    }
    if intent.attack && !stunned {
        fighter.start_attack();
    }
    match intent.horizontal {
        Horizontal::Left => fighter.move_left(),
        Horizontal::Right => fighter.move_right(),
        Horizontal::Neutral => fighter.stop(),
    }
}
