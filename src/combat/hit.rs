//! Hit resolution: one attacker against one defender
//!
//! Called once per ordered pair per tick while the round is live. The only
//! place besides separation that mutates a fighter it does not own.

use serde::{Deserialize, Serialize};

use crate::core::types::Side;
use crate::fighter::constants::{DEFEAT_KNOCKBACK, HITSTUN_SECONDS, HIT_KNOCKBACK};
use crate::fighter::Combatant;

/// Result of a connecting hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    pub attacker: Side,
    pub defender: Side,
    pub damage: i32,
    pub remaining_hp: i32,
    /// +1 pushes the defender right, -1 left
    pub knock_dir: f32,
    /// Defender's hp reached zero; the attacker won the round
    pub lethal: bool,
}

/// Resolve `attacker`'s attack against `defender`
///
/// Returns `None` when nothing connects: no attack, not in the Active
/// window, already connected, or the boxes do not overlap.
pub fn check_hit(attacker: &mut Combatant, defender: &mut Combatant) -> Option<HitOutcome> {
    let attack = attacker.attack?;
    if !attack.can_connect() || defender.defeated {
        return None;
    }
    let hitbox = attacker.attack_hitbox()?;
    let hurtbox = defender.hurtbox();
    if !hitbox.overlaps(&hurtbox) {
        return None;
    }

    if let Some(attack) = attacker.attack.as_mut() {
        attack.mark_connected();
    }

    let damage = attacker.attack_config().damage;
    defender.hp = (defender.hp - damage).max(0);

    let knock_dir = if defender.x() > attacker.x() { 1.0 } else { -1.0 };
    let scale = defender.stage().physics_scale;
    defender.defeat.knock_dir = knock_dir;
    defender.knockback_vx = knock_dir * HIT_KNOCKBACK * scale;
    defender.hitstun_remaining = HITSTUN_SECONDS;
    defender.on_hit();

    let lethal = defender.hp == 0;
    if lethal {
        defender.knockback_vx = knock_dir * DEFEAT_KNOCKBACK * scale;
        defender.on_defeat();
        attacker.on_victory();
    }

    tracing::debug!(
        "{:?} hits {:?} for {} (hp {}{})",
        attacker.side,
        defender.side,
        damage,
        defender.hp,
        if lethal { ", knockout" } else { "" }
    );

    Some(HitOutcome {
        attacker: attacker.side,
        defender: defender.side,
        damage,
        remaining_hp: defender.hp,
        knock_dir,
        lethal,
    })
}
