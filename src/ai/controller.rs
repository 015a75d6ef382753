//! Timed decision machine driving the AI fighter

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ai::behavior::{AiFacts, Behavior, BehaviorKind};
use crate::core::config::AiConfig;
use crate::fighter::Combatant;

/// How close to a steering target counts as arrived
const ARRIVE_DISTANCE: f32 = 8.0;
/// Think delay after an anti-air swat
const ANTI_AIR_THINK_DELAY: f32 = 0.12;

/// Why the AI last started an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackReason {
    AntiAir,
    Stalemate,
    Poke,
    Pressure,
}

/// Drives one fighter's intents from what it sees of the other
///
/// Decisions are re-made only when the think timer runs out; overrides
/// (anti-air, stalemate breaker, close-range poke) act every tick.
#[derive(Debug)]
pub struct AiController {
    config: AiConfig,
    rng: StdRng,
    behavior: Behavior,
    think_timer: f32,
    attack_cooldown: f32,
    jump_cooldown: f32,
    /// Time spent in the current behavior kind
    state_timer: f32,
    /// Time spent nearly motionless without attacking
    idle_time: f32,
    last_x: Option<f32>,
    last_attack: Option<AttackReason>,
    attacks_started: u32,
}

impl AiController {
    pub fn new(config: &AiConfig) -> Self {
        Self::with_seed(config, config.seed)
    }

    pub fn with_seed(config: &AiConfig, seed: u64) -> Self {
        Self {
            config: config.clone(),
            rng: StdRng::seed_from_u64(seed),
            behavior: Behavior::default(),
            think_timer: 0.0,
            attack_cooldown: config.attack_cooldown_min,
            jump_cooldown: 0.0,
            state_timer: 0.0,
            idle_time: 0.0,
            last_x: None,
            last_attack: None,
            attacks_started: 0,
        }
    }

    /// Clear timers and plans between rounds; the RNG stream continues
    pub fn reset(&mut self) {
        self.behavior = Behavior::default();
        self.think_timer = 0.0;
        self.attack_cooldown = self.config.attack_cooldown_min;
        self.jump_cooldown = 0.0;
        self.state_timer = 0.0;
        self.idle_time = 0.0;
        self.last_x = None;
        self.last_attack = None;
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn state_timer(&self) -> f32 {
        self.state_timer
    }

    pub fn idle_time(&self) -> f32 {
        self.idle_time
    }

    pub fn last_attack(&self) -> Option<AttackReason> {
        self.last_attack
    }

    pub fn attacks_started(&self) -> u32 {
        self.attacks_started
    }

    /// Seconds until the next think, scaled by range
    pub fn think_delay(&self, distance: f32) -> f32 {
        let base = self.config.think_interval;
        if distance < self.config.poke_range {
            base * 0.55
        } else if distance < self.config.evade_range {
            base * 0.9
        } else {
            base * 1.1
        }
    }

    fn roll_attack_cooldown(&mut self) -> f32 {
        let (min, max) = (self.config.attack_cooldown_min, self.config.attack_cooldown_max);
        if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        }
    }

    fn try_attack(&mut self, me: &mut Combatant, reason: AttackReason) -> bool {
        if !me.start_attack() {
            return false;
        }
        self.attack_cooldown = self.roll_attack_cooldown();
        self.idle_time = 0.0;
        self.last_attack = Some(reason);
        self.attacks_started += 1;
        tracing::debug!("AI {:?} attacks ({:?})", me.side, reason);
        true
    }

    fn switch_to(&mut self, next: Behavior) {
        if next.kind() != self.behavior.kind() {
            tracing::debug!("AI behavior {:?} -> {:?}", self.behavior.kind(), next.kind());
            self.state_timer = 0.0;
            self.behavior = next;
        } else {
            // Same plan, new target; keeps the one-jump-per-cycle flag
            self.behavior = match (self.behavior, next) {
                (Behavior::Approach { jumped, .. }, Behavior::Approach { target_x, .. }) => {
                    Behavior::Approach { target_x, jumped }
                }
                (Behavior::Evade { jumped, .. }, Behavior::Evade { target_x, .. }) => {
                    Behavior::Evade { target_x, jumped }
                }
                (_, next) => next,
            };
        }
    }

    /// Just outside body contact, on our side of the foe
    fn pressure_target(&self, facts: &AiFacts) -> f32 {
        facts.foe_x - facts.dir_to_foe * (facts.contact_distance + self.config.pressure_standoff)
    }

    /// Pick a behavior from the decision table
    pub fn decide(&mut self, facts: &AiFacts) -> Behavior {
        let cfg = &self.config;
        if facts.cornered && (facts.foe_threatening || facts.distance < cfg.evade_range) {
            Behavior::Evade { target_x: facts.center_x, jumped: false }
        } else if facts.distance < cfg.pressure_range {
            Behavior::Pressure { target_x: self.pressure_target(facts) }
        } else if facts.distance < cfg.approach_range {
            Behavior::Approach { target_x: facts.foe_x, jumped: false }
        } else if self.rng.gen::<f32>() < cfg.far_approach_weight {
            Behavior::Approach { target_x: facts.foe_x, jumped: false }
        } else {
            Behavior::Pressure { target_x: self.pressure_target(facts) }
        }
    }

    fn track_idle(&mut self, me: &Combatant, dt: f32) {
        let moved = self.last_x.map_or(f32::INFINITY, |x| (me.x() - x).abs());
        if moved < self.config.stationary_epsilon && me.attack.is_none() {
            self.idle_time += dt;
        } else {
            self.idle_time = 0.0;
        }
        self.last_x = Some(me.x());
    }

    fn steer(me: &mut Combatant, target_x: f32) {
        let dx = target_x - me.x();
        if dx.abs() <= ARRIVE_DISTANCE {
            me.stop();
        } else if dx > 0.0 {
            me.move_right();
        } else {
            me.move_left();
        }
    }

    fn maybe_jump(&mut self, me: &mut Combatant, facts: &AiFacts) {
        let allowed = match self.behavior {
            Behavior::Approach { jumped, .. } => !jumped && facts.distance > self.config.jump_in_range,
            Behavior::Evade { jumped, .. } => !jumped,
            Behavior::Pressure { .. } => false,
        };
        if !allowed || self.jump_cooldown > 0.0 || !me.is_grounded() {
            return;
        }
        if self.rng.gen::<f32>() < self.config.jump_chance {
            me.jump();
            self.jump_cooldown = self.config.jump_cooldown;
            match &mut self.behavior {
                Behavior::Approach { jumped, .. } | Behavior::Evade { jumped, .. } => *jumped = true,
                Behavior::Pressure { .. } => {}
            }
        }
    }

    /// Run one AI tick: observe, maybe re-think, then steer `me`
    pub fn update(&mut self, me: &mut Combatant, foe: &Combatant, dt: f32) {
        if !me.is_in_play() {
            me.stop();
            return;
        }

        self.think_timer -= dt;
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.jump_cooldown = (self.jump_cooldown - dt).max(0.0);
        self.state_timer += dt;
        self.track_idle(me, dt);

        if me.hitstun_remaining > 0.0 {
            return;
        }

        let facts = AiFacts::observe(me, foe, &self.config);

        // ===== OVERRIDES =====
        if facts.anti_air_window(&self.config)
            && me.attack.is_none()
            && self.rng.gen::<f32>() < self.config.anti_air_chance
        {
            self.try_attack(me, AttackReason::AntiAir);
            self.think_timer = ANTI_AIR_THINK_DELAY;
            me.face_toward(facts.foe_x);
            return;
        }

        if self.idle_time > self.config.stalemate_seconds {
            self.switch_to(Behavior::Pressure { target_x: self.pressure_target(&facts) });
            self.try_attack(me, AttackReason::Stalemate);
            self.idle_time = 0.0;
            self.think_timer = self.think_delay(facts.distance);
        }

        if facts.distance < self.config.poke_range && self.attack_cooldown <= 0.0 {
            self.try_attack(me, AttackReason::Poke);
        }

        // Threatened in a corner: bail out now rather than at the next think
        if facts.cornered
            && facts.foe_threatening
            && facts.distance < self.config.evade_range
            && self.behavior.kind() != BehaviorKind::Evade
        {
            self.switch_to(Behavior::Evade { target_x: facts.center_x, jumped: false });
        }

        // ===== DECISION =====
        if self.think_timer <= 0.0 {
            let next = self.decide(&facts);
            self.switch_to(next);
            self.think_timer = self.think_delay(facts.distance);
        }

        // ===== EXECUTION =====
        match self.behavior {
            Behavior::Approach { .. } => {
                self.switch_to(Behavior::Approach { target_x: facts.foe_x, jumped: false });
                Self::steer(me, facts.foe_x);
            }
            Behavior::Pressure { .. } => {
                let target_x = self.pressure_target(&facts);
                self.behavior = Behavior::Pressure { target_x };
                Self::steer(me, target_x);
                if self.attack_cooldown <= 0.0 && me.attack.is_none() {
                    self.try_attack(me, AttackReason::Pressure);
                }
            }
            Behavior::Evade { target_x, .. } => {
                Self::steer(me, target_x);
            }
        }
        self.maybe_jump(me, &facts);

        // Running out of a corner faces the way we run; otherwise watch the foe
        let fleeing = self.behavior.kind() == BehaviorKind::Evade && me.velocity.x != 0.0;
        if !fleeing {
            me.face_toward(facts.foe_x);
        }
    }
}
