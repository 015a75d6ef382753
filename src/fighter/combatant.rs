//! The fighter entity: movement, attack timeline, hit reactions and physics

use crate::animation::{AnimState, AnimationPlayer, Animator, FrameBox};
use crate::core::config::{AttackConfig, FighterConfig, StageConfig};
use crate::core::types::{Facing, Rect, Side, Vec2};
use crate::fighter::constants::*;
use crate::fighter::geometry::{configured_hitbox, heuristic_hitbox, heuristic_hurtbox, meta_box_to_local};
use crate::fighter::state::{AttackPhase, AttackState, DefeatState, LandingEvent, MovementState};

/// One of the two fighters
///
/// Created once per match and reset between rounds. All fields except the
/// ones written by hit resolution and separation are owned by `update()`.
#[derive(Debug)]
pub struct Combatant {
    pub side: Side,
    /// Bottom-left of the fighter's frame (y grows upward)
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub hp: i32,
    pub max_hp: i32,
    /// Attack in progress, if any
    pub attack: Option<AttackState>,
    pub hitstun_remaining: f32,
    /// Imposed horizontal velocity, decays while nonzero
    pub knockback_vx: f32,
    /// Set by a landed hit, for hit-reaction cues
    pub was_hit: bool,
    pub defeated: bool,
    pub victorious: bool,
    pub defeat: DefeatState,
    config: FighterConfig,
    stage: StageConfig,
    anim: Box<dyn Animator>,
}

impl Combatant {
    pub fn new(
        side: Side,
        config: &FighterConfig,
        stage: &StageConfig,
        anim: Box<dyn Animator>,
        spawn_x: f32,
        facing: Facing,
    ) -> Self {
        let mut fighter = Self {
            side,
            position: Vec2::new(spawn_x, stage.floor_y),
            velocity: Vec2::zero(),
            facing,
            hp: config.max_hp,
            max_hp: config.max_hp,
            attack: None,
            hitstun_remaining: 0.0,
            knockback_vx: 0.0,
            was_hit: false,
            defeated: false,
            victorious: false,
            defeat: DefeatState::new(stage.floor_y, DEFEAT_GRAVITY_MULTIPLIER, facing.sign()),
            config: config.clone(),
            stage: stage.clone(),
            anim,
        };
        fighter.position.x = fighter.clamped_x(spawn_x);
        fighter.anim.play(AnimState::Idle, true, true);
        fighter
    }

    /// Fighter over the standard unannotated clips
    pub fn with_standard_frames(
        side: Side,
        config: &FighterConfig,
        stage: &StageConfig,
        spawn_x: f32,
        facing: Facing,
    ) -> Self {
        let anim = Box::new(AnimationPlayer::standard(config.frame_px));
        Self::new(side, config, stage, anim, spawn_x, facing)
    }

    /// Reinitialise for a new round without recreating the fighter
    pub fn reset_for_round(&mut self, spawn_x: f32, facing: Facing) {
        self.position = Vec2::new(self.clamped_x(spawn_x), self.stage.floor_y);
        self.velocity = Vec2::zero();
        self.facing = facing;
        self.hp = self.max_hp;
        self.attack = None;
        self.hitstun_remaining = 0.0;
        self.knockback_vx = 0.0;
        self.was_hit = false;
        self.defeated = false;
        self.victorious = false;
        self.defeat = DefeatState::new(self.stage.floor_y, DEFEAT_GRAVITY_MULTIPLIER, facing.sign());
        self.anim.play(AnimState::Idle, true, true);
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn attack_config(&self) -> &AttackConfig {
        &self.config.attack
    }

    pub fn config(&self) -> &FighterConfig {
        &self.config
    }

    pub fn stage(&self) -> &StageConfig {
        &self.stage
    }

    pub fn animation(&self) -> &dyn Animator {
        self.anim.as_ref()
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn floor_y(&self) -> f32 {
        self.stage.floor_y
    }

    pub fn body_size(&self) -> f32 {
        self.config.body_size()
    }

    pub fn min_x(&self) -> f32 {
        self.stage.margin
    }

    pub fn max_x(&self) -> f32 {
        self.stage.width - self.body_size() - self.stage.margin
    }

    pub fn attack_phase(&self) -> Option<AttackPhase> {
        self.attack.map(|a| a.phase())
    }

    pub fn last_landing_event(&self) -> Option<LandingEvent> {
        self.defeat.last_landing_event
    }

    pub fn is_grounded(&self) -> bool {
        self.position.y <= self.stage.floor_y + GROUND_EPSILON
    }

    /// Height above the normal floor
    pub fn height_above_floor(&self) -> f32 {
        self.position.y - self.stage.floor_y
    }

    /// Can intents and hits affect this fighter?
    pub fn is_in_play(&self) -> bool {
        !self.defeated && !self.victorious
    }

    /// Derived state, highest priority first
    pub fn movement_state(&self) -> MovementState {
        let resting = self.is_grounded() && self.velocity.y.abs() < VERTICAL_REST_EPSILON;
        let attack_clip_done =
            self.anim.current_state() == AnimState::Attack && self.anim.is_animation_finished();

        if self.victorious {
            MovementState::Victorious
        } else if self.defeated {
            MovementState::Defeated
        } else if self.hitstun_remaining > 0.0 {
            MovementState::Hitstun
        } else if self.attack.is_some() && !attack_clip_done {
            MovementState::Attacking
        } else if !resting {
            MovementState::Jumping
        } else if self.velocity.x.abs() > RUNNING_SPEED_THRESHOLD {
            MovementState::Running
        } else {
            MovementState::Idle
        }
    }

    // ---------------------------------------------------------------
    // Intents
    // ---------------------------------------------------------------

    pub fn move_left(&mut self) {
        self.velocity.x = -self.config.move_speed;
        self.facing = Facing::Left;
    }

    pub fn move_right(&mut self) {
        self.velocity.x = self.config.move_speed;
        self.facing = Facing::Right;
    }

    pub fn stop(&mut self) {
        self.velocity.x = 0.0;
    }

    /// Ignored while airborne
    pub fn jump(&mut self) {
        if self.is_in_play() && self.is_grounded() {
            self.velocity.y = self.config.jump_speed;
        }
    }

    pub fn face_toward(&mut self, x: f32) {
        self.facing = if x >= self.position.x { Facing::Right } else { Facing::Left };
    }

    /// Begin an attack; ignored while one is running or once the round is decided
    pub fn start_attack(&mut self) -> bool {
        if self.attack.is_some() || !self.is_in_play() {
            return false;
        }
        self.attack = Some(AttackState::begin());
        self.anim.play(AnimState::Attack, false, true);
        tracing::debug!("{:?} starts an attack at x={:.1}", self.side, self.position.x);
        true
    }

    // ---------------------------------------------------------------
    // Reaction hooks
    // ---------------------------------------------------------------

    pub fn on_hit(&mut self) {
        self.was_hit = true;
        self.anim.play(AnimState::Hit, false, true);
    }

    pub fn on_defeat(&mut self) {
        self.defeated = true;
        self.victorious = false;
        self.attack = None;
        // knockback_vx still carries the body
        self.velocity.x = 0.0;
        self.defeat.floor_y = (self.stage.floor_y - DEFEAT_FLOOR_DROP).max(0.0);
        self.velocity.y = -self.config.jump_speed.abs() * DEFEAT_DROP_IMPULSE;
        self.defeat.impact_count = 0;
        self.defeat.last_landing_event = None;
        self.anim.play(AnimState::Defeat, false, true);
    }

    pub fn on_victory(&mut self) {
        self.victorious = true;
        self.defeated = false;
        self.attack = None;
        self.velocity = Vec2::zero();
        self.anim.play(AnimState::Victory, true, true);
    }

    // ---------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------

    fn frame_size_px(&self) -> (f32, f32) {
        self.anim.current_frame_size()
    }

    fn frame_size_world(&self) -> (f32, f32) {
        let (w, h) = self.frame_size_px();
        (w * self.config.render_scale, h * self.config.render_scale)
    }

    fn authored_box(&self, kind: FrameBox) -> Option<Rect> {
        let raw = self.anim.current_frame_box(kind)?;
        let (fw, fh) = self.frame_size_px();
        Some(meta_box_to_local(raw, fw, fh, self.facing, self.config.render_scale))
    }

    fn to_world(&self, local: Rect) -> Rect {
        local.translated(self.position.x, self.position.y)
    }

    /// Rectangle that can receive damage, in world coordinates
    pub fn hurtbox(&self) -> Rect {
        if let Some(local) = self.authored_box(FrameBox::Hurtbox) {
            return self.to_world(local);
        }
        let (fw, fh) = self.frame_size_world();
        if fw <= 0.0 || fh <= 0.0 {
            let body = self.body_size();
            return self.to_world(heuristic_hurtbox(body, body));
        }
        self.to_world(heuristic_hurtbox(fw, fh))
    }

    /// Damage-dealing rectangle while an attack is running
    pub fn attack_hitbox(&self) -> Option<Rect> {
        self.attack?;
        if let Some(local) = self.authored_box(FrameBox::Hitbox) {
            return Some(self.to_world(local));
        }
        let (fw, fh) = self.frame_size_world();
        if fw <= 0.0 || fh <= 0.0 {
            let local = configured_hitbox(self.body_size(), &self.config.attack, self.facing);
            return Some(self.to_world(local));
        }
        let progress = (self.anim.current_state() == AnimState::Attack).then(|| self.anim.progress());
        Some(self.to_world(heuristic_hitbox(fw, fh, progress, self.facing)))
    }

    // ---------------------------------------------------------------
    // Physics
    // ---------------------------------------------------------------

    fn clamped_x(&self, x: f32) -> f32 {
        x.max(self.min_x()).min(self.max_x())
    }

    pub fn clamp_x(&mut self) {
        self.position.x = self.clamped_x(self.position.x);
    }

    fn apply_gravity(&mut self, gravity: f32, dt: f32) {
        self.velocity.y += gravity * dt;
        self.position.y += self.velocity.y * dt;
        if self.position.y < self.stage.floor_y {
            self.position.y = self.stage.floor_y;
            self.velocity.y = 0.0;
        }
    }

    fn update_attack(&mut self, dt: f32) {
        let Some(attack) = self.attack else {
            return;
        };
        let next = attack.advanced(dt, &self.config.attack);
        let (before, after) = (attack.phase(), next.map(|a| a.phase()));
        if after != Some(before) {
            tracing::debug!("{:?} attack {:?} -> {:?}", self.side, before, after);
        }
        self.attack = next;
    }

    fn update_defeated(&mut self, dt: f32, gravity: f32) {
        let prev_y = self.position.y;
        self.position.x += self.knockback_vx * dt;
        self.knockback_vx *= DEFEAT_KNOCKBACK_FRICTION;

        self.velocity.y += gravity * self.defeat.gravity_multiplier * dt;
        self.position.y += self.velocity.y * dt;

        let mut landed = false;
        if self.position.y < self.defeat.floor_y {
            self.position.y = self.defeat.floor_y;
            landed = prev_y > self.defeat.floor_y;
            self.velocity.y = 0.0;
        }

        if landed && self.defeat.impact_count < MAX_DEFEAT_IMPACTS {
            self.defeat.impact_count += 1;
            if self.defeat.impact_count == 1 {
                self.defeat.last_landing_event = Some(LandingEvent::First);
                self.anim.seek(FIRST_IMPACT_FRAME);
                self.velocity.y = self.config.jump_speed * FIRST_IMPACT_REBOUND;
            } else {
                self.defeat.last_landing_event = Some(LandingEvent::Second);
                self.anim.seek(SECOND_IMPACT_FRAME);
                self.knockback_vx =
                    self.defeat.knock_dir * SECOND_IMPACT_KNOCKBACK * self.stage.physics_scale;
                self.velocity.y = 0.0;
            }
        }
        self.clamp_x();
    }

    fn update_hitstun(&mut self, dt: f32, gravity: f32) {
        self.hitstun_remaining -= dt;
        self.position.x += self.knockback_vx * dt;
        self.knockback_vx *= HITSTUN_KNOCKBACK_FRICTION;
        self.apply_gravity(gravity, dt);
        self.clamp_x();

        if self.hitstun_remaining <= 0.0 {
            self.hitstun_remaining = 0.0;
            self.knockback_vx = 0.0;
        }
    }

    /// Pick the clip matching the derived state
    fn sync_animation(&mut self) {
        let (target, looped) = match self.movement_state() {
            MovementState::Victorious => (AnimState::Victory, true),
            MovementState::Defeated => (AnimState::Defeat, false),
            MovementState::Hitstun => (AnimState::Hit, false),
            MovementState::Attacking => (AnimState::Attack, false),
            MovementState::Jumping => (AnimState::Jump, true),
            MovementState::Running => (AnimState::Run, true),
            MovementState::Idle => (AnimState::Idle, true),
        };
        if self.anim.current_state() != target {
            self.anim.play(target, looped, false);
        }
    }

    /// Advance one tick
    pub fn update(&mut self, dt: f32, gravity: f32) {
        self.defeat.last_landing_event = None;

        if self.victorious {
            // A winner caught mid-jump drops to the floor, then stands still
            self.velocity.x = 0.0;
            self.knockback_vx = 0.0;
            if self.is_grounded() {
                self.velocity.y = 0.0;
            } else {
                self.apply_gravity(gravity, dt);
            }
        } else if self.defeated {
            self.update_defeated(dt, gravity);
        } else if self.hitstun_remaining > 0.0 {
            self.update_hitstun(dt, gravity);
        } else {
            self.position.x += self.velocity.x * dt;
            self.apply_gravity(gravity, dt);
            self.clamp_x();
            self.update_attack(dt);
        }

        self.sync_animation();
        self.anim.advance(dt);
    }
}
