//! The fixed-rate tick driver tying fighters, AI, combat and rounds together

use crate::ai::AiController;
use crate::animation::{Animator, AnimationPlayer, FrameTable};
use crate::combat::{check_hit, separate, HitOutcome};
use crate::core::config::MatchConfig;
use crate::core::error::Result;
use crate::core::types::{Facing, Side, Tick};
use crate::fighter::Combatant;
use crate::input::{apply_intent, ActionSource, ControlIntent, IntentReader};
use crate::match_flow::{
    spawn_point, ManualClock, MatchEventLog, MatchEventType, MatchPhase, Orchestrator, Transition,
};
use crate::simulation::summary::DuelStats;

/// One match between side A (player, or AI when enabled) and side B (AI)
#[derive(Debug)]
pub struct Duel {
    config: MatchConfig,
    fighters: [Combatant; 2],
    /// Drives side B
    ai: AiController,
    /// Drives side A instead of player input when set
    ai_for_a: Option<AiController>,
    intents: IntentReader,
    orchestrator: Orchestrator,
    clock: ManualClock,
    tick: Tick,
    elapsed: f64,
    stats: DuelStats,
    /// Events raised outside a tick, handed out with the next one
    pending: MatchEventLog,
}

impl Duel {
    /// Duel over the standard unannotated animation clips
    pub fn new(config: MatchConfig) -> Result<Self> {
        let px = config.fighter.frame_px;
        Self::with_animators(
            config,
            Box::new(AnimationPlayer::standard(px)),
            Box::new(AnimationPlayer::standard(px)),
        )
    }

    /// Duel between two characters of a loaded frame table
    pub fn from_frame_table(config: MatchConfig, table: &FrameTable, character_a: &str, character_b: &str) -> Result<Self> {
        let frames_a = table.character(character_a)?;
        frames_a.require_complete(character_a)?;
        let frames_b = table.character(character_b)?;
        frames_b.require_complete(character_b)?;
        Self::with_animators(
            config,
            Box::new(AnimationPlayer::new(frames_a)),
            Box::new(AnimationPlayer::new(frames_b)),
        )
    }

    pub fn with_animators(config: MatchConfig, anim_a: Box<dyn Animator>, anim_b: Box<dyn Animator>) -> Result<Self> {
        config.validate()?;

        let body = config.fighter.body_size();
        let (xa, fa) = spawn_point(&config.stage, body, Side::A);
        let (xb, fb) = spawn_point(&config.stage, body, Side::B);
        let fighters = [
            Combatant::new(Side::A, &config.fighter, &config.stage, anim_a, xa, fa),
            Combatant::new(Side::B, &config.fighter, &config.stage, anim_b, xb, fb),
        ];

        let mut duel = Self {
            ai: AiController::new(&config.ai),
            ai_for_a: None,
            intents: IntentReader::new(),
            orchestrator: Orchestrator::new(&config.rounds),
            clock: ManualClock::new(),
            tick: 0,
            elapsed: 0.0,
            stats: DuelStats::default(),
            pending: MatchEventLog::new(),
            fighters,
            config,
        };
        duel.start_match();
        Ok(duel)
    }

    /// Hand side A to its own AI, seeded independently of side B's
    pub fn with_ai_for_a(mut self, seed: u64) -> Self {
        self.ai_for_a = Some(AiController::with_seed(&self.config.ai, seed));
        self
    }

    /// Restart from round 1, discarding anything still scheduled
    pub fn start_match(&mut self) {
        let mut events = MatchEventLog::new();
        self.orchestrator
            .start_match(&mut self.fighters, &mut self.clock, &mut events, self.tick);
        self.stats = DuelStats::default();
        self.reset_controllers();
        self.pending.extend(events);
    }

    fn reset_controllers(&mut self) {
        self.ai.reset();
        if let Some(ai) = self.ai_for_a.as_mut() {
            ai.reset();
        }
        self.intents.reset();
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn fighter(&self, side: Side) -> &Combatant {
        &self.fighters[side.index()]
    }

    /// Direct access for scripted setups and tests
    pub fn fighter_mut(&mut self, side: Side) -> &mut Combatant {
        &mut self.fighters[side.index()]
    }

    pub fn fighters(&self) -> &[Combatant; 2] {
        &self.fighters
    }

    pub fn ai(&self) -> &AiController {
        &self.ai
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn phase(&self) -> MatchPhase {
        self.orchestrator.phase()
    }

    pub fn is_match_over(&self) -> bool {
        self.phase() == MatchPhase::MatchOver
    }

    pub fn winner(&self) -> Option<Side> {
        self.orchestrator.winner()
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Simulated seconds since construction
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn stats(&self) -> &DuelStats {
        &self.stats
    }

    // ---------------------------------------------------------------
    // Tick
    // ---------------------------------------------------------------

    /// Advance the whole match by `dt`
    ///
    /// `input` drives side A unless side A has its own AI.
    pub fn tick(&mut self, dt: f32, input: &dyn ActionSource) -> MatchEventLog {
        self.tick += 1;
        self.elapsed += f64::from(dt);
        let mut events = std::mem::take(&mut self.pending);

        // ===== PHASE 0: DEFERRED TRANSITIONS =====
        self.phase_transitions(dt, &mut events);

        // Read every tick so a key held through the intro does not fire at "Fight!"
        let intent = self.intents.read(input);
        let playing = self.orchestrator.is_playing();

        // ===== PHASE 1: INTENTS =====
        if playing {
            self.phase_intents(dt, intent);
        }

        // ===== PHASE 2: INTEGRATION =====
        self.phase_integration(dt);

        if playing {
            // ===== PHASE 3: SEPARATION =====
            self.phase_separation();

            // ===== PHASE 4: HIT DETECTION =====
            let knockout = self.phase_hits(&mut events);

            // ===== PHASE 5: ROUND FLOW =====
            self.phase_round_flow(dt, knockout, &mut events);
        }

        // ===== PHASE 6: IMPACT CUES =====
        self.phase_impacts(&mut events);

        events
    }

    fn phase_transitions(&mut self, dt: f32, events: &mut MatchEventLog) {
        for token in self.clock.advance(dt) {
            let applied = self.orchestrator.handle_transition(
                token,
                &mut self.fighters,
                &mut self.clock,
                events,
                self.tick,
            );
            if applied == Some(Transition::NextRound) {
                self.reset_controllers();
            }
        }
    }

    fn phase_intents(&mut self, dt: f32, intent: ControlIntent) {
        let [a, b] = &mut self.fighters;
        match self.ai_for_a.as_mut() {
            Some(ai) => ai.update(a, b, dt),
            None => apply_intent(a, intent),
        }
        self.ai.update(b, a, dt);
    }

    /// Outside `Playing` this is all that runs, so knockouts and wins play out
    fn phase_integration(&mut self, dt: f32) {
        let gravity = self.config.stage.gravity;
        for fighter in self.fighters.iter_mut() {
            fighter.update(dt, gravity);
        }
    }

    fn phase_separation(&mut self) {
        let [a, b] = &mut self.fighters;
        separate(a, b);
    }

    /// A->B then B->A; returns the knockout winner, if any
    fn phase_hits(&mut self, events: &mut MatchEventLog) -> Option<Side> {
        let [a, b] = &mut self.fighters;
        let outcomes = [check_hit(a, b), check_hit(b, a)];

        let mut knockout = None;
        for outcome in outcomes.into_iter().flatten() {
            self.record_hit(&outcome, events);
            if outcome.lethal {
                knockout = Some(outcome.attacker);
            }
        }
        knockout
    }

    fn phase_round_flow(&mut self, dt: f32, knockout: Option<Side>, events: &mut MatchEventLog) {
        if let Some(winner) = knockout {
            self.stats.knockouts[winner.index()] += 1;
            self.orchestrator
                .on_knockout(winner, &mut self.clock, events, self.tick);
        }
        self.orchestrator
            .advance_clock(dt, &mut self.fighters, &mut self.clock, events, self.tick);
    }

    fn phase_impacts(&self, events: &mut MatchEventLog) {
        for fighter in &self.fighters {
            if let Some(event) = fighter.last_landing_event() {
                events.push(
                    MatchEventType::LandingImpact { side: fighter.side, event },
                    format!("{:?} hits the floor ({:?})", fighter.side, event),
                    self.tick,
                );
            }
        }
    }

    fn record_hit(&mut self, outcome: &HitOutcome, events: &mut MatchEventLog) {
        let tick = self.tick;
        self.stats.hits_landed[outcome.attacker.index()] += 1;
        self.stats.damage_dealt[outcome.attacker.index()] += outcome.damage.max(0) as u32;
        events.push(
            MatchEventType::Hit {
                attacker: outcome.attacker,
                damage: outcome.damage,
                remaining_hp: outcome.remaining_hp,
            },
            format!(
                "{:?} hits {:?} for {} ({} left)",
                outcome.attacker, outcome.defender, outcome.damage, outcome.remaining_hp
            ),
            tick,
        );
        if outcome.lethal {
            events.push(
                MatchEventType::Defeat { side: outcome.defender },
                format!("{:?} is knocked out", outcome.defender),
                tick,
            );
        }
    }

    /// Put both fighters at the given positions, facing each other
    ///
    /// Scripted setups only; the orchestrator owns normal spawning.
    pub fn place_fighters(&mut self, x_a: f32, x_b: f32) {
        let (face_a, face_b) = if x_a <= x_b {
            (Facing::Right, Facing::Left)
        } else {
            (Facing::Left, Facing::Right)
        };
        self.fighters[0].reset_for_round(x_a, face_a);
        self.fighters[1].reset_for_round(x_b, face_b);
    }
}
