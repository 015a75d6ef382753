//! Round and match sequencing
//!
//! RoundIntro -> Playing -> RoundOver -> (RoundIntro | MatchOver). Deferred
//! transitions go through a `Scheduler`; every handle the orchestrator
//! creates is cancelled when a new match starts.

use serde::{Deserialize, Serialize};

use crate::core::config::{RoundConfig, StageConfig, TimeUpRule};
use crate::core::types::{Facing, Side, Tick};
use crate::fighter::Combatant;
use crate::match_flow::events::{MatchEventLog, MatchEventType};
use crate::match_flow::scheduler::{Scheduler, TimerHandle, Transition, TransitionToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    RoundIntro,
    Playing,
    RoundOver,
    MatchOver,
}

/// Counters exposed to the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub round_number: u32,
    /// Indexed by `Side::index()`
    pub wins: [u32; 2],
    pub wins_to_take_match: u32,
    /// Whole seconds left on the round clock
    pub round_timer: u32,
    pub phase: MatchPhase,
}

/// Spawn x and facing for a side: 15% and 85% across the stage
pub fn spawn_point(stage: &StageConfig, body_size: f32, side: Side) -> (f32, Facing) {
    match side {
        Side::A => (stage.width * 0.15 - body_size / 2.0, Facing::Right),
        Side::B => (stage.width * 0.85 - body_size / 2.0, Facing::Left),
    }
}

#[derive(Debug)]
pub struct Orchestrator {
    config: RoundConfig,
    state: RoundState,
    generation: u64,
    pending: Vec<(TimerHandle, Transition)>,
    /// Fraction of a second not yet taken off the round clock
    clock_remainder: f32,
    winner: Option<Side>,
}

impl Orchestrator {
    pub fn new(config: &RoundConfig) -> Self {
        Self {
            config: config.clone(),
            state: RoundState {
                round_number: 1,
                wins: [0, 0],
                wins_to_take_match: config.wins_to_take_match,
                round_timer: config.round_seconds,
                phase: MatchPhase::RoundIntro,
            },
            generation: 0,
            pending: Vec::new(),
            clock_remainder: 0.0,
            winner: None,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    pub fn is_playing(&self) -> bool {
        self.state.phase == MatchPhase::Playing
    }

    pub fn round_number(&self) -> u32 {
        self.state.round_number
    }

    pub fn wins(&self, side: Side) -> u32 {
        self.state.wins[side.index()]
    }

    pub fn round_timer(&self) -> u32 {
        self.state.round_timer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Match winner, once the match is over
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    fn schedule(&mut self, scheduler: &mut dyn Scheduler, delay: f32, transition: Transition) {
        let token = TransitionToken { generation: self.generation, transition };
        let handle = scheduler.schedule_once(delay, token);
        self.pending.push((handle, transition));
    }

    /// Start (or restart) a match from round 1
    ///
    /// Any transition still pending from a previous match is cancelled and
    /// would be ignored even if it fired.
    pub fn start_match(
        &mut self,
        fighters: &mut [Combatant; 2],
        scheduler: &mut dyn Scheduler,
        events: &mut MatchEventLog,
        tick: Tick,
    ) {
        for (handle, _) in self.pending.drain(..) {
            scheduler.cancel(handle);
        }
        self.generation += 1;
        self.state.round_number = 1;
        self.state.wins = [0, 0];
        self.state.wins_to_take_match = self.config.wins_to_take_match;
        self.winner = None;
        tracing::info!("Match started (generation {})", self.generation);
        self.enter_round_intro(fighters, scheduler, events, tick);
    }

    fn enter_round_intro(
        &mut self,
        fighters: &mut [Combatant; 2],
        scheduler: &mut dyn Scheduler,
        events: &mut MatchEventLog,
        tick: Tick,
    ) {
        for fighter in fighters.iter_mut() {
            let (x, facing) = spawn_point(fighter.stage(), fighter.body_size(), fighter.side);
            fighter.reset_for_round(x, facing);
        }
        self.state.round_timer = self.config.round_seconds;
        self.clock_remainder = 0.0;
        self.state.phase = MatchPhase::RoundIntro;

        let round = self.state.round_number;
        tracing::info!("Round {} intro", round);
        events.push(MatchEventType::RoundIntro { round }, format!("Round {round}"), tick);
        self.schedule(scheduler, self.config.intro_seconds, Transition::BeginFight);
    }

    /// Apply a fired token
    ///
    /// Returns the transition actually applied; stale or out-of-phase tokens
    /// give `None`.
    pub fn handle_transition(
        &mut self,
        token: TransitionToken,
        fighters: &mut [Combatant; 2],
        scheduler: &mut dyn Scheduler,
        events: &mut MatchEventLog,
        tick: Tick,
    ) -> Option<Transition> {
        if token.generation != self.generation {
            tracing::trace!("ignoring stale {:?} from generation {}", token.transition, token.generation);
            return None;
        }
        self.pending.retain(|(_, t)| *t != token.transition);

        let round = self.state.round_number;
        match (token.transition, self.state.phase) {
            (Transition::BeginFight, MatchPhase::RoundIntro) => {
                self.state.phase = MatchPhase::Playing;
                tracing::info!("Round {} fight", round);
                events.push(MatchEventType::FightBegan { round }, "Fight!".to_string(), tick);
            }
            (Transition::NextRound, MatchPhase::RoundOver) => {
                self.state.round_number += 1;
                self.enter_round_intro(fighters, scheduler, events, tick);
            }
            (Transition::EndMatch, MatchPhase::RoundOver) => {
                self.state.phase = MatchPhase::MatchOver;
                self.winner = self.leader();
                if let Some(winner) = self.winner {
                    tracing::info!("Match won by {:?} ({}-{})", winner, self.state.wins[0], self.state.wins[1]);
                    events.push(
                        MatchEventType::MatchWon { winner },
                        format!("{winner:?} wins the match"),
                        tick,
                    );
                }
            }
            (transition, phase) => {
                tracing::trace!("ignoring {:?} during {:?}", transition, phase);
                return None;
            }
        }
        Some(token.transition)
    }

    fn leader(&self) -> Option<Side> {
        let need = self.state.wins_to_take_match;
        [Side::A, Side::B].into_iter().find(|side| self.state.wins[side.index()] >= need)
    }

    /// Run the round clock; call once per tick
    pub fn advance_clock(
        &mut self,
        dt: f32,
        fighters: &mut [Combatant; 2],
        scheduler: &mut dyn Scheduler,
        events: &mut MatchEventLog,
        tick: Tick,
    ) {
        if !self.is_playing() || self.state.round_timer == 0 {
            return;
        }
        self.clock_remainder += dt;
        while self.clock_remainder >= 1.0 && self.state.round_timer > 0 {
            self.clock_remainder -= 1.0;
            self.state.round_timer -= 1;
        }
        if self.state.round_timer == 0 {
            self.on_time_up(fighters, scheduler, events, tick);
        }
    }

    fn on_time_up(
        &mut self,
        fighters: &mut [Combatant; 2],
        scheduler: &mut dyn Scheduler,
        events: &mut MatchEventLog,
        tick: Tick,
    ) {
        match self.config.time_up {
            TimeUpRule::Cosmetic => {
                tracing::debug!("Round clock expired; play continues until a knockout");
            }
            TimeUpRule::HigherHealthWins => {
                let (hp_a, hp_b) = (fighters[0].hp, fighters[1].hp);
                let round = self.state.round_number;
                if hp_a == hp_b {
                    tracing::info!("Round {} drawn on time", round);
                    events.push(MatchEventType::RoundDrawn { round }, "Time! Draw".to_string(), tick);
                    for fighter in fighters.iter_mut() {
                        fighter.stop();
                    }
                    self.end_round(scheduler);
                } else {
                    let winner = if hp_a > hp_b { Side::A } else { Side::B };
                    fighters[winner.index()].on_victory();
                    fighters[winner.opponent().index()].stop();
                    self.award_round(winner, scheduler, events, tick);
                }
            }
        }
    }

    /// A knockout ended the round; ignored unless the round is live
    pub fn on_knockout(
        &mut self,
        winner: Side,
        scheduler: &mut dyn Scheduler,
        events: &mut MatchEventLog,
        tick: Tick,
    ) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.award_round(winner, scheduler, events, tick);
        true
    }

    fn award_round(
        &mut self,
        winner: Side,
        scheduler: &mut dyn Scheduler,
        events: &mut MatchEventLog,
        tick: Tick,
    ) {
        self.state.wins[winner.index()] += 1;
        let round = self.state.round_number;
        tracing::info!(
            "Round {} won by {:?} (wins {}-{})",
            round,
            winner,
            self.state.wins[0],
            self.state.wins[1]
        );
        events.push(
            MatchEventType::RoundWon { round, winner },
            format!("{winner:?} wins round {round}"),
            tick,
        );
        self.end_round(scheduler);
    }

    fn end_round(&mut self, scheduler: &mut dyn Scheduler) {
        self.state.phase = MatchPhase::RoundOver;
        let next = if self.leader().is_some() {
            Transition::EndMatch
        } else {
            Transition::NextRound
        };
        self.schedule(scheduler, self.config.round_over_seconds, next);
    }
}
