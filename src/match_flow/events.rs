//! Match event log consumed by HUD, audio and the headless runner

use serde::{Deserialize, Serialize};

use crate::core::types::{Side, Tick};
use crate::fighter::LandingEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub tick: Tick,
    pub event_type: MatchEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEventType {
    RoundIntro { round: u32 },
    FightBegan { round: u32 },
    Hit { attacker: Side, damage: i32, remaining_hp: i32 },
    Defeat { side: Side },
    LandingImpact { side: Side, event: LandingEvent },
    RoundWon { round: u32, winner: Side },
    /// Time ran out with equal health
    RoundDrawn { round: u32 },
    MatchWon { winner: Side },
}

/// Events produced during one or more ticks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchEventLog {
    pub events: Vec<MatchEvent>,
}

impl MatchEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: MatchEventType, description: String, tick: Tick) {
        self.events.push(MatchEvent {
            tick,
            event_type,
            description,
        });
    }

    pub fn extend(&mut self, other: MatchEventLog) {
        self.events.extend(other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchEvent> {
        self.events.iter()
    }
}
