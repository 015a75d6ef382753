//! Aggregate statistics and the end-of-run report

use serde::{Deserialize, Serialize};

use crate::core::types::Side;
use crate::simulation::duel::Duel;

/// Running totals, indexed by `Side::index()`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuelStats {
    pub hits_landed: [u32; 2],
    pub damage_dealt: [u32; 2],
    pub knockouts: [u32; 2],
}

/// Serializable outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelSummary {
    pub winner: Option<Side>,
    pub match_over: bool,
    pub rounds_played: u32,
    pub wins: [u32; 2],
    pub hits_landed: [u32; 2],
    pub damage_dealt: [u32; 2],
    pub final_hp: [i32; 2],
    pub ticks: u64,
    pub elapsed_seconds: f64,
    pub seed: u64,
}

impl DuelSummary {
    pub fn from_duel(duel: &Duel) -> Self {
        let orch = duel.orchestrator();
        let stats = duel.stats();
        Self {
            winner: duel.winner(),
            match_over: duel.is_match_over(),
            rounds_played: orch.round_number(),
            wins: [orch.wins(Side::A), orch.wins(Side::B)],
            hits_landed: stats.hits_landed,
            damage_dealt: stats.damage_dealt,
            final_hp: [duel.fighter(Side::A).hp, duel.fighter(Side::B).hp],
            ticks: duel.current_tick(),
            elapsed_seconds: duel.elapsed(),
            seed: duel.config().ai.seed,
        }
    }
}
