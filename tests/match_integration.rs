//! Round and match flow integration tests, driven through `Duel::tick`

use duel_sim::ai::Behavior;
use duel_sim::core::{MatchConfig, RoundConfig, Side, TimeUpRule};
use duel_sim::fighter::LandingEvent;
use duel_sim::input::{Action, InputManager, InputSource};
use duel_sim::match_flow::{MatchEvent, MatchEventType, MatchPhase};
use duel_sim::simulation::Duel;

const DT: f32 = 1.0 / 60.0;

fn run_until(duel: &mut Duel, input: &InputManager, max_seconds: f32, done: impl Fn(&Duel) -> bool) -> Vec<MatchEvent> {
    let mut events = Vec::new();
    let max_ticks = (max_seconds / DT).ceil() as usize;
    for _ in 0..max_ticks {
        if done(duel) {
            break;
        }
        events.extend(duel.tick(DT, input).events);
    }
    events
}

fn run_for(duel: &mut Duel, input: &InputManager, seconds: f32) -> Vec<MatchEvent> {
    run_until(duel, input, seconds, |_| false)
}

/// Put the fighters body to body with B one hit from defeat, then have the
/// player attack until the round is decided
fn knock_out_b(duel: &mut Duel) -> Vec<MatchEvent> {
    let idle = InputManager::new();
    run_until(duel, &idle, 10.0, is_playing);
    assert_eq!(duel.phase(), MatchPhase::Playing);

    duel.place_fighters(400.0, 450.0);
    duel.fighter_mut(Side::B).hp = 10;

    let mut attack = InputManager::new();
    attack.set(Action::Attack, true, InputSource::Scripted);
    run_until(duel, &attack, 1.0, |d| d.phase() != MatchPhase::Playing)
}

fn is_playing(duel: &Duel) -> bool {
    duel.phase() == MatchPhase::Playing
}

#[test]
fn test_intro_gates_player_input() {
    let mut duel = Duel::new(MatchConfig::default()).unwrap();
    let start_x = duel.fighter(Side::A).x();
    let mut right = InputManager::new();
    right.set(Action::Right, true, InputSource::Keyboard);

    run_for(&mut duel, &right, 2.5);
    assert_eq!(duel.phase(), MatchPhase::RoundIntro);
    assert_eq!(duel.fighter(Side::A).x(), start_x);

    run_for(&mut duel, &right, 1.0);
    assert_eq!(duel.phase(), MatchPhase::Playing);
    assert!(duel.fighter(Side::A).x() > start_x);
}

#[test]
fn test_held_attack_fires_once() {
    let mut duel = Duel::new(MatchConfig::default()).unwrap();
    let idle = InputManager::new();
    run_until(&mut duel, &idle, 10.0, is_playing);

    let mut attack = InputManager::new();
    attack.set(Action::Attack, true, InputSource::Keyboard);
    duel.tick(DT, &attack);
    assert!(duel.fighter(Side::A).attack.is_some());

    // Still held well past the attack's end: no second attack
    run_for(&mut duel, &attack, 1.0);
    assert!(duel.fighter(Side::A).attack.is_none());
}

#[test]
fn test_knockout_awards_round_and_plays_defeat_fall() {
    let mut duel = Duel::new(MatchConfig::default()).unwrap();
    let events = knock_out_b(&mut duel);

    assert_eq!(duel.phase(), MatchPhase::RoundOver);
    assert_eq!(duel.orchestrator().wins(Side::A), 1);
    assert!(events.iter().any(|e| matches!(
        e.event_type,
        MatchEventType::Hit { attacker: Side::A, remaining_hp: 0, .. }
    )));
    assert!(events
        .iter()
        .any(|e| e.event_type == MatchEventType::Defeat { side: Side::B }));
    assert!(events
        .iter()
        .any(|e| e.event_type == MatchEventType::RoundWon { round: 1, winner: Side::A }));

    // The body keeps falling during RoundOver
    let idle = InputManager::new();
    let later = run_for(&mut duel, &idle, 3.0);
    let impacts: Vec<LandingEvent> = later
        .iter()
        .filter_map(|e| match e.event_type {
            MatchEventType::LandingImpact { side: Side::B, event } => Some(event),
            _ => None,
        })
        .collect();
    assert_eq!(impacts, vec![LandingEvent::First, LandingEvent::Second]);
    assert!(duel.fighter(Side::A).victorious);
}

#[test]
fn test_two_round_wins_take_the_match() {
    let mut duel = Duel::new(MatchConfig::default()).unwrap();
    knock_out_b(&mut duel);
    assert_eq!(duel.phase(), MatchPhase::RoundOver);

    let idle = InputManager::new();
    let events = run_until(&mut duel, &idle, 6.0, |d| d.phase() == MatchPhase::RoundIntro);
    assert!(events
        .iter()
        .any(|e| e.event_type == MatchEventType::RoundIntro { round: 2 }));
    assert_eq!(duel.fighter(Side::B).hp, 100);
    assert!(!duel.fighter(Side::A).victorious);
    // The AI starts the new round with a clean plan
    assert_eq!(duel.ai().behavior(), Behavior::default());
    assert_eq!(duel.ai().state_timer(), 0.0);
    assert_eq!(duel.ai().idle_time(), 0.0);

    knock_out_b(&mut duel);
    assert_eq!(duel.orchestrator().wins(Side::A), 2);
    assert_eq!(duel.phase(), MatchPhase::RoundOver);

    let events = run_for(&mut duel, &idle, 5.2);
    assert_eq!(duel.phase(), MatchPhase::MatchOver);
    assert_eq!(duel.winner(), Some(Side::A));
    assert!(events
        .iter()
        .any(|e| e.event_type == MatchEventType::MatchWon { winner: Side::A }));
    // Straight to MatchOver: no third round
    assert!(!events
        .iter()
        .any(|e| matches!(e.event_type, MatchEventType::RoundIntro { .. })));
    assert_eq!(duel.orchestrator().round_number(), 2);
}

#[test]
fn test_restart_discards_pending_round() {
    let mut duel = Duel::new(MatchConfig::default()).unwrap();
    knock_out_b(&mut duel);
    assert_eq!(duel.phase(), MatchPhase::RoundOver);

    duel.start_match();
    assert_eq!(duel.phase(), MatchPhase::RoundIntro);
    assert_eq!(duel.orchestrator().wins(Side::A), 0);

    let idle = InputManager::new();
    run_for(&mut duel, &idle, 5.5);
    // The old "next round" never fired
    assert_eq!(duel.orchestrator().round_number(), 1);
    assert_eq!(duel.phase(), MatchPhase::Playing);
}

#[test]
fn test_time_up_rule_awards_higher_health() {
    let config = MatchConfig {
        rounds: RoundConfig {
            round_seconds: 2,
            time_up: TimeUpRule::HigherHealthWins,
            ..RoundConfig::default()
        },
        ..MatchConfig::default()
    };
    let mut duel = Duel::new(config).unwrap();
    let idle = InputManager::new();
    run_until(&mut duel, &idle, 10.0, is_playing);
    duel.fighter_mut(Side::A).hp = 50;

    let events = run_until(&mut duel, &idle, 3.0, |d| d.phase() != MatchPhase::Playing);
    assert_eq!(duel.phase(), MatchPhase::RoundOver);
    assert!(events
        .iter()
        .any(|e| e.event_type == MatchEventType::RoundWon { round: 1, winner: Side::B }));
}

#[test]
fn test_cosmetic_clock_never_ends_round() {
    let config = MatchConfig {
        rounds: RoundConfig { round_seconds: 1, ..RoundConfig::default() },
        ..MatchConfig::default()
    };
    let mut duel = Duel::new(config).unwrap();
    let idle = InputManager::new();
    run_until(&mut duel, &idle, 10.0, is_playing);
    // Keep both fighters out of reach of each other
    duel.place_fighters(20.0, 1068.0);
    run_for(&mut duel, &idle, 1.5);
    assert_eq!(duel.orchestrator().round_timer(), 0);
    assert_eq!(duel.phase(), MatchPhase::Playing);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = MatchConfig::default();
    config.fighter.attack.damage = -1;
    assert!(Duel::new(config).is_err());
}
