//! Combat integration tests
//!
//! Fighters, hit resolution and separation working together through the
//! public API, plus property tests for the floor and stage-bound invariants.

use duel_sim::combat::{check_hit, separate};
use duel_sim::core::{Facing, FighterConfig, Side, StageConfig};
use duel_sim::fighter::{AttackPhase, Combatant, LandingEvent, MovementState};
use proptest::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn fighter(side: Side, x: f32, facing: Facing) -> Combatant {
    Combatant::with_standard_frames(side, &FighterConfig::default(), &StageConfig::default(), x, facing)
}

fn step_both(a: &mut Combatant, b: &mut Combatant, dt: f32) {
    let g = a.stage().gravity;
    a.update(dt, g);
    b.update(dt, g);
}

/// Two fighters 50 apart: one hit for exactly 10 damage over the whole
/// active window.
#[test]
fn test_point_blank_hit_lands_once() {
    let mut a = fighter(Side::A, 400.0, Facing::Right);
    let mut b = fighter(Side::B, 450.0, Facing::Left);
    assert!(a.start_attack());

    let mut t = 0.0;
    let mut connected_at = None;
    while t < 0.38 {
        step_both(&mut a, &mut b, DT);
        t += DT;
        if let Some(outcome) = check_hit(&mut a, &mut b) {
            assert!(connected_at.is_none(), "second hit at t={t}");
            assert_eq!(outcome.damage, 10);
            connected_at = Some(t);
        }
    }

    let connected_at = connected_at.expect("hit should land during Active");
    assert!(connected_at >= 0.08 && connected_at < 0.38);
    assert_eq!(b.hp, 90);
}

/// Hitting at t = 0.10 exactly, as a tick-free driver would
#[test]
fn test_hit_mid_active_window() {
    let mut a = fighter(Side::A, 400.0, Facing::Right);
    let mut b = fighter(Side::B, 450.0, Facing::Left);
    a.start_attack();
    step_both(&mut a, &mut b, 0.05);
    step_both(&mut a, &mut b, 0.05);
    assert_eq!(a.attack_phase(), Some(AttackPhase::Active));

    assert!(check_hit(&mut a, &mut b).is_some());
    for _ in 0..20 {
        step_both(&mut a, &mut b, 0.01);
        assert!(check_hit(&mut a, &mut b).is_none());
    }
    assert_eq!(b.hp, 90);
}

#[test]
fn test_knockout_side_effects() {
    let mut a = fighter(Side::A, 400.0, Facing::Right);
    let mut b = fighter(Side::B, 450.0, Facing::Left);
    b.hp = 10;
    a.start_attack();
    for _ in 0..6 {
        step_both(&mut a, &mut b, DT);
    }

    let outcome = check_hit(&mut a, &mut b).expect("hit lands");
    assert!(outcome.lethal);
    assert!(b.defeated);
    assert!(b.attack.is_none());
    assert!(b.velocity.y < 0.0);
    assert!(a.victorious);
    assert_eq!(b.movement_state(), MovementState::Defeated);
    assert_eq!(a.movement_state(), MovementState::Victorious);
}

/// Knocked-out fighter bounces once, slides on the second impact, then rests
#[test]
fn test_defeat_fall_two_impacts() {
    let mut a = fighter(Side::A, 400.0, Facing::Right);
    let mut b = fighter(Side::B, 450.0, Facing::Left);
    b.hp = 10;
    a.start_attack();
    for _ in 0..6 {
        step_both(&mut a, &mut b, DT);
    }
    check_hit(&mut a, &mut b).expect("hit lands");

    let mut impacts = Vec::new();
    for _ in 0..600 {
        step_both(&mut a, &mut b, DT);
        assert!(b.y() >= b.defeat.floor_y);
        if let Some(event) = b.last_landing_event() {
            match event {
                LandingEvent::First => assert!(b.velocity.y > 0.0),
                LandingEvent::Second => {
                    assert_eq!(b.velocity.y, 0.0);
                    // Pushed away from the attacker
                    assert!(b.knockback_vx > 0.0);
                }
            }
            impacts.push(event);
        }
    }
    assert_eq!(impacts, vec![LandingEvent::First, LandingEvent::Second]);
    // The winner holds still
    assert_eq!(a.x(), 400.0);
}

/// Body drops from height after defeat: further crossings after the second
/// impact report nothing
#[test]
fn test_no_third_impact() {
    let mut b = fighter(Side::B, 600.0, Facing::Left);
    b.on_defeat();
    let mut count = 0;
    for _ in 0..300 {
        b.update(DT, b.stage().gravity);
        if b.last_landing_event().is_some() {
            count += 1;
        }
    }
    assert_eq!(count, 2);

    // Lift the body and let it fall again
    b.position.y += 200.0;
    for _ in 0..300 {
        b.update(DT, b.stage().gravity);
        assert_eq!(b.last_landing_event(), None);
    }
    assert_eq!(b.y(), b.defeat.floor_y);
}

#[test]
fn test_separation_then_hit_at_contact_range() {
    let mut a = fighter(Side::A, 400.0, Facing::Right);
    let mut b = fighter(Side::B, 420.0, Facing::Left);
    separate(&mut a, &mut b);
    assert!(!a.hurtbox().overlaps(&b.hurtbox()));

    // The attack's reach still covers a fighter standing body to body
    a.start_attack();
    let mut landed = false;
    for _ in 0..23 {
        step_both(&mut a, &mut b, DT);
        separate(&mut a, &mut b);
        landed |= check_hit(&mut a, &mut b).is_some();
    }
    assert!(landed);
}

#[derive(Debug, Clone, Copy)]
enum Cmd {
    Left,
    Right,
    Stop,
    Jump,
    Attack,
}

fn cmd_strategy() -> impl Strategy<Value = Cmd> {
    prop_oneof![
        Just(Cmd::Left),
        Just(Cmd::Right),
        Just(Cmd::Stop),
        Just(Cmd::Jump),
        Just(Cmd::Attack),
    ]
}

fn apply(fighter: &mut Combatant, cmd: Cmd) {
    match cmd {
        Cmd::Left => fighter.move_left(),
        Cmd::Right => fighter.move_right(),
        Cmd::Stop => fighter.stop(),
        Cmd::Jump => fighter.jump(),
        Cmd::Attack => {
            fighter.start_attack();
        }
    }
}

proptest! {
    #[test]
    fn prop_fighters_stay_on_stage(
        start_a in 0.0f32..1300.0,
        start_b in 0.0f32..1300.0,
        cmds in prop::collection::vec((cmd_strategy(), cmd_strategy()), 1..400),
    ) {
        let mut a = fighter(Side::A, start_a, Facing::Right);
        let mut b = fighter(Side::B, start_b, Facing::Left);

        for (ca, cb) in cmds {
            apply(&mut a, ca);
            apply(&mut b, cb);
            step_both(&mut a, &mut b, DT);
            separate(&mut a, &mut b);
            check_hit(&mut a, &mut b);
            check_hit(&mut b, &mut a);

            for f in [&a, &b] {
                let floor = if f.defeated { f.defeat.floor_y } else { f.floor_y() };
                prop_assert!(f.y() >= floor);
                prop_assert!(f.x() >= f.min_x() - 1e-3);
                prop_assert!(f.x() <= f.max_x() + 1e-3);
                prop_assert!(f.hp >= 0);
            }
        }
    }

    #[test]
    fn prop_connected_attack_never_hits_twice(gap in 40.0f32..120.0) {
        let mut a = fighter(Side::A, 400.0, Facing::Right);
        let mut b = fighter(Side::B, 400.0 + gap, Facing::Left);
        a.start_attack();
        let mut hits = 0;
        for _ in 0..40 {
            step_both(&mut a, &mut b, DT);
            if check_hit(&mut a, &mut b).is_some() {
                hits += 1;
            }
        }
        prop_assert!(hits <= 1);
        prop_assert_eq!(b.hp, 100 - 10 * hits);
    }
}
