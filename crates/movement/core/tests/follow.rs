mod support;

use std::f32::consts::FRAC_PI_2;

use movement_core::{
    EntityId, MotionType, MovementGenerator, Position, TargetedMovement, UnitState, UpdateStatus,
};
use support::{Harness, RUN_SPEED, TARGET, target_at};

fn follow(harness: &mut Harness, offset: f32, angle: f32) -> TargetedMovement {
    let link = harness.link();
    let mut movement = TargetedMovement::follow(link, offset, angle).unwrap();
    movement.initialize(&mut harness.owner);
    movement
}

#[test]
fn follow_marks_owner() {
    let mut harness = Harness::new(Position::new(20.0, 0.0, 0.0), target_at(Position::ORIGIN));
    let mut movement = follow(&mut harness, 2.0, FRAC_PI_2);

    assert_eq!(movement.motion_type(), MotionType::Follow);
    assert!(harness.owner.state.contains(UnitState::FOLLOW_MOVE));
    assert!(!harness.owner.state.contains(UnitState::CHASE_MOVE));

    movement.finalize(&mut harness.owner);
    assert!(!harness.owner.state.contains(UnitState::FOLLOW_MOVE));
}

#[test]
fn walk_state_is_mirrored_on_cheap_ticks() {
    let mut harness = Harness::new(Position::new(20.0, 0.0, 0.0), target_at(Position::ORIGIN));
    let mut movement = follow(&mut harness, 2.0, 0.0);
    harness.tick(&mut movement, 0);
    assert_eq!(harness.pathfinder.calls(), 1);
    assert!(!harness.owner.walking);

    harness.target_mut().walking = true;
    harness.tick(&mut movement, 10);
    assert!(harness.owner.walking);
    // the tick itself took the cheap path
    assert_eq!(harness.pathfinder.calls(), 1);

    // the pace change relaunches the route on the following tick
    harness.tick(&mut movement, 10);
    assert_eq!(harness.pathfinder.calls(), 2);

    harness.target_mut().walking = false;
    harness.tick(&mut movement, 10);
    assert!(!harness.owner.walking);
}

#[test]
fn follow_ignores_combat_target() {
    let mut harness = Harness::new(Position::new(20.0, 0.0, 0.0), target_at(Position::ORIGIN));
    let mut movement = follow(&mut harness, 0.0, 0.0);

    harness.owner.victim = Some(EntityId(9));
    assert_eq!(harness.tick(&mut movement, 0), UpdateStatus::Continue);
    assert_eq!(movement.target(), Some(TARGET));
}

#[test]
fn reaching_escort_target_is_silent() {
    let mut harness = Harness::new(Position::new(1.0, 0.0, 0.0), target_at(Position::ORIGIN));
    let mut movement = follow(&mut harness, 0.0, 0.0);

    harness.tick(&mut movement, 0);
    assert!(movement.is_target_reached());

    harness.move_target(Position::new(30.0, 0.0, 0.0));
    harness.tick(&mut movement, 10);
    assert!(!movement.is_target_reached());
    assert!(harness.events.is_empty());
}

#[test]
fn controlled_owner_inherits_master_speed() {
    let mut harness = Harness::new(
        Position::new(20.0, 0.0, 0.0),
        target_at(Position::ORIGIN).with_speed(RUN_SPEED * 2.0),
    );
    harness.owner.master = Some(TARGET);
    let mut movement = follow(&mut harness, 2.0, FRAC_PI_2);

    harness.tick(&mut movement, 0);
    assert_eq!(harness.owner.base_speed, Some(RUN_SPEED * 2.0));
}

#[test]
fn independent_owner_keeps_its_speed() {
    let mut harness = Harness::new(
        Position::new(20.0, 0.0, 0.0),
        target_at(Position::ORIGIN).with_speed(RUN_SPEED * 2.0),
    );
    let mut movement = follow(&mut harness, 2.0, FRAC_PI_2);

    harness.tick(&mut movement, 0);
    assert_eq!(harness.owner.base_speed, None);
}
