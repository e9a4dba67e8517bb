use crate::env::{MovementEventSink, MovementOwner, UnitSnapshot};
use crate::generator::{MotionType, PursuitPolicy};
use crate::state::{EntityId, UnitState};

/// Speed difference (yards per second) below which a controlled owner keeps
/// its own speed.
const SPEED_MATCH_EPSILON: f32 = 0.01;

/// Non-combat escort. Never gives up on its own and mirrors the target's
/// walk/run class every tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct FollowPolicy;

impl FollowPolicy {
    /// Creates the escort policy.
    pub const fn new() -> Self {
        Self
    }
}

impl PursuitPolicy for FollowPolicy {
    fn motion_type(&self) -> MotionType {
        MotionType::Follow
    }

    fn state_flag(&self) -> UnitState {
        UnitState::FOLLOW_MOVE
    }

    fn on_initialize(&mut self, _owner: &mut dyn MovementOwner) {}

    fn lost_target(&self, _owner: &dyn MovementOwner, _target: EntityId) -> bool {
        false
    }

    fn enable_walking(&self, target: &UnitSnapshot) -> bool {
        target.walking
    }

    /// Pets and guardians move at their master's pace.
    fn on_recompute(&mut self, owner: &mut dyn MovementOwner, target: &UnitSnapshot) {
        if owner.is_controlled_by(target.id) && (owner.speed() - target.speed).abs() > SPEED_MATCH_EPSILON {
            tracing::trace!(owner = %owner.id(), target = %target.id, speed = target.speed, "inheriting master speed");
            owner.inherit_speed(target.speed);
        }
    }

    fn on_reached(
        &mut self,
        owner: &dyn MovementOwner,
        target: &UnitSnapshot,
        _events: &mut dyn MovementEventSink,
    ) {
        tracing::trace!(owner = %owner.id(), target = %target.id, "follow target in reach");
    }
}
