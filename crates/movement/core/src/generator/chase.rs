use crate::env::{MovementEvent, MovementEventSink, MovementOwner, UnitSnapshot};
use crate::generator::{MotionType, PursuitPolicy};
use crate::state::{EntityId, UnitState};

/// Combat pursuit of the owner's current victim.
///
/// The owner always runs while chasing; whatever walk state it had when the
/// chase started is put back on finalize.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChasePolicy {
    restore_walking: bool,
}

impl ChasePolicy {
    /// Creates the chase policy.
    pub const fn new() -> Self {
        Self {
            restore_walking: false,
        }
    }
}

impl PursuitPolicy for ChasePolicy {
    fn motion_type(&self) -> MotionType {
        MotionType::Chase
    }

    fn state_flag(&self) -> UnitState {
        UnitState::CHASE_MOVE
    }

    fn on_initialize(&mut self, owner: &mut dyn MovementOwner) {
        self.restore_walking = owner.is_walking();
        owner.set_walking(false);
    }

    fn on_reset(&mut self, owner: &mut dyn MovementOwner) {
        // keep the walk state saved by the first initialize
        owner.set_walking(false);
    }

    fn on_finalize(&mut self, owner: &mut dyn MovementOwner) {
        if self.restore_walking {
            owner.set_walking(true);
            self.restore_walking = false;
        }
    }

    fn lost_target(&self, owner: &dyn MovementOwner, target: EntityId) -> bool {
        owner.victim() != Some(target)
    }

    fn enable_walking(&self, _target: &UnitSnapshot) -> bool {
        false
    }

    fn on_reached(
        &mut self,
        owner: &dyn MovementOwner,
        target: &UnitSnapshot,
        events: &mut dyn MovementEventSink,
    ) {
        events.notify(MovementEvent::TargetReached {
            owner: owner.id(),
            target: target.id,
            motion: MotionType::Chase,
        });
    }

    fn on_left_reach(
        &mut self,
        owner: &dyn MovementOwner,
        target: &UnitSnapshot,
        events: &mut dyn MovementEventSink,
    ) {
        events.notify(MovementEvent::TargetLeftReach {
            owner: owner.id(),
            target: target.id,
            motion: MotionType::Chase,
        });
    }
}
