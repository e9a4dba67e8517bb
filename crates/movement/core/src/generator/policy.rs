use std::fmt;

use crate::env::{MovementEventSink, MovementOwner, UnitSnapshot};
use crate::generator::MotionType;
use crate::state::{EntityId, UnitState};

/// Behavior plugged into [`crate::TargetedMovement`].
///
/// The engine owns timing, destination and reach evaluation; a policy only
/// decides what is specific to its kind of pursuit: which state bit marks it,
/// when the target counts as lost, whether the owner walks, and what to tell
/// the rest of the game when reach changes.
pub trait PursuitPolicy: fmt::Debug + Send + Sync {
    fn motion_type(&self) -> MotionType;

    /// The owner state bit this policy sets while active.
    fn state_flag(&self) -> UnitState;

    fn on_initialize(&mut self, owner: &mut dyn MovementOwner);

    fn on_reset(&mut self, owner: &mut dyn MovementOwner) {
        self.on_initialize(owner);
    }

    fn on_finalize(&mut self, _owner: &mut dyn MovementOwner) {}

    /// Checked at the top of every update, before any path work.
    fn lost_target(&self, owner: &dyn MovementOwner, target: EntityId) -> bool;

    /// Walk/run class the owner should use this tick.
    fn enable_walking(&self, target: &UnitSnapshot) -> bool;

    /// Runs right before a new route is requested.
    fn on_recompute(&mut self, _owner: &mut dyn MovementOwner, _target: &UnitSnapshot) {}

    fn on_reached(
        &mut self,
        owner: &dyn MovementOwner,
        target: &UnitSnapshot,
        events: &mut dyn MovementEventSink,
    );

    fn on_left_reach(
        &mut self,
        _owner: &dyn MovementOwner,
        _target: &UnitSnapshot,
        _events: &mut dyn MovementEventSink,
    ) {
    }
}
