use crate::generator::{MotionType, StopReason};
use crate::state::EntityId;

/// Notification emitted towards combat / AI code.
///
/// Events are pure notifications: the sink decides what they mean, the
/// movement layer never waits on or reacts to their handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementEvent {
    /// Owner came within allowed distance of the target over a normal route.
    TargetReached {
        owner: EntityId,
        target: EntityId,
        motion: MotionType,
    },
    /// Owner was within reach and the target moved out of it again.
    TargetLeftReach {
        owner: EntityId,
        target: EntityId,
        motion: MotionType,
    },
    /// The generator gave up on its target and is stopping.
    TargetLost {
        owner: EntityId,
        target: EntityId,
        motion: MotionType,
        reason: StopReason,
    },
}

impl MovementEvent {
    /// Entity whose movement produced the event.
    pub const fn owner(&self) -> EntityId {
        match self {
            MovementEvent::TargetReached { owner, .. }
            | MovementEvent::TargetLeftReach { owner, .. }
            | MovementEvent::TargetLost { owner, .. } => *owner,
        }
    }

    /// Linked target the event refers to.
    pub const fn target(&self) -> EntityId {
        match self {
            MovementEvent::TargetReached { target, .. }
            | MovementEvent::TargetLeftReach { target, .. }
            | MovementEvent::TargetLost { target, .. } => *target,
        }
    }
}

/// Receiver for [`MovementEvent`]s.
pub trait MovementEventSink {
    fn notify(&mut self, event: MovementEvent);
}

impl MovementEventSink for Vec<MovementEvent> {
    fn notify(&mut self, event: MovementEvent) {
        self.push(event);
    }
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEventSink;

impl MovementEventSink for NullEventSink {
    fn notify(&mut self, _event: MovementEvent) {}
}
