//! Collaborator interfaces consumed by the targeted generators.
//!
//! The movement layer neither owns entities nor searches paths. It reads the
//! owner through [`MovementOwner`], resolves targets through [`UnitOracle`],
//! asks a [`Pathfinder`] for routes and reports to a [`MovementEventSink`].
//! [`PursuitEnv`] bundles the per-tick collaborators so generator entry
//! points take one argument instead of three.
mod events;
mod path;

use std::collections::HashMap;

pub use events::{MovementEvent, MovementEventSink, NullEventSink};
pub use path::{DirectPathfinder, PathType, Pathfinder, Route};

use crate::state::{EntityId, Position, UnitState};

/// Mutable view of the unit whose movement a generator controls.
///
/// Generators only write their own `*_MOVE` state bit, the walk flag and the
/// launched route; everything else is read.
pub trait MovementOwner {
    fn id(&self) -> EntityId;
    fn position(&self) -> Position;
    fn orientation(&self) -> f32;

    fn is_walking(&self) -> bool;
    fn set_walking(&mut self, walking: bool);

    /// Current movement speed in yards per second for the active walk/run class.
    fn speed(&self) -> f32;
    fn combat_reach(&self) -> f32;

    /// Current combat target, if any.
    fn victim(&self) -> Option<EntityId>;

    fn unit_state(&self) -> UnitState;
    fn add_unit_state(&mut self, state: UnitState);
    fn clear_unit_state(&mut self, state: UnitState);

    /// Starts moving along `route`, replacing any route in progress.
    fn move_along(&mut self, route: &Route);
    fn stop_moving(&mut self);

    /// Flying and swimming owners measure reach in three dimensions.
    fn can_fly(&self) -> bool {
        false
    }

    /// True for pets and guardians whose movement is slaved to `other`.
    fn is_controlled_by(&self, _other: EntityId) -> bool {
        false
    }

    /// Adopts `speed` (yards per second) as the owner's base speed.
    fn inherit_speed(&mut self, _speed: f32) {}
}

/// Read-only snapshot of a unit as seen by another unit's generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSnapshot {
    pub id: EntityId,
    pub position: Position,
    pub orientation: f32,
    pub walking: bool,
    pub speed: f32,
    pub combat_reach: f32,
}

impl UnitSnapshot {
    /// Stationary, running snapshot at `position` with zero speed and reach.
    pub fn new(id: EntityId, position: Position) -> Self {
        Self {
            id,
            position,
            orientation: 0.0,
            walking: false,
            speed: 0.0,
            combat_reach: 0.0,
        }
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: f32) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_walking(mut self, walking: bool) -> Self {
        self.walking = walking;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_combat_reach(mut self, combat_reach: f32) -> Self {
        self.combat_reach = combat_reach;
        self
    }
}

/// Resolves unit ids to their current state.
///
/// Returning `None` means the unit is gone from the owner's point of view
/// (despawned, on another map); generators treat it like an invalid link.
pub trait UnitOracle {
    fn unit(&self, id: EntityId) -> Option<UnitSnapshot>;
}

impl UnitOracle for HashMap<EntityId, UnitSnapshot> {
    fn unit(&self, id: EntityId) -> Option<UnitSnapshot> {
        self.get(&id).copied()
    }
}

/// Per-tick collaborators handed to [`crate::MovementGenerator::update`].
pub struct PursuitEnv<'a> {
    pub units: &'a dyn UnitOracle,
    pub pathfinder: &'a mut dyn Pathfinder,
    pub events: &'a mut dyn MovementEventSink,
}

impl<'a> PursuitEnv<'a> {
    /// Bundles the collaborators for one update.
    pub fn new(
        units: &'a dyn UnitOracle,
        pathfinder: &'a mut dyn Pathfinder,
        events: &'a mut dyn MovementEventSink,
    ) -> Self {
        Self {
            units,
            pathfinder,
            events,
        }
    }
}
