//! Targeted movement for simulated units: chasing a combat target and
//! following an escort target.
//!
//! `movement-core` decides, tick by tick, whether an owner's route towards its
//! target must be recomputed, where the owner should stand relative to the
//! target, and when the target counts as reached. Path search, locomotion,
//! combat decisions and entity lifecycle stay outside; they are reached
//! through the collaborator traits in [`env`].
//!
//! - [`link`] keeps weak, mutually invalidating target references
//! - [`timer`] throttles re-evaluation
//! - [`generator`] hosts the shared engine ([`TargetedMovement`]) and its
//!   chase / follow policies
pub mod config;
pub mod env;
pub mod error;
pub mod generator;
pub mod link;
pub mod state;
pub mod timer;

pub use config::{PursuitConfig, ReachMargin};
pub use env::{
    DirectPathfinder, MovementEvent, MovementEventSink, MovementOwner, NullEventSink, PathType,
    Pathfinder, PursuitEnv, Route, UnitOracle, UnitSnapshot,
};
pub use error::{ErrorSeverity, LinkError, MovementError, PursuitError};
pub use generator::{
    ChasePolicy, EvaluationTrigger, FollowPolicy, MotionType, MovementGenerator, PursuitPhase,
    PursuitPolicy, StopReason, TargetedMovement, UpdateStatus,
};
pub use link::{LinkRegistry, TargetLink};
pub use state::{EntityId, Position, UnitState};
pub use timer::RecheckTimer;
