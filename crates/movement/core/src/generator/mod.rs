//! Movement generators driven by the owner's behavior stack.
//!
//! A generator is created when the stack selects a behavior, receives one
//! [`MovementGenerator::update`] per simulation tick while it is on top, and
//! is finalized when the stack removes it. Only the targeted generator
//! (chase / follow) lives in this crate.
mod chase;
mod follow;
mod policy;
mod targeted;

pub use chase::ChasePolicy;
pub use follow::FollowPolicy;
pub use policy::PursuitPolicy;
pub use targeted::{EvaluationTrigger, PursuitPhase, TargetedMovement};

use crate::env::{MovementOwner, PursuitEnv};

/// Kind of movement a generator performs.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MotionType {
    Chase,
    Follow,
}

/// Why a generator asked the behavior stack to remove it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// Target destroyed, unlinked or no longer resolvable.
    TargetInvalid,
    /// Owner's combat target is no longer the chased unit.
    TargetLost,
    /// Generator was already finalized.
    Finalized,
}

/// Result of a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateStatus {
    Continue,
    Stop(StopReason),
}

impl UpdateStatus {
    /// Returns true if the generator keeps running.
    #[inline]
    pub fn is_continue(self) -> bool {
        matches!(self, UpdateStatus::Continue)
    }

    /// Returns true if the generator has ended.
    #[inline]
    pub fn is_stop(self) -> bool {
        matches!(self, UpdateStatus::Stop(_))
    }
}

/// Lifecycle contract between a generator and the owner's behavior stack.
pub trait MovementGenerator {
    fn motion_type(&self) -> MotionType;

    /// Called once when the generator becomes active.
    fn initialize(&mut self, owner: &mut dyn MovementOwner);

    /// Called when the generator is removed. Must be idempotent.
    fn finalize(&mut self, owner: &mut dyn MovementOwner);

    /// Called when the generator regains control after being superseded.
    fn reset(&mut self, owner: &mut dyn MovementOwner);

    /// Per-tick entry point; `Stop` asks the stack to remove the generator.
    fn update(
        &mut self,
        owner: &mut dyn MovementOwner,
        env: &mut PursuitEnv<'_>,
        diff_ms: u32,
    ) -> UpdateStatus;

    /// The owner's movement speed changed.
    fn unit_speed_changed(&mut self) {}
}
