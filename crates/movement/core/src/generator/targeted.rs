//! Shared chase/follow engine.
//!
//! Every tick is split in two phases. [`TargetedMovement::evaluation_trigger`]
//! is a cheap predicate over timer, flags and position snapshots; only when it
//! reports a reason does the engine re-evaluate. A new route is requested only
//! when a forcing trigger fired or the target has left the allowed distance of
//! the tracked destination, so a steadily moving target costs one route per
//! recheck interval rather than one per tick.
//!
//! The recheck timer bounds worst-case staleness, the allowed distance bounds
//! tracking lag, and the explicit flags force recomputes that neither would
//! catch (offset or speed changes).

use bitflags::bitflags;

use crate::config::PursuitConfig;
use crate::env::{MovementEvent, MovementOwner, PursuitEnv, Route, UnitSnapshot};
use crate::error::PursuitError;
use crate::generator::{
    ChasePolicy, FollowPolicy, MotionType, MovementGenerator, PursuitPolicy, StopReason,
    UpdateStatus,
};
use crate::link::TargetLink;
use crate::state::{EntityId, Position, normalize_orientation};
use crate::timer::RecheckTimer;

bitflags! {
    /// Reasons a tick leaves the cheap path. Empty means nothing to do.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct EvaluationTrigger: u8 {
        const TIMER           = 1 << 0;
        const RECALCULATE     = 1 << 1;
        const SPEED_CHANGED   = 1 << 2;
        const TARGET_MOVED    = 1 << 3;
        const OWNER_DISPLACED = 1 << 4;

        /// Triggers that always request a new route.
        const FORCE_ROUTE = Self::TIMER.bits()
            | Self::RECALCULATE.bits()
            | Self::SPEED_CHANGED.bits()
            | Self::OWNER_DISPLACED.bits();
    }
}

/// Coarse lifecycle of a targeted generator.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum PursuitPhase {
    #[default]
    Uninitialized,
    /// Initialized, no route evaluated yet.
    Active,
    Pursuing,
    Reached,
    Finalized,
}

/// A route together with the snapshot it was computed for.
#[derive(Clone, Debug, PartialEq)]
struct TrackedPath {
    route: Route,
    destination: Position,
    target_position: Position,
}

/// Targeted movement generator: moves the owner towards a point defined
/// relative to a linked target and tracks when that target is reached.
#[derive(Debug)]
pub struct TargetedMovement {
    policy: Box<dyn PursuitPolicy>,
    link: TargetLink,
    config: PursuitConfig,
    offset: f32,
    angle: f32,
    recheck_timer: RecheckTimer,
    recalculate_path: bool,
    speed_changed: bool,
    target_reached: bool,
    last_target_position: Position,
    last_owner_position: Position,
    current_path: Option<TrackedPath>,
    phase: PursuitPhase,
}

impl TargetedMovement {
    /// Builds a generator around an arbitrary policy.
    pub fn new(
        policy: Box<dyn PursuitPolicy>,
        link: TargetLink,
        offset: f32,
        angle: f32,
    ) -> Result<Self, PursuitError> {
        validate_offset(offset)?;
        if !angle.is_finite() {
            return Err(PursuitError::InvalidAngle(angle));
        }
        Ok(Self::assemble(policy, link, offset, angle))
    }

    /// Melee chase: runs straight onto the target.
    pub fn chase(link: TargetLink) -> Self {
        Self::assemble(Box::new(ChasePolicy::new()), link, 0.0, 0.0)
    }

    fn assemble(policy: Box<dyn PursuitPolicy>, link: TargetLink, offset: f32, angle: f32) -> Self {
        let config = PursuitConfig::default();
        Self {
            policy,
            link,
            config,
            offset,
            angle,
            recheck_timer: RecheckTimer::new(config.initial_recheck_ms),
            recalculate_path: false,
            speed_changed: false,
            target_reached: false,
            last_target_position: Position::ORIGIN,
            last_owner_position: Position::ORIGIN,
            current_path: None,
            phase: PursuitPhase::Uninitialized,
        }
    }

    /// Chase that holds `offset` yards at `angle` around the target.
    pub fn chase_at(link: TargetLink, offset: f32, angle: f32) -> Result<Self, PursuitError> {
        Self::new(Box::new(ChasePolicy::new()), link, offset, angle)
    }

    /// Escort that holds `offset` yards at `angle` around the target.
    pub fn follow(link: TargetLink, offset: f32, angle: f32) -> Result<Self, PursuitError> {
        Self::new(Box::new(FollowPolicy::new()), link, offset, angle)
    }

    /// Replaces the default configuration.
    pub fn with_config(mut self, config: PursuitConfig) -> Result<Self, PursuitError> {
        config.validate()?;
        self.config = config;
        if self.phase == PursuitPhase::Uninitialized {
            self.recheck_timer.reset(config.initial_recheck_ms);
        }
        Ok(self)
    }

    /// Active tuning parameters.
    pub fn config(&self) -> &PursuitConfig {
        &self.config
    }

    /// Linked target, `None` once the link has been invalidated.
    pub fn target(&self) -> Option<EntityId> {
        self.link.target()
    }

    /// Standoff distance from the target, in yards.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Bearing of the destination relative to the target's facing, in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Changes the standoff distance; the next update recomputes the route.
    pub fn set_offset(&mut self, offset: f32) -> Result<(), PursuitError> {
        validate_offset(offset)?;
        self.offset = offset;
        self.recalculate_path = true;
        Ok(())
    }

    /// Marks the allowed distance stale; the next update recomputes.
    pub fn unit_speed_changed(&mut self) {
        self.speed_changed = true;
    }

    /// Optimistically true until a search fails to produce a full route.
    pub fn is_reachable(&self) -> bool {
        self.current_path
            .as_ref()
            .is_none_or(|path| path.route.kind.is_normal())
    }

    /// Whether the last evaluation found the owner within reach.
    pub fn is_target_reached(&self) -> bool {
        self.target_reached
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> PursuitPhase {
        self.phase
    }

    /// True while a forced route recalculation is pending.
    pub fn needs_recalculation(&self) -> bool {
        self.recalculate_path
    }

    /// Most recent route, including one that has since been invalidated.
    pub fn current_path(&self) -> Option<&Route> {
        self.current_path.as_ref().map(|path| &path.route)
    }

    /// Destination of the most recent route.
    pub fn destination(&self) -> Option<Position> {
        self.current_path.as_ref().map(|path| path.destination)
    }

    /// Target position the current route was computed for.
    pub fn path_target_position(&self) -> Option<Position> {
        self.current_path.as_ref().map(|path| path.target_position)
    }

    /// Target position seen by the last evaluation.
    pub fn last_target_position(&self) -> Position {
        self.last_target_position
    }

    /// Owner position the current route was launched from.
    pub fn last_owner_position(&self) -> Position {
        self.last_owner_position
    }

    /// Route usable for reach decisions: none while a recalculation is pending.
    fn trusted_path(&self) -> Option<&TrackedPath> {
        if self.recalculate_path {
            None
        } else {
            self.current_path.as_ref()
        }
    }

    /// Distance within which the owner counts as having reached the target.
    pub fn allowed_dist(&self, owner: &dyn MovementOwner) -> f32 {
        self.offset + self.config.margin.margin(owner.speed(), owner.combat_reach())
    }

    /// True if the owner is within [`Self::allowed_dist`] of `target_position`
    /// and the trusted route is a normal one.
    pub fn is_within_allowed_dist(&self, owner: &dyn MovementOwner, target_position: Position) -> bool {
        let Some(path) = self.trusted_path() else {
            return false;
        };
        if !path.route.kind.is_normal() {
            return false;
        }

        separation(owner, owner.position(), target_position) <= self.allowed_dist(owner)
    }

    /// Point `offset` yards from the target, `angle` radians off its facing.
    pub fn destination_for(&self, target: &UnitSnapshot) -> Position {
        if self.offset <= 0.0 {
            return target.position;
        }
        let heading = normalize_orientation(target.orientation + self.angle);
        target.position.offset_towards(heading, self.offset)
    }

    /// Cheap predicate deciding whether this tick needs a recompute.
    pub fn evaluation_trigger(&self, owner_position: Position, target_position: Position) -> EvaluationTrigger {
        let mut trigger = EvaluationTrigger::empty();
        if self.recheck_timer.passed() {
            trigger |= EvaluationTrigger::TIMER;
        }
        if self.recalculate_path || self.current_path.is_none() {
            trigger |= EvaluationTrigger::RECALCULATE;
        }
        if self.speed_changed {
            trigger |= EvaluationTrigger::SPEED_CHANGED;
        }
        if target_position.distance(&self.last_target_position) > self.config.target_move_epsilon {
            trigger |= EvaluationTrigger::TARGET_MOVED;
        }
        if owner_position.distance(&self.last_owner_position) > self.config.owner_displacement_threshold {
            trigger |= EvaluationTrigger::OWNER_DISPLACED;
        }
        trigger
    }

    /// True when the tracked route no longer serves: a forcing trigger fired,
    /// or the target has left `allowed_dist` of the route's destination.
    fn needs_route(&self, owner: &dyn MovementOwner, target_position: Position, trigger: EvaluationTrigger) -> bool {
        if trigger.intersects(EvaluationTrigger::FORCE_ROUTE) {
            return true;
        }
        let Some(path) = self.trusted_path() else {
            return true;
        };
        separation(owner, path.destination, target_position) > self.allowed_dist(owner)
    }

    /// Expensive phase: refreshes the route when needed and re-evaluates reach.
    fn recompute(
        &mut self,
        owner: &mut dyn MovementOwner,
        target: &UnitSnapshot,
        env: &mut PursuitEnv<'_>,
        trigger: EvaluationTrigger,
    ) {
        self.policy.on_recompute(owner, target);

        if self.needs_route(&*owner, target.position, trigger) {
            self.request_route(owner, target, env, trigger);
        } else {
            tracing::trace!(
                owner = %owner.id(),
                target = %target.id,
                ?trigger,
                "target within tolerance of tracked route"
            );
        }
        self.last_target_position = target.position;

        self.evaluate_reach(owner, target, env);
    }

    fn request_route(
        &mut self,
        owner: &mut dyn MovementOwner,
        target: &UnitSnapshot,
        env: &mut PursuitEnv<'_>,
        trigger: EvaluationTrigger,
    ) {
        let from = owner.position();
        let destination = self.destination_for(target);
        let route = env.pathfinder.compute_route(from, destination);

        tracing::debug!(
            owner = %owner.id(),
            target = %target.id,
            motion = %self.policy.motion_type(),
            ?trigger,
            destination = %destination,
            path = %route.kind,
            "targeted movement recomputed"
        );
        if !route.kind.is_normal() {
            tracing::warn!(
                owner = %owner.id(),
                target = %target.id,
                path = %route.kind,
                "no full route to target, moving best-effort"
            );
        }

        // Standing on the destination: halt whatever route is still running
        // instead of launching a micro-correction.
        let settled = from.distance_2d(&destination) <= self.config.margin.base;
        if route.is_traversable() && !settled {
            owner.move_along(&route);
        } else {
            owner.stop_moving();
        }

        self.current_path = Some(TrackedPath {
            route,
            destination,
            target_position: target.position,
        });
        self.last_owner_position = from;
        self.recheck_timer.reset(self.config.recheck_interval_ms);
        self.recalculate_path = false;
        self.speed_changed = false;
    }

    /// Runs the reach transition hooks against the current route.
    fn evaluate_reach(&mut self, owner: &mut dyn MovementOwner, target: &UnitSnapshot, env: &mut PursuitEnv<'_>) {
        let reached = self.is_within_allowed_dist(&*owner, target.position);
        match (self.target_reached, reached) {
            (false, true) => {
                tracing::debug!(owner = %owner.id(), target = %target.id, "target reached");
                self.policy.on_reached(owner, target, env.events);
            }
            (true, false) => {
                tracing::debug!(owner = %owner.id(), target = %target.id, "target left reach");
                self.policy.on_left_reach(owner, target, env.events);
            }
            _ => {}
        }
        self.target_reached = reached;
        self.phase = if reached {
            PursuitPhase::Reached
        } else {
            PursuitPhase::Pursuing
        };
    }

    /// Keeps the owner's walk/run class in line with the policy.
    fn sync_walking(&mut self, owner: &mut dyn MovementOwner, target: &UnitSnapshot) {
        let walk = self.policy.enable_walking(target);
        if owner.is_walking() != walk {
            owner.set_walking(walk);
            // the launched route still carries the old pace
            self.speed_changed = true;
        }
    }

    fn arm(&mut self) {
        self.recalculate_path = true;
        self.speed_changed = false;
        self.target_reached = false;
        self.current_path = None;
        self.recheck_timer.reset(self.config.initial_recheck_ms);
        self.phase = PursuitPhase::Active;
    }

    fn stop(
        &mut self,
        owner: &mut dyn MovementOwner,
        env: &mut PursuitEnv<'_>,
        reason: StopReason,
    ) -> UpdateStatus {
        let target = self.link.target_id();
        tracing::debug!(owner = %owner.id(), target = %target, %reason, "targeted movement stopping");
        env.events.notify(MovementEvent::TargetLost {
            owner: owner.id(),
            target,
            motion: self.policy.motion_type(),
            reason,
        });
        self.finalize(owner);
        UpdateStatus::Stop(reason)
    }
}

impl MovementGenerator for TargetedMovement {
    fn motion_type(&self) -> MotionType {
        self.policy.motion_type()
    }

    fn initialize(&mut self, owner: &mut dyn MovementOwner) {
        match self.phase {
            PursuitPhase::Uninitialized => {}
            PursuitPhase::Finalized => return,
            PursuitPhase::Active | PursuitPhase::Pursuing | PursuitPhase::Reached => {
                self.reset(owner);
                return;
            }
        }
        owner.add_unit_state(self.policy.state_flag());
        self.policy.on_initialize(owner);
        self.arm();
        tracing::debug!(
            owner = %owner.id(),
            target = %self.link.target_id(),
            motion = %self.policy.motion_type(),
            offset = self.offset,
            angle = self.angle,
            "targeted movement initialized"
        );
    }

    fn finalize(&mut self, owner: &mut dyn MovementOwner) {
        if self.phase == PursuitPhase::Finalized {
            return;
        }
        owner.clear_unit_state(self.policy.state_flag());
        self.policy.on_finalize(owner);
        self.current_path = None;
        self.target_reached = false;
        self.recalculate_path = false;
        self.speed_changed = false;
        self.link.unlink();
        self.phase = PursuitPhase::Finalized;
        tracing::debug!(owner = %owner.id(), motion = %self.policy.motion_type(), "targeted movement finalized");
    }

    fn reset(&mut self, owner: &mut dyn MovementOwner) {
        match self.phase {
            PursuitPhase::Uninitialized => self.initialize(owner),
            PursuitPhase::Finalized => {
                tracing::warn!(owner = %owner.id(), "reset of a finalized targeted movement ignored");
            }
            PursuitPhase::Active | PursuitPhase::Pursuing | PursuitPhase::Reached => {
                owner.add_unit_state(self.policy.state_flag());
                self.policy.on_reset(owner);
                self.arm();
            }
        }
    }

    fn update(
        &mut self,
        owner: &mut dyn MovementOwner,
        env: &mut PursuitEnv<'_>,
        diff_ms: u32,
    ) -> UpdateStatus {
        match self.phase {
            PursuitPhase::Finalized => return UpdateStatus::Stop(StopReason::Finalized),
            PursuitPhase::Uninitialized => self.initialize(owner),
            PursuitPhase::Active | PursuitPhase::Pursuing | PursuitPhase::Reached => {}
        }

        let Some(target) = self.link.target().and_then(|id| env.units.unit(id)) else {
            return self.stop(owner, env, StopReason::TargetInvalid);
        };

        if self.policy.lost_target(&*owner, target.id) {
            return self.stop(owner, env, StopReason::TargetLost);
        }

        if owner.unit_state().prevents_movement() {
            tracing::trace!(owner = %owner.id(), "movement prevented, holding");
            owner.stop_moving();
            self.recalculate_path = true;
            return UpdateStatus::Continue;
        }

        self.recheck_timer.update(diff_ms);

        let trigger = self.evaluation_trigger(owner.position(), target.position);
        if trigger.is_empty() {
            tracing::trace!(
                owner = %owner.id(),
                remaining_ms = self.recheck_timer.remaining_ms(),
                "targeted movement up to date"
            );
        } else {
            self.recompute(owner, &target, env, trigger);
        }

        self.sync_walking(owner, &target);
        UpdateStatus::Continue
    }

    fn unit_speed_changed(&mut self) {
        TargetedMovement::unit_speed_changed(self);
    }
}

/// Owner-relative distance: horizontal for ground owners, full 3D for flyers.
fn separation(owner: &dyn MovementOwner, from: Position, to: Position) -> f32 {
    if owner.can_fly() {
        from.distance(&to)
    } else {
        from.distance_2d(&to)
    }
}

fn validate_offset(offset: f32) -> Result<(), PursuitError> {
    if offset.is_finite() && offset >= 0.0 {
        Ok(())
    } else {
        Err(PursuitError::InvalidOffset(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkRegistry;
    use std::f32::consts::PI;

    fn generator(offset: f32, angle: f32) -> (LinkRegistry, TargetedMovement) {
        let mut registry = LinkRegistry::new();
        let link = registry.link(EntityId(1), EntityId(2)).unwrap();
        let movement = TargetedMovement::follow(link, offset, angle).unwrap();
        (registry, movement)
    }

    #[test]
    fn zero_offset_destination_is_target_position() {
        let (_registry, movement) = generator(0.0, 0.0);
        let target = UnitSnapshot::new(EntityId(2), Position::new(4.0, -2.0, 7.0)).with_orientation(1.3);
        assert_eq!(movement.destination_for(&target), target.position);
    }

    #[test]
    fn offset_behind_target() {
        let (_registry, movement) = generator(5.0, PI);
        let target = UnitSnapshot::new(EntityId(2), Position::ORIGIN);
        let destination = movement.destination_for(&target);
        approx::assert_abs_diff_eq!(destination.x, -5.0, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(destination.y, 0.0, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(destination.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn angle_is_relative_to_target_facing() {
        let (_registry, movement) = generator(2.0, PI / 2.0);
        let target = UnitSnapshot::new(EntityId(2), Position::ORIGIN).with_orientation(PI / 2.0);
        let destination = movement.destination_for(&target);
        approx::assert_abs_diff_eq!(destination.x, -2.0, epsilon = 1e-4);
        approx::assert_abs_diff_eq!(destination.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn fresh_generator_requests_evaluation() {
        let (_registry, movement) = generator(0.0, 0.0);
        let trigger = movement.evaluation_trigger(Position::ORIGIN, Position::ORIGIN);
        assert!(trigger.contains(EvaluationTrigger::RECALCULATE));
        assert!(trigger.contains(EvaluationTrigger::TIMER));
    }

    #[test]
    fn speed_change_is_a_trigger_on_its_own() {
        let (_registry, mut movement) = generator(0.0, 0.0);
        movement.unit_speed_changed();
        let trigger = movement.evaluation_trigger(Position::ORIGIN, Position::ORIGIN);
        assert!(trigger.contains(EvaluationTrigger::SPEED_CHANGED));
    }

    #[test]
    fn target_movement_alone_does_not_force_a_route() {
        assert!(!EvaluationTrigger::FORCE_ROUTE.contains(EvaluationTrigger::TARGET_MOVED));
        assert!(EvaluationTrigger::FORCE_ROUTE.contains(EvaluationTrigger::OWNER_DISPLACED));
    }

    #[test]
    fn set_offset_marks_path_stale() {
        let (_registry, mut movement) = generator(1.0, 0.0);
        movement.set_offset(3.0).unwrap();
        assert_eq!(movement.offset(), 3.0);
        assert!(movement.needs_recalculation());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let (_registry, mut movement) = generator(1.0, 0.0);
        assert_eq!(movement.set_offset(-1.0), Err(PursuitError::InvalidOffset(-1.0)));
        assert!(movement.set_offset(f32::NAN).is_err());
        assert_eq!(movement.offset(), 1.0);

        let mut registry = LinkRegistry::new();
        let link = registry.link(EntityId(1), EntityId(2)).unwrap();
        assert!(matches!(
            TargetedMovement::chase_at(link, 1.0, f32::INFINITY),
            Err(PursuitError::InvalidAngle(_))
        ));
    }

    #[test]
    fn reachable_until_a_path_fails() {
        let (_registry, movement) = generator(0.0, 0.0);
        assert!(movement.is_reachable());
        assert!(movement.current_path().is_none());
    }
}
