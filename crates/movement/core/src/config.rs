//! Tunable parameters for targeted movement.

use crate::error::PursuitError;

/// Slack added on top of the standoff offset before the owner counts as
/// being within reach of its target.
///
/// `margin = base + speed * speed_window_secs + combat_reach * reach_factor`,
/// so faster owners and owners with a longer reach tolerate more drift before
/// a correction is forced.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachMargin {
    pub base: f32,
    pub speed_window_secs: f32,
    pub reach_factor: f32,
}

impl ReachMargin {
    pub const DEFAULT: Self = Self {
        base: 0.5,
        speed_window_secs: 0.25,
        reach_factor: 1.0,
    };

    /// A fixed margin independent of speed and reach.
    pub const fn fixed(base: f32) -> Self {
        Self {
            base,
            speed_window_secs: 0.0,
            reach_factor: 0.0,
        }
    }

    /// Slack added to the offset for an owner moving at `speed` with `combat_reach`.
    pub fn margin(&self, speed: f32, combat_reach: f32) -> f32 {
        let margin = self.base
            + speed.max(0.0) * self.speed_window_secs
            + combat_reach.max(0.0) * self.reach_factor;
        margin.max(0.0)
    }
}

impl Default for ReachMargin {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runtime configuration shared by chase and follow generators.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PursuitConfig {
    /// Timer armed on initialize/reset. Zero forces a path on the first tick.
    pub initial_recheck_ms: u32,
    /// Timer armed after every full recompute; bounds worst-case staleness.
    pub recheck_interval_ms: u32,
    /// Target movement (yards) below which a tick stays on the cheap path.
    pub target_move_epsilon: f32,
    /// Owner displacement (yards) since the last recompute that forces a new
    /// evaluation, e.g. after a knockback or teleport.
    pub owner_displacement_threshold: f32,
    pub margin: ReachMargin,
}

impl PursuitConfig {
    pub const DEFAULT_INITIAL_RECHECK_MS: u32 = 0;
    pub const DEFAULT_RECHECK_INTERVAL_MS: u32 = 500;
    pub const DEFAULT_TARGET_MOVE_EPSILON: f32 = 0.1;
    pub const DEFAULT_OWNER_DISPLACEMENT_THRESHOLD: f32 = 5.0;

    /// Configuration with the default tuning.
    pub const fn new() -> Self {
        Self {
            initial_recheck_ms: Self::DEFAULT_INITIAL_RECHECK_MS,
            recheck_interval_ms: Self::DEFAULT_RECHECK_INTERVAL_MS,
            target_move_epsilon: Self::DEFAULT_TARGET_MOVE_EPSILON,
            owner_displacement_threshold: Self::DEFAULT_OWNER_DISPLACEMENT_THRESHOLD,
            margin: ReachMargin::DEFAULT,
        }
    }

    /// Sets the interval between forced route refreshes.
    #[must_use]
    pub const fn with_recheck_interval(mut self, interval_ms: u32) -> Self {
        self.recheck_interval_ms = interval_ms;
        self
    }

    /// Sets the delay before the first route request.
    #[must_use]
    pub const fn with_initial_recheck(mut self, interval_ms: u32) -> Self {
        self.initial_recheck_ms = interval_ms;
        self
    }

    /// Sets the minimum target movement that leaves the cheap path.
    #[must_use]
    pub const fn with_target_move_epsilon(mut self, epsilon: f32) -> Self {
        self.target_move_epsilon = epsilon;
        self
    }

    /// Sets how far the owner may be displaced before a route refresh.
    #[must_use]
    pub const fn with_owner_displacement_threshold(mut self, threshold: f32) -> Self {
        self.owner_displacement_threshold = threshold;
        self
    }

    /// Replaces the allowed-distance margin.
    #[must_use]
    pub const fn with_margin(mut self, margin: ReachMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Rejects values that would make the throttle meaningless.
    pub fn validate(&self) -> Result<(), PursuitError> {
        if self.recheck_interval_ms == 0 {
            return Err(PursuitError::InvalidConfig {
                field: "recheck_interval_ms",
                reason: "must be greater than zero",
            });
        }
        if !self.target_move_epsilon.is_finite() || self.target_move_epsilon < 0.0 {
            return Err(PursuitError::InvalidConfig {
                field: "target_move_epsilon",
                reason: "must be a finite non-negative distance",
            });
        }
        if !self.owner_displacement_threshold.is_finite() || self.owner_displacement_threshold <= 0.0 {
            return Err(PursuitError::InvalidConfig {
                field: "owner_displacement_threshold",
                reason: "must be a finite positive distance",
            });
        }
        let margin = self.margin;
        if !(margin.base.is_finite() && margin.speed_window_secs.is_finite() && margin.reach_factor.is_finite()) {
            return Err(PursuitError::InvalidConfig {
                field: "margin",
                reason: "coefficients must be finite",
            });
        }
        Ok(())
    }
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self::new()
    }
}
