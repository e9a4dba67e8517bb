//! Millisecond countdown used to throttle re-evaluation.

/// Countdown that expires once enough elapsed time has been fed to it.
///
/// The remaining time only ever decreases through [`RecheckTimer::update`];
/// [`RecheckTimer::reset`] is the only way to push it back up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecheckTimer {
    remaining_ms: i32,
}

impl RecheckTimer {
    /// Timer that fires once `interval_ms` has elapsed.
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            remaining_ms: clamp_interval(interval_ms),
        }
    }

    /// Advances the countdown by `diff_ms`.
    pub fn update(&mut self, diff_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(clamp_interval(diff_ms));
    }

    /// Returns true once the countdown has run out.
    pub const fn passed(&self) -> bool {
        self.remaining_ms <= 0
    }

    /// Re-arms the countdown.
    pub fn reset(&mut self, interval_ms: u32) {
        self.remaining_ms = clamp_interval(interval_ms);
    }

    /// Remaining time in milliseconds, zero once expired.
    pub const fn remaining_ms(&self) -> u32 {
        if self.remaining_ms <= 0 {
            0
        } else {
            self.remaining_ms as u32
        }
    }
}

const fn clamp_interval(ms: u32) -> i32 {
    if ms > i32::MAX as u32 {
        i32::MAX
    } else {
        ms as i32
    }
}
