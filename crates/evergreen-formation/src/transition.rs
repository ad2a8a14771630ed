//! Exponentially damped progress between the scattered (0) and formed (1) states

use crate::generator::check_positive;
use evergreen_core::Result;

/// Distance from the target below which progress snaps onto it
pub const SNAP_EPSILON: f32 = 0.001;

/// Progress of one group's transition, owned by that group.
///
/// `current` always moves toward `target` without passing it, and lands on it
/// exactly once within [`SNAP_EPSILON`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionProgress {
    current: f32,
    target: f32,
    damping_rate: f32,
}

impl TransitionProgress {
    /// Start at rest on `initial` (clamped to [0, 1])
    pub fn new(damping_rate: f32, initial: f32) -> Result<Self> {
        check_positive("damping_rate", damping_rate)?;
        let initial = if initial.is_finite() {
            initial.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Ok(Self {
            current: initial,
            target: initial,
            damping_rate,
        })
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn damping_rate(&self) -> f32 {
        self.damping_rate
    }

    /// True once `current` sits exactly on `target`
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance one frame toward `target`. Returns true if `current` moved.
    ///
    /// Changing `target` between calls redirects the motion from wherever
    /// `current` is; nothing is reset. A non-finite `dt` skips the frame and a
    /// negative one counts as zero.
    pub fn advance(&mut self, dt: f32, target: f32) -> bool {
        if !dt.is_finite() || !target.is_finite() {
            return false;
        }
        self.target = target.clamp(0.0, 1.0);
        let dt = dt.max(0.0);

        if self.is_settled() {
            return false;
        }

        // A step factor of 1 lands on the target; anything larger would overshoot
        let step = (self.damping_rate * dt).min(1.0);
        let mut next = self.current + (self.target - self.current) * step;

        if (self.target - next).abs() < SNAP_EPSILON {
            next = self.target;
        }

        let next = next.clamp(0.0, 1.0);
        let moved = next != self.current;
        self.current = next;
        moved
    }
}
