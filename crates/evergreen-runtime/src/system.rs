//! Runtime system trait

use crate::state::FormationState;
use evergreen_core::Result;

/// Everything a system needs to know about the current frame.
///
/// The formation state travels with the frame instead of living in a global,
/// so each system can be driven in isolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Sanitized frame delta in seconds (never negative, never NaN)
    pub dt: f32,
    /// State every group should be heading toward this frame
    pub state: FormationState,
}

impl FrameContext {
    /// Non-finite deltas become 0, negative ones are clamped to 0
    pub fn new(dt: f32, state: FormationState) -> Self {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        Self { dt, state }
    }
}

/// A system that can be ticked by the render loop
///
/// Systems are updated in registration order, once per display refresh.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self) -> Result<()>;

    /// Called once per frame
    fn update(&mut self, frame: &FrameContext) -> Result<()>;

    /// Called when the system is being shut down
    fn shutdown(&mut self) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_delta_is_sanitized() {
        assert_eq!(FrameContext::new(0.1, FormationState::Formed).dt, 0.1);
        assert_eq!(FrameContext::new(f32::NAN, FormationState::Formed).dt, 0.0);
        assert_eq!(FrameContext::new(f32::INFINITY, FormationState::Formed).dt, 0.0);
        assert_eq!(FrameContext::new(-0.4, FormationState::Scattered).dt, 0.0);
    }
}
