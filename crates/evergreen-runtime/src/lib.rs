//! Evergreen Runtime - Render-loop infrastructure
//!
//! Provides the building blocks the host loop drives each frame:
//! - `GameClock`: sanitized frame delta and total elapsed time
//! - `FormationState` / `FormationToggle`: the two-state input all groups read
//! - `FrameContext`: the explicit per-frame input handed to every system
//! - `RuntimeSystem`: trait for systems ticked by the render loop

mod clock;
mod state;
mod system;

pub use clock::GameClock;
pub use state::{FormationState, FormationToggle};
pub use system::{FrameContext, RuntimeSystem};
