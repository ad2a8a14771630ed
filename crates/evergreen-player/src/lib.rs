//! Evergreen Player - interactive window for formation scenes
//!
//! `PlayerApp` drives a [`Session`] from winit events; the session itself
//! has no window and can be stepped in tests.

mod player_app;
mod session;

pub use player_app::PlayerApp;
pub use session::Session;

use anyhow::Result;
use evergreen_formation::SceneConfig;
use winit::event_loop::{ControlFlow, EventLoop};

/// Open a window and run until it is closed
pub fn run(config: SceneConfig, fullscreen: bool) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = PlayerApp::new(config, fullscreen);
    event_loop.run_app(&mut app)?;
    Ok(())
}
