//! Window-independent playback state: formation system, toggle, clock, camera

use evergreen_core::Result;
use evergreen_formation::{FormationSystem, SceneConfig};
use evergreen_render::OrbitCamera;
use evergreen_runtime::{FormationState, FormationToggle, FrameContext, GameClock, RuntimeSystem};

pub struct Session {
    pub system: FormationSystem,
    pub toggle: FormationToggle,
    pub clock: GameClock,
    pub camera: OrbitCamera,
}

impl Session {
    pub fn new(config: &SceneConfig, aspect: f32) -> Result<Self> {
        let mut system = FormationSystem::from_config(config)?;
        system.initialize()?;

        let mut toggle = FormationToggle::new(FormationState::Scattered);
        if let Some(delay) = config.scene.auto_assemble_after() {
            toggle = toggle.with_auto_assemble(delay);
        }

        Ok(Self {
            system,
            toggle,
            clock: GameClock::new(),
            camera: OrbitCamera::from_config(&config.camera, aspect),
        })
    }

    /// Advance from wall time
    pub fn tick(&mut self) -> Result<()> {
        self.clock.tick();
        self.update()
    }

    /// Advance by a fixed delta
    pub fn step(&mut self, dt: f64) -> Result<()> {
        self.clock.advance(dt);
        self.update()
    }

    fn update(&mut self) -> Result<()> {
        self.toggle.update(self.clock.total_time);
        let state = self.toggle.state();
        let dt = self.clock.delta_time as f32;

        self.system.update(&FrameContext::new(dt, state))?;
        self.camera.advance(dt, state == FormationState::Formed);
        Ok(())
    }

    pub fn toggle_formation(&mut self) -> FormationState {
        self.toggle.toggle()
    }

    pub fn state(&self) -> FormationState {
        self.toggle.state()
    }
}
