//! Formation state and the toggle that drives it

use serde::{Deserialize, Serialize};

/// The two arrangements every formation group moves between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationState {
    /// Diffuse spherical cloud
    #[default]
    Scattered,
    /// Assembled cone ("tree")
    Formed,
}

impl FormationState {
    /// Progress value groups converge toward in this state
    pub fn target(self) -> f32 {
        match self {
            FormationState::Scattered => 0.0,
            FormationState::Formed => 1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FormationState::Scattered => FormationState::Formed,
            FormationState::Formed => FormationState::Scattered,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FormationState::Scattered => "scattered",
            FormationState::Formed => "formed",
        }
    }
}

/// Holds the current formation state for the host loop.
///
/// Starts scattered and optionally assembles itself once after a delay.
/// Manual toggles are always honored; the delayed assemble still fires once.
#[derive(Debug, Clone)]
pub struct FormationToggle {
    state: FormationState,
    auto_assemble_after: Option<f64>,
    auto_fired: bool,
}

impl FormationToggle {
    pub fn new(initial: FormationState) -> Self {
        Self {
            state: initial,
            auto_assemble_after: None,
            auto_fired: false,
        }
    }

    /// Switch to `Formed` the first time elapsed time passes `delay` seconds
    pub fn with_auto_assemble(mut self, delay: f64) -> Self {
        self.auto_assemble_after = Some(delay);
        self
    }

    pub fn state(&self) -> FormationState {
        self.state
    }

    pub fn set(&mut self, state: FormationState) {
        if state != self.state {
            log::info!("formation state -> {}", state.name());
        }
        self.state = state;
    }

    pub fn toggle(&mut self) -> FormationState {
        self.set(self.state.toggled());
        self.state
    }

    /// Poll timers. Returns true when the state changed during this call.
    pub fn update(&mut self, elapsed: f64) -> bool {
        let Some(delay) = self.auto_assemble_after else {
            return false;
        };
        if self.auto_fired || elapsed < delay {
            return false;
        }
        self.auto_fired = true;
        let changed = self.state != FormationState::Formed;
        self.set(FormationState::Formed);
        changed
    }
}

impl Default for FormationToggle {
    fn default() -> Self {
        Self::new(FormationState::Scattered)
    }
}
