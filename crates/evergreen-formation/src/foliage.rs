//! The point-sprite foliage group

use crate::config::FoliageConfig;
use crate::generator::{generate, FormationSet};
use crate::gpu::{FoliageAttributes, FoliageFrame};
use crate::modulation::{modulate, Modulated, ModulationInput, ModulationProfile};
use crate::rand::FormationRng;
use crate::transition::TransitionProgress;
use evergreen_core::Result;
use evergreen_runtime::FormationState;

/// Fine-grained particles animated entirely on the GPU.
///
/// The host only owns the static attributes (uploaded once) and the two
/// per-frame scalars, elapsed time and progress.
pub struct FoliageGroup {
    set: FormationSet,
    attributes: Vec<FoliageAttributes>,
    progress: TransitionProgress,
    elapsed: f32,
    base_size: f32,
    profile: ModulationProfile,
}

impl FoliageGroup {
    pub fn new(config: &FoliageConfig, rng: &mut FormationRng) -> Result<Self> {
        config.validate()?;
        let set = generate(config.count, &config.params(), rng);
        let attributes = FoliageAttributes::pack(&set);
        Ok(Self {
            set,
            attributes,
            progress: TransitionProgress::new(config.damping_rate, 0.0)?,
            elapsed: 0.0,
            base_size: config.size,
            profile: ModulationProfile::FOLIAGE,
        })
    }

    /// Accumulate time, then move progress toward `state`
    pub fn update(&mut self, dt: f32, state: FormationState) {
        if !dt.is_finite() {
            return;
        }
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.progress.advance(dt, state.target());
    }

    pub fn count(&self) -> usize {
        self.set.len()
    }

    pub fn progress(&self) -> &TransitionProgress {
        &self.progress
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn profile(&self) -> &ModulationProfile {
        &self.profile
    }

    pub fn formation_set(&self) -> &FormationSet {
        &self.set
    }

    /// Static storage-buffer contents
    pub fn attributes(&self) -> &[FoliageAttributes] {
        &self.attributes
    }

    /// The per-frame uniform write
    pub fn frame_uniform(&self) -> FoliageFrame {
        FoliageFrame {
            time: self.elapsed,
            progress: self.progress.current(),
            base_size: self.base_size,
            _pad: 0.0,
        }
    }

    /// Host evaluation of what the vertex shader computes for particle `index`
    pub fn sample(&self, index: usize) -> Option<Modulated> {
        let seed = *self.set.seed.get(index)?;
        Some(modulate(
            &self.profile,
            &ModulationInput {
                scatter: self.set.scatter[index],
                formation: self.set.formation[index],
                progress: self.progress.current(),
                elapsed: self.elapsed,
                seed,
            },
        ))
    }
}
