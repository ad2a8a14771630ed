//! Instanced rigid ornaments: host-composed transforms, one batch upload per frame

use crate::config::OrnamentConfig;
use crate::generator::{generate, FormationParams};
use crate::gpu::OrnamentInstanceGpu;
use crate::modulation::{base_position, motion_offset, ModulationProfile};
use crate::rand::FormationRng;
use crate::theme::{ColorTheme, GeometryKind};
use crate::transition::TransitionProgress;
use evergreen_core::{Result, Vec3};
use evergreen_runtime::FormationState;
use glam::{EulerRot, Mat4, Quat};
use std::f32::consts::TAU;

/// Immutable per-instance data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrnamentInstance {
    pub scatter: Vec3,
    pub formation: Vec3,
    pub scale: f32,
    /// Radians per second about X (and half of it about Y)
    pub rotation_speed: f32,
    /// In [0, 2π)
    pub phase: f32,
}

impl OrnamentInstance {
    /// Modulation seed in [0, 1)
    pub fn seed(&self) -> f32 {
        self.phase / TAU
    }

    /// Euler angles (x, y, z) at `elapsed`; independent of progress
    pub fn rotation(&self, elapsed: f32) -> Vec3 {
        let spin = elapsed * self.rotation_speed;
        Vec3::new(spin + self.phase, spin * 0.5 + self.phase, 0.0)
    }

    /// Position including breathing and floating
    pub fn position(&self, profile: &ModulationProfile, progress: f32, elapsed: f32) -> Vec3 {
        let eased = profile.easing.apply(progress);
        base_position(profile, self.scatter, self.formation, progress)
            + motion_offset(profile, eased, elapsed, self.seed())
    }

    /// `T(position) · R(euler XYZ) · S(scale)`
    pub fn transform(&self, profile: &ModulationProfile, progress: f32, elapsed: f32) -> Mat4 {
        let position = self.position(profile, progress, elapsed);
        let euler = self.rotation(elapsed);
        let rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
        Mat4::from_scale_rotation_translation(
            glam::Vec3::splat(self.scale),
            rotation,
            glam::Vec3::from_array(position.to_array()),
        )
    }
}

/// Generate `count` instances with their per-instance statics
pub fn generate_instances(
    count: usize,
    params: &FormationParams,
    rng: &mut FormationRng,
) -> Vec<OrnamentInstance> {
    let set = generate(count, params, rng);
    set.scatter
        .into_iter()
        .zip(set.formation)
        .map(|(scatter, formation)| OrnamentInstance {
            scatter,
            formation,
            scale: 0.1 + rng.next_f32() * 0.25,
            rotation_speed: rng.next_f32() * 0.02,
            phase: rng.angle(),
        })
        .collect()
}

/// One geometry × color theme group
pub struct OrnamentGroup {
    geometry: GeometryKind,
    theme: ColorTheme,
    instances: Vec<OrnamentInstance>,
    profile: ModulationProfile,
    progress: TransitionProgress,
    elapsed: f32,
    /// Rebuilt every update, uploaded with a single buffer write
    batch: Vec<OrnamentInstanceGpu>,
}

impl OrnamentGroup {
    pub fn new(config: &OrnamentConfig, index: usize, rng: &mut FormationRng) -> Result<Self> {
        config.validate(index)?;
        let geometry = config.geometry_kind()?;
        let theme = config.color_theme()?;
        let instances = generate_instances(config.count, &config.params(), rng);

        let mut group = Self {
            geometry,
            theme,
            batch: Vec::with_capacity(instances.len()),
            instances,
            profile: ModulationProfile::ornament(theme.color()),
            progress: TransitionProgress::new(config.damping_rate, 0.0)?,
            elapsed: 0.0,
        };
        group.rebuild_batch();
        Ok(group)
    }

    /// Accumulate time, advance progress, then recompose every transform
    pub fn update(&mut self, dt: f32, state: FormationState) {
        if !dt.is_finite() {
            return;
        }
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.progress.advance(dt, state.target());
        self.rebuild_batch();
    }

    fn rebuild_batch(&mut self) {
        let progress = self.progress.current();
        let color = self.profile.deep.to_array();
        self.batch.clear();
        self.batch.extend(self.instances.iter().map(|instance| OrnamentInstanceGpu {
            model: instance
                .transform(&self.profile, progress, self.elapsed)
                .to_cols_array_2d(),
            color,
        }));
    }

    pub fn geometry(&self) -> GeometryKind {
        self.geometry
    }

    pub fn theme(&self) -> ColorTheme {
        self.theme
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.geometry.key(), self.theme.key())
    }

    pub fn count(&self) -> usize {
        self.instances.len()
    }

    pub fn instances(&self) -> &[OrnamentInstance] {
        &self.instances
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

    /// Instance data for this frame
    pub fn batch(&self) -> &[OrnamentInstanceGpu] {
        &self.batch
    }
}
