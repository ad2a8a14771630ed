//! Evergreen Formation - Dual-formation particle transition engine
//!
//! Every group owns particles with two precomputed positions, a scattered
//! cloud and a spiral cone, and blends between them as the formation state
//! flips:
//! - Procedural scatter/cone generation with per-particle seeds
//! - Exponentially damped progress per group, redirectable mid-flight
//! - Breathing, floating, sparkle and color modulation shared by host and GPU
//! - Foliage packed for point-sprite rendering, ornaments as instance batches

pub mod config;
pub mod easing;
pub mod foliage;
pub mod generator;
pub mod gpu;
pub mod group;
pub mod modulation;
pub mod ornament;
pub mod rand;
pub mod shader;
pub mod theme;
pub mod transition;

use evergreen_core::{Result, Vec3};
use evergreen_runtime::{FrameContext, RuntimeSystem};

pub use config::{load_scene_config, CameraConfig, FoliageConfig, OrnamentConfig, SceneConfig};
pub use foliage::FoliageGroup;
pub use generator::{generate, FormationParams, FormationSet};
pub use gpu::{FoliageAttributes, FoliageFrame, OrnamentInstanceGpu};
pub use group::{FormationGroup, GroupSnapshot, RenderStyle};
pub use modulation::{modulate, Modulated, ModulationInput, ModulationProfile};
pub use ornament::{OrnamentGroup, OrnamentInstance};
pub use shader::modulation_prelude;
pub use theme::{ColorTheme, GeometryKind};
pub use transition::{TransitionProgress, SNAP_EPSILON};

/// All groups of one scene, ticked by the render loop as a RuntimeSystem.
///
/// Groups never share progress or time; each one is advanced with the same
/// explicit [`FrameContext`].
pub struct FormationSystem {
    groups: Vec<FormationGroup>,
    origin: Vec3,
    seed: u32,
}

impl FormationSystem {
    /// Generate every group described by `config`
    pub fn from_config(config: &SceneConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.scene.seed {
            Some(seed) => rand::FormationRng::new(seed),
            None => rand::FormationRng::from_entropy(),
        };
        let seed = rng.seed();

        let mut groups = Vec::with_capacity(1 + config.ornaments.len());
        groups.push(FormationGroup::Point(FoliageGroup::new(
            &config.foliage,
            &mut rng,
        )?));
        for (index, ornament) in config.ornaments.iter().enumerate() {
            groups.push(FormationGroup::InstancedRigid(OrnamentGroup::new(
                ornament, index, &mut rng,
            )?));
        }

        Ok(Self {
            groups,
            origin: config.scene.origin(),
            seed,
        })
    }

    pub fn groups(&self) -> &[FormationGroup] {
        &self.groups
    }

    /// Seed the layout was generated from
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Translation applied to every group when drawing
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn model_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_translation(glam::Vec3::from_array(self.origin.to_array()))
    }

    pub fn foliage(&self) -> Option<&FoliageGroup> {
        self.groups.iter().find_map(|group| match group {
            FormationGroup::Point(foliage) => Some(foliage),
            FormationGroup::InstancedRigid(_) => None,
        })
    }

    pub fn ornaments(&self) -> impl Iterator<Item = &OrnamentGroup> {
        self.groups.iter().filter_map(|group| match group {
            FormationGroup::InstancedRigid(ornament) => Some(ornament),
            FormationGroup::Point(_) => None,
        })
    }

    pub fn total_count(&self) -> usize {
        self.groups.iter().map(FormationGroup::count).sum()
    }

    /// True once every group sits exactly on its target
    pub fn is_settled(&self) -> bool {
        self.groups.iter().all(|group| group.progress().is_settled())
    }

    pub fn snapshots(&self) -> Vec<GroupSnapshot> {
        self.groups.iter().map(FormationGroup::snapshot).collect()
    }
}

impl RuntimeSystem for FormationSystem {
    fn initialize(&mut self) -> Result<()> {
        log::info!(
            "[formation] {} group(s), {} particle(s), seed {:#010x}",
            self.groups.len(),
            self.total_count(),
            self.seed
        );
        for group in &self.groups {
            log::debug!("[formation]   {} x{}", group.label(), group.count());
        }
        Ok(())
    }

    fn update(&mut self, frame: &FrameContext) -> Result<()> {
        let was_settled = self.is_settled();
        for group in &mut self.groups {
            group.update(frame.dt, frame.state);
        }
        if !was_settled && self.is_settled() {
            log::debug!("[formation] settled at {}", frame.state.name());
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "formation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evergreen_runtime::FormationState;

    fn small_config(seed: u32) -> SceneConfig {
        let mut config = SceneConfig::default();
        config.scene.seed = Some(seed);
        config.foliage.count = 200;
        for ornament in &mut config.ornaments {
            ornament.count = 10;
        }
        config
    }

    #[test]
    fn builds_one_foliage_and_one_group_per_ornament_entry() {
        let system = FormationSystem::from_config(&small_config(5)).unwrap();
        assert_eq!(system.groups().len(), 4);
        assert_eq!(system.groups()[0].style(), RenderStyle::Point);
        assert_eq!(system.foliage().unwrap().count(), 200);
        let labels: Vec<String> = system.ornaments().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["box/gold", "sphere/red", "sphere/silver"]);
        assert_eq!(system.total_count(), 230);
        assert_eq!(system.seed(), 5);
    }

    #[test]
    fn same_seed_same_layout() {
        let a = FormationSystem::from_config(&small_config(99)).unwrap();
        let b = FormationSystem::from_config(&small_config(99)).unwrap();
        assert_eq!(
            a.foliage().unwrap().attributes(),
            b.foliage().unwrap().attributes()
        );
    }

    #[test]
    fn groups_converge_independently() {
        let mut system = FormationSystem::from_config(&small_config(1)).unwrap();
        system.initialize().unwrap();
        let frame = FrameContext::new(0.1, FormationState::Formed);
        system.update(&frame).unwrap();

        // Foliage damps at 1.5, ornaments at 1.2
        let snaps = system.snapshots();
        assert!((snaps[0].progress - 0.15).abs() < 1e-6);
        assert!((snaps[1].progress - 0.12).abs() < 1e-6);
        assert!(snaps.iter().all(|s| (s.elapsed - 0.1).abs() < 1e-6));

        while !system.is_settled() {
            system.update(&frame).unwrap();
        }
        assert!(system.snapshots().iter().all(|s| s.progress == 1.0));
    }

    #[test]
    fn reversal_mid_flight_keeps_progress() {
        let mut system = FormationSystem::from_config(&small_config(2)).unwrap();
        for _ in 0..5 {
            system
                .update(&FrameContext::new(0.1, FormationState::Formed))
                .unwrap();
        }
        let mid = system.snapshots()[0].progress;
        system
            .update(&FrameContext::new(0.1, FormationState::Scattered))
            .unwrap();
        let after = system.snapshots()[0].progress;
        assert!(after < mid && after > mid * 0.8);
    }

    #[test]
    fn bad_frame_delta_leaves_time_finite() {
        let mut system = FormationSystem::from_config(&small_config(6)).unwrap();
        system
            .update(&FrameContext::new(f32::NAN, FormationState::Formed))
            .unwrap();
        for _ in 0..100 {
            system
                .update(&FrameContext::new(0.1, FormationState::Formed))
                .unwrap();
        }
        for snap in system.snapshots() {
            assert!((snap.elapsed - 10.0).abs() < 1e-3, "{}", snap.elapsed);
            assert_eq!(snap.progress, 1.0);
        }
        let foliage = system.foliage().unwrap().frame_uniform();
        assert!(foliage.time.is_finite());
        for ornament in system.ornaments() {
            let all_finite = ornament
                .batch()
                .iter()
                .all(|i| i.model.iter().flatten().all(|v| v.is_finite()));
            assert!(all_finite, "{}", ornament.label());
        }
    }

    #[test]
    fn model_matrix_applies_origin() {
        let system = FormationSystem::from_config(&small_config(3)).unwrap();
        let p = system.model_matrix().transform_point3(glam::Vec3::ZERO);
        assert_eq!(p, glam::Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn invalid_config_fails_before_generation() {
        let mut config = small_config(4);
        config.ornaments[1].theme = "teal".into();
        assert!(FormationSystem::from_config(&config).is_err());
    }
}
