//! GPU data layouts: static foliage attributes, per-frame uniforms, ornament instances

use crate::generator::FormationSet;
use bytemuck::{Pod, Zeroable};

/// Static per-particle foliage data, matching WGSL `FoliageAttributes`.
/// 32 bytes (2 × vec4), uploaded once into a storage buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FoliageAttributes {
    pub scatter_seed: [f32; 4], // xyz = scatter position, w = seed
    pub formation: [f32; 4],    // xyz = formation position, w unused
}

impl FoliageAttributes {
    /// Pack a generated set, one entry per particle
    pub fn pack(set: &FormationSet) -> Vec<Self> {
        set.scatter
            .iter()
            .zip(&set.formation)
            .zip(&set.seed)
            .map(|((s, f), &seed)| Self {
                scatter_seed: [s.x, s.y, s.z, seed],
                formation: [f.x, f.y, f.z, 0.0],
            })
            .collect()
    }
}

/// Per-frame foliage values, the tail of the WGSL `FoliageUniforms` block.
/// Rewritten every frame together with the camera matrices.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FoliageFrame {
    pub time: f32,
    pub progress: f32,
    /// Sprite size before depth attenuation
    pub base_size: f32,
    pub _pad: f32,
}

/// One ornament instance, laid out for the ornament pipeline's instance buffer.
/// 80 bytes: column-major model matrix followed by linear RGBA.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct OrnamentInstanceGpu {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;
    use evergreen_core::Vec3;

    #[test]
    fn layouts_match_wgsl() {
        assert_eq!(std::mem::size_of::<FoliageAttributes>(), 32);
        assert_eq!(std::mem::size_of::<FoliageFrame>(), 16);
        assert_eq!(std::mem::size_of::<OrnamentInstanceGpu>(), 80);
        assert_eq!(std::mem::align_of::<OrnamentInstanceGpu>(), 4);
    }

    #[test]
    fn pack_interleaves_seed_with_scatter() {
        let set = FormationSet {
            scatter: vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 4.0)],
            formation: vec![Vec3::new(0.5, -4.5, 0.0), Vec3::new(0.0, 4.5, 0.0)],
            seed: vec![0.25, 0.75],
        };
        let packed = FoliageAttributes::pack(&set);
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[0].scatter_seed, [1.0, 2.0, 3.0, 0.25]);
        assert_eq!(packed[1].formation, [0.0, 4.5, 0.0, 0.0]);

        let bytes: &[u8] = bytemuck::cast_slice(&packed);
        assert_eq!(bytes.len(), 64);
    }
}
