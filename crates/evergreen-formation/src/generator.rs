//! Procedural scatter cloud and cone formation sampling

use crate::rand::FormationRng;
use evergreen_core::{EvergreenError, Result, Vec3};

/// Shape parameters for one generated layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationParams {
    /// Radius of the scatter sphere
    pub scatter_radius: f32,
    /// Cone radius at the base of the formation
    pub base_radius: f32,
    /// Total formation height, centered on y = 0
    pub height: f32,
    /// Radians of spiral twist per unit of normalized height
    pub spiral_turns: f32,
    /// Half-width of the radial jitter around the cone surface, in world units
    pub radial_jitter: Option<f32>,
}

impl FormationParams {
    /// Reject shapes that would generate degenerate geometry
    pub fn validate(&self, prefix: &str) -> Result<()> {
        check_positive(&format!("{prefix}.scatter_radius"), self.scatter_radius)?;
        check_positive(&format!("{prefix}.base_radius"), self.base_radius)?;
        check_positive(&format!("{prefix}.height"), self.height)?;
        if !self.spiral_turns.is_finite() {
            return Err(EvergreenError::InvalidValue {
                field: format!("{prefix}.spiral_turns"),
                value: self.spiral_turns as f64,
                reason: "must be finite",
            });
        }
        if let Some(jitter) = self.radial_jitter {
            check_positive(&format!("{prefix}.radial_jitter"), jitter)?;
        }
        Ok(())
    }

    /// Largest horizontal distance a formation point may have from the axis
    pub fn max_formation_radius(&self) -> f32 {
        self.base_radius + self.radial_jitter.unwrap_or(0.0)
    }
}

pub(crate) fn check_positive(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EvergreenError::not_positive(field, value as f64))
    }
}

/// Parallel per-particle arrays produced by [`generate`]
#[derive(Debug, Clone, Default)]
pub struct FormationSet {
    pub scatter: Vec<Vec3>,
    pub formation: Vec<Vec3>,
    pub seed: Vec<f32>,
}

impl FormationSet {
    pub fn len(&self) -> usize {
        self.seed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seed.is_empty()
    }
}

/// Generate `count` particles: a scatter position, a formation position, and a seed each.
///
/// `count == 0` yields three empty arrays.
pub fn generate(count: usize, params: &FormationParams, rng: &mut FormationRng) -> FormationSet {
    let mut set = FormationSet {
        scatter: Vec::with_capacity(count),
        formation: Vec::with_capacity(count),
        seed: Vec::with_capacity(count),
    };

    for _ in 0..count {
        set.scatter.push(scatter_point(params.scatter_radius, rng));
        set.formation.push(cone_point(params, rng));
        set.seed.push(rng.next_f32());
    }

    set
}

/// Uniform sample from the volume of a ball of radius `max_radius`.
///
/// The cube root on the radius spreads samples evenly by volume instead of
/// piling them up near the center.
pub fn scatter_point(max_radius: f32, rng: &mut FormationRng) -> Vec3 {
    let r = max_radius * rng.next_f32().cbrt();
    let theta = rng.angle();
    let phi = (2.0 * rng.next_f32() - 1.0).clamp(-1.0, 1.0).acos();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Sample on a spiraling cone with its apex at the top
pub fn cone_point(params: &FormationParams, rng: &mut FormationRng) -> Vec3 {
    let h = rng.next_f32();
    let mut radius = (1.0 - h) * params.base_radius;
    if let Some(jitter) = params.radial_jitter {
        radius += rng.range(-jitter, jitter);
    }
    let angle = h * params.spiral_turns + rng.angle();

    Vec3::new(
        radius * angle.cos(),
        h * params.height - params.height / 2.0,
        radius * angle.sin(),
    )
}
