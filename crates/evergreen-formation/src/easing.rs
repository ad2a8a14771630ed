//! Easing curves shared by both render paths

use serde::{Deserialize, Serialize};

/// Cubic ease-in-out: `4t³` below the midpoint, mirrored above it
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Hermite smoothstep `t²(3 − 2t)`
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Easing curve applied to transition progress before blending positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Fine point layer
    CubicInOut,
    /// Coarse instanced layer
    Smoothstep,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::CubicInOut => ease_in_out_cubic(t),
            Easing::Smoothstep => smoothstep(t),
        }
    }

    /// Discriminant baked into generated WGSL
    pub fn shader_id(self) -> u32 {
        match self {
            Easing::CubicInOut => 0,
            Easing::Smoothstep => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 2] = [Easing::CubicInOut, Easing::Smoothstep];

    #[test]
    fn easing_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn easing_is_monotonic() {
        for easing in ALL {
            let mut prev = easing.apply(0.0);
            for i in 1..=1000 {
                let v = easing.apply(i as f32 / 1000.0);
                assert!(v >= prev, "{easing:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn easing_midpoint_is_half() {
        for easing in ALL {
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn easing_clamps_out_of_range_input() {
        for easing in ALL {
            assert_eq!(easing.apply(-0.5), 0.0);
            assert_eq!(easing.apply(1.5), 1.0);
        }
    }
}
