//! Per-particle motion and shading modulation.
//!
//! One formula set serves both render paths. Foliage evaluates it per vertex
//! on the GPU (see [`crate::shader`], generated from the same
//! [`ModulationProfile`]), ornaments evaluate it per instance on the host.
//!
//! With eased progress `e` and `loose = 1 − e`:
//! - position: `lerp(scatter, formation, e)`
//! - breathing: `b = sin(time·f_b + seed·k_b)·A_b`, applied as
//!   `(b·(0.2 + 0.8·loose), 0.1·b, b·(0.2 + 0.8·loose))`
//! - floating: `sin(time·f_f + seed·k_f)·A_f·(loose + floor)` on y, plus
//!   `cos(time·f_f/2 + seed·k_f)·lateral` times the same amplitude on x
//! - sparkle: `1 + sin(time·f_s + seed·k_s)·A_s·e`
//! - alpha: `α₀ + α₁·sin(time + seed·k_α)`
//! - color: `lerp(deep, bright, seed·mix·e)`

use crate::easing::Easing;
use evergreen_core::{Color, Vec3};
use std::f32::consts::TAU;

/// Constants for one layer's modulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationProfile {
    pub easing: Easing,

    pub breathe_frequency: f32,
    pub breathe_seed_scale: f32,
    pub breathe_amplitude: f32,

    pub float_frequency: f32,
    pub float_seed_scale: f32,
    pub float_amplitude: f32,
    /// Fraction of `float_amplitude` kept once fully formed
    pub float_floor: f32,
    /// Scale of the x-axis drift relative to the vertical float
    pub float_lateral: f32,

    pub sparkle_frequency: f32,
    pub sparkle_seed_scale: f32,
    pub sparkle_amplitude: f32,

    pub alpha_base: f32,
    pub alpha_amplitude: f32,
    pub alpha_seed_scale: f32,

    /// Maximum blend toward `bright`, reached by seed 1 when fully formed
    pub color_mix: f32,
    pub deep: Color,
    pub bright: Color,
}

/// Deep emerald foliage color, sRGB `(0.0, 0.25, 0.1)` in linear light
pub const FOLIAGE_DEEP: Color = Color::rgb(0.0, 0.050876, 0.010023);
/// Gold highlight foliage color, sRGB `(1.0, 0.8, 0.2)` in linear light
pub const FOLIAGE_BRIGHT: Color = Color::rgb(1.0, 0.603827, 0.033105);

impl ModulationProfile {
    /// Point-sprite foliage: chaotic while scattered, sparkling once formed
    pub const FOLIAGE: Self = Self {
        easing: Easing::CubicInOut,
        breathe_frequency: 2.0,
        breathe_seed_scale: 10.0,
        breathe_amplitude: 0.05,
        float_frequency: 0.5,
        float_seed_scale: 20.0,
        float_amplitude: 0.5,
        float_floor: 0.0,
        float_lateral: 0.0,
        sparkle_frequency: 3.0,
        sparkle_seed_scale: 100.0,
        sparkle_amplitude: 0.5,
        alpha_base: 0.6,
        alpha_amplitude: 0.4,
        alpha_seed_scale: 10.0,
        color_mix: 0.2,
        deep: FOLIAGE_DEEP,
        bright: FOLIAGE_BRIGHT,
    };

    /// Rigid ornaments: slow drift that never fully stops, no sparkle.
    ///
    /// Ornament seeds are `phase / 2π`, so a seed scale of 2π turns the seed
    /// term back into the instance phase.
    pub const fn ornament(color: Color) -> Self {
        Self {
            easing: Easing::Smoothstep,
            breathe_frequency: 2.0,
            breathe_seed_scale: TAU,
            breathe_amplitude: 0.02,
            float_frequency: 1.0,
            float_seed_scale: TAU,
            float_amplitude: 0.5,
            float_floor: 0.1,
            float_lateral: 0.5,
            sparkle_frequency: 0.0,
            sparkle_seed_scale: 0.0,
            sparkle_amplitude: 0.0,
            alpha_base: 1.0,
            alpha_amplitude: 0.0,
            alpha_seed_scale: 0.0,
            color_mix: 0.0,
            deep: color,
            bright: color,
        }
    }
}

/// Static and per-frame inputs for one particle
#[derive(Debug, Clone, Copy)]
pub struct ModulationInput {
    pub scatter: Vec3,
    pub formation: Vec3,
    /// Raw (un-eased) transition progress
    pub progress: f32,
    /// Seconds accumulated by the owning group
    pub elapsed: f32,
    /// Per-particle seed in [0, 1)
    pub seed: f32,
}

/// Result of modulating one particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulated {
    pub position: Vec3,
    /// Multiplier on sprite size
    pub sparkle: f32,
    pub alpha: f32,
    pub color: Color,
}

/// Eased interpolation between the two static positions
pub fn base_position(profile: &ModulationProfile, scatter: Vec3, formation: Vec3, progress: f32) -> Vec3 {
    scatter.lerp(&formation, profile.easing.apply(progress))
}

/// Breathing + floating displacement, given eased progress
pub fn motion_offset(profile: &ModulationProfile, eased: f32, elapsed: f32, seed: f32) -> Vec3 {
    let loose = 1.0 - eased;

    let breathe = (elapsed * profile.breathe_frequency + seed * profile.breathe_seed_scale).sin()
        * profile.breathe_amplitude;
    let shake = breathe * (0.2 + 0.8 * loose);

    let drift = profile.float_amplitude * (loose + profile.float_floor);
    let float_phase = seed * profile.float_seed_scale;
    let float_y = (elapsed * profile.float_frequency + float_phase).sin() * drift;
    let float_x = (elapsed * profile.float_frequency * 0.5 + float_phase).cos()
        * drift
        * profile.float_lateral;

    Vec3::new(shake + float_x, breathe * 0.1 + float_y, shake)
}

/// Size multiplier; only visible as the formation assembles
pub fn sparkle(profile: &ModulationProfile, eased: f32, elapsed: f32, seed: f32) -> f32 {
    1.0 + (elapsed * profile.sparkle_frequency + seed * profile.sparkle_seed_scale).sin()
        * profile.sparkle_amplitude
        * eased
}

pub fn alpha(profile: &ModulationProfile, elapsed: f32, seed: f32) -> f32 {
    profile.alpha_base + profile.alpha_amplitude * (elapsed + seed * profile.alpha_seed_scale).sin()
}

/// Per-particle hue; the blend fraction varies by seed for uneven variegation
pub fn color(profile: &ModulationProfile, eased: f32, seed: f32) -> Color {
    profile
        .deep
        .lerp(&profile.bright, seed * profile.color_mix * eased)
}

/// Evaluate the full modulation for one particle
pub fn modulate(profile: &ModulationProfile, input: &ModulationInput) -> Modulated {
    let eased = profile.easing.apply(input.progress);
    let base = input.scatter.lerp(&input.formation, eased);

    Modulated {
        position: base + motion_offset(profile, eased, input.elapsed, input.seed),
        sparkle: sparkle(profile, eased, input.elapsed, input.seed),
        alpha: alpha(profile, input.elapsed, input.seed),
        color: color(profile, eased, input.seed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(progress: f32, elapsed: f32, seed: f32) -> ModulationInput {
        ModulationInput {
            scatter: Vec3::new(10.0, -4.0, 2.0),
            formation: Vec3::new(1.0, 3.0, -1.0),
            progress,
            elapsed,
            seed,
        }
    }

    #[test]
    fn base_position_hits_both_endpoints() {
        let p = &ModulationProfile::FOLIAGE;
        let i = input(0.0, 0.0, 0.0);
        assert_eq!(base_position(p, i.scatter, i.formation, 0.0), i.scatter);
        assert_eq!(base_position(p, i.scatter, i.formation, 1.0), i.formation);
    }

    #[test]
    fn foliage_matches_reference_values() {
        // Hand-evaluated at progress 0: e = 0, loose = 1
        let p = &ModulationProfile::FOLIAGE;
        let (elapsed, seed) = (1.3f32, 0.25f32);
        let out = modulate(p, &input(0.0, elapsed, seed));

        let breathe = (elapsed * 2.0 + seed * 10.0).sin() * 0.05;
        let float_y = (elapsed * 0.5 + seed * 20.0).sin() * 0.5;
        let expected = Vec3::new(10.0 + breathe, -4.0 + breathe * 0.1 + float_y, 2.0 + breathe);

        assert!((out.position - expected).length() < 1e-5);
        assert_eq!(out.sparkle, 1.0);
        assert_eq!(out.color, FOLIAGE_DEEP);
        let alpha = 0.6 + 0.4 * (elapsed + seed * 10.0).sin();
        assert!((out.alpha - alpha).abs() < 1e-6);
    }

    #[test]
    fn formed_foliage_is_calm() {
        let p = &ModulationProfile::FOLIAGE;
        for i in 0..200 {
            let elapsed = i as f32 * 0.37;
            let seed = (i as f32 * 0.618).fract();
            let out = modulate(p, &input(1.0, elapsed, seed));
            let offset = out.position - input(1.0, 0.0, 0.0).formation;
            // Breathing only: at most 0.2 · 0.05 sideways and 0.1 · 0.05 vertically
            assert!(offset.x.abs() <= 0.01 + 1e-6);
            assert!(offset.y.abs() <= 0.005 + 1e-6);
            assert!(offset.z.abs() <= 0.01 + 1e-6);
        }
    }

    #[test]
    fn scattered_foliage_floats() {
        let p = &ModulationProfile::FOLIAGE;
        let mut max_y = 0.0f32;
        for i in 0..400 {
            let out = modulate(p, &input(0.0, i as f32 * 0.1, 0.5));
            max_y = max_y.max((out.position.y - -4.0).abs());
        }
        assert!(max_y > 0.4);
    }

    #[test]
    fn sparkle_grows_with_progress() {
        let p = &ModulationProfile::FOLIAGE;
        let spread = |progress: f32| {
            (0..500)
                .map(|i| modulate(p, &input(progress, i as f32 * 0.05, 0.3)).sparkle)
                .fold((f32::MAX, f32::MIN), |(lo, hi), s| (lo.min(s), hi.max(s)))
        };
        assert_eq!(spread(0.0), (1.0, 1.0));
        let (lo, hi) = spread(1.0);
        assert!(lo < 0.55 && hi > 1.45);
    }

    #[test]
    fn color_blend_scales_with_seed_and_progress() {
        let p = &ModulationProfile::FOLIAGE;
        assert_eq!(color(p, 1.0, 0.0), FOLIAGE_DEEP);
        assert_eq!(color(p, 0.0, 0.9), FOLIAGE_DEEP);
        let c = color(p, 1.0, 1.0);
        let expected = FOLIAGE_DEEP.lerp(&FOLIAGE_BRIGHT, 0.2);
        assert!((c.g - expected.g).abs() < 1e-6);
        assert!(c.r > FOLIAGE_DEEP.r);
    }

    #[test]
    fn foliage_colors_are_linear() {
        use evergreen_core::srgb_to_linear;
        let close = |linear: f32, srgb: f32| (linear - srgb_to_linear(srgb)).abs() < 1e-5;
        assert!(close(FOLIAGE_DEEP.g, 0.25) && close(FOLIAGE_DEEP.b, 0.1));
        assert!(close(FOLIAGE_BRIGHT.g, 0.8) && close(FOLIAGE_BRIGHT.b, 0.2));
        assert_eq!(FOLIAGE_DEEP.r, 0.0);
        assert_eq!(FOLIAGE_BRIGHT.r, 1.0);
    }

    #[test]
    fn ornament_drift_never_fully_stops() {
        let p = ModulationProfile::ornament(Color::WHITE);
        let mut max_y = 0.0f32;
        for i in 0..400 {
            let off = motion_offset(&p, 1.0, i as f32 * 0.05, 0.2);
            max_y = max_y.max(off.y.abs());
        }
        // floor 0.1 of amplitude 0.5, plus breathing
        assert!(max_y > 0.04 && max_y < 0.06);
    }

    #[test]
    fn ornament_profile_keeps_color_and_size() {
        let gold = Color::from_hex(0xFFD700);
        let p = ModulationProfile::ornament(gold);
        let out = modulate(&p, &input(0.7, 3.0, 0.4));
        assert_eq!(out.color, gold);
        assert_eq!(out.sparkle, 1.0);
        assert_eq!(out.alpha, 1.0);
    }
}
