//! WGSL generation for the GPU side of [`crate::modulation`].
//!
//! The template in `modulation.wgsl` mirrors the Rust formulas line for line;
//! only the constants differ per layer, so they are substituted here from the
//! same [`ModulationProfile`] the host path uses.

use crate::modulation::ModulationProfile;
use evergreen_core::Color;

const TEMPLATE: &str = include_str!("modulation.wgsl");

/// Format a float as a WGSL abstract-float literal
fn wgsl_f32(value: f32) -> String {
    // Debug always keeps a fractional part or exponent ("2.0", "1e-7")
    format!("{value:?}")
}

fn wgsl_rgb(color: &Color) -> String {
    format!(
        "{}, {}, {}",
        wgsl_f32(color.r),
        wgsl_f32(color.g),
        wgsl_f32(color.b)
    )
}

/// Placeholder → value pairs for one profile
pub fn profile_constants(profile: &ModulationProfile) -> Vec<(&'static str, String)> {
    vec![
        ("EASING", profile.easing.shader_id().to_string()),
        ("BREATHE_FREQUENCY", wgsl_f32(profile.breathe_frequency)),
        ("BREATHE_SEED_SCALE", wgsl_f32(profile.breathe_seed_scale)),
        ("BREATHE_AMPLITUDE", wgsl_f32(profile.breathe_amplitude)),
        ("FLOAT_FREQUENCY", wgsl_f32(profile.float_frequency)),
        ("FLOAT_SEED_SCALE", wgsl_f32(profile.float_seed_scale)),
        ("FLOAT_AMPLITUDE", wgsl_f32(profile.float_amplitude)),
        ("FLOAT_FLOOR", wgsl_f32(profile.float_floor)),
        ("FLOAT_LATERAL", wgsl_f32(profile.float_lateral)),
        ("SPARKLE_FREQUENCY", wgsl_f32(profile.sparkle_frequency)),
        ("SPARKLE_SEED_SCALE", wgsl_f32(profile.sparkle_seed_scale)),
        ("SPARKLE_AMPLITUDE", wgsl_f32(profile.sparkle_amplitude)),
        ("ALPHA_BASE", wgsl_f32(profile.alpha_base)),
        ("ALPHA_AMPLITUDE", wgsl_f32(profile.alpha_amplitude)),
        ("ALPHA_SEED_SCALE", wgsl_f32(profile.alpha_seed_scale)),
        ("COLOR_MIX", wgsl_f32(profile.color_mix)),
        ("DEEP_COLOR", wgsl_rgb(&profile.deep)),
        ("BRIGHT_COLOR", wgsl_rgb(&profile.bright)),
    ]
}

/// WGSL defining `Modulated`, `ease_progress` and `modulate` for `profile`.
///
/// Prepend it to a shader body that calls `modulate(...)`.
pub fn modulation_prelude(profile: &ModulationProfile) -> String {
    let mut source = TEMPLATE.to_string();
    for (name, value) in profile_constants(profile) {
        source = source.replace(&format!("{{{{{name}}}}}"), &value);
    }
    source
}
