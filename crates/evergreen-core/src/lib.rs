//! Evergreen Core - Foundational types for the Evergreen formation engine
//!
//! This crate provides the types every other Evergreen crate depends on:
//! - `Vec3` - Spatial vector with the handful of operations the engine needs
//! - `Color` - Linear RGBA color, decoded from sRGB hex
//! - Error types and Result alias

mod error;
mod types;

pub use error::{EvergreenError, Result};
pub use types::{srgb_to_linear, Color, Vec3};
