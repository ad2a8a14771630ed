//! Scene configuration parsed from TOML

use crate::generator::{check_positive, FormationParams};
use crate::theme::{ColorTheme, GeometryKind};
use evergreen_core::{EvergreenError, Result, Vec3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub scene: SceneSection,
    pub foliage: FoliageConfig,
    pub ornaments: Vec<OrnamentConfig>,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scene: SceneSection::default(),
            foliage: FoliageConfig::default(),
            ornaments: vec![
                OrnamentConfig::new(150, "box", "gold"),
                OrnamentConfig::new(200, "sphere", "red"),
                OrnamentConfig::new(100, "sphere", "silver"),
            ],
            camera: CameraConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneSection {
    pub name: String,
    /// Offset applied to every group
    pub origin: [f32; 3],
    /// Generation seed; omitted means a fresh layout every run
    pub seed: Option<u32>,
    /// Switch to the formed state once, this many seconds after start
    pub auto_assemble: bool,
    pub auto_assemble_delay: f64,
}

impl Default for SceneSection {
    fn default() -> Self {
        Self {
            name: "evergreen".to_string(),
            origin: [0.0, -2.0, 0.0],
            seed: None,
            auto_assemble: true,
            auto_assemble_delay: 2.5,
        }
    }
}

impl SceneSection {
    pub fn origin(&self) -> Vec3 {
        Vec3::from_array(self.origin)
    }

    /// Delay to hand to the formation toggle, if auto-assembly is on
    pub fn auto_assemble_after(&self) -> Option<f64> {
        self.auto_assemble.then_some(self.auto_assemble_delay)
    }
}

/// The point-sprite layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoliageConfig {
    pub count: usize,
    pub scatter_radius: f32,
    pub base_radius: f32,
    pub height: f32,
    pub spiral_turns: f32,
    pub damping_rate: f32,
    /// Sprite size before depth attenuation
    pub size: f32,
}

impl Default for FoliageConfig {
    fn default() -> Self {
        Self {
            count: 6000,
            scatter_radius: 15.0,
            base_radius: 3.5,
            height: 9.0,
            spiral_turns: 30.0,
            damping_rate: 1.5,
            size: 0.15,
        }
    }
}

impl FoliageConfig {
    pub fn params(&self) -> FormationParams {
        FormationParams {
            scatter_radius: self.scatter_radius,
            base_radius: self.base_radius,
            height: self.height,
            spiral_turns: self.spiral_turns,
            radial_jitter: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_count("foliage.count", self.count)?;
        self.params().validate("foliage")?;
        check_positive("foliage.damping_rate", self.damping_rate)?;
        check_positive("foliage.size", self.size)?;
        Ok(())
    }
}

/// One instanced ornament group (a geometry × theme combination)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrnamentConfig {
    pub count: usize,
    /// `box` (alias `cube`) or `sphere`
    pub geometry: String,
    /// `gold`, `red` or `silver`
    pub theme: String,
    pub scatter_radius: f32,
    pub base_radius: f32,
    pub height: f32,
    pub spiral_turns: f32,
    /// Half-width of the radial scatter around the cone surface, in world units
    pub radial_jitter: f32,
    pub damping_rate: f32,
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self::new(100, "sphere", "gold")
    }
}

impl OrnamentConfig {
    pub fn new(count: usize, geometry: &str, theme: &str) -> Self {
        Self {
            count,
            geometry: geometry.to_string(),
            theme: theme.to_string(),
            scatter_radius: 12.0,
            base_radius: 3.8,
            height: 9.0,
            spiral_turns: 25.0,
            radial_jitter: 0.25,
            damping_rate: 1.2,
        }
    }

    pub fn params(&self) -> FormationParams {
        FormationParams {
            scatter_radius: self.scatter_radius,
            base_radius: self.base_radius,
            height: self.height,
            spiral_turns: self.spiral_turns,
            radial_jitter: Some(self.radial_jitter),
        }
    }

    /// Mesh geometry for this group; point sprites are foliage-only
    pub fn geometry_kind(&self) -> Result<GeometryKind> {
        let kind = GeometryKind::from_key(&self.geometry)?;
        if !kind.is_mesh() {
            return Err(EvergreenError::Config(format!(
                "ornament geometry '{}' is not a mesh; use box or sphere",
                self.geometry
            )));
        }
        Ok(kind)
    }

    pub fn color_theme(&self) -> Result<ColorTheme> {
        ColorTheme::from_key(&self.theme)
    }

    /// Label like `box/gold`
    pub fn label(&self) -> String {
        format!("{}/{}", self.geometry, self.theme)
    }

    pub fn validate(&self, index: usize) -> Result<()> {
        let prefix = format!("ornaments[{index}]");
        check_count(&format!("{prefix}.count"), self.count)?;
        self.geometry_kind()?;
        self.color_theme()?;
        self.params().validate(&prefix)?;
        check_positive(&format!("{prefix}.damping_rate"), self.damping_rate)?;
        Ok(())
    }
}

/// Orbit camera around the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    /// Orbit speed while formed; one unit is a full turn per minute
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits, measured from straight up (radians)
    pub min_polar: f32,
    pub max_polar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 2.0, 12.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 50.0,
            auto_rotate_speed: 0.5,
            min_distance: 5.0,
            max_distance: 25.0,
            min_polar: std::f32::consts::FRAC_PI_4,
            max_polar: std::f32::consts::FRAC_PI_2 + 0.2,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.fov_degrees.is_finite() && self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(EvergreenError::InvalidValue {
                field: "camera.fov_degrees".into(),
                value: self.fov_degrees as f64,
                reason: "must be between 0 and 180 degrees",
            });
        }
        if !self.auto_rotate_speed.is_finite() {
            return Err(EvergreenError::InvalidValue {
                field: "camera.auto_rotate_speed".into(),
                value: self.auto_rotate_speed as f64,
                reason: "must be finite",
            });
        }
        check_positive("camera.min_distance", self.min_distance)?;
        check_positive("camera.max_distance", self.max_distance)?;
        if self.min_distance > self.max_distance {
            return Err(EvergreenError::Config(format!(
                "camera.min_distance ({}) exceeds camera.max_distance ({})",
                self.min_distance, self.max_distance
            )));
        }
        if !(self.min_polar.is_finite()
            && self.max_polar.is_finite()
            && 0.0 <= self.min_polar
            && self.min_polar <= self.max_polar
            && self.max_polar <= std::f32::consts::PI)
        {
            return Err(EvergreenError::Config(format!(
                "camera polar limits [{}, {}] must satisfy 0 <= min <= max <= pi",
                self.min_polar, self.max_polar
            )));
        }
        let offset = Vec3::from_array(self.position) - Vec3::from_array(self.target);
        if !offset.to_array().iter().all(|c| c.is_finite()) || offset.length() == 0.0 {
            return Err(EvergreenError::Config(
                "camera.position must differ from camera.target".into(),
            ));
        }
        Ok(())
    }
}

fn check_count(field: &str, count: usize) -> Result<()> {
    if count == 0 {
        return Err(EvergreenError::not_positive(field, 0.0));
    }
    Ok(())
}

impl SceneConfig {
    /// Parse and validate a scene from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SceneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML, e.g. to write out the defaults
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EvergreenError::Config(e.to_string()))
    }

    /// Fail fast on anything that would produce degenerate groups
    pub fn validate(&self) -> Result<()> {
        let origin = self.scene.origin();
        if !origin.to_array().iter().all(|c| c.is_finite()) {
            return Err(EvergreenError::Config("scene.origin must be finite".into()));
        }
        let delay = self.scene.auto_assemble_delay;
        if !(delay.is_finite() && delay >= 0.0) {
            return Err(EvergreenError::InvalidValue {
                field: "scene.auto_assemble_delay".into(),
                value: delay,
                reason: "must be a finite number of seconds, zero or more",
            });
        }

        self.foliage.validate()?;
        for (index, ornament) in self.ornaments.iter().enumerate() {
            ornament.validate(index)?;
        }
        self.camera.validate()?;
        Ok(())
    }

    /// Total particles across every group
    pub fn total_count(&self) -> usize {
        self.foliage.count + self.ornaments.iter().map(|o| o.count).sum::<usize>()
    }
}

/// Load and validate a scene file
pub fn load_scene_config<P: AsRef<Path>>(path: P) -> Result<SceneConfig> {
    let content = fs::read_to_string(path)?;
    SceneConfig::from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_the_reference_scene() {
        let config = SceneConfig::default();
        config.validate().unwrap();

        assert_eq!(config.foliage.count, 6000);
        assert_eq!(config.ornaments.len(), 3);
        let counts: Vec<usize> = config.ornaments.iter().map(|o| o.count).collect();
        assert_eq!(counts, vec![150, 200, 100]);
        assert_eq!(config.ornaments[0].geometry_kind().unwrap(), GeometryKind::Box);
        assert_eq!(config.ornaments[2].color_theme().unwrap(), ColorTheme::Silver);
        assert_eq!(config.scene.origin(), Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(config.scene.auto_assemble_after(), Some(2.5));
        assert_eq!(config.total_count(), 6450);
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config = SceneConfig::from_toml_str("").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn parse_partial_scene() {
        let toml_str = r#"
[scene]
name = "small"
seed = 7
auto_assemble = false

[foliage]
count = 500
damping_rate = 3

[[ornaments]]
count = 12
geometry = "cube"
theme = "red"
radial_jitter = 0.5
"#;
        let config = SceneConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.scene.name, "small");
        assert_eq!(config.scene.seed, Some(7));
        assert_eq!(config.scene.auto_assemble_after(), None);
        assert_eq!(config.foliage.count, 500);
        assert!((config.foliage.damping_rate - 3.0).abs() < 1e-6);
        // Unset fields keep their defaults
        assert!((config.foliage.scatter_radius - 15.0).abs() < 1e-6);

        assert_eq!(config.ornaments.len(), 1);
        let ornament = &config.ornaments[0];
        assert_eq!(ornament.geometry_kind().unwrap(), GeometryKind::Box);
        assert_eq!(ornament.params().radial_jitter, Some(0.5));
        assert!((ornament.base_radius - 3.8).abs() < 1e-6);
    }

    #[test]
    fn unknown_theme_fails_fast() {
        let toml_str = r#"
[[ornaments]]
count = 10
geometry = "sphere"
theme = "purple"
"#;
        let err = SceneConfig::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, EvergreenError::UnknownKey { kind: "color theme", .. }));
    }

    #[test]
    fn point_geometry_is_not_an_ornament() {
        let toml_str = r#"
[[ornaments]]
geometry = "point"
"#;
        let err = SceneConfig::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, EvergreenError::Config(_)));
    }

    #[test]
    fn non_positive_values_fail_fast() {
        let cases = [
            ("[foliage]\ncount = 0", "foliage.count"),
            ("[foliage]\nheight = -1.0", "foliage.height"),
            ("[foliage]\ndamping_rate = 0.0", "foliage.damping_rate"),
            ("[[ornaments]]\nradial_jitter = 0.0", "ornaments[0].radial_jitter"),
            ("[[ornaments]]\ndamping_rate = -2.0", "ornaments[0].damping_rate"),
            ("[[ornaments]]\nscatter_radius = 0", "ornaments[0].scatter_radius"),
        ];
        for (toml_str, field) in cases {
            let err = SceneConfig::from_toml_str(toml_str).unwrap_err();
            assert!(
                err.to_string().contains(field),
                "expected error naming {field}, got {err}"
            );
        }
    }

    #[test]
    fn negative_count_is_a_parse_error() {
        let err = SceneConfig::from_toml_str("[foliage]\ncount = -5").unwrap_err();
        assert!(matches!(err, EvergreenError::TomlParseError(_)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SceneConfig::from_toml_str("[foliage]\ncolour = 1").unwrap_err();
        assert!(matches!(err, EvergreenError::TomlParseError(_)));
    }

    #[test]
    fn camera_limits_are_checked() {
        let mut config = SceneConfig::default();
        config.camera.fov_degrees = 180.0;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.camera.min_distance = 30.0;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.camera.position = config.camera.target;
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = SceneConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = SceneConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_scene_config("/nonexistent/evergreen/scene.toml").unwrap_err();
        assert!(matches!(err, EvergreenError::IoError(_)));
    }
}
