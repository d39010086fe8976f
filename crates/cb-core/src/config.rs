//! Build and export configuration
//!
//! Settings can be loaded from a RON file; every missing field takes its
//! default.

use std::path::Path;

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::constants::{DISPLAY_SCALE, WHEEL_SEGMENTS};
use crate::design::Design;
use crate::panel::Sides;

/// Material colors of the preview groups (0xRRGGBB)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterialColors {
    pub odd: u32,
    pub even: u32,
    pub wheels: u32,
}

impl From<&Design> for MaterialColors {
    fn from(design: &Design) -> Self {
        Self {
            odd: design.color_odd,
            even: design.color_even,
            wheels: design.color_wheels,
        }
    }
}

impl MaterialColors {
    /// Split a 0xRRGGBB color into RGB floats in `[0, 1]`
    pub fn rgb(color: u32) -> [f32; 3] {
        let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
        [channel(16), channel(8), channel(0)]
    }
}

/// How body meshes are generated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildOptions {
    /// Multiplier from lattice units to display units
    pub display_scale: f32,
    pub sides: Sides,
    /// Segments around each wheel cylinder
    pub wheel_segments: u32,
    pub render_wheels: bool,
    /// Overrides the design's own colors
    pub colors: Option<MaterialColors>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::preview()
    }
}

impl BuildOptions {
    /// Double-sided body with wheels, for interactive viewing
    pub fn preview() -> Self {
        Self {
            display_scale: DISPLAY_SCALE,
            sides: Sides::Double,
            wheel_segments: WHEEL_SEGMENTS,
            render_wheels: true,
            colors: None,
        }
    }

    /// Outward-facing body only, for closed solid output
    pub fn solid() -> Self {
        Self {
            sides: Sides::Single,
            render_wheels: false,
            ..Self::preview()
        }
    }

    /// Colors to use for a design
    pub fn colors_for(&self, design: &Design) -> MaterialColors {
        self.colors.unwrap_or_else(|| MaterialColors::from(design))
    }
}

/// How a body is written to a mesh file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportOptions {
    /// Rotation about X, Y and Z in degrees, applied in that order
    pub rotation_deg: [f32; 3],
    pub include_wheels: bool,
    pub display_scale: f32,
    pub wheel_segments: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            rotation_deg: [90.0, 0.0, 0.0],
            include_wheels: false,
            display_scale: DISPLAY_SCALE,
            wheel_segments: WHEEL_SEGMENTS,
        }
    }
}

/// Display scales must be finite and positive
pub fn is_valid_scale(scale: f32) -> bool {
    scale.is_finite() && scale > 0.0
}

impl ExportOptions {
    /// Scale followed by the X, Y, Z rotations
    pub fn transform(&self) -> Mat4 {
        let [x, y, z] = self.rotation_deg.map(f32::to_radians);
        Mat4::from_rotation_z(z)
            * Mat4::from_rotation_y(y)
            * Mat4::from_rotation_x(x)
            * Mat4::from_scale(glam::Vec3::splat(self.display_scale))
    }
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CbConfig {
    #[serde(default)]
    pub build: BuildOptions,
    #[serde(default)]
    pub export: ExportOptions,
}

impl CbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (section, scale) in [
            ("build", self.build.display_scale),
            ("export", self.export.display_scale),
        ] {
            if !is_valid_scale(scale) {
                return Err(ConfigError::InvalidScale { section, scale });
            }
        }
        Ok(())
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Invalid {section} display_scale {scale}: must be finite and positive")]
    InvalidScale { section: &'static str, scale: f32 },
}
