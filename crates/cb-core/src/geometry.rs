//! Shared geometric input types: profile points and box dimensions

use serde::{Deserialize, Serialize};

/// A sample of a drawn profile curve
///
/// `x` is the position along the profile's axis, `y` the height (or width)
/// value at that position. Only `y` drives the deformation; `x` is kept so
/// records round-trip through the editor unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Build a profile of `count` samples with the same value everywhere
pub fn flat_profile(count: usize, value: f32) -> Vec<Point2> {
    (0..count).map(|i| Point2::new(i as f32, value)).collect()
}

/// Profile whose samples the engine reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// Height vs. length
    Side,
    /// Width vs. length
    Top,
    /// Height vs. width (cross-section)
    Front,
}

impl ProfileKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProfileKind::Side => "side",
            ProfileKind::Top => "top",
            ProfileKind::Front => "front",
        }
    }
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Highest vertex index a `u32` index buffer can address
const MAX_VERTEX_INDEX: usize = u32::MAX as usize;

/// Lattice resolution of the body's bounding box
///
/// Serialized as `{x, y, z}` to match stored design records, where `x` is
/// the length, `y` the width and `z` the height point count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSize {
    #[serde(rename = "x")]
    pub length: usize,
    #[serde(rename = "y")]
    pub width: usize,
    #[serde(rename = "z")]
    pub height: usize,
}

impl BoxSize {
    pub const fn new(length: usize, width: usize, height: usize) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Reject dimensions that make midpoint/centering math degenerate, or
    /// panels too large for `u32` vertex indices
    pub fn validate(&self) -> Result<(), BodyError> {
        for (axis, value) in [
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ] {
            if value < 2 {
                return Err(BodyError::InvalidDimension { axis, value });
            }
        }

        // Double-sided panels hold two copies of the largest face lattice
        let vertices = [
            self.length.checked_mul(self.width),
            self.length.checked_mul(self.height),
            self.width.checked_mul(self.height),
        ]
        .into_iter()
        .map(|face| face.and_then(|n| n.checked_mul(2)))
        .try_fold(0usize, |max, n| n.map(|n| max.max(n)));
        match vertices {
            Some(n) if n - 1 <= MAX_VERTEX_INDEX => Ok(()),
            _ => Err(BodyError::TooLarge { size: *self }),
        }
    }

    /// Width centerline in lattice units
    pub fn half_width(&self) -> f32 {
        (self.width as f32 - 1.0) / 2.0
    }
}

impl Default for BoxSize {
    fn default() -> Self {
        let (length, width, height) = crate::constants::DEFAULT_BOX_SIZE;
        Self::new(length, width, height)
    }
}

/// Check that a profile has exactly one sample per lattice index
pub fn check_profile(
    kind: ProfileKind,
    points: &[Point2],
    expected: usize,
) -> Result<(), BodyError> {
    if points.len() != expected {
        return Err(BodyError::ProfileLength {
            profile: kind,
            expected,
            actual: points.len(),
        });
    }
    Ok(())
}

/// Input-shape errors that abort a body build
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BodyError {
    #[error("Invalid box {axis} point count {value}: at least 2 points are required")]
    InvalidDimension { axis: &'static str, value: usize },
    #[error(
        "Box of {}x{}x{} points is too large for 32-bit mesh indices",
        .size.length,
        .size.width,
        .size.height
    )]
    TooLarge { size: BoxSize },
    #[error("The {profile} profile has {actual} samples, expected {expected}")]
    ProfileLength {
        profile: ProfileKind,
        expected: usize,
        actual: usize,
    },
    #[error("Section at length index {index} has {actual} samples, expected {expected}")]
    SectionLength {
        index: usize,
        expected: usize,
        actual: usize,
    },
}
