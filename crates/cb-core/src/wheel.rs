//! Wheel descriptors, wheel-arc profile, and wheel cylinder meshes

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{WHEEL_ARC_CLEARANCE, WHEEL_SEGMENTS};
use crate::design::null_as_default;
use crate::geometry::{BoxSize, Point2};
use crate::mesh::Mesh;
use crate::primitive::generate_cylinder_mesh;

/// A wheel and the body cutout around it, mirrored to both sides of the body
///
/// `center.x` is the length coordinate and `center.y` the height of the
/// wheel axis. `offset` is the lateral distance from the body centerline to
/// the inner face of the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wheel {
    pub center: Point2,
    pub wheel_radius: f32,
    pub arc_radius: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub offset: f32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: f32,
}

impl Wheel {
    /// Whether the wheel can shape the body at all
    pub fn is_degenerate(&self) -> bool {
        self.arc_radius.is_nan() || self.arc_radius <= 0.0
    }

    /// Whether a length coordinate lies inside the wheel-arc band
    pub fn covers(&self, length: f32) -> bool {
        between_inclusive(
            length,
            self.center.x - self.arc_radius,
            self.center.x + self.arc_radius,
        )
    }

    /// Height of the arc above the wheel center at a length coordinate
    ///
    /// Only meaningful inside the band where [`covers`](Self::covers) holds.
    pub fn arc_height(&self, length: f32) -> f32 {
        let d = self.center.x - length;
        (self.arc_radius * self.arc_radius - d * d).max(0.0).sqrt()
    }

    /// Absolute height of the arc surface at a length coordinate
    pub fn arc_top(&self, length: f32) -> f32 {
        self.center.y + self.arc_height(length)
    }

    /// Radius of the visual wheel, kept inside its own cutout
    pub fn visual_radius(&self) -> f32 {
        self.wheel_radius.min(self.arc_radius - WHEEL_ARC_CLEARANCE)
    }
}

/// First non-degenerate wheel whose arc band covers `length`
pub fn wheel_at(wheels: &[Wheel], length: f32) -> Option<&Wheel> {
    wheels
        .iter()
        .find(|w| !w.is_degenerate() && w.covers(length))
}

/// `min <= value <= max`
pub fn between_inclusive(value: f32, min: f32, max: f32) -> bool {
    value >= min && value <= max
}

/// Builds independent cylinder meshes for wheels
#[derive(Debug, Clone, Copy)]
pub struct WheelBuilder {
    half_width: f32,
    segments: u32,
}

impl WheelBuilder {
    pub fn new(size: BoxSize) -> Self {
        Self {
            half_width: size.half_width(),
            segments: WHEEL_SEGMENTS,
        }
    }

    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }

    /// Two meshes per wheel, one on each side of the centerline
    ///
    /// Cylinders have their axis along the width (Z) axis and are placed
    /// with their inner face at `half_width ± offset`. Wheels whose visual
    /// radius is not positive are skipped.
    pub fn build(&self, wheels: &[Wheel]) -> Vec<Mesh> {
        let mut result = Vec::with_capacity(wheels.len() * 2);

        for (index, wheel) in wheels.iter().enumerate() {
            let radius = wheel.visual_radius();
            if radius.is_nan() || radius <= 0.0 || wheel.width.is_nan() || wheel.width <= 0.0 {
                tracing::warn!(index, radius, width = wheel.width, "Skipping degenerate wheel");
                continue;
            }

            let lateral = wheel.offset + wheel.width / 2.0;
            for side in [-1.0, 1.0] {
                let cylinder = generate_cylinder_mesh(radius, wheel.width, self.segments);
                let position = Vec3::new(
                    wheel.center.x,
                    wheel.center.y,
                    self.half_width + side * lateral,
                );
                result.push(cylinder.translated(position));
            }
        }

        result
    }
}
