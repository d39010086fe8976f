//! Axis-aligned extents of generated meshes

use glam::Vec3;

/// Axis-aligned box spanned by a set of mesh positions
///
/// An empty box is inverted (`min = +inf`, `max = -inf`) so that folding
/// points or other boxes into it needs no special case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub const fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bbox = Self::empty();
        bbox.extend(points);
        bbox
    }

    /// True until at least one point has been included
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extents along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Inclusive on every face
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn union(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn expand_to_include(self, point: Vec3) -> Self {
        Self::new(self.min.min(point), self.max.max(point))
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl Extend<Vec3> for BoundingBox {
    fn extend<I: IntoIterator<Item = Vec3>>(&mut self, points: I) {
        for point in points {
            *self = self.expand_to_include(point);
        }
    }
}

impl FromIterator<Vec3> for BoundingBox {
    fn from_iter<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        Self::from_points(points)
    }
}
