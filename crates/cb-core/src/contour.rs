//! Cross-section lookup along the body's length

use crate::geometry::Point2;
use crate::section::SectionTable;

/// Step-function lookup of the cross-section at a length index
///
/// A slice inherits the nearest section defined at or below its index;
/// the primary contour applies when none is. There is no forward search.
#[derive(Debug, Clone, Copy)]
pub struct ContourQuery<'a> {
    contour: &'a [Point2],
    sections: &'a SectionTable,
}

impl<'a> ContourQuery<'a> {
    pub fn new(contour: &'a [Point2], sections: &'a SectionTable) -> Self {
        Self { contour, sections }
    }

    /// Cross-section in effect at length index `l`
    pub fn query(&self, l: usize) -> &'a [Point2] {
        let sections = self.sections;
        (0..=l)
            .rev()
            .find_map(|i| sections.get(i))
            .unwrap_or(self.contour)
    }

    /// Height of the cross-section at length `l`, width sample `w`
    pub fn height(&self, l: usize, w: usize) -> f32 {
        self.query(l)[w].y
    }
}
