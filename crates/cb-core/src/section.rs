//! Per-length-index cross-section overrides and their interpolation

use serde::{Deserialize, Serialize};

use crate::geometry::{BodyError, Point2};

/// Sparse mapping from length index to a full cross-section contour
///
/// Serialized as an array with `null` holes, the shape stored design
/// records use. Keys are unique by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionTable(Vec<Option<Vec<Point2>>>);

impl SectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contour defined at `index`, if any
    pub fn get(&self, index: usize) -> Option<&[Point2]> {
        self.0.get(index).and_then(|s| s.as_deref())
    }

    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Define (or replace) the contour at `index`
    pub fn set(&mut self, index: usize, contour: Vec<Point2>) {
        if self.0.len() <= index {
            self.0.resize(index + 1, None);
        }
        self.0[index] = Some(contour);
    }

    /// Remove the contour at `index`, returning it
    pub fn remove(&mut self, index: usize) -> Option<Vec<Point2>> {
        let removed = self.0.get_mut(index).and_then(Option::take);
        while matches!(self.0.last(), Some(None)) {
            self.0.pop();
        }
        removed
    }

    /// Sorted indices that hold a contour
    pub fn defined_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i))
    }

    /// Number of defined contours
    pub fn defined_count(&self) -> usize {
        self.defined_indices().count()
    }

    pub fn is_empty(&self) -> bool {
        self.defined_count() == 0
    }

    /// One past the highest index the table has storage for
    pub fn span(&self) -> usize {
        self.0.len()
    }

    /// Check every defined contour has `width` samples
    pub fn validate(&self, width: usize) -> Result<(), BodyError> {
        for index in self.defined_indices() {
            let actual = self.get(index).map_or(0, <[Point2]>::len);
            if actual != width {
                return Err(BodyError::SectionLength {
                    index,
                    expected: width,
                    actual,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<(usize, Vec<Point2>)> for SectionTable {
    fn from_iter<T: IntoIterator<Item = (usize, Vec<Point2>)>>(iter: T) -> Self {
        let mut table = SectionTable::new();
        for (index, contour) in iter {
            table.set(index, contour);
        }
        table
    }
}

/// Build a dense section table by linear interpolation
///
/// The primary `front` contour seeds index 0 when the table has no explicit
/// entry there. Every index strictly between two consecutive defined
/// indices `a < b` gets, per width sample,
/// `y(a) + (y(b) - y(a)) * (i - a) / (b - a)`. Indices after the last
/// defined one are left empty; there is no extrapolation. Entries at or
/// beyond `length` are ignored.
pub fn interpolate_sections(
    front: &[Point2],
    sections: &SectionTable,
    length: usize,
) -> Result<SectionTable, BodyError> {
    let width = front.len();
    sections.validate(width)?;

    let ignored = sections.defined_indices().filter(|&i| i >= length).count();
    if ignored > 0 {
        tracing::warn!(
            ignored,
            length,
            "Ignoring sections beyond the last length index"
        );
    }

    let mut dense: Vec<Option<Vec<Point2>>> = (0..length)
        .map(|i| sections.get(i).map(<[Point2]>::to_vec))
        .collect();

    if let Some(first) = dense.first_mut()
        && first.is_none()
    {
        *first = Some(front.to_vec());
    }

    let existing: Vec<usize> = dense
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.as_ref().map(|_| i))
        .collect();

    for pair in existing.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        debug_assert!(b > a, "section indices must be strictly increasing");

        let (Some(start), Some(end)) = (dense[a].clone(), dense[b].clone()) else {
            continue;
        };
        let span = (b - a) as f32;

        for (i, slot) in dense.iter_mut().enumerate().take(b).skip(a + 1) {
            let t = (i - a) as f32 / span;
            let section = start
                .iter()
                .zip(&end)
                .map(|(s, e)| Point2::new(s.x, s.y + (e.y - s.y) * t))
                .collect();
            *slot = Some(section);
        }
    }

    Ok(SectionTable(dense))
}
