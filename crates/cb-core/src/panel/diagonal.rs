//! Quad diagonal selection for lattice triangulation

use serde::{Deserialize, Serialize};

/// How a panel picks the diagonal that splits each unit quad
///
/// The symmetric modes keep the triangulation pattern mirror-symmetric about
/// the panel's length and/or width midline, so a mirrored deformation still
/// looks mirrored after shading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiagonalMode {
    /// Same diagonal everywhere
    #[default]
    Uniform,
    /// Diagonal flips at the length midline
    LSymmetrical,
    /// Diagonal flips at the width midline
    WSymmetrical,
    /// Diagonal flips where the length side and width side agree
    LWSymmetrical,
}

impl DiagonalMode {
    pub const ALL: &'static [DiagonalMode] = &[
        DiagonalMode::Uniform,
        DiagonalMode::LSymmetrical,
        DiagonalMode::WSymmetrical,
        DiagonalMode::LWSymmetrical,
    ];
}

/// Whether the quad at `(l, w)` is split along the flipped diagonal
///
/// `length_half` and `width_half` are the vertex midpoints of the panel,
/// `(count - 1) / 2`. A quad lies on the lower side of an axis when its
/// center (`index + 0.5`) is strictly below the midpoint; a quad centered
/// exactly on the midline counts as upper.
///
/// Unflipped quads use the `(l, w + 1)`–`(l + 1, w)` diagonal, flipped
/// quads the `(l, w)`–`(l + 1, w + 1)` one. Reflecting a quad across a
/// midline swaps the two, which is why mirrored quads must get opposite
/// answers here.
pub fn diagonal_flip(
    mode: DiagonalMode,
    l: usize,
    w: usize,
    length_half: f32,
    width_half: f32,
) -> bool {
    let lower_l = (l as f32 + 0.5) < length_half;
    let lower_w = (w as f32 + 0.5) < width_half;

    match mode {
        DiagonalMode::Uniform => false,
        DiagonalMode::LSymmetrical => lower_l,
        DiagonalMode::WSymmetrical => lower_w,
        DiagonalMode::LWSymmetrical => lower_l == lower_w,
    }
}

/// Checkerboard filter for quad emission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Parity {
    /// Emit every quad
    #[default]
    All,
    /// Emit quads where `(l + w)` is odd
    Odd,
    /// Emit quads where `(l + w)` is even
    Even,
}

impl Parity {
    /// Whether the quad at `(l, w)` passes this filter
    pub fn accepts(&self, l: usize, w: usize) -> bool {
        match self {
            Parity::All => true,
            Parity::Odd => (l + w) % 2 == 1,
            Parity::Even => (l + w) % 2 == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 5x5 vertices -> 4x4 quads, midpoints at 2.0
    const N: usize = 5;
    const HALF: f32 = (N as f32 - 1.0) / 2.0;
    const QUADS: usize = N - 1;

    fn mirror(i: usize) -> usize {
        QUADS - 1 - i
    }

    #[test]
    fn test_uniform_never_flips() {
        for l in 0..QUADS {
            for w in 0..QUADS {
                assert!(!diagonal_flip(DiagonalMode::Uniform, l, w, HALF, HALF));
            }
        }
    }

    #[test]
    fn test_l_symmetrical_mirrors_about_length_midline() {
        for l in 0..QUADS {
            for w in 0..QUADS {
                let here = diagonal_flip(DiagonalMode::LSymmetrical, l, w, HALF, HALF);
                let there = diagonal_flip(DiagonalMode::LSymmetrical, mirror(l), w, HALF, HALF);
                assert_ne!(here, there, "quad ({l}, {w})");
                // Independent of width
                let other_w = diagonal_flip(DiagonalMode::LSymmetrical, l, mirror(w), HALF, HALF);
                assert_eq!(here, other_w);
            }
        }
    }

    #[test]
    fn test_w_symmetrical_mirrors_about_width_midline() {
        for l in 0..QUADS {
            for w in 0..QUADS {
                let here = diagonal_flip(DiagonalMode::WSymmetrical, l, w, HALF, HALF);
                let there = diagonal_flip(DiagonalMode::WSymmetrical, l, mirror(w), HALF, HALF);
                assert_ne!(here, there, "quad ({l}, {w})");
                let other_l = diagonal_flip(DiagonalMode::WSymmetrical, mirror(l), w, HALF, HALF);
                assert_eq!(here, other_l);
            }
        }
    }

    #[test]
    fn test_lw_symmetrical_mirrors_about_both_midlines() {
        let mode = DiagonalMode::LWSymmetrical;
        for l in 0..QUADS {
            for w in 0..QUADS {
                let here = diagonal_flip(mode, l, w, HALF, HALF);
                assert_ne!(here, diagonal_flip(mode, mirror(l), w, HALF, HALF));
                assert_ne!(here, diagonal_flip(mode, l, mirror(w), HALF, HALF));
                // Point reflection keeps the same diagonal
                assert_eq!(here, diagonal_flip(mode, mirror(l), mirror(w), HALF, HALF));
            }
        }
    }

    #[test]
    fn test_midline_boundaries() {
        // Quads 0 and 1 are below the midpoint 2.0, quads 2 and 3 above
        assert!(diagonal_flip(DiagonalMode::LSymmetrical, 1, 0, HALF, HALF));
        assert!(!diagonal_flip(DiagonalMode::LSymmetrical, 2, 0, HALF, HALF));
        // Odd quad count: the center quad (index 1 of 3, center 1.5) is upper
        assert!(!diagonal_flip(DiagonalMode::WSymmetrical, 0, 1, 1.5, 1.5));
        assert!(diagonal_flip(DiagonalMode::WSymmetrical, 0, 0, 1.5, 1.5));
        assert!(diagonal_flip(DiagonalMode::LWSymmetrical, 0, 0, 1.5, 1.5));
        assert!(!diagonal_flip(DiagonalMode::LWSymmetrical, 0, 2, 1.5, 1.5));
    }

    #[test]
    fn test_parity_partitions_quads() {
        for l in 0..6 {
            for w in 0..6 {
                assert!(Parity::All.accepts(l, w));
                assert_ne!(Parity::Odd.accepts(l, w), Parity::Even.accepts(l, w));
            }
        }
        assert!(Parity::Even.accepts(0, 0));
        assert!(Parity::Odd.accepts(1, 0));
    }
}
