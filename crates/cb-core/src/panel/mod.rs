//! Grid panels: one deformable lattice per face of the body's bounding box
//!
//! A panel is generated in two phases. [`GridPanel::new`] lays out the
//! undeformed lattice and its triangle topology once; [`GridPanel::deform`]
//! maps every lattice point through a displacement function into a new
//! position array, and [`GridPanel::mesh`] turns those positions into
//! buffers with smooth normals. The lattice itself is never mutated.

mod diagonal;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::PLACEHOLDER_UV;
use crate::mesh::Mesh;

pub use diagonal::{DiagonalMode, Parity, diagonal_flip};

/// Which triangle ordering faces out of the closed body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winding {
    /// The primary ordering (`i0, i1, i2` / `i1, i3, i2`) faces outward
    Ccw,
    /// The reversed ordering faces outward
    Cw,
}

/// Whether a panel emits one or both faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sides {
    /// Two coincident vertex layers with opposite winding, for renderers
    /// that cull back faces but must show the inside of the shell
    #[default]
    Double,
    /// Only the outward-facing layer, for closed solid export
    Single,
}

/// Construction parameters for a [`GridPanel`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelOptions {
    /// Lattice points along the panel's first axis
    pub length: usize,
    /// Lattice points along the panel's second axis
    pub width: usize,
    pub mode: DiagonalMode,
    pub parity: Parity,
    pub winding: Winding,
    pub sides: Sides,
}

/// One rectangular lattice with fixed triangle topology
#[derive(Debug, Clone)]
pub struct GridPanel {
    options: PanelOptions,
    /// Undeformed positions, `l * width + w`
    lattice: Vec<Vec3>,
    /// Triangles over the emitted layers
    indices: Vec<u32>,
    /// Quads that passed the parity filter, in emission order
    quads: Vec<(usize, usize)>,
}

impl GridPanel {
    /// Lay out the lattice by mapping every `(l, w)` index pair to 3D
    pub fn new(options: PanelOptions, points_mapper: impl Fn(usize, usize) -> Vec3) -> Self {
        let PanelOptions { length, width, .. } = options;

        let mut lattice = Vec::with_capacity(length * width);
        for l in 0..length {
            for w in 0..width {
                lattice.push(points_mapper(l, w));
            }
        }

        let (indices, quads) = triangulate(&options);

        Self {
            options,
            lattice,
            indices,
            quads,
        }
    }

    pub fn length(&self) -> usize {
        self.options.length
    }

    pub fn width(&self) -> usize {
        self.options.width
    }

    /// Undeformed lattice positions
    pub fn lattice(&self) -> &[Vec3] {
        &self.lattice
    }

    /// Lattice position at `(l, w)`
    pub fn point(&self, l: usize, w: usize) -> Vec3 {
        self.lattice[l * self.options.width + w]
    }

    /// Triangle index buffer over the emitted layers
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Quads emitted after parity filtering
    pub fn quads(&self) -> &[(usize, usize)] {
        &self.quads
    }

    /// Number of vertex layers this panel emits
    pub fn layer_count(&self) -> usize {
        match self.options.sides {
            Sides::Double => 2,
            Sides::Single => 1,
        }
    }

    /// Map every lattice point to its deformed position
    ///
    /// The displacement receives the lattice indices and the undeformed
    /// position and returns the final position. The result has one entry
    /// per lattice point, in lattice order.
    pub fn deform(&self, displacement: impl Fn(usize, usize, Vec3) -> Vec3) -> Vec<Vec3> {
        let width = self.options.width;
        self.lattice
            .iter()
            .enumerate()
            .map(|(i, p)| displacement(i / width, i % width, *p))
            .collect()
    }

    /// Build mesh buffers from per-lattice-point positions
    ///
    /// `positions` must have one entry per lattice point, such as the output
    /// of [`deform`](Self::deform) or [`lattice`](Self::lattice). Every layer
    /// gets a copy of the positions; normals are computed on the final
    /// positions.
    pub fn mesh(&self, positions: &[Vec3]) -> Mesh {
        debug_assert_eq!(positions.len(), self.lattice.len());

        let layers = self.layer_count();
        let mut buffer = Vec::with_capacity(positions.len() * layers);
        for _ in 0..layers {
            buffer.extend(positions.iter().map(|p| p.to_array()));
        }
        let uvs = vec![PLACEHOLDER_UV; buffer.len()];

        Mesh::from_triangles(buffer, uvs, self.indices.clone())
    }

    /// Mesh of the undeformed lattice
    pub fn lattice_mesh(&self) -> Mesh {
        self.mesh(&self.lattice)
    }
}

/// Build the index buffer for the panel's emitted layers
///
/// Double-sided panels store the front ordering in layer 1 (offset 0) and
/// the reversed ordering in layer 2 (offset `length * width`). Single-sided
/// panels store only the outward ordering for their winding.
fn triangulate(options: &PanelOptions) -> (Vec<u32>, Vec<(usize, usize)>) {
    let PanelOptions {
        length,
        width,
        mode,
        parity,
        winding,
        sides,
    } = *options;

    let length_half = (length as f32 - 1.0) / 2.0;
    let width_half = (width as f32 - 1.0) / 2.0;
    let layer = (length * width) as u32;

    let mut front = Vec::new();
    let mut back = Vec::new();
    let mut quads = Vec::new();

    for l in 0..length.saturating_sub(1) {
        for w in 0..width.saturating_sub(1) {
            if !parity.accepts(l, w) {
                continue;
            }
            quads.push((l, w));

            let i0 = (l * width + w) as u32;
            let i1 = i0 + 1;
            let i2 = i0 + width as u32;
            let i3 = i2 + 1;

            if diagonal_flip(mode, l, w, length_half, width_half) {
                front.extend_from_slice(&[i0, i1, i3, i0, i3, i2]);
                back.extend_from_slice(&[i0, i3, i1, i0, i2, i3]);
            } else {
                front.extend_from_slice(&[i0, i1, i2, i1, i3, i2]);
                back.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }
    }

    let indices = match (sides, winding) {
        (Sides::Double, _) => {
            front.extend(back.iter().map(|i| i + layer));
            front
        }
        (Sides::Single, Winding::Ccw) => front,
        (Sides::Single, Winding::Cw) => back,
    };

    (indices, quads)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn options(length: usize, width: usize, parity: Parity) -> PanelOptions {
        PanelOptions {
            length,
            width,
            mode: DiagonalMode::Uniform,
            parity,
            winding: Winding::Ccw,
            sides: Sides::Double,
        }
    }

    fn flat(options: PanelOptions) -> GridPanel {
        GridPanel::new(options, |l, w| Vec3::new(l as f32, w as f32, 0.0))
    }

    #[test]
    fn test_lattice_size() {
        let panel = flat(options(5, 4, Parity::All));
        let mesh = panel.lattice_mesh();
        assert_eq!(panel.lattice().len(), 20);
        assert_eq!(mesh.vertex_count(), 2 * 5 * 4);
        // 4 * 3 quads, 2 triangles each, 2 layers
        assert_eq!(mesh.triangle_count(), 4 * 3 * 2 * 2);
        assert_eq!(mesh.uvs.len(), mesh.vertex_count());
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
    }

    #[test]
    fn test_second_layer_offset() {
        let panel = flat(options(3, 3, Parity::All));
        let half = panel.indices().len() / 2;
        assert!(panel.indices()[..half].iter().all(|&i| i < 9));
        assert!(panel.indices()[half..].iter().all(|&i| (9..18).contains(&i)));
    }

    #[test]
    fn test_parity_split_reconstructs_all() {
        let all = flat(options(6, 5, Parity::All));
        let odd = flat(options(6, 5, Parity::Odd));
        let even = flat(options(6, 5, Parity::Even));

        let odd_set: HashSet<_> = odd.quads().iter().copied().collect();
        let even_set: HashSet<_> = even.quads().iter().copied().collect();
        let all_set: HashSet<_> = all.quads().iter().copied().collect();

        assert!(odd_set.is_disjoint(&even_set));
        let union: HashSet<_> = odd_set.union(&even_set).copied().collect();
        assert_eq!(union, all_set);
        assert_eq!(odd.quads().len() + even.quads().len(), all.quads().len());
        assert_eq!(
            odd.indices().len() + even.indices().len(),
            all.indices().len()
        );
        // 5 * 4 = 20 quads split evenly
        assert_eq!(odd.quads().len(), 10);
    }

    #[test]
    fn test_layers_have_opposite_normals() {
        let panel = flat(options(3, 3, Parity::All));
        let mesh = panel.lattice_mesh();
        // Primary ordering of an x/y lattice faces -z
        assert_normal(mesh.normals[4], [0.0, 0.0, -1.0]);
        assert_normal(mesh.normals[9 + 4], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_single_sided_uses_winding() {
        let mut opts = options(3, 3, Parity::All);
        opts.sides = Sides::Single;
        let ccw = flat(opts).lattice_mesh();
        opts.winding = Winding::Cw;
        let cw = flat(opts).lattice_mesh();

        assert_eq!(ccw.vertex_count(), 9);
        assert_eq!(ccw.triangle_count(), 8);
        assert_normal(ccw.normals[4], [0.0, 0.0, -1.0]);
        assert_normal(cw.normals[4], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_every_diagonal_mode_keeps_winding() {
        for &mode in DiagonalMode::ALL {
            for (winding, facing) in [(Winding::Ccw, -1.0), (Winding::Cw, 1.0)] {
                let mut opts = options(5, 5, Parity::All);
                opts.mode = mode;
                opts.winding = winding;
                opts.sides = Sides::Single;
                let mesh = flat(opts).lattice_mesh();
                assert_eq!(mesh.triangle_count(), 4 * 4 * 2, "{mode:?}");
                for n in calculate_face_normals_for(&mesh) {
                    assert_eq!(n, [0.0, 0.0, facing], "{mode:?} {winding:?}");
                }
            }
        }
    }

    #[test]
    fn test_flip_uses_other_diagonal() {
        let mut opts = options(3, 3, Parity::All);
        opts.mode = DiagonalMode::LSymmetrical;
        opts.sides = Sides::Single;
        let panel = flat(opts);
        // Quad (0, 0) is on the lower length side and flipped: shares i0-i3
        assert_eq!(&panel.indices()[..6], &[0, 1, 4, 0, 4, 3]);
        // Quad (1, 0) is not flipped: shares i1-i2
        assert_eq!(&panel.indices()[12..18], &[3, 4, 6, 4, 7, 6]);
    }

    #[test]
    fn test_deform_is_two_phase() {
        let panel = flat(options(3, 2, Parity::All));
        let moved = panel.deform(|l, w, p| p + Vec3::new(0.0, 0.0, (l * 10 + w) as f32));
        assert_eq!(moved[5], Vec3::new(2.0, 1.0, 21.0));
        // Lattice untouched
        assert_eq!(panel.point(2, 1), Vec3::new(2.0, 1.0, 0.0));
        let mesh = panel.mesh(&moved);
        assert_eq!(mesh.positions[5], [2.0, 1.0, 21.0]);
        assert_eq!(mesh.positions[6 + 5], [2.0, 1.0, 21.0]);
    }

    fn assert_normal(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "{actual:?} != {expected:?}");
        }
    }

    fn calculate_face_normals_for(mesh: &Mesh) -> Vec<[f32; 3]> {
        crate::mesh::calculate_face_normals(&mesh.positions, &mesh.indices)
    }
}
