//! Normal calculation utilities for mesh data

use glam::Vec3;

/// Calculate normal for a single triangle
pub fn calculate_triangle_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let cross = triangle_cross(v0, v1, v2);
    let len = cross.length();
    if len > 0.0 {
        (cross / len).to_array()
    } else {
        [0.0, 0.0, 1.0]
    }
}

/// Calculate face normals from vertices and indices (one per triangle)
pub fn calculate_face_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    indices
        .chunks_exact(3)
        .map(|tri| {
            calculate_triangle_normal(
                vertices[tri[0] as usize],
                vertices[tri[1] as usize],
                vertices[tri[2] as usize],
            )
        })
        .collect()
}

/// Calculate smooth per-vertex normals
///
/// Each vertex gets the normalized average of the unit normals of the
/// triangles that reference it. Degenerate triangles are ignored, and a
/// vertex no triangle references keeps a zero normal.
pub fn calculate_vertex_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vec3::ZERO; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = triangle_cross(vertices[a], vertices[b], vertices[c]).normalize_or_zero();
        if face == Vec3::ZERO {
            continue;
        }
        sums[a] += face;
        sums[b] += face;
        sums[c] += face;
    }

    sums.into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}

fn triangle_cross(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> Vec3 {
    let v0 = Vec3::from(v0);
    (Vec3::from(v1) - v0).cross(Vec3::from(v2) - v0)
}
