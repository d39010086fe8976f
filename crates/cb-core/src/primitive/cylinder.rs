//! Cylinder mesh generation (with end caps)

use std::f32::consts::PI;

use crate::constants::PLACEHOLDER_UV;
use crate::mesh::Mesh;

/// Generate a cylinder mesh centered at the origin, axis along Z
///
/// # Arguments
/// * `radius` - Cylinder radius
/// * `length` - Cylinder length along Z
/// * `segments` - Number of sides around the axis (at least 3 are used)
pub fn generate_cylinder_mesh(radius: f32, length: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let half_length = length / 2.0;
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    let rim = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        (theta.cos(), theta.sin())
    };

    // Side vertices: bottom/top pairs
    for i in 0..=segments {
        let (c, s) = rim(i);
        positions.push([radius * c, radius * s, -half_length]);
        normals.push([c, s, 0.0]);
        positions.push([radius * c, radius * s, half_length]);
        normals.push([c, s, 0.0]);
    }

    for i in 0..segments {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 2, base + 1, base + 1, base + 2, base + 3]);
    }

    // Caps: +Z then -Z (reversed winding)
    for (z, nz) in [(half_length, 1.0), (-half_length, -1.0)] {
        let center = positions.len() as u32;
        positions.push([0.0, 0.0, z]);
        normals.push([0.0, 0.0, nz]);

        let rim_start = positions.len() as u32;
        for i in 0..=segments {
            let (c, s) = rim(i);
            positions.push([radius * c, radius * s, z]);
            normals.push([0.0, 0.0, nz]);
        }

        for i in 0..segments {
            if nz > 0.0 {
                indices.extend_from_slice(&[center, rim_start + i, rim_start + i + 1]);
            } else {
                indices.extend_from_slice(&[center, rim_start + i + 1, rim_start + i]);
            }
        }
    }

    let uvs = vec![PLACEHOLDER_UV; positions.len()];
    Mesh {
        positions,
        normals,
        uvs,
        indices,
    }
}
