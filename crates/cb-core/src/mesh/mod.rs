//! Generated mesh buffers (positions, normals, uvs, indices)

mod bounds;
mod normals;

use glam::{Mat4, Vec3};

pub use bounds::BoundingBox;
pub use normals::{calculate_face_normals, calculate_triangle_normal, calculate_vertex_normals};

/// Indexed triangle mesh handed to a renderer or exporter
///
/// Coordinates are in lattice units unless the mesh was explicitly
/// [`scaled`](Mesh::scaled).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals (same length as `positions`)
    pub normals: Vec<[f32; 3]>,
    /// Placeholder texture coordinates (same length as `positions`)
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list indices
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh and compute smooth vertex normals for it
    pub fn from_triangles(positions: Vec<[f32; 3]>, uvs: Vec<[f32; 2]>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            positions,
            normals: Vec::new(),
            uvs,
            indices,
        };
        mesh.compute_vertex_normals();
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Replace the normal buffer with smooth per-vertex normals
    pub fn compute_vertex_normals(&mut self) {
        self.normals = calculate_vertex_normals(&self.positions, &self.indices);
    }

    /// Calculate bounding box from positions
    pub fn bounding_box(&self) -> BoundingBox {
        self.positions.iter().copied().map(Vec3::from).collect()
    }

    /// Bounding box of several meshes
    pub fn combined_bounding_box<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> BoundingBox {
        meshes
            .into_iter()
            .fold(BoundingBox::empty(), |bbox, mesh| bbox.union(mesh.bounding_box()))
    }

    /// Uniformly scale all positions (normals are unaffected)
    pub fn scaled(mut self, factor: f32) -> Self {
        for p in &mut self.positions {
            *p = (Vec3::from(*p) * factor).to_array();
        }
        self
    }

    /// Move all positions by `offset`
    pub fn translated(mut self, offset: Vec3) -> Self {
        for p in &mut self.positions {
            *p = (Vec3::from(*p) + offset).to_array();
        }
        self
    }

    /// Apply an affine transform to positions and normals
    pub fn transformed(mut self, transform: &Mat4) -> Self {
        let normal_mat = transform.inverse().transpose();
        for p in &mut self.positions {
            *p = transform.transform_point3(Vec3::from(*p)).to_array();
        }
        for n in &mut self.normals {
            *n = normal_mat
                .transform_vector3(Vec3::from(*n))
                .normalize_or_zero()
                .to_array();
        }
        self
    }

    /// Concatenate meshes into one, offsetting indices
    pub fn merge<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Mesh {
        let mut merged = Mesh::default();
        for mesh in meshes {
            let offset = merged.positions.len() as u32;
            merged.positions.extend_from_slice(&mesh.positions);
            merged.normals.extend_from_slice(&mesh.normals);
            merged.uvs.extend_from_slice(&mesh.uvs);
            merged.indices.extend(mesh.indices.iter().map(|i| i + offset));
        }
        merged
    }

    /// Iterate triangles as position triples
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Interleave buffers into GPU-ready vertices
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, position)| MeshVertex {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or_default(),
                uv: self.uvs.get(i).copied().unwrap_or_default(),
            })
            .collect()
    }

    /// Interleaved vertices as raw bytes for buffer upload
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }

    /// Indices as raw bytes for buffer upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Vertex for mesh rendering with position, normal, and texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Vertex position.
    pub position: [f32; 3],
    /// Vertex normal vector.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}
