//! STL export of a design's body

use std::io::Write;
use std::path::Path;

use crate::config::{BuildOptions, ExportOptions, is_valid_scale};
use crate::design::Design;
use crate::geometry::BodyError;
use crate::mesh::{Mesh, calculate_face_normals};
use crate::model::build_body;
use crate::panel::Parity;

/// Build a design as one closed, outward-facing mesh in export space
///
/// The body is built with every cell and single-sided panels, merged with
/// the wheels if requested, then scaled and rotated.
pub fn export_mesh(design: &Design, options: &ExportOptions) -> Result<Mesh, ExportError> {
    if !is_valid_scale(options.display_scale) {
        return Err(ExportError::InvalidScale(options.display_scale));
    }
    let build = BuildOptions {
        render_wheels: options.include_wheels,
        wheel_segments: options.wheel_segments,
        ..BuildOptions::solid()
    };
    let model = build_body(design, Parity::All, &build)?;
    Ok(model.merged().transformed(&options.transform()))
}

/// Write meshes as one binary STL with per-triangle face normals
pub fn write_stl<'a, W: Write>(
    meshes: impl IntoIterator<Item = &'a Mesh>,
    writer: &mut W,
) -> Result<(), ExportError> {
    let mut triangles = Vec::new();
    for mesh in meshes {
        let normals = calculate_face_normals(&mesh.positions, &mesh.indices);
        for (vertices, normal) in mesh.triangles().zip(normals) {
            triangles.push(stl_io::Triangle {
                normal: stl_io::Normal::new(normal),
                vertices: vertices.map(stl_io::Vertex::new),
            });
        }
    }

    stl_io::write_stl(writer, triangles.iter()).map_err(|e| ExportError::Write(e.to_string()))
}

/// Binary STL of a design
pub fn stl_bytes(design: &Design, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let mesh = export_mesh(design, options)?;
    let mut buffer = Vec::new();
    write_stl([&mesh], &mut buffer)?;
    Ok(buffer)
}

/// Write a design to an STL file
pub fn export_stl(
    design: &Design,
    options: &ExportOptions,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mesh = export_mesh(design, options)?;

    let mut file = std::fs::File::create(path).map_err(|e| ExportError::Io(e.to_string()))?;
    write_stl([&mesh], &mut file)?;

    tracing::info!(
        design = %design.name,
        triangles = mesh.triangle_count(),
        path = %path.display(),
        "Exported STL"
    );
    Ok(())
}

/// Export-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid design: {0}")]
    Body(#[from] BodyError),
    #[error("IO error: {0}")]
    Io(String),
    #[error("STL write error: {0}")]
    Write(String),
    #[error("Invalid display scale {0}: must be finite and positive")]
    InvalidScale(f32),
}
