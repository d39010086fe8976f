//! Design-to-mesh build pipeline

use crate::body::{BodyShape, PanelSide, SectionPoints, SectionRequest};
use crate::config::BuildOptions;
use crate::design::Design;
use crate::geometry::BodyError;
use crate::mesh::{BoundingBox, Mesh};
use crate::panel::Parity;
use crate::section::interpolate_sections;
use crate::wheel::WheelBuilder;

/// Meshes of one built body, in lattice units
#[derive(Debug, Clone)]
pub struct BodyModel {
    shape: BodyShape,
    /// Panel meshes in [`PanelSide::ALL`] order
    pub panels: Vec<Mesh>,
    /// Wheel cylinders, two per wheel
    pub wheels: Vec<Mesh>,
}

impl BodyModel {
    pub fn shape(&self) -> &BodyShape {
        &self.shape
    }

    pub fn panel(&self, side: PanelSide) -> &Mesh {
        &self.panels[side as usize]
    }

    /// Panels followed by wheels
    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.panels.iter().chain(&self.wheels)
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes().map(Mesh::triangle_count).sum()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        Mesh::combined_bounding_box(self.meshes())
    }

    /// All meshes concatenated into one
    pub fn merged(&self) -> Mesh {
        Mesh::merge(self.meshes())
    }

    /// Cross-sections of the built body, honoring the design's explicit sections
    pub fn section_points(&self, design: &Design, request: SectionRequest) -> SectionPoints {
        self.shape.section_points(&design.front_segments, request)
    }
}

/// Build one body from a design
///
/// Sections are interpolated along the length before deformation. Meshes
/// are not scaled.
pub fn build_body(
    design: &Design,
    parity: Parity,
    options: &BuildOptions,
) -> Result<BodyModel, BodyError> {
    design.validate()?;
    let size = design.box_size;

    let sections = interpolate_sections(&design.front_points, &design.front_segments, size.length)?;
    let mut shape = BodyShape::with_sides(size, parity, options.sides)?;
    shape.apply_contour(
        &design.side_points,
        &design.front_points,
        &design.top_points,
        &design.wheels,
        &sections,
    )?;

    let panels = shape.geometry();
    let wheels = if options.render_wheels {
        WheelBuilder::new(size)
            .with_segments(options.wheel_segments)
            .build(&design.wheels)
    } else {
        Vec::new()
    };

    let model = BodyModel {
        shape,
        panels,
        wheels,
    };
    tracing::debug!(
        design = %design.name,
        ?parity,
        triangles = model.triangle_count(),
        wheels = model.wheels.len(),
        "Built body"
    );
    Ok(model)
}

/// Meshes drawn with one material
#[derive(Debug, Clone)]
pub struct MaterialGroup {
    pub name: &'static str,
    /// 0xRRGGBB
    pub color: u32,
    pub meshes: Vec<Mesh>,
}

impl MaterialGroup {
    fn scaled(name: &'static str, color: u32, meshes: Vec<Mesh>, scale: f32) -> Self {
        Self {
            name,
            color,
            meshes: meshes.into_iter().map(|m| m.scaled(scale)).collect(),
        }
    }
}

/// Checkerboard preview of a design in display units
#[derive(Debug, Clone)]
pub struct PreviewModel {
    pub odd: MaterialGroup,
    pub even: MaterialGroup,
    pub wheels: MaterialGroup,
}

impl PreviewModel {
    pub fn groups(&self) -> [&MaterialGroup; 3] {
        [&self.odd, &self.even, &self.wheels]
    }

    pub fn bounding_box(&self) -> BoundingBox {
        Mesh::combined_bounding_box(self.groups().into_iter().flat_map(|g| &g.meshes))
    }
}

/// Build the two-color preview: odd and even cells as separate bodies plus wheels
pub fn build_preview(design: &Design, options: &BuildOptions) -> Result<PreviewModel, BodyError> {
    let colors = options.colors_for(design);
    let body_options = BuildOptions {
        render_wheels: false,
        ..options.clone()
    };

    let odd = build_body(design, Parity::Odd, &body_options)?;
    let even = build_body(design, Parity::Even, &body_options)?;
    let wheels = if options.render_wheels {
        WheelBuilder::new(design.box_size)
            .with_segments(options.wheel_segments)
            .build(&design.wheels)
    } else {
        Vec::new()
    };

    let scale = options.display_scale;
    Ok(PreviewModel {
        odd: MaterialGroup::scaled("odd", colors.odd, odd.panels, scale),
        even: MaterialGroup::scaled("even", colors.even, even.panels, scale),
        wheels: MaterialGroup::scaled("wheels", colors.wheels, wheels, scale),
    })
}
