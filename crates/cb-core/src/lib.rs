//! Car Body Designer core
//!
//! This crate turns a parametric car body design into triangle meshes:
//! - Panels: deformable lattices for the six faces of the bounding box
//! - Body: contour, section and wheel-arc deformation of those panels
//! - Design: serializable design records and the design store
//! - Export: binary STL output

pub mod body;
pub mod config;
pub mod constants;
pub mod contour;
pub mod design;
pub mod export;
pub mod geometry;
pub mod mesh;
pub mod model;
pub mod panel;
pub mod primitive;
pub mod section;
pub mod wheel;

pub use body::*;
pub use config::*;
pub use constants::*;
pub use contour::*;
pub use design::*;
pub use export::*;
pub use geometry::*;
pub use mesh::*;
pub use model::*;
pub use panel::*;
pub use primitive::*;
pub use section::*;
pub use wheel::*;
