//! Primitive mesh generation for parts that are not lattice panels

mod cylinder;

pub use cylinder::generate_cylinder_mesh;
