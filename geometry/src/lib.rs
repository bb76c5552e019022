//! Procedural mesh generation
//!
//! Functions for generating the primitives used by the lighting demos, with
//! smooth normals and texture coordinates.
//!
//! Generators are generic over [`MeshBuilderUV`], so the same code fills the
//! f32 [`Mesh`] container used for upload and export, or any custom container.

mod cube;
mod error;
mod export;
mod sphere;
mod types;
mod vertex;

#[cfg(test)]
mod tests;

pub use cube::generate_cube;
pub use error::GeometryError;
pub use export::write_obj;
pub use sphere::{
    AxisConvention, CountPolicy, MIN_SECTOR_COUNT, MIN_STACK_COUNT, SphereMesh,
    SphereParams, generate_sphere,
};
pub use types::{Mesh, MeshBuilder, MeshBuilderUV};
pub use vertex::{VertexAttribute, VertexLayout, VertexPN, VertexPNU};
