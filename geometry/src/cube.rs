//! Axis-aligned cube with flat per-face normals

use glam::Vec3;

use crate::error::GeometryError;
use crate::types::MeshBuilderUV;

/// Face normal, then the U and V axes of the face (U x V = normal)
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y), // back
    (Vec3::Z, Vec3::X, Vec3::Y),         // front
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),     // left
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),     // right
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),     // bottom
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),     // top
];

/// Generate a cube centered at the origin spanning `[-half_extent, half_extent]` on every axis
///
/// # Returns
/// Mesh with 24 vertices (4 per face) and 36 indices
///
/// # UV Mapping
/// Every face gets the full `[0, 1]` square, (0, 0) at the face's -U/-V corner.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidParameter`] if `half_extent` is not a
/// positive finite number.
pub fn generate_cube<M: MeshBuilderUV>(half_extent: f32) -> Result<M, GeometryError> {
    if !half_extent.is_finite() || half_extent <= 0.0 {
        return Err(GeometryError::invalid(
            "half_extent",
            half_extent,
            "must be a positive finite number",
        ));
    }

    let mut mesh = M::default();
    mesh.reserve(24, 36);

    for (normal, u_axis, v_axis) in FACES {
        let center = normal * half_extent;
        let u = u_axis * half_extent;
        let v = v_axis * half_extent;

        // CCW when viewed from outside (looking against the normal)
        let i0 = mesh.add_vertex_uv(center - u - v, (0.0, 0.0), normal);
        let i1 = mesh.add_vertex_uv(center + u - v, (1.0, 0.0), normal);
        let i2 = mesh.add_vertex_uv(center + u + v, (1.0, 1.0), normal);
        let i3 = mesh.add_vertex_uv(center - u + v, (0.0, 1.0), normal);

        mesh.add_triangle(i0, i1, i2);
        mesh.add_triangle(i0, i2, i3);

        mesh.add_line(i0, i1);
        mesh.add_line(i1, i2);
        mesh.add_line(i2, i3);
        mesh.add_line(i3, i0);
    }

    Ok(mesh)
}
