//! Mesh container and builder traits
//!
//! Shared types for procedural mesh generation.

use bytemuck::cast_slice;
use glam::Vec3;

use crate::vertex::{VertexPN, VertexPNU};

/// Trait for mesh construction - enables generic geometry generation
///
/// Generators only talk to this trait, so they can fill the f32 [`Mesh`]
/// container or any backend-specific staging buffer.
pub trait MeshBuilder: Default {
    /// Add a vertex with position and normal, returning its index
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32;

    /// Add a triangle using three vertex indices
    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32);

    /// Add a wireframe line segment between two vertex indices
    ///
    /// Containers without line storage may ignore it.
    fn add_line(&mut self, _i0: u32, _i1: u32) {}

    /// Reserve room for `vertices` vertices and `indices` triangle indices
    fn reserve(&mut self, _vertices: usize, _indices: usize) {}
}

/// Trait extension for UV-mapped meshes
pub trait MeshBuilderUV: MeshBuilder {
    /// Add a vertex with position, UV coordinates, and normal, returning its index
    fn add_vertex_uv(&mut self, position: Vec3, uv: (f32, f32), normal: Vec3) -> u32;
}

/// Mesh data in f32 format
///
/// Parallel attribute arrays plus a triangle list and an optional line list.
/// This is the form handed to a rendering backend (separately or through
/// [`Mesh::interleaved`]) and to the OBJ writer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions as [x, y, z]
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals as [x, y, z]
    pub normals: Vec<[f32; 3]>,
    /// UV coordinates as [u, v] (empty if no UVs)
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices, three per triangle
    pub indices: Vec<u32>,
    /// Line indices, two per segment
    pub line_indices: Vec<u32>,
}

impl Mesh {
    /// Create empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get line segment count
    pub fn line_count(&self) -> usize {
        self.line_indices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether every vertex carries a UV coordinate
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty() && self.uvs.len() == self.positions.len()
    }

    /// Check that every triangle and line index refers to an existing vertex
    pub fn indices_in_bounds(&self) -> bool {
        let count = self.positions.len() as u64;
        self.indices
            .iter()
            .chain(self.line_indices.iter())
            .all(|&i| (i as u64) < count)
    }

    /// Interleave attributes as position / normal / uv (32 bytes per vertex)
    ///
    /// Missing UVs are written as (0, 0).
    pub fn interleaved(&self) -> Vec<VertexPNU> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, &position)| VertexPNU {
                position,
                normal: self.normals.get(i).copied().unwrap_or([0.0; 3]),
                uv: self.uvs.get(i).copied().unwrap_or([0.0; 2]),
            })
            .collect()
    }

    /// Interleave attributes as position / normal (24 bytes per vertex)
    pub fn interleaved_pn(&self) -> Vec<VertexPN> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, &position)| VertexPN {
                position,
                normal: self.normals.get(i).copied().unwrap_or([0.0; 3]),
            })
            .collect()
    }

    /// Interleaved vertex buffer as raw bytes, ready for upload
    pub fn interleaved_bytes(&self) -> Vec<u8> {
        cast_slice(&self.interleaved()).to_vec()
    }

    /// Triangle index buffer as raw native-endian bytes
    pub fn index_bytes(&self) -> Vec<u8> {
        cast_slice(&self.indices).to_vec()
    }

    /// Append another mesh, offsetting its indices
    pub fn append(&mut self, other: &Mesh) {
        let base = self.positions.len() as u32;
        let keep_uvs = self.has_uvs() || other.has_uvs();

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.normals.resize(self.positions.len(), [0.0; 3]);

        // UVs stay parallel to positions once either side carries them
        if keep_uvs {
            self.uvs.resize(base as usize, [0.0; 2]);
            if other.has_uvs() {
                self.uvs.extend_from_slice(&other.uvs);
            }
            self.uvs.resize(self.positions.len(), [0.0; 2]);
        }

        self.indices.extend(other.indices.iter().map(|i| i + base));
        self.line_indices
            .extend(other.line_indices.iter().map(|i| i + base));
    }
}

impl MeshBuilder for Mesh {
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }

    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    fn add_line(&mut self, i0: u32, i1: u32) {
        self.line_indices.push(i0);
        self.line_indices.push(i1);
    }

    fn reserve(&mut self, vertices: usize, indices: usize) {
        self.positions.reserve(vertices);
        self.normals.reserve(vertices);
        self.uvs.reserve(vertices);
        self.indices.reserve(indices);
    }
}

impl MeshBuilderUV for Mesh {
    fn add_vertex_uv(&mut self, position: Vec3, uv: (f32, f32), normal: Vec3) -> u32 {
        let index = self.add_vertex(position, normal);
        self.uvs.push([uv.0, uv.1]);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex_uv(Vec3::ZERO, (0.0, 0.0), Vec3::Z);
        let b = mesh.add_vertex_uv(Vec3::X, (1.0, 0.0), Vec3::Z);
        let c = mesh.add_vertex_uv(Vec3::Y, (0.0, 1.0), Vec3::Z);
        mesh.add_triangle(a, b, c);
        mesh
    }

    #[test]
    fn test_builder_counts() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.line_count(), 0);
        assert!(mesh.has_uvs());
        assert!(mesh.indices_in_bounds());
    }

    #[test]
    fn test_out_of_bounds_index_detected() {
        let mut mesh = triangle();
        mesh.add_triangle(0, 1, 3);
        assert!(!mesh.indices_in_bounds());
    }

    #[test]
    fn test_interleaved_layout() {
        let mesh = triangle();
        let verts = mesh.interleaved();
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(verts[1].normal, [0.0, 0.0, 1.0]);
        assert_eq!(verts[1].uv, [1.0, 0.0]);

        let bytes = mesh.interleaved_bytes();
        assert_eq!(bytes.len(), 3 * 32);
        assert_eq!(mesh.index_bytes().len(), 3 * 4);
        assert_eq!(mesh.interleaved_pn().len(), 3);
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut mesh = triangle();
        mesh.append(&triangle());
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.uvs.len(), 6);
        assert!(mesh.indices_in_bounds());
    }

    #[test]
    fn test_append_without_uvs_keeps_arrays_parallel() {
        let mut no_uv = Mesh::new();
        let a = no_uv.add_vertex(Vec3::ZERO, Vec3::Y);
        let b = no_uv.add_vertex(Vec3::X, Vec3::Y);
        let c = no_uv.add_vertex(Vec3::Z, Vec3::Y);
        no_uv.add_triangle(a, b, c);

        let mut mesh = triangle();
        mesh.append(&no_uv);
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
        assert_eq!(mesh.uvs[4], [0.0, 0.0]);

        let mut merged = no_uv.clone();
        merged.append(&triangle());
        assert_eq!(merged.uvs.len(), merged.positions.len());
        assert_eq!(merged.uvs[0], [0.0, 0.0]);
        assert_eq!(merged.uvs[4], [1.0, 0.0]);
    }
}
