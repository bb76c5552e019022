//! Interleaved vertex formats and buffer layout descriptions
//!
//! Backends read [`VertexLayout`] to set up attribute pointers; the layouts
//! match the `#[repr(C)]` structs byte for byte.

use bytemuck::{Pod, Zeroable};

/// Position + normal + uv, 32 bytes per vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct VertexPNU {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Position + normal, 24 bytes per vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct VertexPN {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// One float attribute inside an interleaved vertex
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader attribute location
    pub location: u32,
    /// Number of f32 components
    pub components: u32,
    /// Byte offset from the start of the vertex
    pub offset: u32,
}

/// Vertex buffer layout: stride plus attribute list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    /// Stride in bytes
    pub stride: u32,
    pub attributes: &'static [VertexAttribute],
    /// Human-readable name for debugging
    pub name: &'static str,
}

const F32: u32 = std::mem::size_of::<f32>() as u32;

impl VertexLayout {
    /// Layout of [`VertexPNU`]: location 0 position, 1 normal, 2 uv
    pub const POS_NORMAL_UV: Self = Self {
        stride: 8 * F32,
        attributes: &[
            VertexAttribute {
                location: 0,
                components: 3,
                offset: 0,
            },
            VertexAttribute {
                location: 1,
                components: 3,
                offset: 3 * F32,
            },
            VertexAttribute {
                location: 2,
                components: 2,
                offset: 6 * F32,
            },
        ],
        name: "POS_NORMAL_UV",
    };

    /// Layout of [`VertexPN`]: location 0 position, 1 normal
    pub const POS_NORMAL: Self = Self {
        stride: 6 * F32,
        attributes: &[
            VertexAttribute {
                location: 0,
                components: 3,
                offset: 0,
            },
            VertexAttribute {
                location: 1,
                components: 3,
                offset: 3 * F32,
            },
        ],
        name: "POS_NORMAL",
    };

    /// Total floats per vertex
    pub fn float_count(&self) -> u32 {
        self.attributes.iter().map(|a| a.components).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_vertex_sizes() {
        assert_eq!(size_of::<VertexPNU>(), 32);
        assert_eq!(size_of::<VertexPN>(), 24);
    }

    #[test]
    fn test_layout_matches_struct() {
        let layout = VertexLayout::POS_NORMAL_UV;
        assert_eq!(layout.stride as usize, size_of::<VertexPNU>());
        assert_eq!(layout.attributes[1].offset as usize, offset_of!(VertexPNU, normal));
        assert_eq!(layout.attributes[2].offset as usize, offset_of!(VertexPNU, uv));
        assert_eq!(layout.float_count(), 8);

        let layout = VertexLayout::POS_NORMAL;
        assert_eq!(layout.stride as usize, size_of::<VertexPN>());
        assert_eq!(layout.attributes[1].offset as usize, offset_of!(VertexPN, normal));
        assert_eq!(layout.float_count(), 6);
    }

    #[test]
    fn test_layout_locations_sequential() {
        for (i, attr) in VertexLayout::POS_NORMAL_UV.attributes.iter().enumerate() {
            assert_eq!(attr.location, i as u32);
        }
    }
}
