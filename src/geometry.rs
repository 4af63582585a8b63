//! Render export.
//!
//! The renderer never sees the particle arena. After each step it asks the
//! grid for a [`Geometry`], an owned copy of every particle's position and
//! normal in row-major order plus the triangulation fixed at construction.
//! [`ClothVertex`] is `#[repr(C)]` and [`bytemuck::Pod`], so the arrays can be
//! uploaded as-is:
//!
//! ```ignore
//! let geometry = cloth.export_geometry();
//! queue.write_buffer(&vertex_buffer, 0, geometry.vertex_bytes());
//! queue.write_buffer(&index_buffer, 0, geometry.index_bytes());
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One exported cloth vertex (24 bytes, tightly packed).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct ClothVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl ClothVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// A snapshot of the cloth surface for rendering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// One vertex per particle, row-major.
    pub vertices: Vec<ClothVertex>,
    /// Three particle indices per triangle.
    pub indices: Vec<u32>,
}

impl Geometry {
    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[inline]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}
