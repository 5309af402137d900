//! Per-frame data handed to a renderer.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use mesoscope_shapes::Mesh;

/// Placement and colour of one drawn particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub transform: Mat4,
    pub colour: Vec3,
}

impl Instance {
    /// Packs the instance for upload as a vertex buffer.
    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            transform: self.transform.to_cols_array_2d(),
            colour: self.colour.extend(1.0).to_array(),
        }
    }
}

/// GPU layout of an [`Instance`]: a column-major matrix and an RGBA colour.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub transform: [[f32; 4]; 4],
    pub colour: [f32; 4],
}

/// One level of a discrete level-of-detail chain.
#[derive(Debug, Clone)]
pub struct LodLevel {
    /// Camera distance from which this level is used.
    pub distance: f32,
    pub level_of_detail: usize,
    pub mesh: Mesh,
}
