//! Flat triangle meshes handed to the renderer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// One interleaved mesh vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Creates a vertex from a position and a normal.
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    /// Returns the position.
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Returns the normal.
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// A triangle soup: every three consecutive vertices form one triangle,
/// wound counter-clockwise when seen from outside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<MeshVertex>,
}

impl Mesh {
    /// Creates a mesh from a vertex list whose length is a multiple of three.
    pub fn new(vertices: Vec<MeshVertex>) -> Self {
        debug_assert!(vertices.len() % 3 == 0, "triangle soup length must be a multiple of 3");
        Self { vertices }
    }

    /// Expands an indexed mesh into a triangle soup.
    pub fn from_indexed(positions: &[Vec3], normals: &[Vec3], indices: &[[u32; 3]]) -> Self {
        let vertices = indices
            .iter()
            .flatten()
            .map(|&i| MeshVertex::new(positions[i as usize], normals[i as usize]))
            .collect();
        Self { vertices }
    }

    /// Returns the vertices.
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Returns true if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates over triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|tri| [tri[0].position(), tri[1].position(), tri[2].position()])
    }

    /// Returns the axis-aligned bounding box.
    ///
    /// Returns `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self.vertices.iter().map(MeshVertex::position);
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Returns the vertex buffer as raw bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
