use glam::Vec3;
use mesoscope_core::Result;

use super::positive;
use crate::grid::VertexGrid;
use crate::sampler::sphere_grid;

/// A sphere centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub radius: f32,
}

impl Sphere {
    pub fn new(radius: f64) -> Result<Self> {
        Ok(Self {
            radius: positive("Sphere", "Radius", radius)?,
        })
    }

    pub fn vertex_grid(&self, samples: usize) -> VertexGrid {
        sphere_grid(self.radius, samples)
    }
}

/// An axis-aligned ellipsoid with semi-axes `x`, `y` and `z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub semi_axes: Vec3,
}

impl Ellipsoid {
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        let semi_axes = Vec3::new(
            positive("Ellipsoid", "X", x)?,
            positive("Ellipsoid", "Y", y)?,
            positive("Ellipsoid", "Z", z)?,
        );
        Ok(Self { semi_axes })
    }

    /// The unit sphere grid stretched along each axis.
    pub fn vertex_grid(&self, samples: usize) -> VertexGrid {
        sphere_grid(1.0, samples).map(|p| p * self.semi_axes)
    }
}
