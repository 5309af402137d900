use glam::{Vec2, Vec3};
use mesoscope_core::Result;

use super::positive;
use crate::grid::VertexGrid;
use crate::sampler::{column_step, rolled_row_phase, sphere_grid};

/// Points closer than this to the z axis have no usable radial direction.
const AXIS_EPSILON: f32 = 1e-6;

/// Splits a rolled grid below row `index` and pulls the halves apart.
///
/// Rows `0..=index` move up by `length / 2` and the remaining rows move down
/// by the same amount. A copy of row `index` is inserted between the halves
/// so the gap is bridged by a band of aligned quads.
pub fn split_with_connector(grid: VertexGrid, index: usize, length: f32) -> VertexGrid {
    if length <= 0.0 || index + 1 >= grid.num_rows() {
        return grid;
    }
    let mut rows = grid.into_rows();
    let connector = rows[index].clone();
    rows.insert(index + 1, connector);

    let total = rows.len();
    let mut grid = VertexGrid::new(rows);
    let half = Vec3::new(0.0, 0.0, length / 2.0);
    grid.translate_rows(0..index + 1, half);
    grid.translate_rows(index + 1..total, -half);
    grid
}

/// A cylinder of length `length` capped by hemispheres of radius `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherocylinder {
    pub radius: f32,
    pub length: f32,
}

impl Spherocylinder {
    pub fn new(radius: f64, length: f64) -> Result<Self> {
        Ok(Self {
            radius: positive("Spherocylinder", "Radius", radius)?,
            length: positive("Spherocylinder", "Length", length)?,
        })
    }

    pub fn vertex_grid(&self, samples: usize) -> VertexGrid {
        let sphere = sphere_grid(self.radius, samples);
        let equator = sphere.num_rows() / 2;
        split_with_connector(sphere, equator, self.length)
    }
}

/// The Minkowski sum of a sphere and a flat disc in the xy plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spheroplatelet {
    pub sphere_radius: f32,
    pub circle_radius: f32,
}

impl Spheroplatelet {
    pub fn new(sphere_radius: f64, circle_radius: f64) -> Result<Self> {
        Ok(Self {
            sphere_radius: positive("Spheroplatelet", "RadSphere", sphere_radius)?,
            circle_radius: positive("Spheroplatelet", "RadCircle", circle_radius)?,
        })
    }

    /// Pushes every sphere point outwards in the xy plane.
    ///
    /// Pole points have no radial direction of their own, so they spread
    /// out along the longitude their column would have in a rolled ring.
    /// The original poles are kept as the centres of the two flat faces.
    pub fn vertex_grid(&self, samples: usize) -> VertexGrid {
        let sphere = sphere_grid(self.sphere_radius, samples);
        let step = column_step(samples);

        let mut rows = Vec::with_capacity(sphere.num_rows() + 2);
        if let Some(top) = sphere.rows().first() {
            rows.push(top.clone());
        }
        for (r, row) in sphere.rows().iter().enumerate() {
            let pushed = row
                .iter()
                .enumerate()
                .map(|(c, &p)| {
                    let radial = Vec2::new(p.x, p.y);
                    let direction = if radial.length() > AXIS_EPSILON {
                        radial.normalize()
                    } else {
                        // TODO: verify the pole ring phase against reference renders.
                        Vec2::from_angle((c as f32 + rolled_row_phase(r)) * step)
                    };
                    p + (direction * self.circle_radius).extend(0.0)
                })
                .collect();
            rows.push(pushed);
        }
        if let Some(bottom) = sphere.rows().last() {
            rows.push(bottom.clone());
        }
        VertexGrid::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spherocylinder_extents() {
        let grid = Spherocylinder::new(0.5, 0.7).unwrap().vertex_grid(16);
        let (min, max) = grid.bounding_box().unwrap();
        assert!((max.z - 0.85).abs() < 1e-5);
        assert!((min.z + 0.85).abs() < 1e-5);
        assert!(grid.points().all(|p| p.truncate().length() <= 0.5 + 1e-5));
    }

    #[test]
    fn test_connector_row_is_aligned() {
        let sphere = sphere_grid(1.0, 12);
        let equator = sphere.num_rows() / 2;
        let grid = split_with_connector(sphere.clone(), equator, 2.0);
        assert_eq!(grid.num_rows(), sphere.num_rows() + 1);
        for c in 0..12 {
            let upper = grid.point(equator, c);
            let lower = grid.point(equator + 1, c);
            assert!((upper.truncate() - lower.truncate()).length() < 1e-6);
            assert!((upper.z - lower.z - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_zero_length_split_is_identity() {
        let sphere = sphere_grid(1.0, 8);
        assert_eq!(split_with_connector(sphere.clone(), 3, 0.0), sphere);
    }

    #[test]
    fn test_spheroplatelet_faces_are_flat_discs() {
        let shape = Spheroplatelet::new(0.3, 0.2).unwrap();
        let grid = shape.vertex_grid(16);
        assert_eq!(grid.num_rows(), 17);
        assert!(grid.row(0).iter().all(|p| (*p - Vec3::new(0.0, 0.0, 0.3)).length() < 1e-6));
        for p in grid.row(1) {
            assert!((p.z - 0.3).abs() < 1e-6);
            assert!((p.truncate().length() - 0.2).abs() < 1e-5);
        }
        let (_, max) = grid.bounding_box().unwrap();
        assert!(max.x <= 0.5 + 1e-5);
        assert!(max.x > 0.45);
    }
}
