//! Analytic meshes that skip the grid pipeline.
//!
//! All presets are z-up and centred on the origin. `samples` sets the
//! number of segments around z (and along the sweep where there is one).

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use mesoscope_core::{MesoscopeError, Result};

use super::positive;
use crate::mesh::Mesh;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preset {
    Sphere {
        radius: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
    Torus {
        radius: f32,
        tube: f32,
    },
}

impl Preset {
    pub fn sphere(radius: f64) -> Result<Self> {
        Ok(Preset::Sphere {
            radius: positive("PresetSphere", "Radius", radius)?,
        })
    }

    pub fn cylinder(radius_top: f64, radius_bottom: f64, height: f64) -> Result<Self> {
        Ok(Preset::Cylinder {
            radius_top: positive("PresetCylinder", "RadiusTop", radius_top)?,
            radius_bottom: positive("PresetCylinder", "RadiusBottom", radius_bottom)?,
            height: positive("PresetCylinder", "Height", height)?,
        })
    }

    pub fn torus(radius: f64, tube: f64) -> Result<Self> {
        let radius = positive("PresetTorus", "Radius", radius)?;
        let tube_radius = positive("PresetTorus", "Tube", tube)?;
        if tube_radius >= radius {
            return Err(MesoscopeError::InvalidParameter {
                shape: "PresetTorus".to_string(),
                name: "Tube",
                value: tube,
                reason: "must be smaller than the ring radius",
            });
        }
        Ok(Preset::Torus {
            radius,
            tube: tube_radius,
        })
    }

    pub fn mesh(&self, samples: usize) -> Mesh {
        let samples = samples.max(3);
        match *self {
            Preset::Sphere { radius } => uv_sphere(radius, samples, samples),
            Preset::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => capped_cylinder(radius_top, radius_bottom, height, samples),
            Preset::Torus { radius, tube } => torus(radius, tube, samples, 2 * samples),
        }
    }
}

/// Index of `(row, column)` in a `(columns + 1)`-wide parametric sheet.
fn sheet_index(row: usize, column: usize, columns: usize) -> u32 {
    (row * (columns + 1) + column) as u32
}

fn uv_sphere(radius: f32, width: usize, height: usize) -> Mesh {
    let mut positions = Vec::with_capacity((width + 1) * (height + 1));
    for iy in 0..=height {
        let phi = iy as f32 / height as f32 * PI;
        for ix in 0..=width {
            let theta = ix as f32 / width as f32 * TAU;
            positions.push(
                radius * Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()),
            );
        }
    }
    let normals: Vec<Vec3> = positions.iter().map(|p| p.normalize_or_zero()).collect();

    let mut indices = Vec::with_capacity(2 * width * height);
    for iy in 0..height {
        for ix in 0..width {
            let a = sheet_index(iy, ix + 1, width);
            let b = sheet_index(iy, ix, width);
            let c = sheet_index(iy + 1, ix, width);
            let d = sheet_index(iy + 1, ix + 1, width);
            if iy != 0 {
                indices.push([b, d, a]);
            }
            if iy != height - 1 {
                indices.push([b, c, d]);
            }
        }
    }
    Mesh::from_indexed(&positions, &normals, &indices)
}

fn capped_cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: usize) -> Mesh {
    let half = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    // Torso: row 0 is the top rim, row 1 the bottom rim.
    for (radius, z) in [(radius_top, half), (radius_bottom, -half)] {
        for x in 0..=segments {
            let theta = x as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            positions.push(Vec3::new(radius * cos, radius * sin, z));
            normals.push(Vec3::new(cos, sin, slope).normalize());
        }
    }
    for x in 0..segments {
        let a = sheet_index(0, x, segments);
        let b = sheet_index(1, x, segments);
        let c = sheet_index(1, x + 1, segments);
        let d = sheet_index(0, x + 1, segments);
        indices.push([a, b, d]);
        indices.push([b, c, d]);
    }

    for (radius, z, up) in [(radius_top, half, true), (radius_bottom, -half, false)] {
        let normal = if up { Vec3::Z } else { Vec3::NEG_Z };
        let centre = positions.len() as u32;
        positions.push(Vec3::new(0.0, 0.0, z));
        normals.push(normal);
        let rim = positions.len() as u32;
        for x in 0..=segments {
            let theta = x as f32 / segments as f32 * TAU;
            positions.push(Vec3::new(radius * theta.cos(), radius * theta.sin(), z));
            normals.push(normal);
        }
        for x in 0..segments as u32 {
            if up {
                indices.push([centre, rim + x, rim + x + 1]);
            } else {
                indices.push([centre, rim + x + 1, rim + x]);
            }
        }
    }
    Mesh::from_indexed(&positions, &normals, &indices)
}

fn torus(radius: f32, tube: f32, radial: usize, tubular: usize) -> Mesh {
    let mut positions = Vec::with_capacity((radial + 1) * (tubular + 1));
    let mut normals = Vec::with_capacity(positions.capacity());
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = radius + tube * v.cos();
            let p = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let centre = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            positions.push(p);
            normals.push((p - centre).normalize_or_zero());
        }
    }

    let mut indices = Vec::with_capacity(2 * radial * tubular);
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = sheet_index(j, i - 1, tubular);
            let b = sheet_index(j - 1, i - 1, tubular);
            let c = sheet_index(j - 1, i, tubular);
            let d = sheet_index(j, i, tubular);
            indices.push([a, b, d]);
            indices.push([b, c, d]);
        }
    }
    Mesh::from_indexed(&positions, &normals, &indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &Mesh, centre_of: impl Fn(Vec3) -> Vec3) {
        for [a, b, c] in mesh.triangles() {
            let face = (b - a).cross(c - a);
            if face.length() < 1e-9 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid - centre_of(centroid)) > 0.0);
        }
    }

    #[test]
    fn test_sphere_triangle_count() {
        let mesh = Preset::sphere(0.5).unwrap().mesh(8);
        assert_eq!(mesh.num_triangles(), 2 * 8 * 8 - 2 * 8);
        assert_outward(&mesh, |_| Vec3::ZERO);
    }

    #[test]
    fn test_cylinder_winding() {
        let mesh = Preset::cylinder(0.3, 0.5, 1.0).unwrap().mesh(12);
        assert_eq!(mesh.num_triangles(), 4 * 12);
        assert_outward(&mesh, |p| Vec3::new(0.0, 0.0, p.z * 0.5));
        let (min, max) = mesh.bounding_box().unwrap();
        assert!((max.z - 0.5).abs() < 1e-6 && (min.z + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_torus_winding() {
        let mesh = Preset::torus(0.5, 0.15).unwrap().mesh(8);
        assert_eq!(mesh.num_triangles(), 2 * 8 * 16);
        assert_outward(&mesh, |p| Vec3::new(p.x, p.y, 0.0).normalize_or_zero() * 0.5);
    }

    #[test]
    fn test_torus_tube_must_be_thinner() {
        assert!(Preset::torus(0.5, 0.5).is_err());
    }
}
