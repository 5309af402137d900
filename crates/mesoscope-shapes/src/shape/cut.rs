//! Spheres truncated by planes perpendicular to z.
//!
//! `zCut` is the radius of the circular cut face, so the cut latitude is
//! `asin(zCut / R)`. Cut faces are closed with a ring of centroids.

use std::f32::consts::PI;

use mesoscope_core::Result;

use super::{cut_radius, positive};
use crate::grid::VertexGrid;
use crate::sampler::{build_latitude_band, centroid_row, linspace, roll_rows, rows_for_arc};

fn cut_latitude(radius: f32, cut: f32) -> f32 {
    (cut / radius).clamp(0.0, 1.0).asin()
}

fn latitudes(samples: usize, from: f32, to: f32) -> Vec<f32> {
    linspace(from, to, rows_for_arc(to - from, samples))
}

/// A sphere with its top removed above the cut latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutSphere {
    pub radius: f32,
    pub cut_radius: f32,
}

impl CutSphere {
    pub fn new(radius: f64, z_cut: f64) -> Result<Self> {
        let radius = positive("CutSphere", "Radius", radius)?;
        Ok(Self {
            radius,
            cut_radius: cut_radius("CutSphere", radius, z_cut, true)?,
        })
    }

    pub fn vertex_grid(&self, samples: usize) -> VertexGrid {
        let phi0 = cut_latitude(self.radius, self.cut_radius);
        let band = build_latitude_band(self.radius, samples, &latitudes(samples, phi0, PI));

        let mut rows = band.into_rows();
        let lid = centroid_row(&rows[0]);
        rows.insert(0, lid);
        roll_rows(&VertexGrid::new(rows), true)
    }
}

/// The spherical cap above the cut latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cap {
    pub radius: f32,
    pub cut_radius: f32,
}

impl Cap {
    pub fn new(radius: f64, z_cut: f64) -> Result<Self> {
        let radius = positive("Cap", "Radius", radius)?;
        Ok(Self {
            radius,
            cut_radius: cut_radius("Cap", radius, z_cut, true)?,
        })
    }

    pub fn vertex_grid(&self, samples: usize) -> VertexGrid {
        let phi0 = cut_latitude(self.radius, self.cut_radius);
        let band = build_latitude_band(self.radius, samples, &latitudes(samples, 0.0, phi0));

        let mut rows = band.into_rows();
        if let Some(base) = rows.last().map(|row| centroid_row(row)) {
            rows.push(base);
        }
        roll_rows(&VertexGrid::new(rows), false)
    }
}

/// A sphere cut symmetrically at the top and bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleCutSphere {
    pub radius: f32,
    pub cut_radius: f32,
}

impl DoubleCutSphere {
    pub fn new(radius: f64, z_cut: f64) -> Result<Self> {
        let radius = positive("DoubleCutSphere", "Radius", radius)?;
        Ok(Self {
            radius,
            cut_radius: cut_radius("DoubleCutSphere", radius, z_cut, false)?,
        })
    }

    pub fn vertex_grid(&self, samples: usize) -> VertexGrid {
        let phi0 = cut_latitude(self.radius, self.cut_radius);
        let band = build_latitude_band(
            self.radius,
            samples,
            &latitudes(samples, phi0, PI - phi0),
        );

        let mut rows = band.into_rows();
        let top = centroid_row(&rows[0]);
        let bottom = rows.last().map(|row| centroid_row(row)).unwrap_or_default();
        rows.insert(0, top);
        rows.push(bottom);
        roll_rows(&VertexGrid::new(rows), true)
    }
}
