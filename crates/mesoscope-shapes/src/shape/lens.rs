//! Lenses built from two opposing spherical caps.
//!
//! The upper cap is sampled pole-first and translated so its rim sits on
//! the z = 0 plane. The lower cap is sampled the same way, reflected below
//! the plane and appended after the shared rim. Because the two caps are
//! sampled independently their stagger does not in general line up, which
//! [`connect_halves`] corrects before the grid is rolled.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;
use mesoscope_core::{MesoscopeError, Result};

use super::{positive, split_with_connector};
use crate::grid::VertexGrid;
use crate::sampler::{
    build_latitude_band, column_step, linspace, roll_rows, rotate_about_z, rows_for_arc,
};

/// Half-angle of two spheres of radius R whose centres are R apart.
pub const RADIUS_ONLY_LENS_ANGLE: f32 = PI / 3.0;

const AXIS_EPSILON: f32 = 1e-6;

/// Two spherical caps joined at a common circular rim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub upper_radius: f32,
    pub upper_angle: f32,
    pub lower_radius: f32,
    pub lower_angle: f32,
    /// Height of the cylindrical band between the two rims.
    pub separation: f32,
}

impl Lens {
    /// Two identical caps touching at the rim.
    pub fn symmetric(radius: f64, angle: f64) -> Result<Self> {
        LensBuilder::new("Lens", radius, angle).build()
    }

    /// Two identical caps separated by a band of height `thickness`.
    pub fn thick(radius: f64, thickness: f64, angle: f64) -> Result<Self> {
        let thickness = positive("ThickLens", "Thickness", thickness)?;
        LensBuilder::new("ThickLens", radius, angle)
            .separation(thickness)
            .build()
    }

    /// Two identical caps separated by one cap height.
    pub fn biconvex(radius: f64, angle: f64) -> Result<Self> {
        let lens = LensBuilder::new("BiconvexLens", radius, angle).build()?;
        Ok(Self {
            separation: lens.upper_radius * (1.0 - lens.upper_angle.cos()),
            ..lens
        })
    }

    /// The intersection of two spheres of radius `radius` whose centres are
    /// `radius` apart.
    pub fn radius_only(radius: f64) -> Result<Self> {
        LensBuilder::new("RadiusOnlyLens", radius, f64::from(RADIUS_ONLY_LENS_ANGLE)).build()
    }

    /// Radius of the shared rim.
    pub fn rim_radius(&self) -> f32 {
        self.upper_radius * self.upper_angle.sin()
    }

    /// Height of the upper cap above the rim.
    pub fn upper_height(&self) -> f32 {
        self.upper_radius * (1.0 - self.upper_angle.cos())
    }

    /// Depth of the lower cap below the rim.
    pub fn lower_height(&self) -> f32 {
        self.lower_radius * (1.0 - self.lower_angle.cos())
    }

    pub fn vertex_grid(&self, samples: usize) -> VertexGrid {
        let upper_phis = linspace(0.0, self.upper_angle, rows_for_arc(self.upper_angle, samples));
        let upper_drop = Vec3::Z * (self.upper_radius * self.upper_angle.cos());
        let upper = build_latitude_band(self.upper_radius, samples, &upper_phis).map(|p| p - upper_drop);

        let lower_phis = linspace(0.0, self.lower_angle, rows_for_arc(self.lower_angle, samples));
        let lower_drop = self.lower_radius * self.lower_angle.cos();
        let lower_rows: Vec<Vec<Vec3>> = build_latitude_band(self.lower_radius, samples, &lower_phis)
            .into_rows()
            .into_iter()
            .rev()
            .skip(1)
            .map(|row| {
                row.into_iter()
                    .map(|p| Vec3::new(p.x, p.y, lower_drop - p.z))
                    .collect()
            })
            .collect();

        let rim = upper.num_rows() - 1;
        let joined = connect_halves(upper, VertexGrid::new(lower_rows));
        split_with_connector(roll_rows(&joined, false), rim, self.separation)
    }
}

/// Builds lenses whose halves may have different radii.
///
/// The lower cap angle is derived so that both rims coincide:
/// `upper_radius · sin(upper_angle) = lower_radius · sin(lower_angle)`.
#[derive(Debug, Clone)]
pub struct LensBuilder {
    shape: &'static str,
    upper_radius: f64,
    upper_angle: f64,
    lower_radius: Option<f64>,
    separation: f32,
}

impl LensBuilder {
    /// Starts from a symmetric lens with the given cap radius and half-angle.
    pub fn new(shape: &'static str, radius: f64, angle: f64) -> Self {
        Self {
            shape,
            upper_radius: radius,
            upper_angle: angle,
            lower_radius: None,
            separation: 0.0,
        }
    }

    /// Uses a different sphere radius for the lower cap.
    #[must_use]
    pub fn lower_radius(mut self, radius: f64) -> Self {
        self.lower_radius = Some(radius);
        self
    }

    /// Separates the two rims by a band of the given height.
    #[must_use]
    pub fn separation(mut self, separation: f32) -> Self {
        self.separation = separation.max(0.0);
        self
    }

    pub fn build(self) -> Result<Lens> {
        let upper_radius = positive(self.shape, "Radius", self.upper_radius)?;
        let upper_angle = positive(self.shape, "Angle", self.upper_angle)?;
        if upper_angle > FRAC_PI_2 + f32::EPSILON {
            return Err(MesoscopeError::InvalidParameter {
                shape: self.shape.to_string(),
                name: "Angle",
                value: self.upper_angle,
                reason: "must not exceed a quarter turn",
            });
        }
        let upper_angle = upper_angle.min(FRAC_PI_2);

        let lower_radius = match self.lower_radius {
            Some(radius) => positive(self.shape, "LowerRadius", radius)?,
            None => upper_radius,
        };
        let rim = upper_radius * upper_angle.sin();
        if rim > lower_radius {
            return Err(MesoscopeError::InvalidParameter {
                shape: self.shape.to_string(),
                name: "LowerRadius",
                value: f64::from(lower_radius),
                reason: "is smaller than the rim radius",
            });
        }
        let lower_angle = if self.lower_radius.is_some() {
            (rim / lower_radius).min(1.0).asin()
        } else {
            upper_angle
        };

        Ok(Lens {
            upper_radius,
            upper_angle,
            lower_radius,
            lower_angle,
            separation: self.separation,
        })
    }
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

fn is_on_axis(p: Vec3) -> bool {
    p.truncate().length() <= AXIS_EPSILON
}

/// Distance of a row's longitudes from the lattice expected at `row_index`.
fn lattice_offset(row: &[Vec3], row_index: usize, step: f32, turn: f32) -> f32 {
    let stagger = (row_index % 2) as f32 / 2.0;
    row.iter()
        .filter(|p| !is_on_axis(**p))
        .map(|p| {
            let x = (p.y.atan2(p.x) + turn) / step - stagger;
            (x - x.round()).abs()
        })
        .sum()
}

/// Angular error of a row whose column `c` is taken from `c + shift`.
fn column_offset(row: &[Vec3], row_index: usize, step: f32, shift: usize) -> f32 {
    let stagger = (row_index % 2) as f32 / 2.0;
    (0..row.len())
        .map(|c| row[(c + shift) % row.len()])
        .enumerate()
        .filter(|(_, p)| !is_on_axis(*p))
        .map(|(c, p)| wrap_angle(p.y.atan2(p.x) - (c as f32 + stagger) * step).abs())
        .sum()
}

/// Appends `lower` below `upper`, aligning its stagger first.
///
/// Both grids must be unrolled and share a column count. The lower half is
/// turned about z by the number of half-column steps that best matches the
/// stagger expected of the row after the upper rim, then each lower row is
/// cycled so its column 0 sits at the expected longitude.
pub fn connect_halves(upper: VertexGrid, lower: VertexGrid) -> VertexGrid {
    let columns = upper.num_columns();
    if columns == 0 || lower.is_empty() {
        return upper;
    }
    let step = column_step(columns);
    let start = upper.num_rows();
    let half_step = step / 2.0;

    let reference = lower
        .rows()
        .iter()
        .position(|row| row.iter().any(|p| !is_on_axis(*p)));
    let turns = reference.map_or(0, |i| {
        (0..2 * columns)
            .min_by(|&a, &b| {
                let offset_a = lattice_offset(lower.row(i), start + i, step, a as f32 * half_step);
                let offset_b = lattice_offset(lower.row(i), start + i, step, b as f32 * half_step);
                offset_a.total_cmp(&offset_b)
            })
            .unwrap_or(0)
    });
    let lower = rotate_about_z(lower, turns as f32 * half_step);

    let mut rows = upper.into_rows();
    for (i, mut row) in lower.into_rows().into_iter().enumerate() {
        let shift = (0..columns)
            .min_by(|&a, &b| {
                column_offset(&row, start + i, step, a)
                    .total_cmp(&column_offset(&row, start + i, step, b))
            })
            .unwrap_or(0);
        row.rotate_left(shift);
        rows.push(row);
    }
    VertexGrid::new(rows)
}
