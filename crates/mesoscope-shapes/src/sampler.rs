//! Spherical point sampling and grid construction.
//!
//! Grids are built a quarter at a time: a quadrant of longitudes over the
//! northern hemisphere is sampled, mirrored to full rings, mirrored again
//! about the equator, and finally rolled so that the zig-zag between
//! neighbouring rows lines up with the triangulator's column indexing.
//!
//! Row `i` of an unrolled grid is staggered by `i % 2` half-steps of
//! longitude. After [`roll_rows`] every row sits half a step behind the row
//! above it, which is the layout [`crate::triangulate`] expects.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

use crate::grid::VertexGrid;

/// Maps spherical coordinates to a Cartesian point.
///
/// `theta` is the longitude around +z and `phi` the polar angle from +z.
pub fn sample_point(radius: f32, theta: f32, phi: f32) -> Vec3 {
    let sin_phi = phi.sin();
    radius * Vec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), phi.cos())
}

/// Returns `count` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f32, stop: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let increment = (stop - start) / (count - 1) as f32;
            (0..count).map(|i| start + i as f32 * increment).collect()
        }
    }
}

/// Longitudes of one half ring: `samples / 2` values covering `[0, π)`.
pub fn quarter_thetas(samples: usize) -> Vec<f32> {
    let mut thetas = linspace(0.0, PI, samples / 2 + 1);
    thetas.pop();
    thetas
}

/// Angular width of one column for a ring of `samples` points.
pub fn column_step(samples: usize) -> f32 {
    TAU / samples as f32
}

/// Number of latitude rows used to cover a polar arc of `arc` radians.
///
/// A full arc of π gets `samples - 1` rows, matching the sphere.
pub fn rows_for_arc(arc: f32, samples: usize) -> usize {
    let rows = (arc / PI * (samples.saturating_sub(2)) as f32).ceil() as usize + 1;
    rows.max(2)
}

fn staggered_rows(radius: f32, thetas: &[f32], phis: &[f32], samples: usize) -> Vec<Vec<Vec3>> {
    let half_step = PI / samples as f32;
    phis.iter()
        .enumerate()
        .map(|(phi_index, &phi)| {
            let offset = if phi_index % 2 == 0 { 0.0 } else { half_step };
            thetas
                .iter()
                .map(|&theta| sample_point(radius, theta + offset, phi))
                .collect()
        })
        .collect()
}

/// Samples one quadrant of the northern hemisphere.
///
/// Rows run from the pole to the equator; there are
/// `vertical_samples / 2 - phi_offset_rows` of them (at least two) and each
/// holds `samples / 2` longitudes in `[0, π)`. Odd rows are shifted by half a
/// longitude step so that no triangle collapses to zero width.
pub fn build_quarter_grid(
    radius: f32,
    samples: usize,
    phi_offset_rows: usize,
    vertical_samples: usize,
) -> VertexGrid {
    let rows = (vertical_samples / 2).saturating_sub(phi_offset_rows).max(2);
    let phis = linspace(0.0, PI / 2.0, rows);
    VertexGrid::new(staggered_rows(
        radius,
        &quarter_thetas(samples),
        &phis,
        samples,
    ))
}

/// Samples full staggered rings at an explicit list of polar angles.
pub fn build_latitude_band(radius: f32, samples: usize, phis: &[f32]) -> VertexGrid {
    let quarter = VertexGrid::new(staggered_rows(
        radius,
        &quarter_thetas(samples),
        phis,
        samples,
    ));
    mirror_quadrant(&quarter)
}

/// Completes half rings by appending their `(-x, -y, z)` reflections.
pub fn mirror_quadrant(grid: &VertexGrid) -> VertexGrid {
    let rows = grid
        .rows()
        .iter()
        .map(|row| {
            let mut full = row.clone();
            full.extend(row.iter().map(|p| Vec3::new(-p.x, -p.y, p.z)));
            full
        })
        .collect();
    VertexGrid::new(rows)
}

/// Appends the southern hemisphere by reflecting a pole-to-equator band.
///
/// Each source row is rolled by half a ring and negated, which mirrors it in
/// z while keeping its longitudes, and the rows are appended in reverse so
/// the equator is shared rather than duplicated.
pub fn mirror_hemisphere(grid: &VertexGrid) -> VertexGrid {
    let mut rows = grid.rows().to_vec();
    let bottom: Vec<Vec<Vec3>> = grid
        .rows()
        .iter()
        .rev()
        .skip(1)
        .map(|row| {
            let mut rolled = row.clone();
            if !rolled.is_empty() {
                let half = rolled.len() / 2;
                rolled.rotate_left(half);
            }
            rolled.into_iter().map(|p| -p).collect()
        })
        .collect();
    rows.extend(bottom);
    VertexGrid::new(rows)
}

/// Rotates row `i` right by `ceil((i + offset) / 2)` columns.
///
/// Pass `offset = true` when a flat end row has been prepended to a grid
/// whose first sampled row is staggered like row 0.
pub fn roll_rows(grid: &VertexGrid, offset: bool) -> VertexGrid {
    let shift = usize::from(offset);
    let rows = grid
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut rolled = row.clone();
            if !rolled.is_empty() {
                let cut = (i + shift).div_ceil(2) % rolled.len();
                rolled.rotate_right(cut);
            }
            rolled
        })
        .collect();
    VertexGrid::new(rows)
}

/// Longitude, in column steps, of column 0 of row `row` in a rolled grid.
pub fn rolled_row_phase(row: usize) -> f32 {
    -(row as f32) / 2.0
}

/// A ring made of copies of the centroid of `row`, closing a flat end.
pub fn centroid_row(row: &[Vec3]) -> Vec<Vec3> {
    if row.is_empty() {
        return Vec::new();
    }
    let centroid = row.iter().copied().sum::<Vec3>() / row.len() as f32;
    vec![centroid; row.len()]
}

/// Rotates every point of a grid about the z axis.
pub fn rotate_about_z(grid: VertexGrid, angle: f32) -> VertexGrid {
    let rotation = Quat::from_rotation_z(angle);
    grid.map(|p| rotation * p)
}

/// A full, rolled sphere grid.
pub fn sphere_grid(radius: f32, samples: usize) -> VertexGrid {
    let quarter = build_quarter_grid(radius, samples, 0, samples);
    roll_rows(&mirror_hemisphere(&mirror_quadrant(&quarter)), false)
}
