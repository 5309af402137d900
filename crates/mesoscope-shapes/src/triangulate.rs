//! Grid triangulation and normal generation.
//!
//! Every interior row `r` contributes two triangle families per column `c`:
//! an upward triangle `(r,c) (r,c+1) (r-1,c)` and a downward triangle
//! `(r,c) (r+1,c+1) (r,c+1)`. Column indices wrap, so each row is a closed
//! ring. The first and last rows only ever act as apexes, which closes the
//! poles (or flat ends) with fans.
//!
//! Normals are geometric: coincident grid points are welded into one vertex
//! and each welded vertex gets the area-weighted average of its face normals.

use std::collections::HashMap;

use glam::Vec3;

use crate::grid::{NormalGrid, VertexGrid};
use crate::mesh::{Mesh, MeshVertex};

/// Positions closer than this fraction of the grid's bounding-box diagonal
/// are treated as the same vertex when welding.
const WELD_TOLERANCE: f32 = 1e-5;

/// A `(row, column)` grid coordinate.
type GridCoord = (usize, usize);

/// Returns the grid coordinates of every triangle, outward winding.
pub fn triangle_corners(grid: &VertexGrid) -> Vec<[GridCoord; 3]> {
    let rows = grid.rows();
    if rows.len() < 3 {
        return Vec::new();
    }

    let mut corners = Vec::with_capacity(2 * (rows.len() - 2) * grid.num_columns());
    for r in 1..rows.len() - 1 {
        let width = rows[r].len();
        let width_prev = rows[r - 1].len();
        let width_next = rows[r + 1].len();
        for c in 0..width {
            let c_next = (c + 1) % width;
            corners.push([(r, c), (r, c_next), (r - 1, c % width_prev)]);
            corners.push([(r, c), (r + 1, (c + 1) % width_next), (r, c_next)]);
        }
    }
    corners
}

/// Emits the triangle soup for a vertex grid and its matching normal grid.
pub fn triangulate(vertices: &VertexGrid, normals: &NormalGrid) -> Mesh {
    debug_assert_eq!(vertices.num_rows(), normals.num_rows());
    let soup = triangle_corners(vertices)
        .into_iter()
        .flatten()
        .map(|(r, c)| MeshVertex::new(vertices.point(r, c), normals.point(r, c)))
        .collect();
    Mesh::new(soup)
}

/// An indexed mesh with coincident grid points merged.
#[derive(Debug, Clone, Default)]
pub struct WeldedMesh {
    /// Unique vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangles as indices into `positions`.
    pub indices: Vec<[u32; 3]>,
    /// For each grid row and column, the welded vertex index.
    pub grid_index: Vec<Vec<u32>>,
}

impl WeldedMesh {
    /// Area-weighted vertex normals.
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in &self.indices {
            let [a, b, c] = tri.map(|i| self.positions[i as usize]);
            // Unnormalized cross product: its length is twice the face area.
            let weighted = (b - a).cross(c - a);
            for &i in tri {
                normals[i as usize] += weighted;
            }
        }
        normals.into_iter().map(Vec3::normalize_or_zero).collect()
    }
}

fn weld_key(p: Vec3, epsilon: f32) -> [i64; 3] {
    (p / epsilon).round().to_array().map(|v| v as i64)
}

fn weld_epsilon(grid: &VertexGrid) -> f32 {
    let extent = grid
        .bounding_box()
        .map_or(0.0, |(min, max)| (max - min).length());
    let epsilon = WELD_TOLERANCE * extent;
    if epsilon.is_normal() {
        epsilon
    } else {
        WELD_TOLERANCE
    }
}

/// Merges coincident grid points and returns the indexed triangulation.
pub fn weld(grid: &VertexGrid) -> WeldedMesh {
    let epsilon = weld_epsilon(grid);
    let mut lookup: HashMap<[i64; 3], u32> = HashMap::new();
    let mut positions = Vec::new();

    let grid_index = grid
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|&p| {
                    *lookup.entry(weld_key(p, epsilon)).or_insert_with(|| {
                        positions.push(p);
                        (positions.len() - 1) as u32
                    })
                })
                .collect()
        })
        .collect::<Vec<Vec<u32>>>();

    let indices = triangle_corners(grid)
        .into_iter()
        .map(|tri| tri.map(|(r, c)| grid_index[r][c % grid_index[r].len()]))
        .collect();

    WeldedMesh {
        positions,
        indices,
        grid_index,
    }
}

/// Computes a normal grid from the surface the grid triangulates to.
pub fn geometric_normals(grid: &VertexGrid) -> NormalGrid {
    let welded = weld(grid);
    let normals = welded.vertex_normals();
    let rows = welded
        .grid_index
        .iter()
        .map(|row| row.iter().map(|&i| normals[i as usize]).collect())
        .collect();
    NormalGrid::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sphere_grid;

    fn octahedron_grid() -> VertexGrid {
        VertexGrid::new(vec![
            vec![Vec3::Z; 4],
            vec![Vec3::X, Vec3::Y, -Vec3::X, -Vec3::Y],
            vec![-Vec3::Z; 4],
        ])
    }

    #[test]
    fn test_octahedron_triangle_count() {
        let grid = octahedron_grid();
        let mesh = triangulate(&grid, &grid);
        assert_eq!(mesh.num_triangles(), 8);
    }

    #[test]
    fn test_octahedron_winding_outward() {
        let grid = octahedron_grid();
        for [a, b, c] in triangulate(&grid, &grid).triangles() {
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_too_few_rows() {
        let grid = VertexGrid::new(vec![vec![Vec3::Z; 4], vec![Vec3::X; 4]]);
        assert!(triangulate(&grid, &grid).is_empty());
    }

    #[test]
    fn test_weld_merges_poles() {
        let welded = weld(&octahedron_grid());
        assert_eq!(welded.positions.len(), 6);
        assert_eq!(welded.indices.len(), 8);
        assert_eq!(welded.grid_index[0], vec![0; 4]);
    }

    #[test]
    fn test_tiny_sphere_keeps_distinct_vertices() {
        let grid = sphere_grid(1e-4, 128);
        let welded = weld(&grid);
        // Everything but the two pole rings stays distinct.
        let expected = (grid.num_rows() - 2) * grid.num_columns() + 2;
        assert_eq!(welded.positions.len(), expected);

        let normals = geometric_normals(&grid);
        for (p, n) in grid.points().zip(normals.points()) {
            assert!(n.dot(p.normalize()) > 0.95, "normal {n} at {p}");
        }
    }

    #[test]
    fn test_geometric_normals_on_sphere_point_outward() {
        let grid = sphere_grid(1.0, 16);
        let normals = geometric_normals(&grid);
        assert_eq!(normals.num_rows(), grid.num_rows());
        for (p, n) in grid.points().zip(normals.points()) {
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.dot(p.normalize()) > 0.95);
        }
    }
}
