//! Latitude/longitude point grids.

use glam::Vec3;

/// Rows of points on a closed surface.
///
/// Rows run from one pole (or flat end) to the other; each row is a cyclic
/// ring of points and all rows have the same number of columns. The first
/// and last rows are expected to be degenerate (every point equal), which is
/// what lets the triangulator close the surface with fans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexGrid {
    rows: Vec<Vec<Vec3>>,
}

/// A grid of unit normals laid out exactly like its [`VertexGrid`].
pub type NormalGrid = VertexGrid;

impl VertexGrid {
    /// Creates a grid from rows of points.
    pub fn new(rows: Vec<Vec<Vec3>>) -> Self {
        debug_assert!(
            rows.windows(2).all(|pair| pair[0].len() == pair[1].len()),
            "all grid rows must have the same column count"
        );
        Self { rows }
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[Vec<Vec3>] {
        &self.rows
    }

    /// Returns a single row.
    pub fn row(&self, index: usize) -> &[Vec3] {
        &self.rows[index]
    }

    /// Consumes the grid, returning its rows.
    pub fn into_rows(self) -> Vec<Vec<Vec3>> {
        self.rows
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns (points per row).
    pub fn num_columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Returns true if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the point at `(row, column)`, wrapping the column index.
    pub fn point(&self, row: usize, column: usize) -> Vec3 {
        let ring = &self.rows[row];
        ring[column % ring.len()]
    }

    /// Iterates over every point, row by row.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Applies `f` to every point.
    #[must_use]
    pub fn map(self, mut f: impl FnMut(Vec3) -> Vec3) -> Self {
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(&mut f).collect())
            .collect();
        Self { rows }
    }

    /// Translates every point of the rows in `range`.
    pub fn translate_rows(&mut self, range: std::ops::Range<usize>, offset: Vec3) {
        for row in &mut self.rows[range] {
            for point in row {
                *point += offset;
            }
        }
    }

    /// Returns the axis-aligned bounding box of all points.
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.points();
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

impl From<Vec<Vec<Vec3>>> for VertexGrid {
    fn from(rows: Vec<Vec<Vec3>>) -> Self {
        Self::new(rows)
    }
}
