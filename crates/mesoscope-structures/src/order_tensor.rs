//! Orientational order analysis.
//!
//! The order tensor of N unit axes `u` is
//! `Q = 3/(2N) · Σ u⊗u − I/2`. Its largest eigenvalue is the scalar order
//! parameter `S` and the matching eigenvector is the director.

use std::f64::consts::FRAC_PI_2;

use glam::{DMat3, DVec3};
use mesoscope_core::{MesoscopeError, Result};

const MAX_SWEEPS: usize = 50;
const OFF_DIAGONAL_TOLERANCE: f64 = 1.0e-24;

/// Fallback director for degenerate ensembles.
pub const DEFAULT_DIRECTOR: DVec3 = DVec3::Z;

/// Symmetric, traceless 3x3 order tensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTensor {
    m: [[f64; 3]; 3],
}

/// Eigen-decomposition of a symmetric matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eigen {
    pub values: [f64; 3],
    /// Unit eigenvectors; `vectors[i]` belongs to `values[i]`.
    pub vectors: [DVec3; 3],
}

impl Eigen {
    /// Index of the largest eigenvalue, the first one on ties.
    pub fn largest(&self) -> usize {
        let mut best = 0;
        for i in 1..3 {
            if self.values[i] > self.values[best] {
                best = i;
            }
        }
        best
    }
}

impl OrderTensor {
    /// Builds the tensor from particle axes. The axes are assumed to be unit
    /// length.
    pub fn from_orientations(axes: &[DVec3]) -> Result<Self> {
        if axes.is_empty() {
            return Err(MesoscopeError::EmptySet);
        }

        let (mut xx, mut xy, mut xz, mut yy, mut yz, mut zz) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        for u in axes {
            xx += u.x * u.x;
            xy += u.x * u.y;
            xz += u.x * u.z;
            yy += u.y * u.y;
            yz += u.y * u.z;
            zz += u.z * u.z;
        }
        let f = 1.5 / axes.len() as f64;

        Ok(Self {
            m: [
                [f * xx - 0.5, f * xy, f * xz],
                [f * xy, f * yy - 0.5, f * yz],
                [f * xz, f * yz, f * zz - 0.5],
            ],
        })
    }

    /// The tensor as a glam matrix.
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_cols_array_2d(&self.m)
    }

    pub fn trace(&self) -> f64 {
        self.m[0][0] + self.m[1][1] + self.m[2][2]
    }

    /// Diagonalizes the tensor with cyclic Jacobi rotations.
    pub fn eigen(&self) -> Eigen {
        let mut a = self.m;
        let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

        for _ in 0..MAX_SWEEPS {
            let off = a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2];
            if off < OFF_DIAGONAL_TOLERANCE {
                break;
            }
            jacobi_rotate(&mut a, &mut v, 0, 1);
            jacobi_rotate(&mut a, &mut v, 0, 2);
            jacobi_rotate(&mut a, &mut v, 1, 2);
        }

        let column = |i: usize| DVec3::new(v[0][i], v[1][i], v[2][i]);
        Eigen {
            values: [a[0][0], a[1][1], a[2][2]],
            vectors: [column(0), column(1), column(2)],
        }
    }

    /// Unit eigenvector of the largest eigenvalue.
    ///
    /// Falls back to [`DEFAULT_DIRECTOR`] when the solver produces nothing
    /// usable.
    pub fn director(&self) -> DVec3 {
        let eigen = self.eigen();
        eigen.vectors[eigen.largest()]
            .try_normalize()
            .unwrap_or(DEFAULT_DIRECTOR)
    }

    /// The largest eigenvalue, `S`. 1 for a perfectly aligned ensemble.
    pub fn scalar_order_parameter(&self) -> f64 {
        let eigen = self.eigen();
        eigen.values[eigen.largest()]
    }
}

/// Rotates the `(p, q)` plane so that `a[p][q]` vanishes.
fn jacobi_rotate(a: &mut [[f64; 3]; 3], v: &mut [[f64; 3]; 3], p: usize, q: usize) {
    if a[p][q] == 0.0 {
        return;
    }
    let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let c = (t * t + 1.0).sqrt().recip();
    let s = t * c;

    for k in 0..3 {
        let (akp, akq) = (a[k][p], a[k][q]);
        a[k][p] = c * akp - s * akq;
        a[k][q] = s * akp + c * akq;
    }
    for k in 0..3 {
        let (apk, aqk) = (a[p][k], a[q][k]);
        a[p][k] = c * apk - s * aqk;
        a[q][k] = s * apk + c * aqk;
    }
    for row in v.iter_mut() {
        let (vp, vq) = (row[p], row[q]);
        row[p] = c * vp - s * vq;
        row[q] = s * vp + c * vq;
    }
}

/// Director of an ensemble of particle axes.
pub fn compute_director(axes: &[DVec3]) -> Result<DVec3> {
    Ok(OrderTensor::from_orientations(axes)?.director())
}

/// Bins the angle between a particle axis and the director.
///
/// Angle 0 maps to index 0 and a right angle to `palette_size - 1`. Axes
/// are treated as headless, so antiparallel counts as aligned.
pub fn colour_index(axis: DVec3, director: DVec3, palette_size: usize) -> usize {
    let last = palette_size.max(1) - 1;
    let cosine = axis.dot(director).abs().clamp(0.0, 1.0);
    let index = (cosine.acos() / FRAC_PI_2 * last as f64).round();
    if index.is_finite() {
        (index as usize).min(last)
    } else {
        0
    }
}
