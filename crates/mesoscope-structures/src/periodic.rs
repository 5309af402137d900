//! Periodic boundary handling.

use glam::DVec3;
use mesoscope_core::{MesoscopeError, Result};
use rand::Rng;

/// Dimensions of the periodic simulation cell, centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitBox {
    lengths: DVec3,
}

impl UnitBox {
    pub fn new(lengths: [f64; 3]) -> Result<Self> {
        for (name, value) in ["Lx", "Ly", "Lz"].into_iter().zip(lengths) {
            if !(value.is_finite() && value > 0.0) {
                return Err(MesoscopeError::InvalidParameter {
                    shape: "UnitBox".to_string(),
                    name,
                    value,
                    reason: "must be positive",
                });
            }
        }
        Ok(Self {
            lengths: DVec3::from_array(lengths),
        })
    }

    pub fn lengths(&self) -> DVec3 {
        self.lengths
    }

    /// Corners of the box, `(-L/2, L/2)`.
    pub fn bounds(&self) -> (DVec3, DVec3) {
        (-self.lengths / 2.0, self.lengths / 2.0)
    }

    /// Wraps a position into `[-L/2, L/2)` per component.
    pub fn fold_position(&self, position: DVec3) -> DVec3 {
        DVec3::new(
            fold_coordinate(position.x, self.lengths.x),
            fold_coordinate(position.y, self.lengths.y),
            fold_coordinate(position.z, self.lengths.z),
        )
    }

    /// Whether a position lies strictly inside the box.
    pub fn contains(&self, position: DVec3) -> bool {
        let half = self.lengths / 2.0;
        position.abs().cmplt(half).all()
    }

    pub fn fold(&self, positions: &[DVec3]) -> Vec<DVec3> {
        positions.iter().map(|&p| self.fold_position(p)).collect()
    }

    /// True when every position lies strictly inside the box.
    ///
    /// A coordinate folded onto the lower face `-L/2` is not strictly
    /// inside, so such a set still reports as unfolded.
    pub fn is_folded(&self, positions: &[DVec3]) -> bool {
        positions.iter().all(|&p| self.contains(p))
    }

    /// Moves each coordinate by a random whole number of box lengths in
    /// `{-1, 0, 1}`. Folding the result gives back the folded input.
    pub fn unfold_with_rng<R: Rng + ?Sized>(&self, positions: &[DVec3], rng: &mut R) -> Vec<DVec3> {
        positions
            .iter()
            .map(|&p| {
                let image = DVec3::new(
                    f64::from(rng.gen_range(-1i32..=1)),
                    f64::from(rng.gen_range(-1i32..=1)),
                    f64::from(rng.gen_range(-1i32..=1)),
                );
                p + image * self.lengths
            })
            .collect()
    }

    pub fn unfold(&self, positions: &[DVec3]) -> Vec<DVec3> {
        self.unfold_with_rng(positions, &mut rand::thread_rng())
    }
}

/// `x - L·round(x / L)` with halves rounded up, so the result lies in
/// `[-L/2, L/2)`.
///
/// Values already in range come back unchanged, which makes folding
/// idempotent bit for bit.
pub fn fold_coordinate(x: f64, length: f64) -> f64 {
    let half = length / 2.0;
    if (-half..half).contains(&x) {
        return x;
    }
    let r = x - length * (x / length + 0.5).floor();
    // x / L + 0.5 can round onto an integer and push r one ulp past a face.
    let r = if r < -half {
        r + length
    } else if r >= half {
        r - length
    } else {
        r
    };
    if r >= half {
        -half
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_fold_coordinate_range() {
        assert!((fold_coordinate(0.6, 1.0) + 0.4).abs() < 1e-12);
        assert!((fold_coordinate(-0.6, 1.0) - 0.4).abs() < 1e-12);
        assert!((fold_coordinate(0.5, 1.0) + 0.5).abs() < 1e-12);
        assert!((fold_coordinate(-0.5, 1.0) + 0.5).abs() < 1e-12);
        assert!((fold_coordinate(3.25, 2.0) + 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_fold_near_half_box_stays_in_range() {
        let length = 0.3;
        let cases = [
            -0.75,
            0.449_999_999_999_999_96,
            1.349_999_999_999_999_9,
            0.15,
            -0.15,
            -0.45,
            4.5,
        ];
        for x in cases {
            let once = fold_coordinate(x, length);
            assert!((-0.15..0.15).contains(&once), "{x} folded to {once}");
            assert_eq!(fold_coordinate(once, length).to_bits(), once.to_bits(), "{x}");
        }
    }

    #[test]
    fn test_fold_brute_force_half_box_multiples() {
        for length in [0.1, 0.3, 0.7, 1.0, 1.1, 2.5, 3.3, 9.7] {
            let half = length / 2.0;
            for n in -8i32..=8 {
                let mut x = half + f64::from(n) * length;
                for _ in 0..16 {
                    let once = fold_coordinate(x, length);
                    assert!(once >= -half && once < half, "L={length} x={x} once={once}");
                    assert_eq!(fold_coordinate(once, length).to_bits(), once.to_bits());
                    x = f64::from_bits(x.to_bits() - 1);
                }
            }
        }
    }

    #[test]
    fn test_is_folded_is_strict() {
        let cell = UnitBox::new([2.0, 2.0, 2.0]).unwrap();
        assert!(cell.is_folded(&[DVec3::new(0.5, -0.9, 0.99)]));
        assert!(!cell.is_folded(&[DVec3::new(1.0, 0.0, 0.0)]));
        assert!(!cell.is_folded(&[DVec3::new(0.0, 0.0, -1.5)]));
        assert!(cell.is_folded(&[]));
    }

    #[test]
    fn test_unfold_then_fold() {
        let cell = UnitBox::new([1.0, 2.0, 3.0]).unwrap();
        let positions = vec![DVec3::new(0.1, -0.7, 1.2), DVec3::new(-0.45, 0.9, -1.4)];
        let mut rng = StdRng::seed_from_u64(7);
        let unfolded = cell.unfold_with_rng(&positions, &mut rng);
        for (a, b) in cell.fold(&unfolded).iter().zip(&positions) {
            assert!((*a - *b).length() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_box() {
        assert!(UnitBox::new([1.0, 0.0, 1.0]).is_err());
        assert!(UnitBox::new([1.0, 1.0, f64::INFINITY]).is_err());
    }
}
