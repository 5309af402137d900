//! Level-of-detail sample counts.

use mesoscope_core::{MesoscopeError, Result};

/// Number of levels in the default table.
pub const DEFAULT_LEVELS: usize = 10;

/// Fewest longitude samples a shape is ever generated with.
pub const MIN_SAMPLES: usize = 6;

/// Most longitude samples a shape is ever generated with.
pub const MAX_SAMPLES: usize = 128;

/// Logarithmically spaced, even sample counts indexed by level of detail.
///
/// Counts are even so that mirrored hemispheres meet on a consistent seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexityTable {
    samples: Vec<usize>,
}

impl Default for ComplexityTable {
    fn default() -> Self {
        Self::logarithmic(MIN_SAMPLES, MAX_SAMPLES, DEFAULT_LEVELS)
    }
}

impl ComplexityTable {
    /// Builds `levels` even counts spaced geometrically from `min` to `max`.
    ///
    /// Counts are rounded to the nearest even number and forced to grow by at
    /// least two per level.
    pub fn logarithmic(min: usize, max: usize, levels: usize) -> Self {
        let min = round_even(min.max(4) as f64);
        let max = max.max(min) as f64;
        let ratio = if levels > 1 {
            (max / min as f64).powf(1.0 / (levels - 1) as f64)
        } else {
            1.0
        };

        let mut samples: Vec<usize> = Vec::with_capacity(levels);
        for level in 0..levels {
            let value = round_even(min as f64 * ratio.powi(level as i32));
            let value = match samples.last() {
                Some(&previous) if value <= previous => previous + 2,
                _ => value,
            };
            samples.push(value);
        }
        Self { samples }
    }

    /// Returns the sample count for a level of detail.
    pub fn samples(&self, level_of_detail: usize) -> Result<usize> {
        self.samples
            .get(level_of_detail)
            .copied()
            .ok_or(MesoscopeError::InvalidLevelOfDetail {
                lod: level_of_detail,
                len: self.samples.len(),
            })
    }

    /// Returns the number of levels.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the table has no levels.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the highest valid level of detail.
    pub fn max_level(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }

    /// Returns every sample count in level order.
    pub fn as_slice(&self) -> &[usize] {
        &self.samples
    }
}

fn round_even(value: f64) -> usize {
    ((value / 2.0).round() as usize * 2).max(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = ComplexityTable::default();
        assert_eq!(table.len(), DEFAULT_LEVELS);
        assert_eq!(table.samples(0).unwrap(), MIN_SAMPLES);
        assert_eq!(table.samples(table.max_level()).unwrap(), MAX_SAMPLES);
    }

    #[test]
    fn test_even_and_increasing() {
        for table in [
            ComplexityTable::default(),
            ComplexityTable::logarithmic(6, 26, 5),
            ComplexityTable::logarithmic(4, 10, 8),
        ] {
            assert!(table.as_slice().iter().all(|s| s % 2 == 0));
            assert!(table.as_slice().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_out_of_range_level() {
        let table = ComplexityTable::default();
        assert!(matches!(
            table.samples(DEFAULT_LEVELS),
            Err(MesoscopeError::InvalidLevelOfDetail { lod: 10, len: 10 })
        ));
    }

    #[test]
    fn test_spacing_is_geometric() {
        let table = ComplexityTable::default();
        let s = table.as_slice();
        // Later steps are larger than earlier ones.
        assert!(s[9] - s[8] > s[1] - s[0]);
    }
}
