//! Orientation encodings and their conversion to unit quaternions.

use std::fmt;
use std::str::FromStr;

use glam::{DQuat, DVec3};
use mesoscope_core::{MesoscopeError, Result};

/// How each orientation record is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrientationType {
    /// `[x, y, z]`: the particle axis itself.
    UnitVector,
    /// `[w, x, y, z]`.
    Quaternion,
    /// `[x, y, z, angle]`: rotation axis and angle in radians.
    AxisAngle,
    /// `[a, b, c]`: intrinsic rotations about x, y then z, in radians.
    Euler,
}

impl OrientationType {
    /// The single-letter code used in input records.
    pub fn code(self) -> &'static str {
        match self {
            OrientationType::UnitVector => "v",
            OrientationType::Quaternion => "q",
            OrientationType::AxisAngle => "a",
            OrientationType::Euler => "e",
        }
    }

    /// Number of components in one record.
    pub fn components(self) -> usize {
        match self {
            OrientationType::UnitVector | OrientationType::Euler => 3,
            OrientationType::Quaternion | OrientationType::AxisAngle => 4,
        }
    }
}

impl fmt::Display for OrientationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OrientationType {
    type Err = MesoscopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "v" | "V" => Ok(OrientationType::UnitVector),
            "q" | "Q" => Ok(OrientationType::Quaternion),
            "a" | "A" => Ok(OrientationType::AxisAngle),
            "e" | "E" => Ok(OrientationType::Euler),
            other => Err(MesoscopeError::UnknownOrientationType(other.to_string())),
        }
    }
}

/// A decoded orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Rotation taking the particle frame to the world frame.
    pub quaternion: DQuat,
    /// The particle axis, `quaternion * +z`.
    pub axis: DVec3,
}

impl Orientation {
    fn from_quaternion(quaternion: DQuat) -> Self {
        Self {
            quaternion,
            axis: quaternion * DVec3::Z,
        }
    }

    /// Decodes record `index` of the given type.
    pub fn from_record(kind: OrientationType, record: &[f64], index: usize) -> Result<Self> {
        if record.len() != kind.components() {
            return Err(MesoscopeError::OrientationArity {
                index,
                expected: kind.components(),
                actual: record.len(),
            });
        }
        if record.iter().any(|v| !v.is_finite()) {
            return Err(MesoscopeError::DegenerateOrientation { index });
        }
        let degenerate = || MesoscopeError::DegenerateOrientation { index };

        let quaternion = match kind {
            OrientationType::UnitVector => {
                let v = DVec3::from_slice(record)
                    .try_normalize()
                    .ok_or_else(degenerate)?;
                DQuat::from_rotation_arc(DVec3::Z, v)
            }
            OrientationType::Quaternion => {
                let q = DQuat::from_xyzw(record[1], record[2], record[3], record[0]);
                if q.length_squared() == 0.0 {
                    return Err(degenerate());
                }
                q.normalize()
            }
            OrientationType::AxisAngle => {
                let axis = DVec3::from_slice(&record[..3])
                    .try_normalize()
                    .ok_or_else(degenerate)?;
                DQuat::from_axis_angle(axis, record[3])
            }
            OrientationType::Euler => {
                DQuat::from_rotation_x(record[0])
                    * DQuat::from_rotation_y(record[1])
                    * DQuat::from_rotation_z(record[2])
            }
        };
        Ok(Self::from_quaternion(quaternion))
    }
}

/// Decodes every record, failing on the first invalid one.
pub fn decode_records(kind: OrientationType, records: &[Vec<f64>]) -> Result<Vec<Orientation>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| Orientation::from_record(kind, record, index))
        .collect()
}
