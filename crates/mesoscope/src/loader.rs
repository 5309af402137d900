//! JSON input for particle sets.
//!
//! A document is either `{"model": {"sets": [record, ...]}}` or a single
//! bare record:
//!
//! ```json
//! {
//!   "name": "rods",
//!   "orientationType": "q",
//!   "positions": [[0.0, 0.0, 0.0]],
//!   "orientations": [[1.0, 0.0, 0.0, 0.0]],
//!   "unitBox": [10.0, 10.0, 10.0],
//!   "shapeType": "Spherocylinder",
//!   "parameters": [0.5, 0.7]
//! }
//! ```

use std::path::Path;

use glam::DVec3;
use mesoscope_core::{Options, Result};
use mesoscope_shapes::{ShapeKind, ShapeSpec};
use mesoscope_structures::{OrientationType, ParticleSet, UnitBox};
use serde::{Deserialize, Serialize};

/// Shape used when a record names none.
pub const DEFAULT_SHAPE: ShapeKind = ShapeKind::Ellipsoid;

/// One particle set as it appears in an input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub orientation_type: String,
    pub positions: Vec<[f64; 3]>,
    pub orientations: Vec<Vec<f64>>,
    pub unit_box: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<f64>>,
}

impl SetRecord {
    /// Resolves the shape, falling back to the default ellipsoid.
    pub fn shape_spec(&self, level_of_detail: usize) -> Result<ShapeSpec> {
        let kind = match &self.shape_type {
            Some(identifier) => identifier.parse()?,
            None => DEFAULT_SHAPE,
        };
        let parameters = self
            .parameters
            .clone()
            .unwrap_or_else(|| kind.default_parameters().to_vec());
        ShapeSpec::new(kind, parameters, level_of_detail)
    }

    /// Builds the particle set this record describes.
    pub fn build(&self, options: &Options) -> Result<ParticleSet> {
        let shape = self.shape_spec(options.level_of_detail)?;
        let orientation_type: OrientationType = self.orientation_type.parse()?;
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| shape.kind().to_string());
        let positions = self.positions.iter().map(|&p| DVec3::from_array(p)).collect();

        ParticleSet::new(
            name,
            positions,
            &self.orientations,
            orientation_type,
            UnitBox::new(self.unit_box)?,
            &shape,
            options,
        )
    }
}

#[derive(Deserialize)]
struct ModelSets {
    sets: Vec<SetRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Model { model: ModelSets },
    Record(SetRecord),
}

/// Parses a document into its set records without building them.
pub fn parse_records(json: &str) -> Result<Vec<SetRecord>> {
    Ok(match serde_json::from_str::<Document>(json)? {
        Document::Model { model } => model.sets,
        Document::Record(record) => vec![record],
    })
}

/// Parses a document and builds every set in it.
pub fn load_model_str(json: &str, options: &Options) -> Result<Vec<ParticleSet>> {
    let records = parse_records(json)?;
    log::debug!("loading {} particle set record(s)", records.len());
    records.iter().map(|record| record.build(options)).collect()
}

/// Reads a document from disk and builds every set in it.
pub fn load_model_path(path: impl AsRef<Path>, options: &Options) -> Result<Vec<ParticleSet>> {
    let text = std::fs::read_to_string(path)?;
    load_model_str(&text, options)
}

#[cfg(test)]
mod tests {
    use mesoscope_core::MesoscopeError;

    use super::*;

    const BARE: &str = r#"{
        "orientationType": "v",
        "positions": [[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
        "orientations": [[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        "unitBox": [2.0, 2.0, 2.0]
    }"#;

    #[test]
    fn test_bare_record_defaults() {
        let sets = load_model_str(BARE, &Options::default()).unwrap();
        assert_eq!(sets.len(), 1);
        let set = &sets[0];
        assert_eq!(set.name(), "Ellipsoid");
        assert_eq!(set.shape().kind(), ShapeKind::Ellipsoid);
        assert_eq!(set.shape().parameters(), &[1.0, 1.0, 0.2]);
    }

    #[test]
    fn test_model_document() {
        let json = r#"{"model": {"sets": [
            {"name": "a", "orientationType": "q", "positions": [[0, 0, 0]],
             "orientations": [[1, 0, 0, 0]], "unitBox": [1, 1, 1],
             "shapeType": "Cut Sphere", "parameters": [0.8, 0.7]},
            {"name": "b", "orientationType": "e", "positions": [[0, 0, 0]],
             "orientations": [[0, 0, 0]], "unitBox": [1, 1, 1], "shapeType": "Cap"}
        ]}}"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].parameters, None);

        let sets = load_model_str(json, &Options::default()).unwrap();
        assert_eq!(sets[0].shape().kind(), ShapeKind::CutSphere);
        assert_eq!(sets[1].shape().parameters(), ShapeKind::Cap.default_parameters());
    }

    #[test]
    fn test_bad_orientation_type() {
        let json = BARE.replace(r#""v""#, r#""m""#);
        assert!(matches!(
            load_model_str(&json, &Options::default()),
            Err(MesoscopeError::UnknownOrientationType(code)) if code == "m"
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            load_model_str("{\"model\": 3}", &Options::default()),
            Err(MesoscopeError::JsonError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_model_path("/nonexistent/mesoscope.json", &Options::default()),
            Err(MesoscopeError::IoError(_))
        ));
    }

    #[test]
    fn test_record_round_trip() {
        let records = parse_records(BARE).unwrap();
        let json = serde_json::to_string(&records[0]).unwrap();
        assert_eq!(parse_records(&json).unwrap(), records);
    }
}
