//! Configuration options for particle set display.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Display configuration shared by the particle sets of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Index into the complexity table used for canonical meshes.
    pub level_of_detail: usize,

    /// Whether elements are coloured by their angle to the director.
    pub colour_by_director: bool,

    /// Colour used for every element when not colouring by director.
    pub user_colour: Vec3,

    /// Uniform scale applied to every instance.
    pub instance_scale: f32,

    /// Name of the palette used for director colouring.
    pub palette: String,

    /// Camera distances at which each coarser level of the LOD chain kicks in.
    pub lod_distances: Vec<f32>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            level_of_detail: 2,
            colour_by_director: true,
            user_colour: Vec3::ONE,
            instance_scale: 0.5,
            palette: "viridis".to_string(),
            lod_distances: vec![0.0, 0.05, 0.1, 0.2],
        }
    }
}

impl Options {
    /// Parses options from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serializes the options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.level_of_detail, 2);
        assert!(options.colour_by_director);
        assert!((options.instance_scale - 0.5).abs() < f32::EPSILON);
        assert_eq!(options.lod_distances.len(), 4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = Options::from_json_str(r#"{ "level_of_detail": 5 }"#).unwrap();
        assert_eq!(options.level_of_detail, 5);
        assert_eq!(options.palette, "viridis");
    }

    #[test]
    fn test_json_round_trip() {
        let mut options = Options::default();
        options.colour_by_director = false;
        options.user_colour = Vec3::new(1.0, 0.0, 0.5);
        let json = options.to_json_string().unwrap();
        assert_eq!(Options::from_json_str(&json).unwrap(), options);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Options::from_json_str("{ level_of_detail: }"),
            Err(crate::MesoscopeError::JsonError(_))
        ));
    }
}
