//! A named collection of particle sets sharing one set of options.

use std::collections::HashMap;
use std::path::Path;

use glam::DVec3;
use mesoscope_core::{MesoscopeError, Options, Result};
use mesoscope_structures::ParticleSet;

use crate::loader;

/// Particle sets keyed by name.
///
/// Every set in a scene is kept at the scene's level of detail.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    sets: HashMap<String, ParticleSet>,
    options: Options,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new(options: Options) -> Self {
        Self {
            sets: HashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Adds a set, rebuilding it at the scene's level of detail if needed.
    ///
    /// Returns an error if a set with the same name already exists.
    pub fn add(&mut self, mut set: ParticleSet) -> Result<()> {
        if self.sets.contains_key(set.name()) {
            return Err(MesoscopeError::SetExists(set.name().to_string()));
        }
        if set.level_of_detail() != self.options.level_of_detail {
            set.set_level_of_detail(self.options.level_of_detail)?;
        }
        self.sets.insert(set.name().to_string(), set);
        Ok(())
    }

    /// Builds every set of a JSON document and adds it.
    ///
    /// Nothing is added unless every set builds and no name collides.
    pub fn load_str(&mut self, json: &str) -> Result<()> {
        let sets = loader::load_model_str(json, &self.options)?;
        let mut staged = self.clone();
        for set in sets {
            staged.add(set)?;
        }
        *self = staged;
        Ok(())
    }

    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.load_str(&text)
    }

    /// Gets a set by name.
    pub fn get(&self, name: &str) -> Option<&ParticleSet> {
        self.sets.get(name)
    }

    /// Gets a mutable reference to a set by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParticleSet> {
        self.sets.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Removes a set by name.
    pub fn remove(&mut self, name: &str) -> Result<ParticleSet> {
        self.sets
            .remove(name)
            .ok_or_else(|| MesoscopeError::SetNotFound(name.to_string()))
    }

    /// Removes every set.
    pub fn clear(&mut self) {
        self.sets.clear();
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Set names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticleSet> {
        self.sets.values()
    }

    /// Rebuilds every set at a new level of detail. On error no set changes.
    pub fn set_level_of_detail(&mut self, level_of_detail: usize) -> Result<()> {
        let mut rebuilt = self.sets.clone();
        for set in rebuilt.values_mut() {
            set.set_level_of_detail(level_of_detail)?;
        }
        self.sets = rebuilt;
        self.options.level_of_detail = level_of_detail;
        Ok(())
    }

    /// Union of the unit boxes of every set.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        self.sets
            .values()
            .map(|set| set.unit_box().bounds())
            .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
    }

    /// Diagonal of the bounding box, or 1 for an empty scene.
    pub fn length_scale(&self) -> f64 {
        self.bounding_box()
            .map_or(1.0, |(min, max)| (max - min).length())
    }
}

#[cfg(test)]
mod tests {
    use mesoscope_shapes::{ShapeKind, ShapeSpec};
    use mesoscope_structures::{OrientationType, UnitBox};

    use super::*;

    fn set(name: &str, size: f64) -> ParticleSet {
        ParticleSet::new(
            name,
            vec![DVec3::ZERO],
            &[vec![0.0, 0.0, 1.0]],
            OrientationType::UnitVector,
            UnitBox::new([size; 3]).unwrap(),
            &ShapeSpec::with_defaults(ShapeKind::Sphere, 0),
            &Options::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_add_get_remove() {
        let mut scene = Scene::new(Options::default());
        scene.add(set("a", 1.0)).unwrap();
        assert!(scene.get("a").is_some());
        assert!(scene.get("b").is_none());
        assert!(matches!(scene.add(set("a", 1.0)), Err(MesoscopeError::SetExists(_))));

        let removed = scene.remove("a").unwrap();
        assert_eq!(removed.name(), "a");
        assert!(matches!(scene.remove("a"), Err(MesoscopeError::SetNotFound(_))));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_extents() {
        let mut scene = Scene::new(Options::default());
        assert!(scene.bounding_box().is_none());
        assert!((scene.length_scale() - 1.0).abs() < f64::EPSILON);

        scene.add(set("small", 2.0)).unwrap();
        scene.add(set("large", 4.0)).unwrap();
        let (min, max) = scene.bounding_box().unwrap();
        assert_eq!(min, DVec3::splat(-2.0));
        assert_eq!(max, DVec3::splat(2.0));
        assert!((scene.length_scale() - 48f64.sqrt()).abs() < 1e-12);
        assert_eq!(scene.names(), vec!["large", "small"]);
    }

    #[test]
    fn test_level_of_detail_applies_to_all_sets() {
        let mut scene = Scene::new(Options::default());
        scene.add(set("a", 1.0)).unwrap();
        scene.add(set("b", 1.0)).unwrap();
        scene.set_level_of_detail(4).unwrap();
        assert!(scene.iter().all(|s| s.level_of_detail() == 4));

        assert!(scene.set_level_of_detail(10).is_err());
        assert!(scene.iter().all(|s| s.level_of_detail() == 4));
        assert_eq!(scene.options().level_of_detail, 4);
    }

    #[test]
    fn test_add_adopts_scene_level_of_detail() {
        let options = Options {
            level_of_detail: 5,
            ..Options::default()
        };
        let mut scene = Scene::new(options);
        scene.add(set("a", 1.0)).unwrap();
        assert_eq!(scene.get("a").unwrap().level_of_detail(), 5);
    }
}
