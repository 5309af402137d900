//! Colour palettes for director-based colouring.
//!
//! A palette is an ordered list of colours indexed by an element's colour
//! index. Palettes are plain data handed to the particle sets that use them.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An ordered, fixed-size list of RGB colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColourPalette {
    /// Palette name.
    pub name: String,
    /// Colours in linear `[0, 1]` RGB, indexed by colour index.
    pub colours: Vec<Vec3>,
}

impl ColourPalette {
    /// Creates a new palette.
    pub fn new(name: impl Into<String>, colours: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            colours,
        }
    }

    /// Creates a palette from 8-bit RGB triples, as found in palette tables.
    pub fn from_rgb8(name: impl Into<String>, values: &[[u8; 3]]) -> Self {
        let colours = values
            .iter()
            .map(|[r, g, b]| Vec3::new(f32::from(*r), f32::from(*g), f32::from(*b)) / 255.0)
            .collect();
        Self::new(name, colours)
    }

    /// Returns the number of colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Returns true if the palette holds no colours.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Returns the colour for an index, clamped into the palette.
    ///
    /// An empty palette yields white.
    pub fn colour(&self, index: usize) -> Vec3 {
        match self.colours.len() {
            0 => Vec3::ONE,
            n => self.colours[index.min(n - 1)],
        }
    }

    /// Samples the palette at `t` in `[0, 1]`, interpolating between entries.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);

        if self.colours.is_empty() {
            return Vec3::ONE;
        }

        if self.colours.len() == 1 {
            return self.colours[0];
        }

        let n = self.colours.len() - 1;
        let idx = (t * n as f32).floor() as usize;
        let idx = idx.min(n - 1);
        let frac = t * n as f32 - idx as f32;

        self.colours[idx].lerp(self.colours[idx + 1], frac)
    }

    /// Returns a new palette with `count` evenly spaced samples of this one.
    #[allow(clippy::cast_precision_loss)]
    pub fn resampled(&self, count: usize) -> Self {
        let colours = match count {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..count)
                .map(|i| self.sample(i as f32 / (count - 1) as f32))
                .collect(),
        };
        Self::new(self.name.clone(), colours)
    }
}

/// Registry of named palettes.
#[derive(Debug, Default)]
pub struct PaletteRegistry {
    palettes: HashMap<String, ColourPalette>,
}

impl PaletteRegistry {
    /// Creates a registry holding the built-in palettes.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register(ColourPalette::new(
            "viridis",
            vec![
                Vec3::new(0.267, 0.004, 0.329),
                Vec3::new(0.282, 0.140, 0.457),
                Vec3::new(0.253, 0.265, 0.529),
                Vec3::new(0.206, 0.371, 0.553),
                Vec3::new(0.163, 0.471, 0.558),
                Vec3::new(0.127, 0.566, 0.550),
                Vec3::new(0.134, 0.658, 0.517),
                Vec3::new(0.266, 0.749, 0.440),
                Vec3::new(0.477, 0.821, 0.318),
                Vec3::new(0.741, 0.873, 0.150),
                Vec3::new(0.993, 0.906, 0.144),
            ],
        ));

        self.register(ColourPalette::new(
            "coolwarm",
            vec![
                Vec3::new(0.230, 0.299, 0.754),
                Vec3::new(0.552, 0.690, 0.996),
                Vec3::new(0.866, 0.866, 0.866),
                Vec3::new(0.956, 0.604, 0.486),
                Vec3::new(0.706, 0.016, 0.150),
            ],
        ));

        // Blue when aligned with the director, red when perpendicular.
        self.register(hue_ramp("director", 240.0, 0.0, 16));
    }

    /// Registers a palette, replacing any palette with the same name.
    pub fn register(&mut self, palette: ColourPalette) {
        self.palettes.insert(palette.name.clone(), palette);
    }

    /// Gets a palette by name.
    pub fn get(&self, name: &str) -> Option<&ColourPalette> {
        self.palettes.get(name)
    }

    /// Returns all palette names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.palettes.keys().map(String::as_str)
    }
}

#[allow(clippy::cast_precision_loss)]
fn hue_ramp(name: &str, start_deg: f32, end_deg: f32, count: usize) -> ColourPalette {
    let steps = count.saturating_sub(1).max(1) as f32;
    let colours = (0..count)
        .map(|i| hsv_to_rgb(start_deg + (end_deg - start_deg) * i as f32 / steps))
        .collect();
    ColourPalette::new(name, colours)
}

/// Fully saturated, full value HSV colour.
fn hsv_to_rgb(hue_deg: f32) -> Vec3 {
    let h = hue_deg.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h {
        h if h < 1.0 => Vec3::new(1.0, x, 0.0),
        h if h < 2.0 => Vec3::new(x, 1.0, 0.0),
        h if h < 3.0 => Vec3::new(0.0, 1.0, x),
        h if h < 4.0 => Vec3::new(0.0, x, 1.0),
        h if h < 5.0 => Vec3::new(x, 0.0, 1.0),
        _ => Vec3::new(1.0, 0.0, x),
    }
}
