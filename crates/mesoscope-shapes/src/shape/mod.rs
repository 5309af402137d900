//! The particle shape catalog.
//!
//! Shapes form a closed set of variants. Grid-based variants produce a
//! [`VertexGrid`] from the sampler helpers and get their normals from the
//! welded surface; presets build an analytic [`Mesh`] directly.

mod cut;
mod lens;
mod preset;
mod sphere;
mod spherocylinder;

use std::fmt;
use std::str::FromStr;

use mesoscope_core::{MesoscopeError, Result};

use crate::complexity::ComplexityTable;
use crate::grid::{NormalGrid, VertexGrid};
use crate::mesh::Mesh;
use crate::triangulate::{geometric_normals, triangulate};

pub use cut::{Cap, CutSphere, DoubleCutSphere};
pub use lens::{connect_halves, Lens, LensBuilder, RADIUS_ONLY_LENS_ANGLE};
pub use preset::Preset;
pub use sphere::{Ellipsoid, Sphere};
pub use spherocylinder::{split_with_connector, Spherocylinder, Spheroplatelet};

/// Identifies one shape of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Sphere,
    Ellipsoid,
    Spherocylinder,
    Spheroplatelet,
    CutSphere,
    Cap,
    DoubleCutSphere,
    Lens,
    ThickLens,
    BiconvexLens,
    RadiusOnlyLens,
    PresetSphere,
    PresetCylinder,
    PresetTorus,
}

impl ShapeKind {
    /// Every shape kind, in catalog order.
    pub const ALL: [ShapeKind; 14] = [
        ShapeKind::Sphere,
        ShapeKind::Ellipsoid,
        ShapeKind::Spherocylinder,
        ShapeKind::Spheroplatelet,
        ShapeKind::CutSphere,
        ShapeKind::Cap,
        ShapeKind::DoubleCutSphere,
        ShapeKind::Lens,
        ShapeKind::ThickLens,
        ShapeKind::BiconvexLens,
        ShapeKind::RadiusOnlyLens,
        ShapeKind::PresetSphere,
        ShapeKind::PresetCylinder,
        ShapeKind::PresetTorus,
    ];

    /// Canonical identifier.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Ellipsoid => "Ellipsoid",
            ShapeKind::Spherocylinder => "Spherocylinder",
            ShapeKind::Spheroplatelet => "Spheroplatelet",
            ShapeKind::CutSphere => "CutSphere",
            ShapeKind::Cap => "Cap",
            ShapeKind::DoubleCutSphere => "DoubleCutSphere",
            ShapeKind::Lens => "Lens",
            ShapeKind::ThickLens => "ThickLens",
            ShapeKind::BiconvexLens => "BiconvexLens",
            ShapeKind::RadiusOnlyLens => "RadiusOnlyLens",
            ShapeKind::PresetSphere => "PresetSphere",
            ShapeKind::PresetCylinder => "PresetCylinder",
            ShapeKind::PresetTorus => "PresetTorus",
        }
    }

    /// Ordered parameter names.
    pub fn schema(self) -> &'static [&'static str] {
        match self {
            ShapeKind::Sphere | ShapeKind::RadiusOnlyLens | ShapeKind::PresetSphere => &["Radius"],
            ShapeKind::Ellipsoid => &["X", "Y", "Z"],
            ShapeKind::Spherocylinder => &["Radius", "Length"],
            ShapeKind::Spheroplatelet => &["RadSphere", "RadCircle"],
            ShapeKind::CutSphere | ShapeKind::Cap | ShapeKind::DoubleCutSphere => {
                &["Radius", "zCut"]
            }
            ShapeKind::Lens | ShapeKind::BiconvexLens => &["Radius", "Angle"],
            ShapeKind::ThickLens => &["Radius", "Thickness", "Angle"],
            ShapeKind::PresetCylinder => &["RadiusTop", "RadiusBottom", "Height"],
            ShapeKind::PresetTorus => &["Radius", "Tube"],
        }
    }

    /// Default parameter values, matching [`ShapeKind::schema`].
    pub fn default_parameters(self) -> &'static [f64] {
        match self {
            ShapeKind::Sphere => &[0.6],
            ShapeKind::Ellipsoid => &[1.0, 1.0, 0.2],
            ShapeKind::Spherocylinder => &[0.5, 0.7],
            ShapeKind::Spheroplatelet => &[0.3, 0.2],
            ShapeKind::CutSphere | ShapeKind::Cap | ShapeKind::DoubleCutSphere => &[0.8, 0.7],
            ShapeKind::Lens | ShapeKind::BiconvexLens => &[1.0, 0.7],
            ShapeKind::ThickLens => &[1.0, 0.1, 0.7],
            ShapeKind::RadiusOnlyLens => &[0.5],
            ShapeKind::PresetSphere => &[0.5],
            ShapeKind::PresetCylinder => &[0.3, 0.3, 1.0],
            ShapeKind::PresetTorus => &[0.5, 0.15],
        }
    }

    /// Whether the shape bypasses the grid pipeline.
    pub fn is_preset(self) -> bool {
        matches!(
            self,
            ShapeKind::PresetSphere | ShapeKind::PresetCylinder | ShapeKind::PresetTorus
        )
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = MesoscopeError;

    /// Accepts canonical names as well as display names such as
    /// `"Cut Sphere"`, `"Thick Lens"` or `"Cinacchi Lens"`.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let kind = match key.as_str() {
            "sphere" => ShapeKind::Sphere,
            "ellipsoid" => ShapeKind::Ellipsoid,
            "spherocylinder" => ShapeKind::Spherocylinder,
            "spheroplatelet" => ShapeKind::Spheroplatelet,
            "cutsphere" => ShapeKind::CutSphere,
            "cap" => ShapeKind::Cap,
            "doublecutsphere" => ShapeKind::DoubleCutSphere,
            "lens" => ShapeKind::Lens,
            "thicklens" => ShapeKind::ThickLens,
            "biconvexlens" => ShapeKind::BiconvexLens,
            "radiusonlylens" | "cinacchilens" => ShapeKind::RadiusOnlyLens,
            "presetsphere" => ShapeKind::PresetSphere,
            "presetcylinder" | "cylinder" => ShapeKind::PresetCylinder,
            "presettorus" | "torus" => ShapeKind::PresetTorus,
            _ => return Err(MesoscopeError::UnknownShape(s.to_string())),
        };
        Ok(kind)
    }
}

/// A validated shape, its parameters and the level of detail to build at.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    kind: ShapeKind,
    parameters: Vec<f64>,
    level_of_detail: usize,
}

impl ShapeSpec {
    /// Creates a shape spec, checking the parameters against the schema.
    pub fn new(kind: ShapeKind, parameters: Vec<f64>, level_of_detail: usize) -> Result<Self> {
        // Builds the typed shape once so range errors surface here.
        Shape::from_parameters(kind, &parameters)?;
        Ok(Self {
            kind,
            parameters,
            level_of_detail,
        })
    }

    /// Creates a shape spec from a shape identifier string.
    pub fn parse(identifier: &str, parameters: Vec<f64>, level_of_detail: usize) -> Result<Self> {
        Self::new(identifier.parse()?, parameters, level_of_detail)
    }

    /// The shape with its default parameters.
    pub fn with_defaults(kind: ShapeKind, level_of_detail: usize) -> Self {
        Self {
            kind,
            parameters: kind.default_parameters().to_vec(),
            level_of_detail,
        }
    }

    /// Returns the shape kind.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Returns the parameter values in schema order.
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Pairs each parameter value with its schema name.
    pub fn named_parameters(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.kind
            .schema()
            .iter()
            .copied()
            .zip(self.parameters.iter().copied())
    }

    /// Returns the level of detail.
    pub fn level_of_detail(&self) -> usize {
        self.level_of_detail
    }

    /// Returns a copy with a different level of detail.
    #[must_use]
    pub fn with_level_of_detail(&self, level_of_detail: usize) -> Self {
        Self {
            level_of_detail,
            ..self.clone()
        }
    }

    /// Returns the typed shape.
    pub fn shape(&self) -> Result<Shape> {
        Shape::from_parameters(self.kind, &self.parameters)
    }

    /// Generates the grids (or preset mesh) at this spec's level of detail.
    pub fn generate(&self, table: &ComplexityTable) -> Result<ShapeGeometry> {
        let samples = table.samples(self.level_of_detail)?;
        Ok(self.shape()?.generate(samples))
    }

    /// Builds the canonical mesh at this spec's level of detail.
    pub fn build_mesh(&self, table: &ComplexityTable) -> Result<Mesh> {
        let samples = table.samples(self.level_of_detail)?;
        let mesh = self.shape()?.build_mesh(samples);
        log::debug!(
            "generated {} mesh at {} samples: {} triangles",
            self.kind,
            samples,
            mesh.num_triangles()
        );
        Ok(mesh)
    }
}

/// Output of shape generation.
#[derive(Debug, Clone)]
pub enum ShapeGeometry {
    /// A vertex grid and its matching normals.
    Grid {
        vertices: VertexGrid,
        normals: NormalGrid,
    },
    /// An analytic mesh that skips triangulation.
    Preset(Mesh),
}

impl ShapeGeometry {
    /// Converts the geometry into a triangle soup.
    pub fn into_mesh(self) -> Mesh {
        match self {
            ShapeGeometry::Grid { vertices, normals } => triangulate(&vertices, &normals),
            ShapeGeometry::Preset(mesh) => mesh,
        }
    }
}

/// A particle shape with validated, typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Ellipsoid(Ellipsoid),
    Spherocylinder(Spherocylinder),
    Spheroplatelet(Spheroplatelet),
    CutSphere(CutSphere),
    Cap(Cap),
    DoubleCutSphere(DoubleCutSphere),
    /// Lens, ThickLens, BiconvexLens and RadiusOnlyLens.
    Lens(Lens),
    Preset(Preset),
}

impl Shape {
    /// Builds a typed shape from raw parameters in schema order.
    pub fn from_parameters(kind: ShapeKind, parameters: &[f64]) -> Result<Self> {
        let schema = kind.schema();
        if parameters.len() != schema.len() {
            return Err(MesoscopeError::ParameterArity {
                shape: kind.to_string(),
                expected: schema,
                actual: parameters.len(),
            });
        }
        let p = parameters;

        let shape = match kind {
            ShapeKind::Sphere => Shape::Sphere(Sphere::new(p[0])?),
            ShapeKind::Ellipsoid => Shape::Ellipsoid(Ellipsoid::new(p[0], p[1], p[2])?),
            ShapeKind::Spherocylinder => Shape::Spherocylinder(Spherocylinder::new(p[0], p[1])?),
            ShapeKind::Spheroplatelet => Shape::Spheroplatelet(Spheroplatelet::new(p[0], p[1])?),
            ShapeKind::CutSphere => Shape::CutSphere(CutSphere::new(p[0], p[1])?),
            ShapeKind::Cap => Shape::Cap(Cap::new(p[0], p[1])?),
            ShapeKind::DoubleCutSphere => Shape::DoubleCutSphere(DoubleCutSphere::new(p[0], p[1])?),
            ShapeKind::Lens => Shape::Lens(Lens::symmetric(p[0], p[1])?),
            ShapeKind::ThickLens => Shape::Lens(Lens::thick(p[0], p[1], p[2])?),
            ShapeKind::BiconvexLens => Shape::Lens(Lens::biconvex(p[0], p[1])?),
            ShapeKind::RadiusOnlyLens => Shape::Lens(Lens::radius_only(p[0])?),
            ShapeKind::PresetSphere => Shape::Preset(Preset::sphere(p[0])?),
            ShapeKind::PresetCylinder => Shape::Preset(Preset::cylinder(p[0], p[1], p[2])?),
            ShapeKind::PresetTorus => Shape::Preset(Preset::torus(p[0], p[1])?),
        };
        Ok(shape)
    }

    /// Generates the shape with `samples` longitude samples.
    pub fn generate(&self, samples: usize) -> ShapeGeometry {
        let vertices = match self {
            Shape::Sphere(s) => s.vertex_grid(samples),
            Shape::Ellipsoid(s) => s.vertex_grid(samples),
            Shape::Spherocylinder(s) => s.vertex_grid(samples),
            Shape::Spheroplatelet(s) => s.vertex_grid(samples),
            Shape::CutSphere(s) => s.vertex_grid(samples),
            Shape::Cap(s) => s.vertex_grid(samples),
            Shape::DoubleCutSphere(s) => s.vertex_grid(samples),
            Shape::Lens(s) => s.vertex_grid(samples),
            Shape::Preset(preset) => return ShapeGeometry::Preset(preset.mesh(samples)),
        };
        let normals = geometric_normals(&vertices);
        ShapeGeometry::Grid { vertices, normals }
    }

    /// Builds the shape's triangle soup with `samples` longitude samples.
    pub fn build_mesh(&self, samples: usize) -> Mesh {
        self.generate(samples).into_mesh()
    }
}

/// Checks that a parameter is finite and strictly positive.
pub(crate) fn positive(shape: &str, name: &'static str, value: f64) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value as f32)
    } else {
        Err(MesoscopeError::InvalidParameter {
            shape: shape.to_string(),
            name,
            value,
            reason: "must be positive",
        })
    }
}

/// Checks a cut radius against the sphere it cuts.
pub(crate) fn cut_radius(shape: &str, radius: f32, value: f64, allow_equal: bool) -> Result<f32> {
    let cut = positive(shape, "zCut", value)?;
    let fits = if allow_equal { cut <= radius } else { cut < radius };
    if fits {
        Ok(cut)
    } else {
        Err(MesoscopeError::InvalidParameter {
            shape: shape.to_string(),
            name: "zCut",
            value,
            reason: "must not exceed the sphere radius",
        })
    }
}
