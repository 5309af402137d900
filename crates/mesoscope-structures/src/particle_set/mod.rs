//! Particle set structure.

mod render;

use glam::{DQuat, DVec3, Mat4, Vec3};
use mesoscope_core::{ColourPalette, MesoscopeError, Options, PaletteRegistry, Result};
use mesoscope_shapes::{ComplexityTable, Mesh, ShapeSpec};

use crate::order_tensor::{colour_index, OrderTensor, DEFAULT_DIRECTOR};
use crate::orientation::{decode_records, Orientation, OrientationType};
use crate::periodic::UnitBox;

pub use render::{Instance, InstanceRaw, LodLevel};

/// Number of coarser levels kept below the active one in a LOD chain.
const LOD_CHAIN_DEPTH: usize = 3;

/// One particle of a set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub position: DVec3,
    pub quaternion: DQuat,
    /// The particle axis, `quaternion * +z`.
    pub orientation: DVec3,
    /// Index into the set's palette.
    pub colour_index: usize,
}

/// Everything derived from a set's inputs.
#[derive(Debug, Clone)]
struct Derived {
    elements: Vec<Element>,
    mesh: Mesh,
    director: DVec3,
    order_parameter: f64,
}

/// An ensemble of identical particles in a periodic box.
///
/// Changing any input goes through a full rebuild of the elements, the
/// canonical mesh, the director and the colour indices. A rebuild that
/// fails leaves the set exactly as it was.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    name: String,
    positions: Vec<DVec3>,
    orientations: Vec<Orientation>,
    orientation_type: OrientationType,
    unit_box: UnitBox,
    shape: ShapeSpec,
    options: Options,
    palette: ColourPalette,
    complexity: ComplexityTable,
    derived: Derived,
}

impl ParticleSet {
    /// Creates a particle set.
    ///
    /// The level of detail of `shape` is replaced by `options.level_of_detail`
    /// and the palette is looked up by `options.palette` among the built-in
    /// palettes.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<DVec3>,
        records: &[Vec<f64>],
        orientation_type: OrientationType,
        unit_box: UnitBox,
        shape: &ShapeSpec,
        options: &Options,
    ) -> Result<Self> {
        if positions.len() != records.len() {
            return Err(MesoscopeError::ShapeMismatch {
                positions: positions.len(),
                orientations: records.len(),
            });
        }
        let orientations = decode_records(orientation_type, records)?;
        let palette = PaletteRegistry::new()
            .get(&options.palette)
            .cloned()
            .ok_or_else(|| MesoscopeError::PaletteNotFound(options.palette.clone()))?;
        let shape = shape.with_level_of_detail(options.level_of_detail);
        let complexity = ComplexityTable::default();

        let derived = derive(&positions, &orientations, orientation_type, &shape, &palette, &complexity)?;
        let name = name.into();
        log::info!(
            "built particle set '{}': {} elements, {} shape, director {}",
            name,
            derived.elements.len(),
            shape.kind(),
            derived.director
        );

        Ok(Self {
            name,
            positions,
            orientations,
            orientation_type,
            unit_box,
            shape,
            options: options.clone(),
            palette,
            complexity,
            derived,
        })
    }

    /// Returns the name of this set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn orientation_type(&self) -> OrientationType {
        self.orientation_type
    }

    pub fn unit_box(&self) -> &UnitBox {
        &self.unit_box
    }

    pub fn shape(&self) -> &ShapeSpec {
        &self.shape
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn palette(&self) -> &ColourPalette {
        &self.palette
    }

    pub fn level_of_detail(&self) -> usize {
        self.shape.level_of_detail()
    }

    /// Returns the elements of the last rebuild.
    pub fn elements(&self) -> &[Element] {
        &self.derived.elements
    }

    /// Returns the canonical mesh shared by every element.
    pub fn mesh(&self) -> &Mesh {
        &self.derived.mesh
    }

    /// Returns the director of the ensemble.
    pub fn director(&self) -> DVec3 {
        self.derived.director
    }

    /// Returns the scalar order parameter `S`.
    pub fn scalar_order_parameter(&self) -> f64 {
        self.derived.order_parameter
    }

    /// Whether every position lies strictly inside the unit box.
    pub fn is_folded(&self) -> bool {
        self.unit_box.is_folded(&self.positions)
    }

    /// Replaces the shape. The current level of detail is kept.
    pub fn set_shape(&mut self, shape: &ShapeSpec) -> Result<()> {
        let shape = shape.with_level_of_detail(self.level_of_detail());
        self.rebuild(None, Some(shape), None)
    }

    pub fn set_level_of_detail(&mut self, level_of_detail: usize) -> Result<()> {
        let shape = self.shape.with_level_of_detail(level_of_detail);
        self.rebuild(None, Some(shape), None)?;
        self.options.level_of_detail = level_of_detail;
        Ok(())
    }

    pub fn set_palette(&mut self, palette: ColourPalette) -> Result<()> {
        self.rebuild(None, None, Some(palette))?;
        self.options.palette = self.palette.name.clone();
        Ok(())
    }

    /// Wraps every position into the unit box.
    pub fn fold(&mut self) -> Result<()> {
        if self.is_folded() {
            log::warn!("particle set '{}' is already folded", self.name);
            return Ok(());
        }
        let positions = self.unit_box.fold(&self.positions);
        self.rebuild(Some(positions), None, None)
    }

    /// Moves every position to a random neighbouring periodic image.
    pub fn unfold(&mut self) -> Result<()> {
        self.unfold_with_rng(&mut rand::thread_rng())
    }

    pub fn unfold_with_rng<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if !self.is_folded() {
            log::warn!("particle set '{}' is already unfolded", self.name);
            return Ok(());
        }
        let positions = self.unit_box.unfold_with_rng(&self.positions, rng);
        self.rebuild(Some(positions), None, None)
    }

    /// Switches between director colouring and a single user colour.
    pub fn set_colour_by_director(&mut self, enabled: bool) {
        self.options.colour_by_director = enabled;
    }

    pub fn set_user_colour(&mut self, colour: Vec3) {
        self.options.user_colour = colour;
    }

    /// Per-element transforms and colours for instanced drawing.
    pub fn instances(&self) -> Vec<Instance> {
        let scale = Vec3::splat(self.options.instance_scale);
        self.derived
            .elements
            .iter()
            .map(|element| Instance {
                transform: Mat4::from_scale_rotation_translation(
                    scale,
                    element.quaternion.as_quat(),
                    element.position.as_vec3(),
                ),
                colour: if self.options.colour_by_director {
                    self.palette.colour(element.colour_index)
                } else {
                    self.options.user_colour
                },
            })
            .collect()
    }

    /// Meshes for the active level of detail and up to three coarser ones,
    /// paired with the camera distance at which each takes over.
    pub fn lod_chain(&self) -> Result<Vec<LodLevel>> {
        let active = self.level_of_detail();
        (0..=LOD_CHAIN_DEPTH)
            .map(|step| {
                let level_of_detail = active.saturating_sub(step);
                let distance = self
                    .options
                    .lod_distances
                    .get(step)
                    .or_else(|| self.options.lod_distances.last())
                    .copied()
                    .unwrap_or(0.0);
                let mesh = if step == 0 {
                    self.derived.mesh.clone()
                } else {
                    self.shape
                        .with_level_of_detail(level_of_detail)
                        .build_mesh(&self.complexity)?
                };
                Ok(LodLevel {
                    distance,
                    level_of_detail,
                    mesh,
                })
            })
            .collect()
    }

    fn rebuild(
        &mut self,
        positions: Option<Vec<DVec3>>,
        shape: Option<ShapeSpec>,
        palette: Option<ColourPalette>,
    ) -> Result<()> {
        let derived = derive(
            positions.as_deref().unwrap_or(&self.positions),
            &self.orientations,
            self.orientation_type,
            shape.as_ref().unwrap_or(&self.shape),
            palette.as_ref().unwrap_or(&self.palette),
            &self.complexity,
        )?;

        if let Some(positions) = positions {
            self.positions = positions;
        }
        if let Some(shape) = shape {
            self.shape = shape;
        }
        if let Some(palette) = palette {
            self.palette = palette;
        }
        self.derived = derived;
        log::info!(
            "rebuilt particle set '{}': {} at lod {}, {} triangles",
            self.name,
            self.shape.kind(),
            self.shape.level_of_detail(),
            self.derived.mesh.num_triangles()
        );
        Ok(())
    }
}

/// The axis used for colouring. Unit-vector input has x and y exchanged
/// before it is compared with the director.
fn colouring_axis(orientation_type: OrientationType, axis: DVec3) -> DVec3 {
    match orientation_type {
        OrientationType::UnitVector => DVec3::new(axis.y, axis.x, axis.z),
        _ => axis,
    }
}

fn derive(
    positions: &[DVec3],
    orientations: &[Orientation],
    orientation_type: OrientationType,
    shape: &ShapeSpec,
    palette: &ColourPalette,
    complexity: &ComplexityTable,
) -> Result<Derived> {
    let mesh = shape.build_mesh(complexity)?;

    let axes: Vec<DVec3> = orientations.iter().map(|o| o.axis).collect();
    let (director, order_parameter) = match OrderTensor::from_orientations(&axes) {
        Ok(tensor) => (tensor.director(), tensor.scalar_order_parameter()),
        Err(MesoscopeError::EmptySet) => {
            log::warn!("empty particle set, using the default director");
            (DEFAULT_DIRECTOR, 0.0)
        }
        Err(err) => return Err(err),
    };

    let elements = positions
        .iter()
        .zip(orientations)
        .map(|(&position, o)| Element {
            position,
            quaternion: o.quaternion,
            orientation: o.axis,
            colour_index: colour_index(
                colouring_axis(orientation_type, o.axis),
                director,
                palette.len(),
            ),
        })
        .collect();

    Ok(Derived {
        elements,
        mesh,
        director,
        order_parameter,
    })
}

#[cfg(test)]
mod tests {
    use mesoscope_shapes::ShapeKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn unit_box() -> UnitBox {
        UnitBox::new([2.0, 2.0, 2.0]).unwrap()
    }

    fn aligned_set(count: usize) -> ParticleSet {
        let positions = (0..count)
            .map(|i| DVec3::new(0.1 * i as f64 - 0.5, 0.0, 0.2))
            .collect();
        let records = vec![vec![0.0, 0.0, 1.0]; count];
        ParticleSet::new(
            "aligned",
            positions,
            &records,
            OrientationType::UnitVector,
            unit_box(),
            &ShapeSpec::with_defaults(ShapeKind::Ellipsoid, 0),
            &Options::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_builds_everything() {
        let set = aligned_set(4);
        assert_eq!(set.len(), 4);
        assert_eq!(set.elements().len(), 4);
        assert_eq!(set.level_of_detail(), Options::default().level_of_detail);
        assert!(!set.mesh().is_empty());
        assert!((set.director().z.abs() - 1.0).abs() < 1e-9);
        assert!((set.scalar_order_parameter() - 1.0).abs() < 1e-9);
        assert!(set.elements().iter().all(|e| e.colour_index == 0));
    }

    #[test]
    fn test_mismatched_lengths() {
        let err = ParticleSet::new(
            "bad",
            vec![DVec3::ZERO; 2],
            &[vec![0.0, 0.0, 1.0]],
            OrientationType::UnitVector,
            unit_box(),
            &ShapeSpec::with_defaults(ShapeKind::Sphere, 0),
            &Options::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MesoscopeError::ShapeMismatch {
                positions: 2,
                orientations: 1
            }
        ));
    }

    #[test]
    fn test_unknown_palette() {
        let options = Options {
            palette: "nope".to_string(),
            ..Options::default()
        };
        let result = ParticleSet::new(
            "bad",
            vec![DVec3::ZERO],
            &[vec![0.0, 0.0, 1.0]],
            OrientationType::UnitVector,
            unit_box(),
            &ShapeSpec::with_defaults(ShapeKind::Sphere, 0),
            &options,
        );
        assert!(matches!(result, Err(MesoscopeError::PaletteNotFound(_))));
    }

    #[test]
    fn test_empty_set_uses_default_director() {
        let set = ParticleSet::new(
            "empty",
            Vec::new(),
            &[],
            OrientationType::Quaternion,
            unit_box(),
            &ShapeSpec::with_defaults(ShapeKind::Sphere, 0),
            &Options::default(),
        )
        .unwrap();
        assert!(set.is_empty());
        assert_eq!(set.director(), DEFAULT_DIRECTOR);
        assert!(set.instances().is_empty());
    }

    #[test]
    fn test_failed_rebuild_keeps_state() {
        let mut set = aligned_set(3);
        let before = set.mesh().clone();
        let err = set.set_level_of_detail(99).unwrap_err();
        assert!(matches!(err, MesoscopeError::InvalidLevelOfDetail { lod: 99, .. }));
        assert_eq!(set.level_of_detail(), 2);
        assert_eq!(set.mesh(), &before);
    }

    #[test]
    fn test_set_shape_rebuilds_mesh() {
        let mut set = aligned_set(3);
        let triangles = set.mesh().num_triangles();
        set.set_shape(&ShapeSpec::with_defaults(ShapeKind::Spherocylinder, 0))
            .unwrap();
        assert_eq!(set.shape().kind(), ShapeKind::Spherocylinder);
        assert_eq!(set.level_of_detail(), 2);
        assert_ne!(set.mesh().num_triangles(), triangles);
    }

    #[test]
    fn test_fold_and_unfold_are_noops_in_their_state() {
        let mut set = aligned_set(3);
        assert!(set.is_folded());
        let positions = set.positions().to_vec();
        set.fold().unwrap();
        assert_eq!(set.positions(), positions.as_slice());

        let mut rng = StdRng::seed_from_u64(3);
        set.unfold_with_rng(&mut rng).unwrap();
        if !set.is_folded() {
            let unfolded = set.positions().to_vec();
            set.unfold_with_rng(&mut rng).unwrap();
            assert_eq!(set.positions(), unfolded.as_slice());
        }
        set.fold().unwrap();
        for (a, b) in set.positions().iter().zip(&positions) {
            assert!((*a - *b).length() < 1e-9);
        }
    }

    #[test]
    fn test_instances_follow_options() {
        let mut set = aligned_set(2);
        let instances = set.instances();
        assert_eq!(instances.len(), 2);
        let origin = instances[0].transform.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(-0.5, 0.0, 0.2)).length() < 1e-6);
        let tip = instances[0].transform.transform_point3(Vec3::Z);
        assert!((tip - origin - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-6);
        assert_eq!(instances[0].colour, set.palette().colour(0));

        set.set_colour_by_director(false);
        set.set_user_colour(Vec3::new(1.0, 0.0, 0.0));
        assert!(set.instances().iter().all(|i| i.colour == Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_perpendicular_unit_vector_gets_last_colour() {
        let set = ParticleSet::new(
            "mixed",
            vec![DVec3::ZERO; 3],
            &[vec![0.0, 0.0, 1.0], vec![0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0]],
            OrientationType::UnitVector,
            unit_box(),
            &ShapeSpec::with_defaults(ShapeKind::Sphere, 0),
            &Options::default(),
        )
        .unwrap();
        let last = set.palette().len() - 1;
        assert_eq!(set.elements()[2].colour_index, last);
    }

    fn four_rods(orientation_type: OrientationType, records: &[Vec<f64>]) -> ParticleSet {
        ParticleSet::new(
            "rods",
            vec![DVec3::ZERO; records.len()],
            records,
            orientation_type,
            unit_box(),
            &ShapeSpec::with_defaults(ShapeKind::Sphere, 0),
            &Options::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_unit_vector_colouring_swaps_x_and_y() {
        let along_x = vec![1.0, 0.0, 0.0];
        let set = four_rods(
            OrientationType::UnitVector,
            &[along_x.clone(), along_x.clone(), along_x, vec![0.0, 1.0, 0.0]],
        );
        let last = set.palette().len() - 1;
        assert!((set.director().x.abs() - 1.0).abs() < 1e-9);
        // The swapped y axis lines up with the x director, and vice versa.
        assert_eq!(set.elements()[3].colour_index, 0);
        assert!(set.elements()[..3].iter().all(|e| e.colour_index == last));
    }

    #[test]
    fn test_quaternion_colouring_is_not_swapped() {
        let half = 0.5f64.sqrt();
        // Quarter turns taking +z to +x and to +y.
        let to_x = vec![half, 0.0, half, 0.0];
        let to_y = vec![half, -half, 0.0, 0.0];
        let set = four_rods(
            OrientationType::Quaternion,
            &[to_x.clone(), to_x.clone(), to_x, to_y],
        );
        let last = set.palette().len() - 1;
        assert!((set.elements()[3].orientation - DVec3::Y).length() < 1e-9);
        assert!((set.director().x.abs() - 1.0).abs() < 1e-9);
        assert_eq!(set.elements()[3].colour_index, last);
        assert!(set.elements()[..3].iter().all(|e| e.colour_index == 0));
    }

    #[test]
    fn test_lod_chain_is_clamped() {
        let mut set = aligned_set(1);
        set.set_level_of_detail(1).unwrap();
        let chain = set.lod_chain().unwrap();
        let levels: Vec<_> = chain.iter().map(|level| level.level_of_detail).collect();
        assert_eq!(levels, vec![1, 0, 0, 0]);
        let distances: Vec<_> = chain.iter().map(|level| level.distance).collect();
        assert_eq!(distances, vec![0.0, 0.05, 0.1, 0.2]);
        assert!(chain[0].mesh.num_triangles() > chain[1].mesh.num_triangles());
    }

    #[test]
    fn test_set_palette_recolours() {
        let mut set = ParticleSet::new(
            "two",
            vec![DVec3::ZERO; 3],
            &[vec![0.0, 0.0, 1.0], vec![0.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]],
            OrientationType::UnitVector,
            unit_box(),
            &ShapeSpec::with_defaults(ShapeKind::Sphere, 0),
            &Options::default(),
        )
        .unwrap();
        set.set_palette(ColourPalette::new("duo", vec![Vec3::ZERO, Vec3::ONE]))
            .unwrap();
        assert_eq!(set.options().palette, "duo");
        assert_eq!(set.elements()[2].colour_index, 1);
        assert_eq!(set.instances()[2].colour, Vec3::ONE);
    }
}
