//! mesoscope-rs: particle shapes and orientational order for liquid-crystal
//! visualization.
//!
//! A simulation snapshot is a list of particle sets. Each set holds
//! positions and orientations of identical convex particles inside a
//! periodic box. mesoscope turns a set into what a renderer needs: one
//! canonical mesh for the particle shape, a transform and colour per
//! particle, and the nematic director of the ensemble.
//!
//! # Quick Start
//!
//! ```no_run
//! use mesoscope::*;
//!
//! fn main() -> Result<()> {
//!     init();
//!
//!     let mut scene = Scene::new(Options::default());
//!     scene.load_str(
//!         r#"{
//!             "name": "rods",
//!             "orientationType": "v",
//!             "positions": [[0, 0, 0], [1, 0, 0]],
//!             "orientations": [[0, 0, 1], [0.1, 0, 1]],
//!             "unitBox": [4, 4, 4],
//!             "shapeType": "Spherocylinder",
//!             "parameters": [0.5, 0.7]
//!         }"#,
//!     )?;
//!
//!     let rods = scene.get("rods").expect("loaded above");
//!     println!("director {} S = {}", rods.director(), rods.scalar_order_parameter());
//!     println!("{} triangles per particle", rods.mesh().num_triangles());
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - `mesoscope-core`: errors, [`Options`] and colour palettes
//! - `mesoscope-shapes`: the shape catalog and grid triangulation
//! - `mesoscope-structures`: [`ParticleSet`], order tensor and periodic box

pub mod loader;
pub mod scene;

pub use mesoscope_core::{
    error::{MesoscopeError, Result},
    options::Options,
    palette::{ColourPalette, PaletteRegistry},
    DQuat, DVec3, Mat4, Quat, Vec3,
};

pub use mesoscope_shapes::{
    ComplexityTable, Mesh, MeshVertex, NormalGrid, Shape, ShapeGeometry, ShapeKind, ShapeSpec,
    VertexGrid,
};

pub use mesoscope_structures::{
    colour_index, compute_director, Element, Instance, InstanceRaw, LodLevel, OrderTensor,
    Orientation, OrientationType, ParticleSet, UnitBox,
};

pub use loader::{load_model_path, load_model_str, SetRecord};
pub use scene::Scene;

/// Installs the `env_logger` backend for the `log` facade.
///
/// Reads `RUST_LOG` as usual. Calling it more than once is harmless.
pub fn init() {
    if env_logger::try_init().is_ok() {
        log::info!("mesoscope-rs initialized");
    }
}
