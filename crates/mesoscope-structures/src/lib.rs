//! Particle sets for mesoscope-rs.
//!
//! A [`ParticleSet`] is an ensemble of identical particles: positions,
//! orientations, a periodic [`UnitBox`] and one [`ShapeSpec`](mesoscope_shapes::ShapeSpec).
//! The set owns everything derived from those inputs (per-element
//! quaternions, the canonical mesh, the director and colour indices) and
//! rebuilds it wholesale whenever an input changes.

// Numeric code mixes f32 rendering data with f64 analysis
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod order_tensor;
pub mod orientation;
pub mod particle_set;
pub mod periodic;

pub use order_tensor::{colour_index, compute_director, OrderTensor};
pub use orientation::{Orientation, OrientationType};
pub use particle_set::{Element, Instance, InstanceRaw, LodLevel, ParticleSet};
pub use periodic::UnitBox;
