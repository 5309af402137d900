//! Core types for mesoscope-rs.
//!
//! This crate provides the pieces shared by every other mesoscope crate:
//! - [`MesoscopeError`], the error taxonomy for shape, orientation and set operations
//! - [`Options`], the serde-backed configuration for particle set display
//! - [`ColourPalette`] and [`PaletteRegistry`] for director-based colouring

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod options;
pub mod palette;

pub use error::{MesoscopeError, Result};
pub use options::Options;
pub use palette::{ColourPalette, PaletteRegistry};

// Re-export glam types for convenience
pub use glam::{DQuat, DVec3, Mat4, Quat, Vec3};
