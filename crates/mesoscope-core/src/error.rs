//! Error types for mesoscope-rs.

use thiserror::Error;

/// The main error type for mesoscope-rs operations.
///
/// Every variant is fatal to the operation that produced it: the caller keeps
/// whatever state it had before the call.
#[derive(Error, Debug)]
pub enum MesoscopeError {
    /// The director of an empty ensemble was requested.
    #[error("no elements in set, director calculation failed")]
    EmptySet,

    /// Position and orientation lists have different lengths.
    #[error(
        "position data does not correspond to orientation data: {positions} positions, {orientations} orientations"
    )]
    ShapeMismatch {
        positions: usize,
        orientations: usize,
    },

    /// Wrong number of shape parameters.
    #[error("wrong number of parameters for {shape}: expected {expected:?}, got {actual}")]
    ParameterArity {
        shape: String,
        expected: &'static [&'static str],
        actual: usize,
    },

    /// A shape parameter is out of its valid range.
    #[error("invalid parameter {name} = {value} for {shape}: {reason}")]
    InvalidParameter {
        shape: String,
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The shape identifier is not recognised.
    #[error("unknown shape identifier '{0}'")]
    UnknownShape(String),

    /// The orientation encoding is not one of `v`, `q`, `a` or `e`.
    #[error("unexpected orientation type '{0}', expected v | q | a | e")]
    UnknownOrientationType(String),

    /// An orientation record has the wrong number of components.
    #[error("orientation {index} has {actual} components, expected {expected}")]
    OrientationArity {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// An orientation record has zero length or non-finite components.
    #[error("orientation {index} is degenerate")]
    DegenerateOrientation { index: usize },

    /// The level of detail is outside the complexity table.
    #[error("level of detail {lod} out of range 0..{len}")]
    InvalidLevelOfDetail { lod: usize, len: usize },

    /// A particle set with the given name already exists.
    #[error("particle set '{0}' already exists")]
    SetExists(String),

    /// A particle set with the given name was not found.
    #[error("particle set '{0}' not found")]
    SetNotFound(String),

    /// A palette with the given name was not found.
    #[error("palette '{0}' not found")]
    PaletteNotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for mesoscope-rs operations.
pub type Result<T> = std::result::Result<T, MesoscopeError>;
