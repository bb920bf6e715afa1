//! Error types used by the crate.

use thiserror::Error;

use crate::draw::{DrawMode, ShapeId};

/// Vespucci error type.
#[derive(Debug, Error, PartialEq)]
pub enum VespucciError {
    /// Too few points for the requested shape kind.
    #[error("a {kind:?} shape requires at least {required} points, got {got}")]
    InsufficientPoints {
        /// Kind of shape that was being constructed.
        kind: DrawMode,
        /// Minimum number of points for this kind.
        required: usize,
        /// Number of points actually supplied.
        got: usize,
    },
    /// No shape with the given id exists in the store.
    #[error("shape {0} not found")]
    ShapeNotFound(ShapeId),
}
