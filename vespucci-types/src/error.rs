//! Error types used by the crate.

use thiserror::Error;

/// Error type for geodetic conversions.
#[derive(Debug, Error, PartialEq)]
pub enum GeodeticError {
    /// No projection with the given id is registered.
    #[error("unknown projection: {0}")]
    UnknownProjection(String),
    /// The inverse transform cannot determine the source zone from its input.
    #[error("cannot determine projection zone from input coordinates")]
    ZoneUnknown,
    /// The underlying transform could not produce a finite result.
    #[error("coordinate transform failed")]
    TransformFailed,
}
