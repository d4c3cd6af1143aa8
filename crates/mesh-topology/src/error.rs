//! Error types for mesh operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::MeshKind;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Error reading from a file.
    #[error("failed to read mesh from {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to a file.
    #[error("failed to write mesh to {path}: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing mesh file format.
    #[error("failed to parse mesh from {path}: {details}")]
    ParseError { path: PathBuf, details: String },

    /// Unsupported file format.
    #[error("unsupported mesh format: {extension:?}")]
    UnsupportedFormat { extension: Option<String> },

    /// Empty mesh (no vertices or triangles).
    #[error("mesh is empty: {details}")]
    EmptyMesh { details: String },

    /// Triangle indices or value array inconsistent with the vertex array.
    #[error("invalid mesh topology: {details}")]
    InvalidTopology { details: String },

    /// Operation requires a planar triangle mesh.
    #[error("not implemented for mesh kind {kind}")]
    UnsupportedTopology { kind: MeshKind },

    /// A boundary ring is open, degenerate, or has non-finite area.
    #[error("malformed boundary geometry: {details}")]
    MalformedGeometry { details: String },

    /// Gradient limiting still had active vertices after the iteration cap.
    #[error("gradient limiting did not converge within {iterations} iterations")]
    DidNotConverge { iterations: usize },

    /// The sieve / pinch repair loop did not reach a fixed point.
    #[error("mesh repair did not converge within {iterations} iterations")]
    RepairDidNotConverge { iterations: usize },

    /// A pipeline configuration could not be parsed or serialized.
    #[error("invalid pipeline configuration: {details}")]
    ConfigError { details: String },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
