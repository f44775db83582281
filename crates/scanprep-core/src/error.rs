//! Error types for mesh data and the orientation solver.

use thiserror::Error;

/// Errors returned by the orientation solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrientError {
    /// No vertex is selected, so there is nothing to average.
    #[error("no vertices are selected")]
    EmptySelection,

    /// The selected normals cancel out (or contain NaN/inf).
    #[error("selected normals cancel out (accumulated magnitude {magnitude})")]
    DegenerateNormal { magnitude: f32 },

    /// The linear part of the world matrix cannot be inverted.
    #[error("world transform is singular (determinant {determinant})")]
    SingularTransform { determinant: f32 },
}

/// Result type for the orientation solver.
pub type OrientResult<T> = std::result::Result<T, OrientError>;

/// Errors raised while building or loading meshes.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Raw vertex buffer has the wrong size or alignment.
    #[error("vertex buffer does not match the vertex layout: {0}")]
    VertexLayout(bytemuck::PodCastError),

    /// A triangle references a vertex that does not exist.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// Index count is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    /// Flat attribute arrays have mismatched lengths.
    #[error("attribute length mismatch: {details}")]
    AttributeLength { details: String },

    /// JSON snapshot could not be parsed.
    #[error("failed to parse mesh snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for mesh construction.
pub type MeshResult<T> = std::result::Result<T, MeshError>;
