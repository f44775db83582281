//! Boundary to the geometry engine that performs the heavy mesh work.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use scanprep_core::math::Mat4;
use scanprep_core::{Image, Mesh};

/// Errors reported by a [`GeometryEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine does not implement this operation.
    #[error("{operation} is not supported by this engine")]
    Unsupported { operation: &'static str },

    /// The engine attempted the operation and failed.
    #[error("{operation} failed: {reason}")]
    Failed {
        operation: &'static str,
        reason: String,
    },
}

/// Result type for engine calls.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Boolean solver quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BooleanSolver {
    /// Fast solver, adequate for box crops.
    #[default]
    Fast,
    /// Exact solver, slower but robust on coplanar geometry.
    Exact,
}

/// Which lighting contributions a diffuse bake captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BakePass {
    /// Surface color only, no lighting.
    #[default]
    Color,
    Direct,
    Indirect,
}

/// Parameters handed to [`GeometryEngine::bake_diffuse`].
#[derive(Debug, Clone, PartialEq)]
pub struct BakeRequest {
    pub pass: BakePass,
    /// Project from the source mesh onto the target mesh.
    pub selected_to_active: bool,
    /// Distance the cage is inflated along target normals.
    pub cage_extrusion: f32,
}

/// Geometry operations a host engine provides.
///
/// Meshes are passed in their local space together with their
/// local-to-world matrices.
pub trait GeometryEngine {
    /// Keep only the part of `target` inside `cutter`. The result is in
    /// `target`'s local space.
    fn boolean_intersect(
        &mut self,
        target: &Mesh,
        target_to_world: Mat4,
        cutter: &Mesh,
        cutter_to_world: Mat4,
        solver: BooleanSolver,
    ) -> EngineResult<Mesh>;

    /// Edge-collapse decimation keeping roughly `ratio` of the faces.
    fn decimate_collapse(&mut self, mesh: &Mesh, ratio: f32) -> EngineResult<Mesh>;

    /// Dissolve faces whose neighbours differ by less than `angle_limit` radians.
    fn decimate_planar(&mut self, mesh: &Mesh, angle_limit: f32) -> EngineResult<Mesh>;

    /// Unwrap UVs of the selected part of `mesh` in place.
    fn smart_uv_project(&mut self, mesh: &mut Mesh) -> EngineResult<()>;

    /// Bake the diffuse channel of `source` into `target_image` using the UVs of `target`.
    fn bake_diffuse(
        &mut self,
        source: &Mesh,
        source_to_world: Mat4,
        target: &Mesh,
        target_to_world: Mat4,
        target_image: &mut Image,
        request: &BakeRequest,
    ) -> EngineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::Unsupported {
            operation: "bake_diffuse",
        };
        assert_eq!(format!("{err}"), "bake_diffuse is not supported by this engine");

        let err = EngineError::Failed {
            operation: "boolean_intersect",
            reason: "cutter is not convex".to_string(),
        };
        assert!(format!("{err}").contains("not convex"));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(BooleanSolver::default(), BooleanSolver::Fast);
        assert_eq!(BakePass::default(), BakePass::Color);
    }
}
