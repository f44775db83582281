//! Workflow operators.
//!
//! Operators validate everything they need before touching the scene, so a
//! failed call leaves the scene unchanged (engine calls aside).

mod bake;
mod center;
mod cut;
mod low_poly;
mod orient;
mod uv;

pub use bake::bake_diffuse;
pub use center::{center_origin, CenterMode};
pub use cut::{add_cut_bounds, cut_object};
pub use low_poly::create_low_poly;
pub use orient::orient_by_normals;
pub use uv::{uv_project, UvOutcome};

use scanprep_core::math::Mat4;
use scanprep_core::{Mesh, ObjectId, Scene};

use crate::error::{OpError, OpResult};

/// Active object, or [`OpError::NoActiveObject`].
fn require_active(scene: &Scene) -> OpResult<ObjectId> {
    scene.active().ok_or(OpError::NoActiveObject)
}

/// Active object plus the one other selected object.
fn require_active_pair(scene: &Scene) -> OpResult<(ObjectId, ObjectId)> {
    let selected = scene.selected();
    if selected.len() != 2 {
        return Err(OpError::SelectionCount {
            expected: 2,
            found: selected.len(),
        });
    }

    let active = require_active(scene)?;
    let other = if selected[0] == active {
        selected[1]
    } else if selected[1] == active {
        selected[0]
    } else {
        // Active object is not part of the selection
        return Err(OpError::NoActiveObject);
    };

    Ok((active, other))
}

/// Local-to-world matrix of an object, or [`OpError::NoActiveObject`].
fn require_world_matrix(scene: &Scene, id: ObjectId) -> OpResult<Mat4> {
    scene
        .get(id)
        .map(|object| object.transform.to_matrix())
        .ok_or(OpError::NoActiveObject)
}

/// Mesh of an object, or [`OpError::MissingMesh`].
fn require_mesh(scene: &Scene, id: ObjectId) -> OpResult<&Mesh> {
    let object = scene.get(id).ok_or(OpError::NoActiveObject)?;
    object.mesh.as_ref().ok_or_else(|| OpError::MissingMesh {
        object: object.name.to_string(),
    })
}
