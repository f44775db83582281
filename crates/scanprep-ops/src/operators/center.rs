use serde::{Deserialize, Serialize};
use tracing::info;

use scanprep_core::math::Vec3;
use scanprep_core::{InteractionMode, Scene};

use crate::error::{OpError, OpResult};

use super::{require_active, require_mesh, require_world_matrix};

/// Which side moves when centering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CenterMode {
    /// Move the mesh so its median sits on the object origin. The object
    /// location is unchanged, so the scan moves in world space.
    #[default]
    GeometryToOrigin,
    /// Move the object origin onto the mesh median. The scan stays where
    /// it is in world space.
    OriginToGeometry,
}

/// Center the active object's mesh on its origin.
///
/// The median is the mean of all vertex positions in local space. Every
/// vertex is shifted by it; with [`CenterMode::OriginToGeometry`] the
/// object position is moved to the median's old world location as well.
/// Returns the local offset that was removed from the vertices. An empty
/// mesh is left alone and yields [`Vec3::ZERO`].
pub fn center_origin(scene: &mut Scene, mode: CenterMode) -> OpResult<Vec3> {
    if scene.mode() != InteractionMode::Object {
        return Err(OpError::WrongMode {
            expected: InteractionMode::Object,
            found: scene.mode(),
        });
    }

    let id = require_active(scene)?;
    let mesh = require_mesh(scene, id)?;
    if mesh.vertices.is_empty() {
        return Ok(Vec3::ZERO);
    }

    let median = mesh.vertices.iter().map(|v| v.position()).sum::<Vec3>()
        / mesh.vertex_count() as f32;
    let median_world = require_world_matrix(scene, id)?.transform_point3(median);

    let object = scene.get_mut(id).ok_or(OpError::NoActiveObject)?;
    if let Some(mesh) = object.mesh.as_mut() {
        for vertex in &mut mesh.vertices {
            vertex.position = (vertex.position() - median).to_array();
        }
    }
    if mode == CenterMode::OriginToGeometry {
        object.transform.position = median_world;
    }

    info!(
        object = %object.name,
        ?mode,
        offset = ?median,
        "Centered mesh on origin"
    );
    Ok(median)
}
