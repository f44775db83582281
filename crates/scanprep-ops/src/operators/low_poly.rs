use tracing::{debug, info};

use scanprep_core::{ObjectId, Scene};

use crate::config::LowPolyParams;
use crate::engine::GeometryEngine;
use crate::error::{OpError, OpResult};

use super::{require_active, require_mesh};

/// Suffix appended to the name of the decimated copy
pub const LOW_POLY_SUFFIX: &str = "_LowPoly";

/// Create a decimated copy of the active object.
///
/// The copy is named `<name>_LowPoly` and becomes the sole selected, active
/// object. Decimation runs an edge-collapse pass followed by a planar
/// dissolve pass.
pub fn create_low_poly<E: GeometryEngine>(
    scene: &mut Scene,
    engine: &mut E,
    params: &LowPolyParams,
) -> OpResult<ObjectId> {
    params.validate()?;

    let source_id = require_active(scene)?;
    let source = require_mesh(scene, source_id)?;
    let original = source.triangle_count();

    // Engine work first; a failure leaves the scene untouched
    let collapsed = engine.decimate_collapse(source, params.collapse_ratio)?;
    debug!(
        ratio = params.collapse_ratio,
        triangles = collapsed.triangle_count(),
        "Applied collapse decimation"
    );

    let planar = engine.decimate_planar(&collapsed, params.planar_angle_radians())?;
    debug!(
        degrees = params.planar_angle_degrees,
        triangles = planar.triangle_count(),
        "Applied planar decimation"
    );
    let final_triangles = planar.triangle_count();

    let Some(copy_id) = scene.duplicate(source_id) else {
        return Err(OpError::NoActiveObject);
    };
    if let Some(copy) = scene.get_mut(copy_id) {
        copy.name = copy.name.with_suffix(LOW_POLY_SUFFIX);
        copy.mesh = Some(planar);
    }
    scene.make_sole_selection(copy_id);

    info!(
        source = %source_id,
        copy = %copy_id,
        original,
        final_triangles,
        "Created low poly copy"
    );
    Ok(copy_id)
}
