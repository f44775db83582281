use tracing::{debug, info};

use scanprep_core::{Image, Material, MaterialId, Scene};

use crate::config::BakeSettings;
use crate::engine::{BakePass, BakeRequest, GeometryEngine};
use crate::error::{OpError, OpResult};

use super::{require_active_pair, require_mesh, require_world_matrix};

/// Bake the diffuse color of the high-poly object onto the active low-poly
/// object.
///
/// Exactly two objects must be selected; the active one receives the bake.
/// The low-poly object's material slots are replaced by a single new
/// material `<high>_LowPoly_Material` whose base color is the baked image
/// `<high>_LowPoly`. Returns the new material.
pub fn bake_diffuse<E: GeometryEngine>(
    scene: &mut Scene,
    engine: &mut E,
    settings: &BakeSettings,
) -> OpResult<MaterialId> {
    settings.validate()?;

    let (low_id, high_id) = require_active_pair(scene)?;
    let high_name = scene
        .get(high_id)
        .map(|object| object.name.clone())
        .ok_or(OpError::NoActiveObject)?;

    // Both meshes must exist before any scene data is created
    require_mesh(scene, high_id)?;
    require_mesh(scene, low_id)?;

    let mut image = Image::new(
        format!("{high_name}_LowPoly"),
        settings.resolution,
        settings.resolution,
        false,
    );
    let request = BakeRequest {
        pass: BakePass::Color,
        selected_to_active: true,
        cage_extrusion: settings.cage_extrusion,
    };

    info!(
        source = %high_name,
        resolution = settings.resolution,
        "Begin baking"
    );
    {
        let high = require_mesh(scene, high_id)?;
        let low = require_mesh(scene, low_id)?;
        let high_to_world = require_world_matrix(scene, high_id)?;
        let low_to_world = require_world_matrix(scene, low_id)?;

        engine.bake_diffuse(high, high_to_world, low, low_to_world, &mut image, &request)?;
    }
    info!("Bake finished");

    let image_id = scene.add_image(image);
    let mut material = Material::new(format!("{high_name}_LowPoly_Material"));
    material.active_image = Some(image_id);
    material.base_color = Some(image_id);
    let material_id = scene.add_material(material);

    if let Some(low) = scene.get_mut(low_id) {
        let removed = low.materials.len();
        low.materials.clear();
        low.materials.push(material_id);
        debug!(removed, "Replaced material slots on low poly object");
    }

    Ok(material_id)
}
