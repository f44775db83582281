use tracing::info;

use scanprep_core::{DisplayType, Mesh, ObjectId, Scene, SceneObject};

use crate::config::CutSettings;
use crate::engine::GeometryEngine;
use crate::error::OpResult;

use super::{require_active_pair, require_mesh, require_world_matrix};

/// Spawn the bounds cube used by [`cut_object`].
///
/// The cube is drawn as bounds only and becomes the sole selected, active
/// object so it can be moved and scaled into place.
pub fn add_cut_bounds(scene: &mut Scene, settings: &CutSettings) -> ObjectId {
    let mut cube = SceneObject::with_mesh("Cube", Mesh::cube(settings.bounds_size));
    cube.display = DisplayType::Bounds;

    let id = scene.spawn(cube);
    scene.make_sole_selection(id);

    info!(%id, size = settings.bounds_size, "Added cut bounds");
    id
}

/// Crop the active object to the other selected object.
///
/// Exactly two objects must be selected. The active one is cut, the other
/// acts as the cutter and is deleted afterwards.
pub fn cut_object<E: GeometryEngine>(
    scene: &mut Scene,
    engine: &mut E,
    settings: &CutSettings,
) -> OpResult<ObjectId> {
    let (target_id, cutter_id) = require_active_pair(scene)?;

    let target = require_mesh(scene, target_id)?;
    let cutter = require_mesh(scene, cutter_id)?;
    let target_to_world = require_world_matrix(scene, target_id)?;
    let cutter_to_world = require_world_matrix(scene, cutter_id)?;

    let before = target.triangle_count();
    let result = engine.boolean_intersect(
        target,
        target_to_world,
        cutter,
        cutter_to_world,
        settings.solver,
    )?;
    let after = result.triangle_count();

    if let Some(object) = scene.get_mut(target_id) {
        object.mesh = Some(result);
    }
    scene.despawn(cutter_id);
    scene.make_sole_selection(target_id);

    info!(target = %target_id, before, after, "Cut object to bounds");
    Ok(target_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CpuEngine;
    use crate::error::OpError;
    use scanprep_core::math::Vec3;

    #[test]
    fn test_add_cut_bounds() {
        let mut scene = Scene::new();
        let scan = scene.spawn(SceneObject::with_mesh("Scan", Mesh::cube(1.0)));
        scene.set_active(scan);

        let cube = add_cut_bounds(&mut scene, &CutSettings::default());

        let object = scene.get(cube).unwrap();
        assert_eq!(object.name.as_str(), "Cube");
        assert_eq!(object.display, DisplayType::Bounds);
        assert_eq!(object.vertex_count(), 24);
        assert_eq!(scene.selected(), &[cube]);
        assert_eq!(scene.active(), Some(cube));
    }

    #[test]
    fn test_cut_requires_two_objects() {
        let mut scene = Scene::new();
        let scan = scene.spawn(SceneObject::with_mesh("Scan", Mesh::cube(1.0)));
        scene.set_active(scan);

        let result = cut_object(&mut scene, &mut CpuEngine::new(), &CutSettings::default());
        assert!(matches!(
            result,
            Err(OpError::SelectionCount { expected: 2, found: 1 })
        ));
        assert_eq!(scene.object_count(), 1);
    }

    #[test]
    fn test_cut_crops_and_removes_bounds() {
        let mut scene = Scene::new();
        let scan = scene.spawn(SceneObject::with_mesh("Scan", Mesh::cube(4.0)));

        let settings = CutSettings::default();
        let bounds = add_cut_bounds(&mut scene, &settings);
        scene.get_mut(bounds).unwrap().transform.position = Vec3::new(0.0, 0.0, 1.5);

        // Bounds first, object second
        scene.set_active(scan);
        let id = cut_object(&mut scene, &mut CpuEngine::new(), &settings).unwrap();

        assert_eq!(id, scan);
        assert!(!scene.contains(bounds));
        assert_eq!(scene.selected(), &[scan]);
        assert_eq!(scene.active(), Some(scan));

        let mesh = scene.get(scan).unwrap().mesh.as_ref().unwrap();
        assert!(mesh.triangle_count() > 0);
        for v in &mesh.vertices {
            assert!(v.position[0].abs() <= 1.0 + 1e-5);
            assert!(v.position[1].abs() <= 1.0 + 1e-5);
            assert!(v.position[2] >= 0.5 - 1e-5 && v.position[2] <= 2.0 + 1e-5);
        }
    }
}
