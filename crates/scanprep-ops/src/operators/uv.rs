use serde::Serialize;
use tracing::{info, warn};

use scanprep_core::{InteractionMode, Scene};

use crate::config::UvSettings;
use crate::engine::GeometryEngine;
use crate::error::{OpError, OpResult};

use super::{require_active, require_mesh};

/// What [`uv_project`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UvOutcome {
    Unwrapped { vertex_count: usize },
    /// Mesh too dense to unwrap safely; nothing was changed.
    Skipped { vertex_count: usize, limit: usize },
}

/// UV-unwrap the active object.
///
/// Meshes with `settings.max_vertices` or more vertices are skipped. Otherwise all
/// vertices are selected and unwrapped in edit mode, and the scene is put
/// back into object mode even when the engine fails.
pub fn uv_project<E: GeometryEngine>(
    scene: &mut Scene,
    engine: &mut E,
    settings: &UvSettings,
) -> OpResult<UvOutcome> {
    let id = require_active(scene)?;
    let vertex_count = require_mesh(scene, id)?.vertex_count();

    if vertex_count >= settings.max_vertices {
        warn!(
            vertex_count,
            limit = settings.max_vertices,
            "UV unwrap skipped because of high vertex count"
        );
        return Ok(UvOutcome::Skipped {
            vertex_count,
            limit: settings.max_vertices,
        });
    }

    scene.set_mode(InteractionMode::Edit);
    let result = scene
        .get_mut(id)
        .and_then(|object| object.mesh.as_mut())
        .ok_or(OpError::NoActiveObject)
        .and_then(|mesh| {
            mesh.select_all(true);
            engine.smart_uv_project(mesh).map_err(OpError::from)
        });
    scene.set_mode(InteractionMode::Object);
    result?;

    info!(vertex_count, "Finished UV unwrap");
    Ok(UvOutcome::Unwrapped { vertex_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CpuEngine;
    use crate::engine::{BakeRequest, BooleanSolver, EngineError, EngineResult};
    use scanprep_core::math::Mat4;
    use scanprep_core::{Image, Mesh, SceneObject};

    /// Engine whose unwrap always fails
    struct BrokenUnwrap;

    impl GeometryEngine for BrokenUnwrap {
        fn boolean_intersect(
            &mut self,
            target: &Mesh,
            target_to_world: Mat4,
            cutter: &Mesh,
            cutter_to_world: Mat4,
            solver: BooleanSolver,
        ) -> EngineResult<Mesh> {
            CpuEngine::new().boolean_intersect(target, target_to_world, cutter, cutter_to_world, solver)
        }

        fn decimate_collapse(&mut self, mesh: &Mesh, ratio: f32) -> EngineResult<Mesh> {
            CpuEngine::new().decimate_collapse(mesh, ratio)
        }

        fn decimate_planar(&mut self, mesh: &Mesh, angle_limit: f32) -> EngineResult<Mesh> {
            CpuEngine::new().decimate_planar(mesh, angle_limit)
        }

        fn smart_uv_project(&mut self, _mesh: &mut Mesh) -> EngineResult<()> {
            Err(EngineError::Failed {
                operation: "smart_uv_project",
                reason: "island packing failed".to_string(),
            })
        }

        fn bake_diffuse(
            &mut self,
            source: &Mesh,
            source_to_world: Mat4,
            target: &Mesh,
            target_to_world: Mat4,
            target_image: &mut Image,
            request: &BakeRequest,
        ) -> EngineResult<()> {
            CpuEngine::new().bake_diffuse(
                source,
                source_to_world,
                target,
                target_to_world,
                target_image,
                request,
            )
        }
    }

    fn scene_with_cube() -> (Scene, scanprep_core::ObjectId) {
        let mut scene = Scene::new();
        let id = scene.spawn(SceneObject::with_mesh("LowPoly", Mesh::cube(2.0)));
        scene.set_active(id);
        (scene, id)
    }

    #[test]
    fn test_unwraps_small_mesh() {
        let (mut scene, id) = scene_with_cube();
        let outcome = uv_project(&mut scene, &mut CpuEngine::new(), &UvSettings::default()).unwrap();

        assert_eq!(outcome, UvOutcome::Unwrapped { vertex_count: 24 });
        let mesh = scene.get(id).unwrap().mesh.as_ref().unwrap();
        assert!(mesh.has_uvs());
        assert_eq!(mesh.selected_count(), 24);
        assert_eq!(scene.mode(), InteractionMode::Object);
    }

    #[test]
    fn test_engine_failure_restores_object_mode() {
        let (mut scene, id) = scene_with_cube();

        let result = uv_project(&mut scene, &mut BrokenUnwrap, &UvSettings::default());

        assert!(matches!(
            result,
            Err(OpError::Engine(EngineError::Failed { operation: "smart_uv_project", .. }))
        ));
        assert_eq!(scene.mode(), InteractionMode::Object);
        assert!(!scene.get(id).unwrap().mesh.as_ref().unwrap().has_uvs());
    }

    #[test]
    fn test_limit_is_exclusive() {
        let (mut scene, id) = scene_with_cube();
        let settings = UvSettings { max_vertices: 24 };

        let outcome = uv_project(&mut scene, &mut CpuEngine::new(), &settings).unwrap();
        assert_eq!(
            outcome,
            UvOutcome::Skipped {
                vertex_count: 24,
                limit: 24
            }
        );
        let mesh = scene.get(id).unwrap().mesh.as_ref().unwrap();
        assert!(!mesh.has_uvs());
        assert_eq!(mesh.selected_count(), 0);
    }

    #[test]
    fn test_just_below_limit_unwraps() {
        let (mut scene, _) = scene_with_cube();
        let settings = UvSettings { max_vertices: 25 };
        let outcome = uv_project(&mut scene, &mut CpuEngine::new(), &settings).unwrap();
        assert!(matches!(outcome, UvOutcome::Unwrapped { .. }));
    }
}
