//! Reference engine running on the CPU.
//!
//! Covers the operations that have a small exact implementation: box
//! cropping against a convex cutter and cube-projection unwrapping.
//! Decimation and baking need a host engine.

mod clip;
mod uv;

use tracing::debug;

use scanprep_core::math::Mat4;
use scanprep_core::{Image, Mesh};

use crate::engine::{BakeRequest, BooleanSolver, EngineError, EngineResult, GeometryEngine};

/// CPU geometry engine.
#[derive(Debug, Clone, Default)]
pub struct CpuEngine;

impl CpuEngine {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryEngine for CpuEngine {
    fn boolean_intersect(
        &mut self,
        target: &Mesh,
        target_to_world: Mat4,
        cutter: &Mesh,
        cutter_to_world: Mat4,
        solver: BooleanSolver,
    ) -> EngineResult<Mesh> {
        // Clipping against a convex cutter is exact, so both solvers share it
        let planes = clip::convex_planes(cutter, cutter_to_world)?;
        let result = clip::intersect(target, target_to_world, &planes);

        debug!(
            ?solver,
            planes = planes.len(),
            before = target.triangle_count(),
            after = result.triangle_count(),
            "Clipped mesh against cutter"
        );
        Ok(result)
    }

    fn decimate_collapse(&mut self, _mesh: &Mesh, _ratio: f32) -> EngineResult<Mesh> {
        Err(EngineError::Unsupported {
            operation: "decimate_collapse",
        })
    }

    fn decimate_planar(&mut self, _mesh: &Mesh, _angle_limit: f32) -> EngineResult<Mesh> {
        Err(EngineError::Unsupported {
            operation: "decimate_planar",
        })
    }

    fn smart_uv_project(&mut self, mesh: &mut Mesh) -> EngineResult<()> {
        let unwrapped = uv::cube_project(mesh);
        debug!(triangles = unwrapped, "Cube-projected UVs");
        Ok(())
    }

    fn bake_diffuse(
        &mut self,
        _source: &Mesh,
        _source_to_world: Mat4,
        _target: &Mesh,
        _target_to_world: Mat4,
        _target_image: &mut Image,
        _request: &BakeRequest,
    ) -> EngineResult<()> {
        Err(EngineError::Unsupported {
            operation: "bake_diffuse",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanprep_core::math::Vec3;

    #[test]
    fn test_crop_with_offset_cutter() {
        let mut engine = CpuEngine::new();
        let target = Mesh::cube(2.0);
        let cutter = Mesh::cube(2.0);
        let cutter_to_world = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));

        let result = engine
            .boolean_intersect(&target, Mat4::IDENTITY, &cutter, cutter_to_world, BooleanSolver::Fast)
            .unwrap();

        assert!(result.triangle_count() > 0);
        for v in &result.vertices {
            assert!(v.position[0] >= -1e-5, "{:?} outside cutter", v.position);
        }
    }

    #[test]
    fn test_unsupported_operations() {
        let mut engine = CpuEngine::new();
        let mesh = Mesh::cube(1.0);

        assert_eq!(
            engine.decimate_collapse(&mesh, 0.5),
            Err(EngineError::Unsupported {
                operation: "decimate_collapse"
            })
        );
        assert!(engine.decimate_planar(&mesh, 0.1).is_err());

        let mut image = Image::new("img", 1, 1, false);
        let request = BakeRequest {
            pass: crate::engine::BakePass::Color,
            selected_to_active: true,
            cage_extrusion: 0.1,
        };
        assert!(
            engine
                .bake_diffuse(&mesh, Mat4::IDENTITY, &mesh, Mat4::IDENTITY, &mut image, &request)
                .is_err()
        );
    }

    #[test]
    fn test_smart_uv_project_fills_uvs() {
        let mut engine = CpuEngine::new();
        let mut mesh = Mesh::cube(1.0);
        mesh.select_all(true);
        engine.smart_uv_project(&mut mesh).unwrap();
        assert!(mesh.has_uvs());
    }
}
