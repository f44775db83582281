use tracing::info;

use scanprep_core::math::Quat;
use scanprep_core::{compute_alignment_rotation, InteractionMode, Scene};

use crate::error::{OpError, OpResult};

use super::{require_active, require_mesh, require_world_matrix};

/// Rotate the active object so the average normal of its selected vertices
/// points along +Z.
///
/// Vertex selection is read from the mesh, so the scene must be back in
/// object mode. The object's rotation is switched to quaternion form and
/// the alignment is pre-multiplied onto it. Returns the applied rotation.
pub fn orient_by_normals(scene: &mut Scene) -> OpResult<Quat> {
    if scene.mode() != InteractionMode::Object {
        return Err(OpError::WrongMode {
            expected: InteractionMode::Object,
            found: scene.mode(),
        });
    }

    let id = require_active(scene)?;
    let mesh = require_mesh(scene, id)?;
    let world = require_world_matrix(scene, id)?;

    let rotation = compute_alignment_rotation(&mesh.vertices, world)?;

    let object = scene.get_mut(id).ok_or(OpError::NoActiveObject)?;
    object.transform.apply_rotation(rotation);

    let (axis, angle) = rotation.to_axis_angle();
    info!(
        object = %object.name,
        axis = ?axis,
        degrees = angle.to_degrees(),
        "Oriented object by selected normals"
    );
    Ok(rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanprep_core::math::Vec3;
    use scanprep_core::{EulerOrder, Mesh, OrientError, Rotation, SceneObject};

    fn scan_with_selection(normal: [f32; 3]) -> SceneObject {
        let mut mesh = Mesh::cube(2.0);
        for v in &mut mesh.vertices {
            v.set_selected(v.normal == normal);
        }
        SceneObject::with_mesh("Scan", mesh)
    }

    #[test]
    fn test_orient_rotates_selection_up() {
        let mut scene = Scene::new();
        let mut object = scan_with_selection([1.0, 0.0, 0.0]);
        object.transform.rotation = Rotation::Euler {
            order: EulerOrder::XYZ,
            angles: Vec3::new(0.2, 0.0, 0.4),
        };
        let id = scene.spawn(object);
        scene.set_active(id);

        orient_by_normals(&mut scene).unwrap();

        let transform = &scene.get(id).unwrap().transform;
        assert!(transform.rotation.is_quaternion());
        let world_normal = transform.quat() * Vec3::X;
        assert!(world_normal.dot(Vec3::Z) >= 1.0 - 1e-5);
    }

    #[test]
    fn test_orient_twice_is_stable() {
        let mut scene = Scene::new();
        let id = scene.spawn(scan_with_selection([0.0, -1.0, 0.0]));
        scene.set_active(id);

        orient_by_normals(&mut scene).unwrap();
        let first = scene.get(id).unwrap().transform.quat();

        let second = orient_by_normals(&mut scene).unwrap();
        assert!(second.w.abs() >= 1.0 - 1e-5);
        assert!(scene.get(id).unwrap().transform.quat().abs_diff_eq(first, 1e-4));
    }

    #[test]
    fn test_orient_requires_object_mode() {
        let mut scene = Scene::new();
        let id = scene.spawn(scan_with_selection([0.0, 0.0, 1.0]));
        scene.set_active(id);
        scene.set_mode(InteractionMode::Edit);

        assert!(matches!(
            orient_by_normals(&mut scene),
            Err(OpError::WrongMode { .. })
        ));
    }

    #[test]
    fn test_orient_empty_selection_leaves_transform() {
        let mut scene = Scene::new();
        let mut object = SceneObject::with_mesh("Scan", Mesh::cube(2.0));
        object.transform.rotation = Rotation::Euler {
            order: EulerOrder::XYZ,
            angles: Vec3::new(0.1, 0.2, 0.3),
        };
        let before = object.transform.clone();
        let id = scene.spawn(object);
        scene.set_active(id);

        assert!(matches!(
            orient_by_normals(&mut scene),
            Err(OpError::Orient(OrientError::EmptySelection))
        ));
        assert_eq!(scene.get(id).unwrap().transform, before);
    }

    #[test]
    fn test_orient_without_active() {
        let mut scene = Scene::new();
        assert!(matches!(
            orient_by_normals(&mut scene),
            Err(OpError::NoActiveObject)
        ));
    }
}
