//! Orientation by selected normals
//!
//! Averages the normals of the selected vertices, moves the average into
//! world space and finds the shortest-arc rotation that points it along +Z.
//! The caller pre-multiplies the result onto the object's rotation
//! (see [`Transform::apply_rotation`](crate::Transform::apply_rotation)).

use std::f32::consts::PI;

use tracing::debug;

use crate::error::{OrientError, OrientResult};
use crate::math::{Mat3, Mat4, Quat, Vec3};
use crate::mesh::Vertex;

/// Reference up axis
pub const UP: Vec3 = Vec3::Z;

/// Below this magnitude the summed normals are treated as cancelled out
pub const DEGENERATE_EPSILON: f32 = 1e-8;

/// Below this absolute determinant the world transform cannot carry normals
pub const SINGULAR_EPSILON: f32 = 1e-12;

/// Tolerance on the dot product for the parallel / anti-parallel tie-breaks
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Sum the normals of all selected vertices and normalize the result.
///
/// Normals are taken as stored (local space); no weighting is applied.
pub fn average_selected_normal(vertices: &[Vertex]) -> OrientResult<Vec3> {
    let mut selected = 0usize;
    let mut sum = Vec3::ZERO;

    for vertex in vertices.iter().filter(|v| v.is_selected()) {
        sum += vertex.normal();
        selected += 1;
    }

    if selected == 0 {
        return Err(OrientError::EmptySelection);
    }

    let magnitude = sum.length();
    if !magnitude.is_finite() || magnitude < DEGENERATE_EPSILON {
        return Err(OrientError::DegenerateNormal { magnitude });
    }

    Ok(sum / magnitude)
}

/// Inverse transpose of the linear (3x3) part of `local_to_world`.
///
/// This is the matrix that carries normals into world space, and it stays
/// correct under non-uniform scale.
pub fn normal_matrix(local_to_world: Mat4) -> OrientResult<Mat3> {
    let linear = Mat3::from_mat4(local_to_world);
    let determinant = linear.determinant();

    if !determinant.is_finite() || determinant.abs() < SINGULAR_EPSILON {
        return Err(OrientError::SingularTransform { determinant });
    }

    Ok(linear.inverse().transpose())
}

/// Transform a local-space unit normal into a world-space unit normal.
pub fn world_normal(local_normal: Vec3, local_to_world: Mat4) -> OrientResult<Vec3> {
    let matrix = normal_matrix(local_to_world)?;

    // Renormalize: the normal matrix does not preserve length
    (matrix * local_normal)
        .try_normalize()
        .ok_or_else(|| OrientError::SingularTransform {
            determinant: matrix.determinant(),
        })
}

/// Shortest-arc rotation taking the unit vector `normal` onto [`UP`].
///
/// Already pointing up yields the identity. Pointing straight down has no
/// unique shortest arc, so a half turn about +X is used.
pub fn rotation_onto_up(normal: Vec3) -> Quat {
    let dot = normal.dot(UP);

    if dot >= 1.0 - PARALLEL_EPSILON {
        return Quat::IDENTITY;
    }

    if dot <= -1.0 + PARALLEL_EPSILON {
        return Quat::from_axis_angle(Vec3::X, PI);
    }

    let axis = normal.cross(UP);
    Quat::from_xyzw(axis.x, axis.y, axis.z, 1.0 + dot).normalize()
}

/// Compute the rotation that points the averaged selected normal along +Z.
///
/// # Errors
///
/// - [`OrientError::EmptySelection`] if no vertex is selected
/// - [`OrientError::DegenerateNormal`] if the selected normals cancel out
/// - [`OrientError::SingularTransform`] if `local_to_world` cannot be inverted
pub fn compute_alignment_rotation(vertices: &[Vertex], local_to_world: Mat4) -> OrientResult<Quat> {
    let local = average_selected_normal(vertices)?;
    let world = world_normal(local, local_to_world)?;
    let rotation = rotation_onto_up(world);

    debug!(
        vertices = vertices.len(),
        local = ?local,
        world = ?world,
        rotation = ?rotation,
        "Computed alignment rotation"
    );

    Ok(rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{EulerOrder, Rotation, Transform};
    use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_3};

    fn selected(normal: Vec3) -> Vertex {
        Vertex::selected([0.0; 3], normal.to_array())
    }

    fn unselected(normal: Vec3) -> Vertex {
        Vertex::new([0.0; 3], normal.to_array())
    }

    /// Rotated world-space average must land on +Z
    fn assert_aligned(vertices: &[Vertex], world: Mat4) {
        let rotation = compute_alignment_rotation(vertices, world).unwrap();
        let local = average_selected_normal(vertices).unwrap();
        let n = world_normal(local, world).unwrap();

        let aligned = rotation * n;
        assert!(
            aligned.dot(UP) >= 1.0 - 1e-5,
            "normal {n:?} rotated to {aligned:?}"
        );
        assert!((rotation.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_selection() {
        let vertices = vec![unselected(Vec3::Z); 100];
        assert_eq!(
            compute_alignment_rotation(&vertices, Mat4::IDENTITY),
            Err(OrientError::EmptySelection)
        );
    }

    #[test]
    fn test_empty_mesh() {
        assert_eq!(
            compute_alignment_rotation(&[], Mat4::IDENTITY),
            Err(OrientError::EmptySelection)
        );
    }

    #[test]
    fn test_opposite_normals_are_degenerate() {
        let vertices = [selected(Vec3::Z), selected(Vec3::NEG_Z), unselected(Vec3::X)];
        let result = compute_alignment_rotation(&vertices, Mat4::IDENTITY);
        assert!(matches!(result, Err(OrientError::DegenerateNormal { .. })));
    }

    #[test]
    fn test_nan_normal_is_degenerate() {
        let vertices = [selected(Vec3::new(f32::NAN, 0.0, 1.0))];
        let result = compute_alignment_rotation(&vertices, Mat4::IDENTITY);
        assert!(matches!(result, Err(OrientError::DegenerateNormal { .. })));
    }

    #[test]
    fn test_up_gives_identity() {
        let vertices = [selected(Vec3::Z)];
        let rotation = compute_alignment_rotation(&vertices, Mat4::IDENTITY).unwrap();
        assert_eq!(rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_down_gives_half_turn() {
        let vertices = [selected(Vec3::NEG_Z)];
        let rotation = compute_alignment_rotation(&vertices, Mat4::IDENTITY).unwrap();

        let (_, angle) = rotation.to_axis_angle();
        assert!((angle - PI).abs() < 1e-5);
        assert!((rotation * Vec3::NEG_Z).abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn test_unselected_vertices_ignored() {
        let vertices = [selected(Vec3::X), unselected(Vec3::NEG_X), unselected(Vec3::Y)];
        let rotation = compute_alignment_rotation(&vertices, Mat4::IDENTITY).unwrap();
        assert!((rotation * Vec3::X).abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn test_average_of_several_normals() {
        let vertices = [selected(Vec3::X), selected(Vec3::Y)];
        let average = average_selected_normal(&vertices).unwrap();
        assert!(average.abs_diff_eq(Vec3::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0), 1e-6));
        assert_aligned(&vertices, Mat4::IDENTITY);
    }

    #[test]
    fn test_non_uniform_scale_uses_inverse_transpose() {
        let world = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));

        // Axis-aligned normal is unaffected by the scale
        let n = world_normal(Vec3::X, world).unwrap();
        assert!(n.abs_diff_eq(Vec3::X, 1e-6));

        // Diagonal normal leans away from the stretched axis
        let local = Vec3::new(1.0, 1.0, 0.0).normalize();
        let n = world_normal(local, world).unwrap();
        let expected = Vec3::new(0.5, 1.0, 0.0).normalize();
        let naive = Vec3::new(2.0, 1.0, 0.0).normalize();
        assert!(n.abs_diff_eq(expected, 1e-6));
        assert!(!n.abs_diff_eq(naive, 1e-3));

        assert_aligned(&[selected(Vec3::X)], world);
        assert_aligned(&[selected(local)], world);
    }

    #[test]
    fn test_world_rotation_is_applied() {
        // Object rotated so local +X faces world +Y
        let world = Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let n = world_normal(Vec3::X, world).unwrap();
        assert!(n.abs_diff_eq(Vec3::Y, 1e-6));
        assert_aligned(&[selected(Vec3::X)], world);
    }

    #[test]
    fn test_singular_transform() {
        let world = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        let result = compute_alignment_rotation(&[selected(Vec3::Z)], world);
        assert!(matches!(result, Err(OrientError::SingularTransform { .. })));
    }

    #[test]
    fn test_singular_threshold() {
        // det = 1e-13, just under the threshold
        let flat = Mat4::from_scale(Vec3::new(1e-4, 1e-4, 1e-5));
        assert!(matches!(
            normal_matrix(flat),
            Err(OrientError::SingularTransform { determinant }) if determinant < SINGULAR_EPSILON
        ));

        // det = 1e-11, tiny but invertible
        let small = Mat4::from_scale(Vec3::new(1e-4, 1e-4, 1e-3));
        assert!(normal_matrix(small).is_ok());
        assert_aligned(&[selected(Vec3::new(0.2, 0.3, 0.9))], small);
    }

    #[test]
    fn test_alignment_sweep() {
        let normals = [
            Vec3::new(0.3, -0.2, 0.9),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(0.001, 0.0, -1.0),
            Vec3::new(0.0, -0.002, 1.0),
            Vec3::new(0.5, 0.5, 0.5),
        ];
        let transforms = [
            Mat4::IDENTITY,
            Mat4::from_scale_rotation_translation(
                Vec3::new(3.0, 0.5, 1.5),
                Quat::from_euler(glam::EulerRot::XYZ, 0.4, -1.2, 2.0),
                Vec3::new(10.0, -4.0, 2.0),
            ),
            Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0)),
        ];

        for &world in &transforms {
            for &normal in &normals {
                assert_aligned(&[selected(normal.normalize())], world);
                assert_aligned(&[selected(normal.normalize()), selected(Vec3::Y)], world);
            }
        }
    }

    #[test]
    fn test_rerun_after_apply_is_identity() {
        let vertices = [
            selected(Vec3::new(0.2, 0.9, 0.1).normalize()),
            selected(Vec3::new(-0.1, 0.8, 0.3).normalize()),
            unselected(Vec3::Z),
        ];
        let mut transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Rotation::Euler {
                order: EulerOrder::XYZ,
                angles: Vec3::new(0.3, FRAC_PI_3, -0.7),
            },
            scale: Vec3::new(1.0, 2.5, 0.5),
        };

        let rotation = compute_alignment_rotation(&vertices, transform.to_matrix()).unwrap();
        transform.apply_rotation(rotation);

        let again = compute_alignment_rotation(&vertices, transform.to_matrix()).unwrap();
        assert!(again.w.abs() >= 1.0 - 1e-5, "second pass rotated by {again:?}");
    }

    #[test]
    fn test_rotation_onto_up_near_down() {
        let normal = Vec3::new(0.0, 0.01, -1.0).normalize();
        let rotation = rotation_onto_up(normal);
        assert!((rotation * normal).dot(UP) >= 1.0 - 1e-5);
    }
}
