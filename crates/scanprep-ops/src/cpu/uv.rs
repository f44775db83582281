//! Cube projection UV unwrap.
//!
//! Each triangle is projected along the dominant axis of its face normal
//! into one cell of a 3x2 atlas:
//!
//! ```text
//! +----+----+----+
//! | -Y | +Z | -Z |   row 1
//! +----+----+----+
//! | +X | -X | +Y |   row 0
//! +----+----+----+
//! ```

use scanprep_core::Mesh;
use scanprep_core::math::{Vec2, Vec3};

/// Gap kept free around each atlas cell
const CELL_MARGIN: f32 = 0.01;

const COLUMNS: f32 = 3.0;
const ROWS: f32 = 2.0;

/// Atlas cell for a face normal: `axis * 2 + (negative as usize)`
fn cell_for_normal(normal: Vec3) -> usize {
    let abs = normal.abs();
    let axis = if abs.x >= abs.y && abs.x >= abs.z {
        0
    } else if abs.y >= abs.z {
        1
    } else {
        2
    };
    axis * 2 + usize::from(normal[axis] < 0.0)
}

/// In-plane coordinates for projection along `axis`
fn project(point: Vec3, axis: usize) -> Vec2 {
    match axis {
        0 => Vec2::new(point.y, point.z),
        1 => Vec2::new(point.x, point.z),
        _ => Vec2::new(point.x, point.y),
    }
}

/// Unwrap every triangle whose three corners are selected.
///
/// Other triangles keep their existing UVs (or `[0, 0]` when the mesh had
/// none). Returns the number of triangles unwrapped.
pub(crate) fn cube_project(mesh: &mut Mesh) -> usize {
    if mesh.uvs.len() != mesh.indices.len() {
        mesh.uvs = vec![[0.0, 0.0]; mesh.indices.len()];
    }

    let Some((min, max)) = selected_bounds(mesh) else {
        return 0;
    };
    let size = (max - min).max(Vec3::splat(f32::EPSILON));

    let mut unwrapped = 0;
    for (t, triangle) in mesh.indices.chunks_exact(3).enumerate() {
        let corners = [
            mesh.vertices[triangle[0] as usize],
            mesh.vertices[triangle[1] as usize],
            mesh.vertices[triangle[2] as usize],
        ];
        if !corners.iter().all(|v| v.is_selected()) {
            continue;
        }

        let [a, b, c] = corners.map(|v| v.position());
        let cell = cell_for_normal((b - a).cross(c - a));
        let axis = cell / 2;
        let negative = cell % 2 == 1;
        let origin = Vec2::new((cell % 3) as f32, (cell / 3) as f32);

        let lo = project(min, axis);
        let extent = project(size, axis);

        for (corner, position) in [a, b, c].into_iter().enumerate() {
            let mut local = (project(position, axis) - lo) / extent;
            // Keep the texture readable when viewed from the negative side
            if negative {
                local.x = 1.0 - local.x;
            }
            let local = local.clamp(Vec2::ZERO, Vec2::ONE) * (1.0 - 2.0 * CELL_MARGIN)
                + Vec2::splat(CELL_MARGIN);
            let uv = (origin + local) / Vec2::new(COLUMNS, ROWS);
            mesh.uvs[t * 3 + corner] = uv.to_array();
        }
        unwrapped += 1;
    }

    unwrapped
}

fn selected_bounds(mesh: &Mesh) -> Option<(Vec3, Vec3)> {
    mesh.vertices
        .iter()
        .filter(|v| v.is_selected())
        .map(|v| v.position())
        .fold(None, |bounds, p| match bounds {
            None => Some((p, p)),
            Some((min, max)) => Some((min.min(p), max.max(p))),
        })
}
