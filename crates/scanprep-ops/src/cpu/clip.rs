//! Clipping a mesh against a convex cutter.

use std::collections::HashMap;

use scanprep_core::math::{Mat4, Vec3};
use scanprep_core::{Mesh, Vertex};

use crate::engine::{EngineError, EngineResult};

const OPERATION: &str = "boolean_intersect";

/// Half-space `normal · p <= offset` in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    /// Plane through a counter-clockwise triangle, facing outward
    fn from_triangle(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let normal = (b - a).cross(c - a).try_normalize()?;
        Some(Self {
            normal,
            offset: normal.dot(a),
        })
    }

    #[inline]
    pub fn distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.offset
    }

    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }
}

/// Collect the distinct face planes of a closed convex mesh in world space.
///
/// Fails if any cutter vertex lies outside one of its own face planes,
/// which means the cutter is not convex (or is inside out).
pub(crate) fn convex_planes(cutter: &Mesh, to_world: Mat4) -> EngineResult<Vec<Plane>> {
    let points: Vec<Vec3> = cutter
        .vertices
        .iter()
        .map(|v| to_world.transform_point3(v.position()))
        .collect();

    // Mirroring flips the winding
    let mirrored = to_world.determinant() < 0.0;

    let extent = points
        .iter()
        .fold(0.0_f32, |acc, p| acc.max(p.abs().max_element()))
        .max(1.0);
    let tolerance = extent * 1e-4;

    let mut planes: Vec<Plane> = Vec::new();
    for [a, b, c] in cutter.triangles() {
        let Some(plane) = Plane::from_triangle(
            points[a as usize],
            points[b as usize],
            points[c as usize],
        ) else {
            continue;
        };
        let plane = if mirrored { plane.flipped() } else { plane };

        let duplicate = planes.iter().any(|existing| {
            existing.normal.dot(plane.normal) > 1.0 - 1e-5
                && (existing.offset - plane.offset).abs() < tolerance
        });
        if !duplicate {
            planes.push(plane);
        }
    }

    if planes.is_empty() {
        return Err(EngineError::Failed {
            operation: OPERATION,
            reason: "cutter has no faces".to_string(),
        });
    }

    let concave = planes
        .iter()
        .any(|plane| points.iter().any(|&p| plane.distance(p) > tolerance));
    if concave {
        return Err(EngineError::Failed {
            operation: OPERATION,
            reason: "cutter is not convex".to_string(),
        });
    }

    Ok(planes)
}

/// Polygon corner carried through clipping
#[derive(Debug, Clone, Copy)]
struct Corner {
    world: Vec3,
    local: Vec3,
    normal: Vec3,
    selected: bool,
    /// Original vertex index, None for points created by a cut
    source: Option<u32>,
}

impl Corner {
    fn lerp(&self, other: &Corner, t: f32) -> Corner {
        let normal = self.normal.lerp(other.normal, t);
        Corner {
            world: self.world.lerp(other.world, t),
            local: self.local.lerp(other.local, t),
            normal: normal.try_normalize().unwrap_or(self.normal),
            selected: false,
            source: None,
        }
    }
}

/// Sutherland–Hodgman clip of a convex polygon against one half-space
fn clip_polygon(polygon: &[Corner], plane: &Plane) -> Vec<Corner> {
    let mut output = Vec::with_capacity(polygon.len() + 1);

    for (i, current) in polygon.iter().enumerate() {
        let next = &polygon[(i + 1) % polygon.len()];
        let dc = plane.distance(current.world);
        let dn = plane.distance(next.world);

        if dc <= 0.0 {
            output.push(*current);
        }
        if (dc < 0.0 && dn > 0.0) || (dc > 0.0 && dn < 0.0) {
            output.push(current.lerp(next, dc / (dc - dn)));
        }
    }

    output
}

/// Keep the part of `target` inside all `planes`, in `target`'s local space.
///
/// Surviving original vertices keep their position, normal and selection;
/// vertices created on a cut interpolate position and normal and are left
/// unselected. Open cuts are not capped.
pub(crate) fn intersect(target: &Mesh, to_world: Mat4, planes: &[Plane]) -> Mesh {
    let corners: Vec<Corner> = target
        .vertices
        .iter()
        .enumerate()
        .map(|(i, v)| Corner {
            world: to_world.transform_point3(v.position()),
            local: v.position(),
            normal: v.normal(),
            selected: v.is_selected(),
            source: Some(i as u32),
        })
        .collect();

    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut remap: HashMap<u32, u32> = HashMap::new();

    for [a, b, c] in target.triangles() {
        let mut polygon = vec![corners[a as usize], corners[b as usize], corners[c as usize]];

        for plane in planes {
            polygon = clip_polygon(&polygon, plane);
            if polygon.len() < 3 {
                break;
            }
        }
        if polygon.len() < 3 {
            continue;
        }

        let polygon_indices: Vec<u32> = polygon
            .iter()
            .map(|corner| {
                let mut push = |corner: &Corner| {
                    let mut vertex = Vertex::new(corner.local.to_array(), corner.normal.to_array());
                    vertex.set_selected(corner.selected);
                    vertices.push(vertex);
                    vertices.len() as u32 - 1
                };
                match corner.source {
                    Some(original) => *remap.entry(original).or_insert_with(|| push(corner)),
                    None => push(corner),
                }
            })
            .collect();

        // Fan triangulation (clipped polygon stays convex)
        for i in 1..polygon_indices.len() - 1 {
            indices.extend_from_slice(&[
                polygon_indices[0],
                polygon_indices[i],
                polygon_indices[i + 1],
            ]);
        }
    }

    Mesh {
        vertices,
        indices,
        uvs: Vec::new(),
    }
}
