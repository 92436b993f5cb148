//! Convex hull computation for submeshes stored as point clouds.
use btmesh_lib::{Triangle, Vector3};
use parry3d::math::Point;

use crate::mesh_data::SubmeshGeometry;

/// Computes a closed triangulated hull around a set of points.
///
/// Implementations should return an empty or degenerate geometry for inputs
/// without a 3D hull such as fewer than 4 points or coplanar points
/// instead of failing the import.
pub trait ConvexHull: Sync {
    fn convex_hull(&self, points: &[Vector3]) -> SubmeshGeometry;
}

/// Computes hulls using [parry3d::transformation::try_convex_hull].
#[derive(Debug, Default, Clone, Copy)]
pub struct ParryHull;

impl ConvexHull for ParryHull {
    fn convex_hull(&self, points: &[Vector3]) -> SubmeshGeometry {
        if points.len() < 4 {
            log::warn!(
                "Skipping convex hull for {} points. At least 4 points are required.",
                points.len()
            );
            return SubmeshGeometry::default();
        }

        let input: Vec<_> = points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();
        match parry3d::transformation::try_convex_hull(&input) {
            Ok((vertices, indices)) => {
                let triangles: Option<Vec<_>> = indices
                    .iter()
                    .map(|[v0, v1, v2]| {
                        Some(Triangle::new(
                            u16::try_from(*v0).ok()?,
                            u16::try_from(*v1).ok()?,
                            u16::try_from(*v2).ok()?,
                        ))
                    })
                    .collect();

                match triangles {
                    Some(triangles) => SubmeshGeometry {
                        vertices: vertices
                            .iter()
                            .map(|p| Vector3::new(p.x, p.y, p.z))
                            .collect(),
                        triangles,
                    },
                    None => {
                        log::warn!(
                            "Convex hull with {} vertices can't be indexed with 16 bit indices.",
                            vertices.len()
                        );
                        SubmeshGeometry::default()
                    }
                }
            }
            Err(e) => {
                log::warn!("Failed to compute convex hull for {} points: {:?}", points.len(), e);
                SubmeshGeometry::default()
            }
        }
    }
}
