//! Triangle meshes for each submesh in a btmesh file.
//!
//! Vertices and faces are read from the blocks referenced by each
//! [SubmeshDescriptor] and validated before any data is returned.
//! Submeshes stored as convex point clouds can optionally be replaced by their convex hull.
use btmesh_lib::formats::btmesh::Layout;
use btmesh_lib::{Btmesh, ByteReader, Convexity, Error, SubmeshDescriptor, Triangle, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::hull::ConvexHull;

/// An indexed triangle mesh.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmeshGeometry {
    pub vertices: Vec<Vector3>,
    pub triangles: Vec<Triangle>,
}

impl SubmeshGeometry {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.triangles.is_empty()
    }
}

/// The decoded data for a single submesh before it receives a unique name.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SubmeshData {
    /// The position of the submesh in the file's submesh table.
    pub index: usize,
    pub layer: i32,
    pub layer_name: String,
    pub convexity: Convexity,
    pub geometry: SubmeshGeometry,
}

impl SubmeshData {
    /// The name before resolving collisions such as `"col0"` for the first submesh in `col.btmesh`.
    pub fn base_name(&self, file_stem: &str) -> String {
        format!("{}{}", file_stem, self.index)
    }

    /// The tags appended to the name such as `"@SOLID"` or `"@LIQUID@CONVEX"`.
    pub fn tag_suffix(&self) -> String {
        if self.convexity.is_convex() {
            format!("{}{}", self.layer_name, btmesh_lib::tags::CONVEX_SUFFIX)
        } else {
            self.layer_name.clone()
        }
    }
}

/// Reads and validates the geometry for `descriptor`.
///
/// If `hull` is provided, convex point cloud submeshes are replaced by their convex hull.
/// Otherwise the faces are returned as stored, which may be empty for point clouds.
pub fn build_geometry(
    reader: &mut ByteReader,
    descriptor: &SubmeshDescriptor,
    hull: Option<&dyn ConvexHull>,
) -> Result<SubmeshGeometry, Error> {
    let vertices = descriptor.read_vertices(reader)?;
    let triangles = descriptor.read_triangles(reader)?;
    validate_indices(&triangles, descriptor)?;

    match hull {
        Some(hull) if descriptor.convexity.is_convex() => Ok(hull.convex_hull(&vertices)),
        _ => Ok(SubmeshGeometry {
            vertices,
            triangles,
        }),
    }
}

fn validate_indices(triangles: &[Triangle], descriptor: &SubmeshDescriptor) -> Result<(), Error> {
    for (i, triangle) in triangles.iter().enumerate() {
        for (j, vertex_index) in triangle.indices().iter().enumerate() {
            if *vertex_index as usize >= descriptor.vertex_count {
                return Err(Error::IndexOutOfRange {
                    offset: descriptor.face_block_offset + i as u64 * 6 + j as u64 * 2,
                    submesh_index: descriptor.index,
                    vertex_index: *vertex_index,
                    vertex_count: descriptor.vertex_count,
                });
            }
        }
    }
    Ok(())
}

/// Reads the geometry for every submesh in table order.
pub fn read_submeshes(
    btmesh: &Btmesh,
    hull: Option<&dyn ConvexHull>,
) -> Result<Vec<SubmeshData>, Error> {
    let mut reader = btmesh.reader();
    btmesh
        .descriptors
        .iter()
        .map(|descriptor| {
            let geometry = build_geometry(&mut reader, descriptor, hull)?;
            log::debug!(
                "Built submesh {} with {} vertices and {} triangles",
                descriptor.index,
                geometry.vertices.len(),
                geometry.triangles.len()
            );

            Ok(SubmeshData {
                index: descriptor.index,
                layer: descriptor.layer,
                layer_name: descriptor.layer_name.to_string(),
                convexity: descriptor.convexity,
                geometry,
            })
        })
        .collect()
}

/// Decodes the submesh table and geometry from the contents of a file.
pub fn read_submeshes_from_bytes(
    bytes: Vec<u8>,
    layout: Layout,
    hull: Option<&dyn ConvexHull>,
) -> Result<Vec<SubmeshData>, Error> {
    let btmesh = Btmesh::from_bytes(bytes, layout)?;
    read_submeshes(&btmesh, hull)
}
