//! # btmesh_data
//!
//! btmesh_data provides a more intuitive API for importing collision meshes built on btmesh_lib.
//!
//! ## Features
//! - Decoding of vertex and face blocks into indexed triangle meshes
//! - Errors for invalid data such as out of bounds vertex indices
//! - Optional convex hulls for submeshes stored as point clouds
//! - Unique names with layer and convexity tags like `"col0@SOLID"` or `"col1.001@LIQUID@CONVEX"`
//! - A [SceneSink](crate::import::SceneSink) trait for handing meshes to an application
//!
//! ## Getting Started
/*!
```no_run
use btmesh_data::prelude::*;

# fn main() -> Result<(), Box<dyn std::error::Error>> {
struct PrintSink;

impl SceneSink for PrintSink {
    type Group = String;

    fn begin_group(&mut self, name: &str) -> String {
        name.to_string()
    }

    fn emit_mesh(&mut self, group: &String, mesh: &CollisionMesh, _rotation: glam::Quat) {
        println!("{}/{}: {} triangles", group, mesh.name, mesh.geometry().triangles.len());
    }
}

let mut importer = Importer::new(ImportOptions::default());
for result in importer.import_files(&["col.btmesh", "col_ex.btmesh"], &mut PrintSink) {
    if let Err(e) = result {
        eprintln!("{}", e);
    }
}
# Ok(())
# }
```
 */
pub mod hull;
pub mod import;
pub mod mesh_data;
pub mod names;

/// Common imports for top level types and important traits.
pub mod prelude {
    pub use crate::hull::{ConvexHull, ParryHull};
    pub use crate::import::{CollisionMesh, ImportOptions, Importer, SceneSink};
    pub use crate::mesh_data::{SubmeshData, SubmeshGeometry};
    pub use crate::names::NameRegistry;
    pub use btmesh_lib::{Convexity, Layout};
}
