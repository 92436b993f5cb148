//! Importing btmesh files into a scene.
//!
//! Each file is decoded independently, so a batch of files is decoded in parallel.
//! Names are then resolved in input order with a single [NameRegistry] for the whole batch
//! before handing the meshes to a [SceneSink].
use std::f32::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

use btmesh_lib::formats::btmesh::Layout;
use glam::Quat;
use rayon::prelude::*;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::hull::{ConvexHull, ParryHull};
use crate::mesh_data::{read_submeshes_from_bytes, SubmeshData, SubmeshGeometry};
use crate::names::NameRegistry;

/// Settings for importing files.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Replace convex point cloud submeshes with their convex hull.
    pub fill_convex_hulls: bool,
    pub layout: Layout,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            fill_convex_hulls: true,
            layout: Layout::Tagged,
        }
    }
}

/// The rotation applied to every mesh to convert from the game's Y up coordinates to Z up.
pub fn import_rotation() -> Quat {
    Quat::from_rotation_x(FRAC_PI_2)
}

/// A finished submesh with a unique name.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMesh {
    pub name: String,
    pub tag_suffix: String,
    pub submesh: SubmeshData,
}

impl CollisionMesh {
    pub fn geometry(&self) -> &SubmeshGeometry {
        &self.submesh.geometry
    }
}

/// The destination for imported meshes such as a scene graph or an export format.
pub trait SceneSink {
    type Group;

    /// Creates a group for the meshes of a single file.
    fn begin_group(&mut self, name: &str) -> Self::Group;

    fn emit_mesh(&mut self, group: &Self::Group, mesh: &CollisionMesh, rotation: Quat);
}

/// An error while importing a single file in a batch.
#[derive(Error, Debug)]
#[error("Failed to import {:?}: {}", path, source)]
pub struct ImportError {
    pub path: PathBuf,
    #[source]
    pub source: btmesh_lib::Error,
}

/// The meshes for a file that was imported successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedFile {
    pub path: PathBuf,
    pub group_name: String,
    pub meshes: Vec<CollisionMesh>,
}

/// Imports files into a sink while keeping names unique for the whole session.
pub struct Importer {
    pub options: ImportOptions,
    names: NameRegistry,
    hull: Box<dyn ConvexHull>,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self::with_hull(options, Box::new(ParryHull))
    }

    /// Uses `hull` instead of [ParryHull] for filling convex submeshes.
    pub fn with_hull(options: ImportOptions, hull: Box<dyn ConvexHull>) -> Self {
        Self {
            options,
            names: NameRegistry::new(),
            hull,
        }
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    fn hull(&self) -> Option<&dyn ConvexHull> {
        if self.options.fill_convex_hulls {
            Some(self.hull.as_ref())
        } else {
            None
        }
    }

    /// Decodes the contents of a file without naming or emitting anything.
    pub fn decode(&self, bytes: Vec<u8>) -> Result<Vec<SubmeshData>, btmesh_lib::Error> {
        read_submeshes_from_bytes(bytes, self.options.layout, self.hull())
    }

    /// Assigns unique names to decoded submeshes for the file with the given stem.
    pub fn name_submeshes(&mut self, file_stem: &str, submeshes: Vec<SubmeshData>) -> Vec<CollisionMesh> {
        submeshes
            .into_iter()
            .map(|submesh| {
                let tag_suffix = submesh.tag_suffix();
                let name = self.names.resolve(&submesh.base_name(file_stem), &tag_suffix);
                CollisionMesh {
                    name,
                    tag_suffix,
                    submesh,
                }
            })
            .collect()
    }

    /// Imports the contents of a single file named `file_stem` and emits a group with its meshes.
    /// Nothing is emitted if any submesh fails to decode.
    pub fn import_bytes<S: SceneSink>(
        &mut self,
        file_stem: &str,
        bytes: Vec<u8>,
        sink: &mut S,
    ) -> Result<Vec<CollisionMesh>, btmesh_lib::Error> {
        let submeshes = self.decode(bytes)?;
        let meshes = self.name_submeshes(file_stem, submeshes);
        emit_group(sink, file_stem, &meshes);
        Ok(meshes)
    }

    /// Imports each file in `paths` into its own group in `sink`.
    ///
    /// Files are decoded in parallel, but names are resolved and meshes emitted in the order of `paths`.
    /// A file that fails to import is logged and returned as an error without stopping the remaining files.
    pub fn import_files<P, S>(
        &mut self,
        paths: &[P],
        sink: &mut S,
    ) -> Vec<Result<ImportedFile, ImportError>>
    where
        P: AsRef<Path> + Sync,
        S: SceneSink,
    {
        let decoded: Vec<_> = paths
            .par_iter()
            .map(|path| {
                let path = path.as_ref();
                std::fs::read(path)
                    .map_err(btmesh_lib::Error::from)
                    .and_then(|bytes| self.decode(bytes))
                    .map_err(|source| ImportError {
                        path: path.to_owned(),
                        source,
                    })
            })
            .collect();

        paths
            .iter()
            .zip(decoded)
            .map(|(path, result)| {
                let path = path.as_ref();
                match result {
                    Ok(submeshes) => {
                        let group_name = file_stem(path);
                        let meshes = self.name_submeshes(&group_name, submeshes);
                        emit_group(sink, &group_name, &meshes);
                        log::info!("Imported {} meshes from {:?}", meshes.len(), path);

                        Ok(ImportedFile {
                            path: path.to_owned(),
                            group_name,
                            meshes,
                        })
                    }
                    Err(e) => {
                        log::error!("{}", e);
                        Err(e)
                    }
                }
            })
            .collect()
    }
}

fn emit_group<S: SceneSink>(sink: &mut S, name: &str, meshes: &[CollisionMesh]) {
    let group = sink.begin_group(name);
    let rotation = import_rotation();
    for mesh in meshes {
        sink.emit_mesh(&group, mesh, rotation);
    }
}

/// The file name up to the first `'.'`, so `"col.btmesh"` and `"col.lod.btmesh"` both become `"col"`.
pub fn file_stem(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .and_then(|n| n.split('.').next().map(str::to_string))
        .unwrap_or_default()
}
