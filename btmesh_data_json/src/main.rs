use btmesh_data::prelude::*;
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Import btmesh collision files and write the meshes as JSON.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// The .btmesh files to import
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write all files to a single JSON file instead of <input>.json for each input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep convex submeshes as point clouds instead of computing their convex hulls
    #[arg(long)]
    no_fill_hulls: bool,

    /// Treat every submesh as a plain mesh for files without convexity flags
    #[arg(long)]
    untagged: bool,
}

#[derive(Serialize)]
struct JsonGroup {
    name: String,
    meshes: Vec<JsonMesh>,
}

#[derive(Serialize)]
struct JsonMesh {
    name: String,
    tags: String,
    /// Quaternion in XYZW order.
    rotation: [f32; 4],
    vertices: Vec<[f32; 3]>,
    triangles: Vec<[u16; 3]>,
}

/// Collects imported groups in memory for serializing.
#[derive(Default)]
struct JsonScene {
    groups: Vec<JsonGroup>,
}

impl SceneSink for JsonScene {
    type Group = usize;

    fn begin_group(&mut self, name: &str) -> usize {
        self.groups.push(JsonGroup {
            name: name.to_string(),
            meshes: Vec::new(),
        });
        self.groups.len() - 1
    }

    fn emit_mesh(&mut self, group: &usize, mesh: &CollisionMesh, rotation: glam::Quat) {
        let geometry = mesh.geometry();
        self.groups[*group].meshes.push(JsonMesh {
            name: mesh.name.clone(),
            tags: mesh.tag_suffix.clone(),
            rotation: rotation.to_array(),
            vertices: geometry.vertices.iter().map(|v| v.to_array()).collect(),
            triangles: geometry.triangles.iter().map(|t| t.indices()).collect(),
        });
    }
}

fn write_json<T: Serialize, P: AsRef<Path>>(output_path: P, object: &T) -> std::io::Result<()> {
    let output_path = output_path.as_ref();
    let json = serde_json::to_string_pretty(object)?;
    let mut output_file = std::fs::File::create(output_path)?;
    output_file.write_all(json.as_bytes())?;
    log::info!("Wrote {:?}", output_path);
    Ok(())
}

/// Writes each output and returns the number of outputs that failed.
fn write_outputs<'a, T: Serialize + 'a>(
    outputs: impl IntoIterator<Item = (PathBuf, &'a T)>,
) -> usize {
    outputs
        .into_iter()
        .filter(|(path, object)| match write_json(path, *object) {
            Ok(()) => false,
            Err(e) => {
                log::error!("Failed to write {:?}: {}", path, e);
                true
            }
        })
        .count()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let options = ImportOptions {
        fill_convex_hulls: !cli.no_fill_hulls,
        layout: if cli.untagged {
            Layout::Untagged
        } else {
            Layout::Tagged
        },
    };

    let start = Instant::now();
    let mut importer = Importer::new(options);
    let mut scene = JsonScene::default();
    let results = importer.import_files(&cli.inputs, &mut scene);
    log::info!("Import: {:?}", start.elapsed());

    let failed_writes = match cli.output {
        Some(output) => write_outputs([(output, &scene.groups)]),
        None => {
            // Groups are only created for files that imported successfully.
            let imported = results.iter().filter_map(|r| r.as_ref().ok());
            write_outputs(imported.zip(&scene.groups).map(|(file, group)| {
                // Append to the full path to allow dragging a file onto the executable.
                let mut output = file.path.clone().into_os_string();
                output.push(".json");
                (PathBuf::from(output), group)
            }))
        }
    };

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        eprintln!("Failed to import {} of {} files", failed, results.len());
    }
    if failed_writes > 0 {
        eprintln!("Failed to write {} output files", failed_writes);
    }
    if failed > 0 || failed_writes > 0 {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_scene_groups() {
        let mesh = CollisionMesh {
            name: "col0.001@SOLID".to_string(),
            tag_suffix: "@SOLID".to_string(),
            submesh: SubmeshData {
                index: 0,
                layer: 1,
                layer_name: "@SOLID".to_string(),
                convexity: Convexity::Mesh,
                geometry: SubmeshGeometry {
                    vertices: vec![[1.0, 2.0, 3.0].into()],
                    triangles: vec![[0, 0, 0].into()],
                },
            },
        };

        let mut scene = JsonScene::default();
        let group = scene.begin_group("col");
        scene.emit_mesh(&group, &mesh, glam::Quat::IDENTITY);

        let json = serde_json::to_value(&scene.groups).unwrap();
        assert_eq!(
            serde_json::json!([{
                "name": "col",
                "meshes": [{
                    "name": "col0.001@SOLID",
                    "tags": "@SOLID",
                    "rotation": [0.0, 0.0, 0.0, 1.0],
                    "vertices": [[1.0, 2.0, 3.0]],
                    "triangles": [[0, 0, 0]]
                }]
            }]),
            json
        );
    }

    #[test]
    fn write_outputs_counts_failures() {
        let dir = std::env::temp_dir().join("btmesh_data_json_write_outputs");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let groups = vec![JsonGroup {
            name: "col".to_string(),
            meshes: Vec::new(),
        }];
        let written = dir.join("col.json");
        // The parent directory doesn't exist, so the file can't be created.
        let missing = dir.join("missing").join("col.json");

        let failed = write_outputs([(written.clone(), &groups), (missing.clone(), &groups)]);
        assert_eq!(1, failed);
        assert!(written.exists());
        assert!(!missing.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
