//! # btmesh_lib
//!
//! btmesh_lib is a library for safe reading of the .btmesh collision mesh containers
//! used by Sonic Frontiers.
//!
//! A btmesh file stores a table of submesh records followed by blocks of vertex positions,
//! triangle indices, and an acceleration structure. Each record refers to its blocks with
//! offsets relative to a fixed data section, so the table and the blocks are read with
//! random access into a file that is loaded into memory up front.
//!
//! All reads go through [ByteReader], which checks bounds before decoding any field.
//! Corrupt files produce an [Error] with the byte offset where decoding stopped instead of
//! panicking or allocating based on invalid counts.
//!
//! ## Example
/*!
```no_run
use btmesh_lib::{Btmesh, Layout};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let btmesh = Btmesh::from_file("col.btmesh", Layout::Tagged)?;
for descriptor in &btmesh.descriptors {
    let vertices = descriptor.read_vertices(&mut btmesh.reader())?;
    println!("{}: {} vertices", descriptor.tag_suffix(), vertices.len());
}
# Ok(())
# }
```
 */
pub mod formats;
pub mod reader;
pub mod tags;
pub mod vectors;

mod error;

use std::path::Path;

pub use error::{Error, Result};
pub use formats::btmesh::{decode_container, Convexity, Layout, SubmeshDescriptor};
pub use reader::ByteReader;
pub use vectors::{Triangle, Vector3};

/// An entire btmesh file and its decoded submesh table.
#[derive(Debug, Clone)]
pub struct Btmesh {
    pub bytes: Vec<u8>,
    pub descriptors: Vec<SubmeshDescriptor>,
}

impl Btmesh {
    /// Tries to read the submesh table from `path`.
    /// The entire file is buffered, since blocks are read with random access.
    pub fn from_file<P: AsRef<Path>>(path: P, layout: Layout) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes, layout)
    }

    /// Tries to read the submesh table from the contents of a file.
    pub fn from_bytes(bytes: Vec<u8>, layout: Layout) -> Result<Self> {
        let descriptors = decode_container(&bytes, layout)?;
        Ok(Self { bytes, descriptors })
    }

    /// A new reader positioned at the start of the file.
    pub fn reader(&self) -> ByteReader {
        ByteReader::new(&self.bytes)
    }
}
