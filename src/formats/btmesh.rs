//! The submesh table for .btmesh collision files.
//!
//! All values are little endian.
//!
//! | Offset | Contents |
//! | --- | --- |
//! | 0x00 | Preamble, not read |
//! | 0x50 | `i32` submesh count, 12 reserved bytes |
//! | 0x60 | 64 byte [SubmeshRecord] for each submesh |
//!
//! Vertex and face block offsets in each record are relative to [DATA_SECTION_OFFSET].
use binread::BinRead;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::reader::ByteReader;
use crate::tags::{TagTable, CONVEX_SUFFIX};
use crate::vectors::{FixedSize, Triangle, Vector3};
use crate::{Error, Result};

/// The absolute position of the submesh count.
pub const SUBMESH_TABLE_OFFSET: u64 = 0x50;

/// The absolute position of the first [SubmeshRecord].
pub const FIRST_SUBMESH_OFFSET: u64 = SUBMESH_TABLE_OFFSET + 0x10;

/// The base added to the relative vertex and face block offsets.
pub const DATA_SECTION_OFFSET: u64 = 0x40;

/// Selects how the first field of each [SubmeshRecord] is interpreted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The first field is reserved and every submesh is a plain triangle mesh.
    Untagged,
    /// The first field is the [Convexity] of the submesh.
    Tagged,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Tagged
    }
}

/// Whether a submesh is a triangle mesh or a point cloud for a convex shape.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convexity {
    Mesh,
    ConvexHull,
    /// Unresearched values are preserved and treated like [Convexity::Mesh].
    Other(i32),
}

impl From<i32> for Convexity {
    fn from(value: i32) -> Self {
        match value {
            0 => Convexity::Mesh,
            2 => Convexity::ConvexHull,
            v => Convexity::Other(v),
        }
    }
}

impl Convexity {
    pub fn is_convex(self) -> bool {
        self == Convexity::ConvexHull
    }
}

/// The submesh count at [SUBMESH_TABLE_OFFSET].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    #[br(pad_after = 12)]
    pub submesh_count: i32,
}

impl FixedSize for FileHeader {
    const SIZE_IN_BYTES: u64 = 16;
}

/// A single entry in the submesh table exactly as stored in the file.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(BinRead, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmeshRecord {
    pub convexity: i32,
    pub layer: i32,
    pub vertex_count: i32,
    pub face_count: i32,
    /// The size of the acceleration structure, which isn't parsed.
    #[br(pad_after = 12)]
    pub bvh_size: i32,
    pub vertex_offset: i64,
    #[br(pad_after = 16)]
    pub face_offset: i64,
}

impl FixedSize for SubmeshRecord {
    const SIZE_IN_BYTES: u64 = 64;
}

/// A validated [SubmeshRecord] with absolute block offsets.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SubmeshDescriptor {
    pub index: usize,
    pub convexity: Convexity,
    pub layer: i32,
    pub layer_name: &'static str,
    pub vertex_count: usize,
    pub face_count: usize,
    pub bvh_size: i32,
    /// The absolute position of the first [Vector3].
    pub vertex_block_offset: u64,
    /// The absolute position of the first [Triangle].
    pub face_block_offset: u64,
    /// The absolute position of the record itself.
    pub record_offset: u64,
    /// The position immediately after the record where the next record starts.
    pub resume_offset: u64,
}

impl SubmeshDescriptor {
    /// The text appended to the submesh name such as `"@SOLID"` or `"@LIQUID@CONVEX"`.
    pub fn tag_suffix(&self) -> String {
        if self.convexity.is_convex() {
            format!("{}{}", self.layer_name, CONVEX_SUFFIX)
        } else {
            self.layer_name.to_string()
        }
    }

    /// Reads the vertex block in file order.
    pub fn read_vertices(&self, reader: &mut ByteReader) -> Result<Vec<Vector3>> {
        reader.seek_absolute(self.vertex_block_offset)?;
        reader.read_array(self.vertex_count)
    }

    /// Reads the face block without validating the indices.
    pub fn read_triangles(&self, reader: &mut ByteReader) -> Result<Vec<Triangle>> {
        reader.seek_absolute(self.face_block_offset)?;
        reader.read_array(self.face_count)
    }
}

/// Reads the submesh table from an entire btmesh file.
///
/// Descriptors are returned in table order. Vertex and face data isn't read,
/// so the position of `bytes` after each record is recorded in [SubmeshDescriptor::resume_offset].
pub fn decode_container(bytes: &[u8], layout: Layout) -> Result<Vec<SubmeshDescriptor>> {
    let mut reader = ByteReader::new(bytes);
    reader.seek_absolute(SUBMESH_TABLE_OFFSET)?;
    let header: FileHeader = reader.read()?;

    let count = checked_submesh_count(header.submesh_count, reader.remaining())?;
    log::debug!("Reading {} submesh descriptors", count);

    let mut descriptors = Vec::with_capacity(descriptor_capacity(count, reader.remaining()));
    for index in 0..count {
        let descriptor = read_descriptor(&mut reader, index, layout)?;
        log::debug!(
            "Submesh {}: {:?} {} with {} vertices and {} faces",
            index,
            descriptor.convexity,
            descriptor.layer_name,
            descriptor.vertex_count,
            descriptor.face_count
        );
        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

fn checked_submesh_count(submesh_count: i32, remaining: u64) -> Result<usize> {
    // Counts that exceed the remaining bytes but still don't fit are reported as truncated
    // when the first missing record is read.
    if submesh_count < 0 || submesh_count as u64 > remaining {
        return Err(Error::MalformedHeader {
            offset: SUBMESH_TABLE_OFFSET,
            field: "submesh count",
            value: submesh_count as i64,
        });
    }
    Ok(submesh_count as usize)
}

// Only reserve space for records that actually fit in the remaining bytes.
fn descriptor_capacity(count: usize, remaining: u64) -> usize {
    let records_that_fit = remaining / SubmeshRecord::SIZE_IN_BYTES;
    count.min(usize::try_from(records_that_fit).unwrap_or(usize::MAX))
}

fn read_descriptor(
    reader: &mut ByteReader,
    index: usize,
    layout: Layout,
) -> Result<SubmeshDescriptor> {
    let record_offset = reader.tell();
    let record: SubmeshRecord = reader.read()?;
    let resume_offset = reader.tell();

    let convexity = match layout {
        Layout::Tagged => Convexity::from(record.convexity),
        Layout::Untagged => Convexity::Mesh,
    };

    // Field offsets within the record for error reporting.
    let layer_name = TagTable::Layer.name(record.layer, record_offset + 4)?;
    let vertex_count = checked_count(record.vertex_count, record_offset + 8, "vertex count")?;
    let face_count = checked_count(record.face_count, record_offset + 12, "face count")?;
    let vertex_block_offset =
        checked_block_offset(record.vertex_offset, record_offset + 32, "vertex offset")?;
    let face_block_offset =
        checked_block_offset(record.face_offset, record_offset + 40, "face offset")?;

    Ok(SubmeshDescriptor {
        index,
        convexity,
        layer: record.layer,
        layer_name,
        vertex_count,
        face_count,
        bvh_size: record.bvh_size,
        vertex_block_offset,
        face_block_offset,
        record_offset,
        resume_offset,
    })
}

fn checked_count(value: i32, offset: u64, field: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::MalformedHeader {
        offset,
        field,
        value: value as i64,
    })
}

fn checked_block_offset(relative: i64, offset: u64, field: &'static str) -> Result<u64> {
    u64::try_from(relative)
        .ok()
        .and_then(|r| r.checked_add(DATA_SECTION_OFFSET))
        .ok_or(Error::MalformedHeader {
            offset,
            field,
            value: relative,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexlit::hex;
    use pretty_assertions::assert_eq;

    // A minimal file with an empty preamble and the given submesh table.
    fn file_with_table(table: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; SUBMESH_TABLE_OFFSET as usize];
        bytes.extend_from_slice(table);
        bytes
    }

    #[test]
    fn record_sizes() {
        let record = hex!(
            02000000 01000000 03000000 01000000
            20000000 00000000 00000000 00000000
            50000000 00000000 60000000 00000000
            00000000 00000000 00000000 00000000
        );
        let mut reader = ByteReader::new(&record);
        let value: SubmeshRecord = reader.read().unwrap();
        assert_eq!(64, reader.tell());
        assert_eq!(
            SubmeshRecord {
                convexity: 2,
                layer: 1,
                vertex_count: 3,
                face_count: 1,
                bvh_size: 0x20,
                vertex_offset: 0x50,
                face_offset: 0x60,
            },
            value
        );
    }

    #[test]
    fn decode_single_descriptor() {
        let bytes = file_with_table(&hex!(
            // header
            01000000 00000000 00000000 00000000
            // record
            00000000 02000000 04000000 02000000
            00000000 00000000 00000000 00000000
            30000000 00000000 60000000 00000000
            00000000 00000000 00000000 00000000
        ));

        let descriptors = decode_container(&bytes, Layout::Tagged).unwrap();
        assert_eq!(
            vec![SubmeshDescriptor {
                index: 0,
                convexity: Convexity::Mesh,
                layer: 2,
                layer_name: "@LIQUID",
                vertex_count: 4,
                face_count: 2,
                bvh_size: 0,
                vertex_block_offset: 0x70,
                face_block_offset: 0xA0,
                record_offset: 0x60,
                resume_offset: 0xA0,
            }],
            descriptors
        );
    }

    #[test]
    fn decode_descriptors_in_table_order() {
        let mut table = hex!(03000000 00000000 00000000 00000000).to_vec();
        for layer in 0..3u8 {
            let mut record = [0u8; 64];
            record[4] = layer;
            table.extend_from_slice(&record);
        }
        let bytes = file_with_table(&table);

        let descriptors = decode_container(&bytes, Layout::Tagged).unwrap();
        assert_eq!(3, descriptors.len());
        for (i, d) in descriptors.iter().enumerate() {
            assert_eq!(i, d.index);
            assert_eq!(i as i32, d.layer);
            assert_eq!(FIRST_SUBMESH_OFFSET + 64 * i as u64, d.record_offset);
            assert_eq!(FIRST_SUBMESH_OFFSET + 64 * (i as u64 + 1), d.resume_offset);
        }
        assert_eq!(
            vec!["@NONE", "@SOLID", "@LIQUID"],
            descriptors.iter().map(|d| d.layer_name).collect::<Vec<_>>()
        );
    }

    #[test]
    fn decode_empty_table() {
        let bytes = file_with_table(&hex!(00000000 00000000 00000000 00000000));
        assert!(decode_container(&bytes, Layout::Tagged).unwrap().is_empty());
    }

    #[test]
    fn decode_file_shorter_than_table() {
        let bytes = vec![0u8; 0x52];
        assert!(matches!(
            decode_container(&bytes, Layout::Tagged),
            Err(Error::TruncatedData { offset: 0x50, .. })
        ));
    }

    #[test]
    fn decode_negative_count() {
        let bytes = file_with_table(&hex!(ffffffff 00000000 00000000 00000000));
        assert!(matches!(
            decode_container(&bytes, Layout::Tagged),
            Err(Error::MalformedHeader {
                offset: 0x50,
                value: -1,
                ..
            })
        ));
    }

    #[test]
    fn decode_implausible_count() {
        let bytes = file_with_table(&hex!(ffffff7f 00000000 00000000 00000000));
        assert!(matches!(
            decode_container(&bytes, Layout::Tagged),
            Err(Error::MalformedHeader {
                value: 0x7fffffff,
                ..
            })
        ));
    }

    #[test]
    fn decode_count_past_end_of_file() {
        // The count claims 2 records, but only the first record is present.
        let bytes = file_with_table(&hex!(
            02000000 00000000 00000000 00000000
            00000000 01000000 00000000 00000000
            00000000 00000000 00000000 00000000
            00000000 00000000 00000000 00000000
            00000000 00000000 00000000 00000000
        ));
        assert!(matches!(
            decode_container(&bytes, Layout::Tagged),
            Err(Error::TruncatedData {
                offset: 0xA0,
                needed: 64,
                remaining: 0
            })
        ));
    }

    #[test]
    fn decode_large_count_past_end_of_file() {
        // Far more records than the file can hold but fewer than the remaining byte count.
        let mut bytes = file_with_table(&hex!(00000000 00000000 00000000 00000000));
        bytes.extend_from_slice(&[0u8; 1024]);
        let count = 1024i32 / 2;
        bytes[0x50..0x54].copy_from_slice(&count.to_le_bytes());

        assert!(matches!(
            decode_container(&bytes, Layout::Tagged),
            Err(Error::TruncatedData {
                offset: 0x460,
                needed: 64,
                remaining: 0
            })
        ));
    }

    #[test]
    fn descriptor_capacity_limited_by_file_size() {
        assert_eq!(16, descriptor_capacity(512, 1024));
        assert_eq!(16, descriptor_capacity(512, 1024 + 63));
        assert_eq!(3, descriptor_capacity(3, 1024));
        assert_eq!(0, descriptor_capacity(1, 63));
        assert_eq!(16382, descriptor_capacity(1048480, 1048480));
    }

    #[test]
    fn decode_unknown_layer() {
        let bytes = file_with_table(&hex!(
            01000000 00000000 00000000 00000000
            00000000 20000000 00000000 00000000
            00000000 00000000 00000000 00000000
            00000000 00000000 00000000 00000000
            00000000 00000000 00000000 00000000
        ));
        assert!(matches!(
            decode_container(&bytes, Layout::Tagged),
            Err(Error::UnknownTag {
                offset: 0x64,
                table: TagTable::Layer,
                code: 32
            })
        ));
    }

    #[test]
    fn decode_negative_vertex_count() {
        let bytes = file_with_table(&hex!(
            01000000 00000000 00000000 00000000
            00000000 01000000 ffffffff 00000000
            00000000 00000000 00000000 00000000
            00000000 00000000 00000000 00000000
            00000000 00000000 00000000 00000000
        ));
        assert!(matches!(
            decode_container(&bytes, Layout::Tagged),
            Err(Error::MalformedHeader {
                offset: 0x68,
                field: "vertex count",
                value: -1
            })
        ));
    }

    #[test]
    fn untagged_layout_ignores_convexity() {
        let bytes = file_with_table(&hex!(
            01000000 00000000 00000000 00000000
            02000000 01000000 00000000 00000000
            00000000 00000000 00000000 00000000
            00000000 00000000 00000000 00000000
            00000000 00000000 00000000 00000000
        ));

        let tagged = decode_container(&bytes, Layout::Tagged).unwrap();
        assert_eq!(Convexity::ConvexHull, tagged[0].convexity);
        assert_eq!("@SOLID@CONVEX", tagged[0].tag_suffix());

        let untagged = decode_container(&bytes, Layout::Untagged).unwrap();
        assert_eq!(Convexity::Mesh, untagged[0].convexity);
        assert_eq!("@SOLID", untagged[0].tag_suffix());
    }

    #[test]
    fn convexity_from_raw() {
        assert_eq!(Convexity::Mesh, Convexity::from(0));
        assert_eq!(Convexity::ConvexHull, Convexity::from(2));
        assert_eq!(Convexity::Other(1), Convexity::from(1));
        assert!(!Convexity::Other(1).is_convex());
    }
}
