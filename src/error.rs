use thiserror::Error;

use crate::tags::TagTable;

/// Errors while reading a btmesh container or building its submeshes.
///
/// Every format error records the absolute byte offset where it was detected.
#[derive(Error, Debug)]
pub enum Error {
    /// A read needed more bytes than remain in the buffer.
    #[error(
        "Expected {} bytes at offset {:#x} but only {} bytes remain.",
        needed,
        offset,
        remaining
    )]
    TruncatedData {
        offset: u64,
        needed: u64,
        remaining: u64,
    },

    /// A block offset points past the end of a file that is shorter than its header claims.
    #[error(
        "Offset {:#x} is past the end of the buffer with {} bytes.",
        offset,
        len
    )]
    OffsetPastEnd { offset: u64, len: u64 },

    /// The submesh table or a descriptor declares a count that can't be valid.
    #[error("Invalid {} {} at offset {:#x}.", field, value, offset)]
    MalformedHeader {
        offset: u64,
        field: &'static str,
        value: i64,
    },

    /// A triangle refers to a vertex that the submesh doesn't contain.
    #[error(
        "Vertex index {} at offset {:#x} is out of range for submesh {} with {} vertices.",
        vertex_index,
        offset,
        submesh_index,
        vertex_count
    )]
    IndexOutOfRange {
        offset: u64,
        submesh_index: usize,
        vertex_index: u16,
        vertex_count: usize,
    },

    /// A tag code has no entry in its table.
    #[error("Code {} at offset {:#x} is not a known {:?} tag.", code, offset, table)]
    UnknownTag {
        offset: u64,
        table: TagTable,
        code: i64,
    },

    /// An error occurred while loading the file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An error occurred while decoding a field.
    #[error(transparent)]
    BinRead(#[from] binread::Error),
}

impl Error {
    /// The absolute byte offset for format errors or `None` for IO errors.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Error::TruncatedData { offset, .. }
            | Error::OffsetPastEnd { offset, .. }
            | Error::MalformedHeader { offset, .. }
            | Error::IndexOutOfRange { offset, .. }
            | Error::UnknownTag { offset, .. } => Some(*offset),
            Error::Io(_) | Error::BinRead(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
