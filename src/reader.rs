use binread::io::{Cursor, Seek, SeekFrom};
use binread::{BinRead, BinReaderExt};

use crate::vectors::{FixedSize, Triangle, Vector3};
use crate::{Error, Result};

/// A bounds checked little endian cursor over an in memory file.
///
/// Reads never consume partial values. If fewer bytes remain than a value needs,
/// the read fails with [Error::TruncatedData] and the position is unchanged.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    /// The total length of the buffer in bytes.
    pub fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The current absolute position.
    pub fn tell(&self) -> u64 {
        self.cursor.position()
    }

    /// The number of bytes between the current position and the end of the buffer.
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.tell())
    }

    /// Moves to `offset` bytes from the start of the buffer.
    /// Seeking exactly to the end is allowed so empty blocks can be read.
    pub fn seek_absolute(&mut self, offset: u64) -> Result<()> {
        if offset > self.len() {
            return Err(Error::OffsetPastEnd {
                offset,
                len: self.len(),
            });
        }
        self.cursor.set_position(offset);
        Ok(())
    }

    /// Advances the position by `count` bytes.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        self.ensure_remaining(count)?;
        self.cursor.seek(SeekFrom::Current(count as i64))?;
        Ok(())
    }

    /// Checks that at least `needed` bytes remain at the current position.
    pub fn ensure_remaining(&self, needed: u64) -> Result<()> {
        let remaining = self.remaining();
        if remaining < needed {
            Err(Error::TruncatedData {
                offset: self.tell(),
                needed,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    /// Reads a single fixed size little endian value.
    pub fn read<T>(&mut self) -> Result<T>
    where
        T: BinRead<Args = ()> + FixedSize,
    {
        self.ensure_remaining(T::SIZE_IN_BYTES)?;
        let value = self.cursor.read_le::<T>()?;
        Ok(value)
    }

    /// Reads `count` consecutive values.
    /// The whole range is checked up front, so a corrupt count can't trigger a large allocation.
    pub fn read_array<T>(&mut self, count: usize) -> Result<Vec<T>>
    where
        T: BinRead<Args = ()> + FixedSize,
    {
        let needed = (count as u64).saturating_mul(T::SIZE_IN_BYTES);
        self.ensure_remaining(needed)?;

        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.cursor.read_le::<T>()?);
        }
        Ok(elements)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read()
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.read()
    }

    pub fn read_f32x3(&mut self) -> Result<Vector3> {
        self.read()
    }

    pub fn read_u16x3(&mut self) -> Result<Triangle> {
        self.read()
    }
}
