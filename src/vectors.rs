use binread::BinRead;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The size in bytes of a type as stored in the file.
///
/// The reader checks this many bytes remain before decoding a value.
pub trait FixedSize {
    const SIZE_IN_BYTES: u64;
}

macro_rules! fixed_size_impl {
    ($($ty:ty),*) => {
        $(
            impl FixedSize for $ty {
                const SIZE_IN_BYTES: u64 = std::mem::size_of::<$ty>() as u64;
            }
        )*
    };
}

fixed_size_impl!(u8, u16, u32, u64, i8, i16, i32, i64, f32);

/// 3 contiguous floats for encoding XYZ vertex positions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(BinRead, Debug, PartialEq, Clone, Copy, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Vector3 {
        Vector3 { x, y, z }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl FixedSize for Vector3 {
    const SIZE_IN_BYTES: u64 = 12;
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

/// The vertex indices for a single triangle face.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(BinRead, Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Triangle {
    pub v0: u16,
    pub v1: u16,
    pub v2: u16,
}

impl Triangle {
    pub fn new(v0: u16, v1: u16, v2: u16) -> Triangle {
        Triangle { v0, v1, v2 }
    }

    pub fn indices(&self) -> [u16; 3] {
        [self.v0, self.v1, self.v2]
    }
}

impl FixedSize for Triangle {
    const SIZE_IN_BYTES: u64 = 6;
}

impl From<[u16; 3]> for Triangle {
    fn from(v: [u16; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}
