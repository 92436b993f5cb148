//! Tag names for the small integer codes stored in btmesh files.
//!
//! Names include the leading `@` since they are appended directly to object names.
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies which table a tag code indexes into.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagTable {
    /// Surface material types such as `@STONE`.
    Type,
    /// Collision layers such as `@SOLID`.
    Layer,
    /// Per submesh behavior flags such as `@WALL`.
    Flag,
}

impl TagTable {
    pub fn names(self) -> &'static [&'static str] {
        match self {
            TagTable::Type => &TYPES,
            TagTable::Layer => &LAYERS,
            TagTable::Flag => &FLAGS,
        }
    }

    /// Looks up the name for `code`.
    /// `offset` is the file position of the code and is only used for errors.
    pub fn name(self, code: i32, offset: u64) -> Result<&'static str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.names().get(i).copied())
            .ok_or(Error::UnknownTag {
                offset,
                table: self,
                code: code as i64,
            })
    }
}

pub const TYPES: [&str; 31] = [
    "@NONE",
    "@STONE",
    "@EARTH",
    "@WOOD",
    "@GRASS",
    "@IRON",
    "@SAND",
    "@LAVA",
    "@GLASS",
    "@SNOW",
    "@NO_ENTRY",
    "@ICE",
    "@WATER",
    "@SEA",
    "@DAMAGE",
    "@DEAD",
    "@FLOWER0",
    "@FLOWER1",
    "@FLOWER2",
    "@AIR",
    "@DEADLEAVES",
    "@WIREMESH",
    "@DEAD_ANYDIR",
    "@DAMAGE_THROUGH",
    "@DRY_GRASS",
    "@RELIC",
    "@GIANT",
    "@GRAVEL",
    "@MUD_WATER",
    "@SAND2",
    "@SAND3",
];

pub const LAYERS: [&str; 32] = [
    "@NONE",
    "@SOLID",
    "@LIQUID",
    "@THROUGH",
    "@CAMERA",
    "@SOLID_ONEWAY",
    "@SOLID_THROUGH",
    "@SOLID_TINY",
    "@SOLID_DETAIL",
    "@LEAF",
    "@LAND",
    "@RAYBLOCK",
    "@EVENT",
    "@RESERVED13",
    "@RESERVED14",
    "@PLAYER",
    "@ENEMY",
    "@ENEMY_BODY",
    "@GIMMICK",
    "@DYNAMICS",
    "@RING",
    "@CHARACTER_CONTROL",
    "@PLAYER_ONLY",
    "@DYNAMICS_THROUGH",
    "@ENEMY_ONLY",
    "@SENSOR_PLAYER",
    "@SENSOR_RING",
    "@SENSOR_GIMMICK",
    "@SENSOR_LAND",
    "@SENSOR_ALL",
    "@RESERVED30",
    "@RESERVED31",
];

pub const FLAGS: [&str; 21] = [
    "@NOT_STAND",
    "@BREAKABLE",
    "@REST",
    "@UNSUPPORTED",
    "@REFLECT_LASER",
    "@LOOP",
    "@WALL",
    "@SLIDE",
    "@PARKOUR",
    "@DECELERATE",
    "@MOVABLE",
    "@PARKOUR_KNUCKLES",
    "@PRESS_DEAD",
    "@RAYBLOCK",
    "@WALLJUMP",
    "@PUSH_BOX",
    "@STRIDER_FLOOR",
    "@GIANT_TOWER",
    "@PUSHOUT_LANDING",
    "@TEST_GRASS",
    "@TEST_WATER",
];

/// Appended to the tag suffix of submeshes stored as convex point clouds.
pub const CONVEX_SUFFIX: &str = "@CONVEX";

pub fn type_name(code: i32, offset: u64) -> Result<&'static str> {
    TagTable::Type.name(code, offset)
}

pub fn layer_name(code: i32, offset: u64) -> Result<&'static str> {
    TagTable::Layer.name(code, offset)
}

pub fn flag_name(code: i32, offset: u64) -> Result<&'static str> {
    TagTable::Flag.name(code, offset)
}
