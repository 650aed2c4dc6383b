use bytemuck::{Pod, Zeroable};
use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Chunk coordinate on the world grid (x = column, y = row along world z).
pub type ChunkCoord = IVec2;

/// Block type stored in each voxel. `Air` is the empty sentinel; every
/// other variant is solid.
///
/// Discriminants are the on-disk byte codes and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Air = 0,
    Crust = 1,
    Grass = 2,
    Dirt = 3,
    Stone = 4,
}

/// All block types in byte-code order.
pub const ALL_BLOCK_TYPES: [BlockType; 5] = [
    BlockType::Air,
    BlockType::Crust,
    BlockType::Grass,
    BlockType::Dirt,
    BlockType::Stone,
];

impl BlockType {
    /// Decode an on-disk byte code.
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(BlockType::Air),
            1 => Some(BlockType::Crust),
            2 => Some(BlockType::Grass),
            3 => Some(BlockType::Dirt),
            4 => Some(BlockType::Stone),
            _ => None,
        }
    }

    pub fn is_air(self) -> bool {
        self == BlockType::Air
    }

    pub fn is_solid(self) -> bool {
        !self.is_air()
    }

    /// Layer in the block texture array. Air is never drawn.
    pub fn palette_index(self) -> Option<u32> {
        match self {
            BlockType::Air => None,
            BlockType::Grass => Some(0),
            BlockType::Stone => Some(1),
            BlockType::Dirt => Some(2),
            BlockType::Crust => Some(3),
        }
    }
}

impl TryFrom<u8> for BlockType {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        BlockType::from_u8(code).ok_or(code)
    }
}

impl From<BlockType> for u8 {
    fn from(block: BlockType) -> u8 {
        block as u8
    }
}

/// One grid cell. Stored as the raw byte code so a chunk's voxel array
/// can be viewed as `&[u8]` for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Voxel {
    code: u8,
}

impl Voxel {
    pub const AIR: Voxel = Voxel { code: 0 };

    pub fn new(block_type: BlockType) -> Self {
        Self {
            code: block_type as u8,
        }
    }

    /// Block type of this voxel. Unknown codes read as air; they can only
    /// arise from a raw byte cast, and loaders reject them before that.
    pub fn block_type(self) -> BlockType {
        BlockType::from_u8(self.code).unwrap_or(BlockType::Air)
    }

    pub fn code(self) -> u8 {
        self.code
    }
}

impl From<BlockType> for Voxel {
    fn from(block_type: BlockType) -> Self {
        Voxel::new(block_type)
    }
}
