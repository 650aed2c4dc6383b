//! Byte layouts.
//!
//! Single chunk file, no header, little-endian:
//!   voxels        VOXELS_PER_CHUNK x u8 block code
//!   heightmap     COLUMNS_PER_CHUNK x i32
//!   non_air_count u32
//!
//! World archive:
//!   header        ArchiveHeader (24 bytes)
//!   chunk table   chunk_count x (chunk_id: u32, offset: u64, size: u32)
//!   data blocks   LZ4 (size-prepended) single chunk files

use strata_core::constants::{COLUMNS_PER_CHUNK, VOXELS_PER_CHUNK};

pub const VOXEL_BLOCK_SIZE: usize = VOXELS_PER_CHUNK;

pub const HEIGHTMAP_BLOCK_SIZE: usize = COLUMNS_PER_CHUNK * 4;

pub const COUNT_BLOCK_SIZE: usize = 4;

/// Exact size of a single chunk file.
pub const CHUNK_FILE_SIZE: usize = VOXEL_BLOCK_SIZE + HEIGHTMAP_BLOCK_SIZE + COUNT_BLOCK_SIZE;

/// Magic bytes identifying a Strata world archive.
pub const MAGIC: [u8; 4] = *b"STRA";

/// Current archive format version.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the archive header in bytes.
pub const HEADER_SIZE: usize = 24;

/// Size of each chunk table entry in bytes.
pub const CHUNK_TABLE_ENTRY_SIZE: usize = 16;

/// World archive header. repr(C) for byte-level serialization.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ArchiveHeader {
    pub magic: [u8; 4],
    pub version: u16,
    pub _pad0: u16,
    pub world_seed: u64,
    pub chunks_wide: u16,
    pub chunks_deep: u16,
    pub chunk_count: u32,
}

/// One chunk table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkTableEntry {
    pub chunk_id: u32,
    pub offset: u64,
    pub size: u32,
}

impl ChunkTableEntry {
    pub fn to_bytes(self) -> [u8; CHUNK_TABLE_ENTRY_SIZE] {
        let mut out = [0u8; CHUNK_TABLE_ENTRY_SIZE];
        out[0..4].copy_from_slice(&self.chunk_id.to_le_bytes());
        out[4..12].copy_from_slice(&self.offset.to_le_bytes());
        out[12..16].copy_from_slice(&self.size.to_le_bytes());
        out
    }

    pub fn from_bytes(b: &[u8; CHUNK_TABLE_ENTRY_SIZE]) -> Self {
        Self {
            chunk_id: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            offset: u64::from_le_bytes([b[4], b[5], b[6], b[7], b[8], b[9], b[10], b[11]]),
            size: u32::from_le_bytes([b[12], b[13], b[14], b[15]]),
        }
    }
}
