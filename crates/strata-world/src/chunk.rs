use strata_core::constants::{
    CHUNK_X, CHUNK_Y, CHUNK_Z, COLUMNS_PER_CHUNK, EMPTY_COLUMN, UNDERGROUND_HEIGHT,
    VOXELS_PER_CHUNK,
};
use strata_core::error::try_alloc_slice;
use strata_core::math::in_chunk_bounds;
use strata_core::{BlockType, ColumnIndex, CoreError, Face, Voxel, VoxelIndex};
use thiserror::Error;

use crate::heightmap::HeightmapBuffer;

/// Reasons raw chunk data cannot be turned into a `Chunk`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkDataError {
    #[error("{what} has {actual} entries, expected {expected}")]
    WrongLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown block code {code} at voxel {index}")]
    UnknownBlockCode { index: usize, code: u8 },

    #[error("column {column} stores height {stored}, voxels say {actual}")]
    HeightMismatch {
        column: usize,
        stored: i32,
        actual: i32,
    },

    #[error("stored non-air count {stored} does not match {actual}")]
    CountMismatch { stored: u32, actual: u32 },

    #[error(transparent)]
    Allocation(#[from] CoreError),
}

/// Dense 16x256x16 block grid with a per-column top-voxel cache and a
/// running non-air count. Both caches are maintained by `set_block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    voxels: Box<[Voxel]>,
    heightmap: Box<[i32]>,
    non_air_count: u32,
}

impl Chunk {
    /// All air.
    pub fn empty() -> Result<Self, CoreError> {
        Ok(Self {
            voxels: try_alloc_slice("chunk voxels", VOXELS_PER_CHUNK, Voxel::AIR)?,
            heightmap: try_alloc_slice("chunk heightmap", COLUMNS_PER_CHUNK, EMPTY_COLUMN)?,
            non_air_count: 0,
        })
    }

    /// A single layer of crust at y = 0.
    pub fn flat() -> Result<Self, CoreError> {
        let mut chunk = Self::empty()?;
        chunk.voxels[..COLUMNS_PER_CHUNK].fill(Voxel::new(BlockType::Crust));
        chunk.heightmap.fill(0);
        chunk.non_air_count = COLUMNS_PER_CHUNK as u32;
        Ok(chunk)
    }

    /// Fill columns from terrain samples starting at (`x_offset`, `z_offset`)
    /// in the heightmap. Each column gets grass on top, one dirt, stone
    /// below and crust at y = 0. Sampling wraps at the heightmap edges.
    pub fn generate(
        heightmap: &HeightmapBuffer,
        use_filtered: bool,
        x_offset: usize,
        z_offset: usize,
    ) -> Result<Self, CoreError> {
        let mut chunk = Self::empty()?;
        let samples = heightmap.samples(use_filtered);
        let hm_w = heightmap.width();
        let hm_h = heightmap.height();

        for z in 0..CHUNK_Z as i32 {
            for x in 0..CHUNK_X as i32 {
                let Some(column) = ColumnIndex::new(x, z) else {
                    continue;
                };
                let sx = (x_offset + x as usize) % hm_w;
                let sz = (z_offset + z as usize) % hm_h;
                let sample = samples[sz * hm_w + sx] as i32;
                let h = (sample + UNDERGROUND_HEIGHT).clamp(1, CHUNK_Y as i32 - 1);

                for y in 0..=h {
                    let block = match y {
                        0 => BlockType::Crust,
                        y if y == h => BlockType::Grass,
                        y if y == h - 1 => BlockType::Dirt,
                        _ => BlockType::Stone,
                    };
                    if let Some(index) = VoxelIndex::from_column(column, y) {
                        chunk.voxels[index.get()] = Voxel::new(block);
                    }
                }

                chunk.heightmap[column.get()] = h;
                chunk.non_air_count += h as u32 + 1;
            }
        }
        Ok(chunk)
    }

    /// Rebuild a chunk from raw block codes and stored caches, checking the
    /// caches against the voxels.
    pub fn from_raw_parts(
        codes: &[u8],
        heightmap: &[i32],
        non_air_count: u32,
    ) -> Result<Self, ChunkDataError> {
        if heightmap.len() != COLUMNS_PER_CHUNK {
            return Err(ChunkDataError::WrongLength {
                what: "heightmap",
                expected: COLUMNS_PER_CHUNK,
                actual: heightmap.len(),
            });
        }
        let chunk = Self::from_raw_voxels(codes, non_air_count)?;
        chunk.check_height_cache(heightmap)?;
        Ok(chunk)
    }

    /// Rebuild a chunk from raw block codes, recomputing the height cache
    /// from the voxels. The stored count must still match.
    pub fn from_raw_voxels(codes: &[u8], non_air_count: u32) -> Result<Self, ChunkDataError> {
        if codes.len() != VOXELS_PER_CHUNK {
            return Err(ChunkDataError::WrongLength {
                what: "voxel array",
                expected: VOXELS_PER_CHUNK,
                actual: codes.len(),
            });
        }

        let mut voxels = try_alloc_slice("chunk voxels", VOXELS_PER_CHUNK, Voxel::AIR)?;
        let mut count = 0u32;
        for (index, (&code, voxel)) in codes.iter().zip(voxels.iter_mut()).enumerate() {
            let block = BlockType::from_u8(code)
                .ok_or(ChunkDataError::UnknownBlockCode { index, code })?;
            if block.is_solid() {
                count += 1;
            }
            *voxel = Voxel::new(block);
        }
        if count != non_air_count {
            return Err(ChunkDataError::CountMismatch {
                stored: non_air_count,
                actual: count,
            });
        }

        let mut chunk = Self {
            voxels,
            heightmap: try_alloc_slice("chunk heightmap", COLUMNS_PER_CHUNK, EMPTY_COLUMN)?,
            non_air_count,
        };
        for raw in 0..COLUMNS_PER_CHUNK {
            if let Some(column) = ColumnIndex::from_raw(raw) {
                chunk.heightmap[raw] = chunk.scan_column(column, CHUNK_Y as i32 - 1);
            }
        }
        Ok(chunk)
    }

    /// First column whose `stored` height disagrees with this chunk's cache.
    pub fn check_height_cache(&self, stored: &[i32]) -> Result<(), ChunkDataError> {
        if stored.len() != COLUMNS_PER_CHUNK {
            return Err(ChunkDataError::WrongLength {
                what: "heightmap",
                expected: COLUMNS_PER_CHUNK,
                actual: stored.len(),
            });
        }
        match stored
            .iter()
            .zip(self.heightmap.iter())
            .position(|(s, a)| s != a)
        {
            Some(column) => Err(ChunkDataError::HeightMismatch {
                column,
                stored: stored[column],
                actual: self.heightmap[column],
            }),
            None => Ok(()),
        }
    }

    /// `None` if any coordinate is outside the chunk.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        VoxelIndex::new(x, y, z).map(|i| self.voxels[i.get()].block_type())
    }

    /// Write one voxel. Returns `false` without touching anything if the
    /// position is outside the chunk or the block is unchanged.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        let Some(index) = VoxelIndex::new(x, y, z) else {
            return false;
        };
        let previous = self.voxels[index.get()].block_type();
        if previous == block {
            return false;
        }
        self.voxels[index.get()] = Voxel::new(block);

        match (previous.is_air(), block.is_air()) {
            (true, false) => self.non_air_count += 1,
            (false, true) => self.non_air_count -= 1,
            _ => {}
        }

        let column = index.column();
        let top = self.heightmap[column.get()];
        if block.is_solid() && y > top {
            self.heightmap[column.get()] = y;
        } else if block.is_air() && y == top {
            self.heightmap[column.get()] = self.scan_column(column, y - 1);
        }
        true
    }

    /// Highest solid y in `column` at or below `from`, or `EMPTY_COLUMN`.
    fn scan_column(&self, column: ColumnIndex, from: i32) -> i32 {
        (0..=from)
            .rev()
            .find(|&y| {
                VoxelIndex::from_column(column, y)
                    .is_some_and(|i| self.voxels[i.get()].block_type().is_solid())
            })
            .unwrap_or(EMPTY_COLUMN)
    }

    /// Cached top solid y of column (x, z); `EMPTY_COLUMN` when the column
    /// is all air.
    pub fn column_height(&self, x: i32, z: i32) -> Option<i32> {
        ColumnIndex::new(x, z).map(|c| self.heightmap[c.get()])
    }

    /// True when nothing solid sits above (x, y, z) in its column, or the
    /// position is outside the chunk.
    pub fn is_voxel_above_surface(&self, x: i32, y: i32, z: i32) -> bool {
        if !in_chunk_bounds(x, y, z) {
            return true;
        }
        match self.column_height(x, z) {
            Some(top) => y > top,
            None => true,
        }
    }

    /// Whether light from straight above reaches the cell across `face`.
    /// Cells beyond the chunk edge count as lit.
    pub fn is_face_exposed_to_sun(&self, x: i32, y: i32, z: i32, face: Face) -> bool {
        let n = face.offset();
        self.is_voxel_above_surface(x + n.x, y + n.y, z + n.z)
    }

    pub fn non_air_count(&self) -> u32 {
        self.non_air_count
    }

    pub fn is_empty(&self) -> bool {
        self.non_air_count == 0
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Voxel array as on-disk block codes.
    pub fn voxel_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.voxels)
    }

    pub fn heightmap(&self) -> &[i32] {
        &self.heightmap
    }
}
