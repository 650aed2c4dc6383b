use crate::constants::{CHUNK_X, CHUNK_Y, CHUNK_Z, COLUMNS_PER_CHUNK, VOXELS_PER_CHUNK};
use crate::types::ChunkCoord;
use glam::{IVec2, IVec3};

/// Flat index into a chunk's voxel array. Layout is y-major:
/// `y * CHUNK_X * CHUNK_Z + z * CHUNK_X + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoxelIndex(usize);

impl VoxelIndex {
    /// Returns `None` if any coordinate lies outside the chunk.
    pub fn new(x: i32, y: i32, z: i32) -> Option<Self> {
        ColumnIndex::new(x, z).and_then(|column| Self::from_column(column, y))
    }

    /// Voxel at height `y` in `column`. `None` above or below the chunk.
    pub fn from_column(column: ColumnIndex, y: i32) -> Option<Self> {
        if y < 0 || y >= CHUNK_Y as i32 {
            return None;
        }
        Some(Self(y as usize * COLUMNS_PER_CHUNK + column.0))
    }

    pub fn from_ivec3(pos: IVec3) -> Option<Self> {
        Self::new(pos.x, pos.y, pos.z)
    }

    /// Inverse of the flat layout. `None` past the end of the chunk.
    pub fn from_raw(index: usize) -> Option<Self> {
        (index < VOXELS_PER_CHUNK).then_some(Self(index))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Heightmap column holding this voxel.
    pub fn column(self) -> ColumnIndex {
        ColumnIndex(self.0 % (CHUNK_X * CHUNK_Z))
    }

    pub fn position(self) -> IVec3 {
        let layer = CHUNK_X * CHUNK_Z;
        let y = self.0 / layer;
        let rem = self.0 % layer;
        IVec3::new((rem % CHUNK_X) as i32, y as i32, (rem / CHUNK_X) as i32)
    }
}

/// Flat index into a chunk's per-column heightmap: `z * CHUNK_X + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnIndex(usize);

impl ColumnIndex {
    pub fn new(x: i32, z: i32) -> Option<Self> {
        if x < 0 || z < 0 || x >= CHUNK_X as i32 || z >= CHUNK_Z as i32 {
            return None;
        }
        Some(Self(z as usize * CHUNK_X + x as usize))
    }

    /// Inverse of the flat layout. `None` past the last column.
    pub fn from_raw(index: usize) -> Option<Self> {
        (index < COLUMNS_PER_CHUNK).then_some(Self(index))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

const _: () = assert!(COLUMNS_PER_CHUNK == CHUNK_X * CHUNK_Z);

pub fn in_chunk_bounds(x: i32, y: i32, z: i32) -> bool {
    x >= 0 && y >= 0 && z >= 0 && x < CHUNK_X as i32 && y < CHUNK_Y as i32 && z < CHUNK_Z as i32
}

/// Grid coordinate of chunk `id` in a grid `width` chunks wide.
pub fn chunk_id_to_coord(id: usize, width: usize) -> ChunkCoord {
    IVec2::new((id % width) as i32, (id / width) as i32)
}

/// Chunk id at `coord`, or `None` if outside a `width` x `depth` grid.
pub fn chunk_coord_to_id(coord: ChunkCoord, width: usize, depth: usize) -> Option<usize> {
    if coord.x < 0 || coord.y < 0 || coord.x >= width as i32 || coord.y >= depth as i32 {
        return None;
    }
    Some(coord.y as usize * width + coord.x as usize)
}

/// Resolve a local position that may have stepped one cell past a chunk's
/// horizontal edge. Returns the neighbouring chunk coordinate (possibly the
/// same one) and the wrapped local position. Y is passed through untouched.
pub fn wrap_local(chunk: ChunkCoord, local: IVec3) -> (ChunkCoord, IVec3) {
    let cx = CHUNK_X as i32;
    let cz = CHUNK_Z as i32;
    let chunk = IVec2::new(
        chunk.x + local.x.div_euclid(cx),
        chunk.y + local.z.div_euclid(cz),
    );
    let local = IVec3::new(local.x.rem_euclid(cx), local.y, local.z.rem_euclid(cz));
    (chunk, local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voxel_index_layout() {
        assert_eq!(VoxelIndex::new(0, 0, 0).map(VoxelIndex::get), Some(0));
        assert_eq!(VoxelIndex::new(1, 0, 0).map(VoxelIndex::get), Some(1));
        assert_eq!(VoxelIndex::new(0, 0, 1).map(VoxelIndex::get), Some(CHUNK_X));
        assert_eq!(
            VoxelIndex::new(0, 1, 0).map(VoxelIndex::get),
            Some(CHUNK_X * CHUNK_Z)
        );
        assert_eq!(
            VoxelIndex::new(15, 255, 15).map(VoxelIndex::get),
            Some(VOXELS_PER_CHUNK - 1)
        );
    }

    #[test]
    fn test_voxel_index_out_of_bounds() {
        assert!(VoxelIndex::new(-1, 0, 0).is_none());
        assert!(VoxelIndex::new(0, -1, 0).is_none());
        assert!(VoxelIndex::new(0, 0, CHUNK_Z as i32).is_none());
        assert!(VoxelIndex::new(0, CHUNK_Y as i32, 0).is_none());
        assert!(VoxelIndex::from_raw(VOXELS_PER_CHUNK).is_none());
    }

    #[test]
    fn test_voxel_index_position_roundtrip() {
        let pos = IVec3::new(7, 130, 3);
        let idx = VoxelIndex::from_ivec3(pos).expect("in bounds");
        assert_eq!(idx.position(), pos);
        assert_eq!(Some(idx.column()), ColumnIndex::new(7, 3));
    }

    #[test]
    fn test_voxel_index_from_column() {
        let column = ColumnIndex::new(7, 3).expect("in bounds");
        assert_eq!(VoxelIndex::from_column(column, 130), VoxelIndex::new(7, 130, 3));
        assert!(VoxelIndex::from_column(column, -1).is_none());
        assert!(VoxelIndex::from_column(column, CHUNK_Y as i32).is_none());
        assert_eq!(ColumnIndex::from_raw(column.get()), Some(column));
        assert!(ColumnIndex::from_raw(COLUMNS_PER_CHUNK).is_none());
    }

    #[test]
    fn test_column_index() {
        assert_eq!(ColumnIndex::new(3, 2).map(ColumnIndex::get), Some(2 * CHUNK_X + 3));
        assert!(ColumnIndex::new(CHUNK_X as i32, 0).is_none());
        assert!(ColumnIndex::new(0, -1).is_none());
    }

    #[test]
    fn test_chunk_id_coord_roundtrip() {
        for id in 0..12 {
            let coord = chunk_id_to_coord(id, 4);
            assert_eq!(chunk_coord_to_id(coord, 4, 3), Some(id));
        }
        assert_eq!(chunk_coord_to_id(IVec2::new(4, 0), 4, 3), None);
        assert_eq!(chunk_coord_to_id(IVec2::new(0, -1), 4, 3), None);
    }

    #[test]
    fn test_wrap_local() {
        let c = IVec2::new(2, 2);
        assert_eq!(wrap_local(c, IVec3::new(5, 9, 5)), (c, IVec3::new(5, 9, 5)));
        assert_eq!(
            wrap_local(c, IVec3::new(-1, 9, 4)),
            (IVec2::new(1, 2), IVec3::new(15, 9, 4))
        );
        assert_eq!(
            wrap_local(c, IVec3::new(16, 9, 4)),
            (IVec2::new(3, 2), IVec3::new(0, 9, 4))
        );
        assert_eq!(
            wrap_local(c, IVec3::new(3, 9, -1)),
            (IVec2::new(2, 1), IVec3::new(3, 9, 15))
        );
        assert_eq!(
            wrap_local(c, IVec3::new(3, 9, 16)),
            (IVec2::new(2, 3), IVec3::new(3, 9, 0))
        );
    }
}
