//! Single source of truth for chunk dimensions and vertex layout.
//! The picking pass packs chunk-local coordinates into 8-bit colour
//! channels, so the dimensions below are bounded by what fits in a byte.

/// Chunk width in voxels (x axis).
pub const CHUNK_X: usize = 16;

/// Chunk height in voxels (y axis).
pub const CHUNK_Y: usize = 256;

/// Chunk depth in voxels (z axis).
pub const CHUNK_Z: usize = 16;

/// Total voxels per chunk.
pub const VOXELS_PER_CHUNK: usize = CHUNK_X * CHUNK_Y * CHUNK_Z;

/// Number of (x, z) columns per chunk, one heightmap entry each.
pub const COLUMNS_PER_CHUNK: usize = CHUNK_X * CHUNK_Z;

/// Heightmap value for a column that holds no solid voxel.
pub const EMPTY_COLUMN: i32 = -1;

/// Depth of solid ground added beneath every terrain heightmap sample.
pub const UNDERGROUND_HEIGHT: i32 = 16;

/// Largest number of chunks a world may hold. Chunk ids travel in the
/// alpha channel of the picking pass.
pub const MAX_CHUNKS: usize = 256;

/// Faces on a voxel.
pub const FACES_PER_VOXEL: usize = 6;

/// Vertices per emitted face (two triangles, unindexed).
pub const FACE_VERTS: usize = 6;

/// Position components per vertex.
pub const VP_COMPS: usize = 3;

/// Texture coordinate components per vertex.
pub const VT_COMPS: usize = 2;

/// Normal components per vertex: xyz plus the sunlit flag in w.
pub const VN_COMPS: usize = 4;

/// Picking components per vertex (r, g, b of the picking colour).
pub const VPICKING_COMPS: usize = 3;

/// Face edge flags per vertex: left, right, top, bottom.
pub const VEDGE_COMPS: usize = 4;

/// Upper bound on vertices a single solid voxel can emit.
pub const MAX_VERTS_PER_VOXEL: usize = FACES_PER_VOXEL * FACE_VERTS;

// Picking channel limits: local x/z packed into R, y into G.
const _: () = assert!(CHUNK_X * CHUNK_Z <= 256);
const _: () = assert!(CHUNK_Y <= 256);
const _: () = assert!(MAX_CHUNKS <= 256);
