use std::path::Path;

use strata_world::{Chunk, ChunkDataError};

use crate::error::PersistError;
use crate::format::{CHUNK_FILE_SIZE, HEIGHTMAP_BLOCK_SIZE, VOXEL_BLOCK_SIZE};

/// Serialize one chunk: voxel codes, column heights, non-air count.
pub fn encode_chunk(chunk: &Chunk) -> Vec<u8> {
    let mut buf = Vec::with_capacity(CHUNK_FILE_SIZE);
    buf.extend_from_slice(chunk.voxel_bytes());
    for &h in chunk.heightmap() {
        buf.extend_from_slice(&h.to_le_bytes());
    }
    buf.extend_from_slice(&chunk.non_air_count().to_le_bytes());
    debug_assert_eq!(buf.len(), CHUNK_FILE_SIZE);
    buf
}

/// Parse one chunk. The count must agree with the voxels. A stale height
/// cache is rebuilt from the voxels with a warning.
pub fn decode_chunk(bytes: &[u8]) -> Result<Chunk, PersistError> {
    if bytes.len() < CHUNK_FILE_SIZE {
        return Err(PersistError::Truncated {
            expected: CHUNK_FILE_SIZE,
            actual: bytes.len(),
        });
    }
    if bytes.len() > CHUNK_FILE_SIZE {
        return Err(PersistError::Corrupt(format!(
            "{} trailing bytes after chunk data",
            bytes.len() - CHUNK_FILE_SIZE
        )));
    }

    let (codes, rest) = bytes.split_at(VOXEL_BLOCK_SIZE);
    let (height_bytes, count_bytes) = rest.split_at(HEIGHTMAP_BLOCK_SIZE);

    let heightmap: Vec<i32> = height_bytes
        .chunks_exact(4)
        .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    let non_air_count = u32::from_le_bytes([count_bytes[0], count_bytes[1], count_bytes[2], count_bytes[3]]);

    let chunk = Chunk::from_raw_voxels(codes, non_air_count).map_err(chunk_data_error)?;
    if let Err(e) = chunk.check_height_cache(&heightmap) {
        log::warn!("rebuilt stale chunk height cache: {e}");
    }
    Ok(chunk)
}

fn chunk_data_error(err: ChunkDataError) -> PersistError {
    match err {
        ChunkDataError::Allocation(e) => PersistError::Allocation(e),
        other => PersistError::Corrupt(other.to_string()),
    }
}

/// Write a chunk file, replacing any existing one.
pub fn save_chunk(path: &Path, chunk: &Chunk) -> Result<(), PersistError> {
    std::fs::write(path, encode_chunk(chunk))?;
    log::debug!("saved chunk to {}", path.display());
    Ok(())
}

/// Read a chunk file. A missing file is `NotFound`, so callers can
/// generate terrain instead.
pub fn load_chunk(path: &Path) -> Result<Chunk, PersistError> {
    let bytes = std::fs::read(path).map_err(|e| PersistError::from_read(path, e))?;
    let chunk = decode_chunk(&bytes)?;
    log::debug!(
        "loaded chunk from {} ({} solid voxels)",
        path.display(),
        chunk.non_air_count()
    );
    Ok(chunk)
}
