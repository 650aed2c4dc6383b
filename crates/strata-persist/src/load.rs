use std::collections::HashSet;
use std::path::Path;

use strata_world::{Chunk, World, WorldConfig};

use crate::chunk_file::decode_chunk;
use crate::compat;
use crate::compress;
use crate::error::PersistError;
use crate::format::*;

/// Parsed archive ready for world reconstruction.
pub struct WorldArchive {
    pub header: ArchiveHeader,
    /// Chunks in table order, keyed by grid id.
    pub chunks: Vec<(u32, Chunk)>,
    /// Compatibility warnings (e.g., seed mismatch).
    pub warnings: Vec<String>,
}

/// Parse and validate an archive from raw bytes.
pub fn decode_archive(bytes: &[u8], current_seed: u64) -> Result<WorldArchive, PersistError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PersistError::Truncated {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        });
    }

    let header: ArchiveHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
    let warnings = compat::validate_header(&header, current_seed)?;

    let grid_size = header.chunks_wide as usize * header.chunks_deep as usize;
    let chunk_count = header.chunk_count as usize;
    if chunk_count > grid_size {
        return Err(PersistError::Corrupt(format!(
            "{chunk_count} chunks stored for a {grid_size}-chunk grid"
        )));
    }

    let table_end = HEADER_SIZE + chunk_count * CHUNK_TABLE_ENTRY_SIZE;
    if bytes.len() < table_end {
        return Err(PersistError::Truncated {
            expected: table_end,
            actual: bytes.len(),
        });
    }

    let mut seen = HashSet::with_capacity(chunk_count);
    let mut chunks = Vec::with_capacity(chunk_count);
    for raw in bytes[HEADER_SIZE..table_end].chunks_exact(CHUNK_TABLE_ENTRY_SIZE) {
        let mut entry_bytes = [0u8; CHUNK_TABLE_ENTRY_SIZE];
        entry_bytes.copy_from_slice(raw);
        let entry = ChunkTableEntry::from_bytes(&entry_bytes);

        if entry.chunk_id as usize >= grid_size {
            return Err(PersistError::Corrupt(format!(
                "chunk id {} outside {}x{} grid",
                entry.chunk_id, header.chunks_wide, header.chunks_deep
            )));
        }
        if !seen.insert(entry.chunk_id) {
            return Err(PersistError::Corrupt(format!(
                "chunk id {} stored twice",
                entry.chunk_id
            )));
        }

        let start = usize::try_from(entry.offset)
            .map_err(|_| PersistError::Corrupt(format!("offset {} out of range", entry.offset)))?;
        let end = start.saturating_add(entry.size as usize);
        if start < table_end || end > bytes.len() {
            return Err(PersistError::Truncated {
                expected: end,
                actual: bytes.len(),
            });
        }

        let raw_chunk = compress::decompress_chunk(&bytes[start..end])?;
        chunks.push((entry.chunk_id, decode_chunk(&raw_chunk)?));
    }

    Ok(WorldArchive {
        header,
        chunks,
        warnings,
    })
}

/// Rebuild a world from an archive. Stored chunks are inserted as saved;
/// slots the archive lacks regenerate from `config`'s terrain. Returns the
/// world and any compatibility warnings.
pub fn load_world(bytes: &[u8], config: WorldConfig) -> Result<(World, Vec<String>), PersistError> {
    let archive = decode_archive(bytes, config.seed)?;

    let stored = (archive.header.chunks_wide as usize, archive.header.chunks_deep as usize);
    if stored != (config.chunks_wide, config.chunks_deep) {
        return Err(PersistError::Corrupt(format!(
            "archive grid {}x{} does not match world grid {}x{}",
            stored.0, stored.1, config.chunks_wide, config.chunks_deep
        )));
    }

    for warning in &archive.warnings {
        log::warn!("{warning}");
    }

    let mut world = World::without_chunks(config)?;
    let loaded = archive.chunks.len();
    for (id, chunk) in archive.chunks {
        world.insert_chunk(id as usize, chunk)?;
    }

    let mut regenerated = 0;
    for id in 0..world.chunk_count() {
        if world.chunk(id).is_none() {
            world.regenerate_chunk(id)?;
            regenerated += 1;
        }
    }

    log::info!(
        "loaded world: {loaded} chunks from archive, {regenerated} regenerated ({} bytes)",
        bytes.len()
    );
    Ok((world, archive.warnings))
}

pub fn load_world_from_file(
    path: &Path,
    config: WorldConfig,
) -> Result<(World, Vec<String>), PersistError> {
    let bytes = std::fs::read(path).map_err(|e| PersistError::from_read(path, e))?;
    load_world(&bytes, config)
}
