use std::path::Path;

use strata_world::{Chunk, World};

use crate::chunk_file::encode_chunk;
use crate::compress;
use crate::error::PersistError;
use crate::format::*;

/// One chunk to write into an archive.
pub struct ChunkRecord<'a> {
    pub chunk_id: u32,
    pub chunk: &'a Chunk,
}

/// Serialize chunks into the archive format.
///
/// Layout: header (24B) + chunk table (16B x N) + LZ4 data blocks.
pub fn encode_archive(
    world_seed: u64,
    chunks_wide: u16,
    chunks_deep: u16,
    chunks: &[ChunkRecord<'_>],
) -> Vec<u8> {
    let compressed_blocks: Vec<Vec<u8>> = chunks
        .iter()
        .map(|record| compress::compress_chunk(&encode_chunk(record.chunk)))
        .collect();

    let data_start = HEADER_SIZE + chunks.len() * CHUNK_TABLE_ENTRY_SIZE;
    let total_data_size: usize = compressed_blocks.iter().map(|b| b.len()).sum();

    let header = ArchiveHeader {
        magic: MAGIC,
        version: FORMAT_VERSION,
        _pad0: 0,
        world_seed,
        chunks_wide,
        chunks_deep,
        chunk_count: chunks.len() as u32,
    };

    let mut output = Vec::with_capacity(data_start + total_data_size);
    output.extend_from_slice(bytemuck::bytes_of(&header));

    let mut offset = data_start as u64;
    for (record, block) in chunks.iter().zip(&compressed_blocks) {
        let entry = ChunkTableEntry {
            chunk_id: record.chunk_id,
            offset,
            size: block.len() as u32,
        };
        output.extend_from_slice(&entry.to_bytes());
        offset += block.len() as u64;
    }

    for block in &compressed_blocks {
        output.extend_from_slice(block);
    }

    output
}

/// Archive every resident chunk of `world`. Absent slots are skipped and
/// regenerate from terrain on load.
pub fn save_world(world: &World) -> Vec<u8> {
    let records: Vec<ChunkRecord<'_>> = (0..world.chunk_count())
        .filter_map(|id| {
            world.chunk(id).map(|chunk| ChunkRecord {
                chunk_id: id as u32,
                chunk,
            })
        })
        .collect();

    let config = world.config();
    // Grid dimensions are bounded by MAX_CHUNKS.
    let bytes = encode_archive(
        config.seed,
        config.chunks_wide as u16,
        config.chunks_deep as u16,
        &records,
    );
    log::info!("saved {} chunks ({} bytes)", records.len(), bytes.len());
    bytes
}

pub fn save_world_to_file(path: &Path, world: &World) -> Result<(), PersistError> {
    std::fs::write(path, save_world(world))?;
    Ok(())
}
