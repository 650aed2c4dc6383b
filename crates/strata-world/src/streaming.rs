use strata_core::constants::CHUNK_X;

use crate::chunk_map::ChunkMap;
use crate::draw_queue::DrawQueue;

/// Whether a grid slot currently holds its chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residency {
    /// Voxels in memory; mesh uploaded once remeshed.
    Resident,
    /// Not tracked. Skipped by drawing, picking and edits.
    Absent,
}

/// Distance thresholds for paging chunks in and out. The world keeps
/// every chunk resident unless the caller acts on these suggestions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamingPolicy {
    /// Resident chunks farther than this many chunks are eviction candidates.
    pub evict_distance_chunks: f32,
    /// Absent chunks nearer than this many chunks should be loaded.
    pub load_distance_chunks: f32,
}

impl StreamingPolicy {
    pub fn new(load_distance_chunks: f32, evict_distance_chunks: f32) -> Self {
        Self {
            evict_distance_chunks,
            load_distance_chunks,
        }
    }

    /// Resident chunk ids beyond the evict distance, farthest first.
    /// Reads the queue as last sorted.
    pub fn eviction_candidates(&self, map: &ChunkMap, queue: &DrawQueue, voxel_scale: f32) -> Vec<usize> {
        let limit = sq_world_distance(self.evict_distance_chunks, voxel_scale);
        queue
            .entries()
            .iter()
            .rev()
            .take_while(|e| e.sq_dist > limit)
            .filter(|e| map.get(e.chunk_id).is_some_and(|s| s.chunk().is_some()))
            .map(|e| e.chunk_id)
            .collect()
    }

    /// Absent chunk ids within the load distance, nearest first.
    pub fn load_candidates(&self, map: &ChunkMap, queue: &DrawQueue, voxel_scale: f32) -> Vec<usize> {
        let limit = sq_world_distance(self.load_distance_chunks, voxel_scale);
        queue
            .entries()
            .iter()
            .take_while(|e| e.sq_dist <= limit)
            .filter(|e| map.get(e.chunk_id).is_some_and(|s| s.chunk().is_none()))
            .map(|e| e.chunk_id)
            .collect()
    }
}

fn sq_world_distance(chunks: f32, voxel_scale: f32) -> f32 {
    let d = chunks * CHUNK_X as f32 * voxel_scale;
    d * d
}
