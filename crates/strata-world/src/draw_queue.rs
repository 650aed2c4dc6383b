use glam::Vec3;

use crate::chunk_map::ChunkMap;

/// One chunk queued for drawing this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawQueueEntry {
    pub chunk_id: usize,
    /// Squared planar distance from the camera to the chunk centre.
    pub sq_dist: f32,
    pub aabb_min: Vec3,
    pub aabb_max: Vec3,
}

/// Chunks ordered nearest first. Rebuilt from the camera every frame.
#[derive(Debug, Clone, Default)]
pub struct DrawQueue {
    entries: Vec<DrawQueueEntry>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DrawQueueEntry] {
        &self.entries
    }

    /// Refill with every slot of `map` sorted by planar distance to
    /// `camera_pos`. Height is ignored.
    pub fn rebuild(&mut self, map: &ChunkMap, camera_pos: Vec3) {
        self.entries.clear();
        self.entries.reserve(map.len());
        for (chunk_id, _) in map.iter() {
            let c = map.center(chunk_id);
            let dx = camera_pos.x - c.x;
            let dz = camera_pos.z - c.z;
            let (aabb_min, aabb_max) = map.aabb(chunk_id);
            self.entries.push(DrawQueueEntry {
                chunk_id,
                sq_dist: dx * dx + dz * dz,
                aabb_min,
                aabb_max,
            });
        }
        self.entries.sort_by(|a, b| a.sq_dist.total_cmp(&b.sq_dist));
    }
}
