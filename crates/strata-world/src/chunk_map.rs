use glam::{IVec3, Mat4, Vec3};
use strata_core::constants::{CHUNK_X, CHUNK_Y, CHUNK_Z};
use strata_core::math::{chunk_coord_to_id, chunk_id_to_coord, wrap_local};
use strata_core::types::ChunkCoord;
use strata_render::MeshHandle;

use crate::chunk::Chunk;
use crate::streaming::Residency;

/// One cell of the world grid: the chunk when resident, plus its GPU mesh
/// bookkeeping.
#[derive(Debug)]
pub struct ChunkSlot {
    pub(crate) chunk: Option<Chunk>,
    pub(crate) mesh: Option<MeshHandle>,
    pub(crate) vertex_count: usize,
    pub(crate) mesh_generation: u64,
    pub(crate) dirty: bool,
}

impl ChunkSlot {
    fn absent() -> Self {
        Self {
            chunk: None,
            mesh: None,
            vertex_count: 0,
            mesh_generation: 0,
            dirty: false,
        }
    }

    pub fn residency(&self) -> Residency {
        if self.chunk.is_some() {
            Residency::Resident
        } else {
            Residency::Absent
        }
    }

    pub fn chunk(&self) -> Option<&Chunk> {
        self.chunk.as_ref()
    }

    pub fn mesh(&self) -> Option<MeshHandle> {
        self.mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn mesh_generation(&self) -> u64 {
        self.mesh_generation
    }

    /// Needs a remesh before its next draw.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Fixed `width` x `depth` grid of chunk slots laid out row-major along z:
/// `id = chunk_z * width + chunk_x`.
#[derive(Debug)]
pub struct ChunkMap {
    width: usize,
    depth: usize,
    voxel_scale: f32,
    slots: Vec<ChunkSlot>,
}

impl ChunkMap {
    /// All slots start absent.
    pub fn new(width: usize, depth: usize, voxel_scale: f32) -> Self {
        let slots = (0..width * depth).map(|_| ChunkSlot::absent()).collect();
        Self {
            width,
            depth,
            voxel_scale,
            slots,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&ChunkSlot> {
        self.slots.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: usize) -> Option<&mut ChunkSlot> {
        self.slots.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ChunkSlot)> {
        self.slots.iter().enumerate()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut ChunkSlot)> {
        self.slots.iter_mut().enumerate()
    }

    pub fn coord(&self, id: usize) -> ChunkCoord {
        chunk_id_to_coord(id, self.width)
    }

    pub fn id_at(&self, coord: ChunkCoord) -> Option<usize> {
        chunk_coord_to_id(coord, self.width, self.depth)
    }

    /// Chunk id and local position for a position one step past chunk
    /// `id`'s horizontal edge. `None` when that neighbour is off the grid.
    pub fn resolve_local(&self, id: usize, local: IVec3) -> Option<(usize, IVec3)> {
        let (coord, local) = wrap_local(self.coord(id), local);
        self.id_at(coord).map(|id| (id, local))
    }

    /// World-space translation of chunk `id`'s origin.
    pub fn origin(&self, id: usize) -> Vec3 {
        let c = self.coord(id);
        Vec3::new(
            c.x as f32 * CHUNK_X as f32 * self.voxel_scale,
            0.0,
            c.y as f32 * CHUNK_Z as f32 * self.voxel_scale,
        )
    }

    /// Model matrix: chunk-local voxel units to world space.
    pub fn model_matrix(&self, id: usize) -> Mat4 {
        Mat4::from_translation(self.origin(id)) * Mat4::from_scale(Vec3::splat(self.voxel_scale))
    }

    /// World-space bounds of chunk `id`, full height.
    pub fn aabb(&self, id: usize) -> (Vec3, Vec3) {
        let min = self.origin(id);
        let extent = Vec3::new(
            CHUNK_X as f32 * self.voxel_scale,
            CHUNK_Y as f32 * self.voxel_scale,
            CHUNK_Z as f32 * self.voxel_scale,
        );
        (min, min + extent)
    }

    /// Centre of chunk `id` on the ground plane.
    pub fn center(&self, id: usize) -> Vec3 {
        let (min, max) = self.aabb(id);
        Vec3::new((min.x + max.x) * 0.5, 0.0, (min.z + max.z) * 0.5)
    }

    /// Counts: (resident, absent, dirty)
    pub fn slot_counts(&self) -> (usize, usize, usize) {
        let mut resident = 0;
        let mut dirty = 0;
        for slot in &self.slots {
            if slot.chunk.is_some() {
                resident += 1;
            }
            if slot.dirty {
                dirty += 1;
            }
        }
        (resident, self.slots.len() - resident, dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec2, Vec4};

    #[test]
    fn test_grid_layout() {
        let map = ChunkMap::new(4, 3, 1.0);
        assert_eq!(map.len(), 12);
        assert_eq!(map.coord(5), IVec2::new(1, 1));
        assert_eq!(map.id_at(IVec2::new(3, 2)), Some(11));
        assert_eq!(map.id_at(IVec2::new(4, 0)), None);
        assert_eq!(map.slot_counts(), (0, 12, 0));
    }

    #[test]
    fn test_resolve_local_neighbours() {
        let map = ChunkMap::new(3, 3, 1.0);
        let centre = 4;
        assert_eq!(map.resolve_local(centre, IVec3::new(-1, 7, 2)), Some((3, IVec3::new(15, 7, 2))));
        assert_eq!(map.resolve_local(centre, IVec3::new(16, 7, 2)), Some((5, IVec3::new(0, 7, 2))));
        assert_eq!(map.resolve_local(centre, IVec3::new(2, 7, -1)), Some((1, IVec3::new(2, 7, 15))));
        assert_eq!(map.resolve_local(centre, IVec3::new(2, 7, 16)), Some((7, IVec3::new(2, 7, 0))));
        assert_eq!(map.resolve_local(0, IVec3::new(-1, 7, 2)), None);
        assert_eq!(map.resolve_local(8, IVec3::new(2, 7, 16)), None);
    }

    #[test]
    fn test_origin_and_model_matrix() {
        let map = ChunkMap::new(4, 4, 0.5);
        let id = map.id_at(IVec2::new(2, 3)).expect("in grid");
        assert_eq!(map.origin(id), Vec3::new(16.0, 0.0, 24.0));
        let m = map.model_matrix(id);
        // Voxel (1, 2, 3) corner lands at origin + 0.5 * (1, 2, 3).
        let p = m * Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(p.truncate(), Vec3::new(16.5, 1.0, 25.5));
    }

    #[test]
    fn test_aabb_and_center() {
        let map = ChunkMap::new(2, 2, 0.2);
        let (min, max) = map.aabb(3);
        assert!((min - Vec3::new(3.2, 0.0, 3.2)).length() < 1e-5);
        assert!((max - Vec3::new(6.4, 51.2, 6.4)).length() < 1e-4);
        assert!((map.center(3) - Vec3::new(4.8, 0.0, 4.8)).length() < 1e-5);
    }
}
