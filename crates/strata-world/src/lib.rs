pub mod chunk;
pub mod chunk_map;
pub mod config;
pub mod draw_queue;
pub mod error;
pub mod heightmap;
pub mod mesh;
pub mod streaming;

use glam::{IVec3, Mat4, Vec3};
use strata_core::constants::{CHUNK_X, CHUNK_Z, MAX_CHUNKS};
use strata_core::math::in_chunk_bounds;
use strata_core::{BlockType, Face};
use strata_render::pick::{chunk_id_uniform, PickColor, PickedVoxel};
use strata_render::{DrawCall, PassKind, PassUniforms, RenderBackend};

pub use chunk::{Chunk, ChunkDataError};
pub use chunk_map::{ChunkMap, ChunkSlot};
pub use config::{HeightmapParams, WorldConfig};
pub use draw_queue::{DrawQueue, DrawQueueEntry};
pub use error::{ConfigError, HeightmapError, MeshError, WorldError};
pub use heightmap::{DiamondSquare, HeightmapBuffer};
pub use streaming::{Residency, StreamingPolicy};

/// Owns a fixed grid of chunks, their GPU meshes and the per-frame draw
/// queue. Generates all terrain up front; edits mark chunks dirty and
/// `update_dirty_chunk_meshes` rebuilds only those.
pub struct World {
    config: WorldConfig,
    terrain: HeightmapBuffer,
    chunk_map: ChunkMap,
    queue: DrawQueue,
    chunks_drawn: usize,
}

impl World {
    /// Generate the heightmap and every chunk. Meshes are built on the
    /// first `update_dirty_chunk_meshes`.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        let mut world = Self::without_chunks(config)?;
        let ids: Vec<usize> = (0..world.chunk_map.len()).collect();
        for id in ids {
            let chunk = world.generate_chunk(id)?;
            world.place_chunk(id, chunk);
        }
        log::info!(
            "world generated: {}x{} chunks, seed {}",
            world.config.chunks_wide,
            world.config.chunks_deep,
            world.config.seed
        );
        Ok(world)
    }

    /// Grid and terrain heightmap with every slot absent. Chunks are added
    /// with `insert_chunk`, e.g. when loading a saved world.
    pub fn without_chunks(config: WorldConfig) -> Result<Self, WorldError> {
        if config.chunks_wide == 0 || config.chunks_deep == 0 {
            return Err(WorldError::EmptyGrid);
        }
        let requested = config.chunk_count();
        if requested > MAX_CHUNKS {
            return Err(WorldError::TooManyChunks {
                requested,
                max: MAX_CHUNKS,
            });
        }
        config.validate()?;

        let terrain = config.diamond_square().generate_seeded(config.seed)?;
        let chunk_map = ChunkMap::new(config.chunks_wide, config.chunks_deep, config.voxel_scale);
        Ok(Self {
            config,
            terrain,
            chunk_map,
            queue: DrawQueue::new(),
            chunks_drawn: 0,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn terrain(&self) -> &HeightmapBuffer {
        &self.terrain
    }

    pub fn chunk_map(&self) -> &ChunkMap {
        &self.chunk_map
    }

    pub fn draw_queue(&self) -> &DrawQueue {
        &self.queue
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_map.len()
    }

    /// Resident chunk by id.
    pub fn chunk(&self, id: usize) -> Option<&Chunk> {
        self.chunk_map.get(id).and_then(ChunkSlot::chunk)
    }

    pub fn residency(&self, id: usize) -> Option<Residency> {
        self.chunk_map.get(id).map(ChunkSlot::residency)
    }

    /// Number of chunks issued by the last `draw`.
    pub fn chunks_drawn(&self) -> usize {
        self.chunks_drawn
    }

    pub fn model_matrix(&self, id: usize) -> Mat4 {
        self.chunk_map.model_matrix(id)
    }

    fn check_id(&self, id: usize) -> Result<(), WorldError> {
        if id >= self.chunk_map.len() {
            return Err(WorldError::ChunkIdOutOfRange {
                id,
                count: self.chunk_map.len(),
            });
        }
        Ok(())
    }

    fn generate_chunk(&self, id: usize) -> Result<Chunk, WorldError> {
        let coord = self.chunk_map.coord(id);
        let chunk = Chunk::generate(
            &self.terrain,
            self.config.use_filtered_heightmap,
            coord.x as usize * CHUNK_X,
            coord.y as usize * CHUNK_Z,
        )?;
        Ok(chunk)
    }

    fn place_chunk(&mut self, id: usize, chunk: Chunk) {
        if let Some(slot) = self.chunk_map.get_mut(id) {
            slot.chunk = Some(chunk);
            slot.dirty = true;
        }
    }

    pub fn get_block(&self, id: usize, x: i32, y: i32, z: i32) -> Option<BlockType> {
        self.chunk(id)?.get_block(x, y, z)
    }

    /// Edit one voxel of chunk `id`. Marks the chunk dirty when the block
    /// changed. `false` for absent chunks and out-of-range positions.
    pub fn set_block(&mut self, id: usize, x: i32, y: i32, z: i32, block: BlockType) -> bool {
        let Some(slot) = self.chunk_map.get_mut(id) else {
            return false;
        };
        let Some(chunk) = slot.chunk.as_mut() else {
            return false;
        };
        let changed = chunk.set_block(x, y, z, block);
        if changed {
            slot.dirty = true;
        }
        changed
    }

    /// Place `block` in the cell across `face_index` from voxel (x, y, z) of
    /// chunk `id`, crossing into the neighbouring chunk when the cell lies
    /// past the edge. `false` if there is no such chunk, the face index is
    /// invalid or the cell is above or below the world.
    pub fn create_block_on_face(
        &mut self,
        id: usize,
        x: i32,
        y: i32,
        z: i32,
        face_index: u8,
        block: BlockType,
    ) -> bool {
        let Some(face) = Face::from_index(face_index) else {
            return false;
        };
        if id >= self.chunk_map.len() || !in_chunk_bounds(x, y, z) {
            return false;
        }
        let target = IVec3::new(x, y, z) + face.offset();
        match self.chunk_map.resolve_local(id, target) {
            Some((target_id, local)) => self.set_block(target_id, local.x, local.y, local.z, block),
            None => {
                log::warn!(
                    "no chunk beyond {:?} face of chunk {id} at ({x}, {y}, {z})",
                    face
                );
                false
            }
        }
    }

    /// Rebuild and upload the mesh of chunk `id` whether or not it is dirty.
    /// The previous mesh is released.
    pub fn update_chunk_mesh<B: RenderBackend>(
        &mut self,
        id: usize,
        backend: &mut B,
    ) -> Result<(), WorldError> {
        self.check_id(id)?;
        let slot = self
            .chunk_map
            .get_mut(id)
            .ok_or(WorldError::ChunkNotResident(id))?;
        let chunk = slot.chunk.as_ref().ok_or(WorldError::ChunkNotResident(id))?;

        let mesh = mesh::generate_mesh(chunk)?;
        let handle = backend.upload_mesh(&mesh);
        if let Some(old) = slot.mesh.replace(handle) {
            backend.release_mesh(old);
        }
        slot.vertex_count = mesh.vertex_count;
        slot.mesh_generation += 1;
        slot.dirty = false;
        Ok(())
    }

    /// Remesh every resident dirty chunk. Returns how many were rebuilt.
    pub fn update_dirty_chunk_meshes<B: RenderBackend>(
        &mut self,
        backend: &mut B,
    ) -> Result<usize, WorldError> {
        let dirty: Vec<usize> = self
            .chunk_map
            .iter()
            .filter(|(_, s)| s.dirty && s.chunk.is_some())
            .map(|(id, _)| id)
            .collect();
        for &id in &dirty {
            self.update_chunk_mesh(id, backend)?;
        }
        if !dirty.is_empty() {
            log::debug!("remeshed {} dirty chunks", dirty.len());
        }
        Ok(dirty.len())
    }

    /// Rebuild the draw queue nearest-first from `camera_pos`.
    pub fn sort_draw_queue(&mut self, camera_pos: Vec3) {
        self.queue.rebuild(&self.chunk_map, camera_pos);
    }

    /// Draw the sorted queue. Stops at the first chunk beyond the visible
    /// distance or once `max_chunks_drawn` chunks are issued; skips chunks
    /// outside the frustum. Returns the number drawn.
    pub fn draw<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        camera_forward: Vec3,
        projection: Mat4,
        view: Mat4,
    ) -> usize {
        let pass = PassUniforms {
            kind: PassKind::Colour,
            projection,
            view,
            camera_forward,
        };
        self.chunks_drawn = self.issue_pass(backend, &pass);
        self.chunks_drawn
    }

    /// Picking pass over the same queue with the same limits. Each draw
    /// carries `chunk_id / 255` for the alpha channel.
    pub fn draw_colour_picking<B: RenderBackend>(
        &self,
        backend: &mut B,
        projection: Mat4,
        view: Mat4,
    ) -> usize {
        let pass = PassUniforms {
            kind: PassKind::Picking,
            projection,
            view,
            camera_forward: -view.row(2).truncate(),
        };
        self.issue_pass(backend, &pass)
    }

    fn issue_pass<B: RenderBackend>(&self, backend: &mut B, pass: &PassUniforms) -> usize {
        let max_dist = self.config.max_visible_chunk_distance as f32 * CHUNK_X as f32 * self.config.voxel_scale;
        let max_sq = max_dist * max_dist;

        backend.begin_pass(pass);
        let mut drawn = 0;
        for entry in self.queue.entries() {
            if drawn >= self.config.max_chunks_drawn || entry.sq_dist > max_sq {
                break;
            }
            let Some(slot) = self.chunk_map.get(entry.chunk_id) else {
                continue;
            };
            let Some(mesh) = slot.mesh.filter(|_| slot.chunk.is_some()) else {
                continue;
            };
            if !backend.is_aabb_in_frustum(entry.aabb_min, entry.aabb_max) {
                continue;
            }
            // Ids fit a byte: the grid is capped at MAX_CHUNKS.
            let chunk_id = entry.chunk_id as u8;
            backend.draw_mesh(
                pass,
                &DrawCall {
                    chunk_id,
                    mesh,
                    model: self.chunk_map.model_matrix(entry.chunk_id),
                    vertex_count: slot.vertex_count,
                    mesh_generation: slot.mesh_generation,
                    chunk_id_uniform: chunk_id_uniform(chunk_id),
                },
            );
            drawn += 1;
        }
        drawn
    }

    /// Read one pixel of the picking pass and decode it. `None` for the
    /// background, for chunk ids outside the grid and for absent chunks.
    pub fn pick<B: RenderBackend>(&self, backend: &mut B, x: u32, y: u32) -> Option<PickedVoxel> {
        let pixels = backend.read_pixels(x, y, 1, 1);
        let picked = PickColor::from_bytes(&pixels)?.decode()?;
        self.chunk(picked.chunk_id as usize)?;
        Some(picked)
    }

    /// Drop chunk `id` from memory and release its mesh. The chunk is
    /// handed back, e.g. for saving.
    pub fn evict_chunk<B: RenderBackend>(
        &mut self,
        id: usize,
        backend: &mut B,
    ) -> Result<Chunk, WorldError> {
        self.check_id(id)?;
        let slot = self
            .chunk_map
            .get_mut(id)
            .ok_or(WorldError::ChunkNotResident(id))?;
        let chunk = slot.chunk.take().ok_or(WorldError::ChunkNotResident(id))?;
        if let Some(handle) = slot.mesh.take() {
            backend.release_mesh(handle);
        }
        slot.vertex_count = 0;
        slot.dirty = false;
        log::debug!("evicted chunk {id}");
        Ok(chunk)
    }

    /// Make slot `id` resident with `chunk`. It is remeshed on the next
    /// dirty pass.
    pub fn insert_chunk(&mut self, id: usize, chunk: Chunk) -> Result<(), WorldError> {
        self.check_id(id)?;
        if self.chunk(id).is_some() {
            return Err(WorldError::ChunkAlreadyResident(id));
        }
        self.place_chunk(id, chunk);
        Ok(())
    }

    /// Replace chunk `id` with freshly generated terrain, discarding edits.
    pub fn regenerate_chunk(&mut self, id: usize) -> Result<(), WorldError> {
        self.check_id(id)?;
        let chunk = self.generate_chunk(id)?;
        self.place_chunk(id, chunk);
        Ok(())
    }

    /// Release every uploaded mesh, e.g. before dropping the backend.
    pub fn release_meshes<B: RenderBackend>(&mut self, backend: &mut B) {
        for (_, slot) in self.chunk_map.iter_mut() {
            if let Some(handle) = slot.mesh.take() {
                backend.release_mesh(handle);
                slot.vertex_count = 0;
                slot.dirty = slot.chunk.is_some();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strata_render::{ChunkMeshData, MeshHandle};

    /// Records every backend call. Frustum answers come from `culled`.
    #[derive(Default)]
    struct RecordingBackend {
        next: u64,
        live: HashSet<u64>,
        uploads: usize,
        released: Vec<u64>,
        culled: HashSet<(u32, u32)>,
        passes: Vec<PassKind>,
        draws: Vec<DrawCall>,
        pixel: Option<[u8; 4]>,
    }

    impl RecordingBackend {
        fn drawn_ids(&self) -> Vec<u8> {
            self.draws.iter().map(|d| d.chunk_id).collect()
        }
    }

    impl RenderBackend for RecordingBackend {
        fn upload_mesh(&mut self, _mesh: &ChunkMeshData) -> MeshHandle {
            self.next += 1;
            self.uploads += 1;
            self.live.insert(self.next);
            MeshHandle(self.next)
        }

        fn release_mesh(&mut self, handle: MeshHandle) {
            assert!(self.live.remove(&handle.0), "double release of {handle:?}");
            self.released.push(handle.0);
        }

        fn begin_pass(&mut self, pass: &PassUniforms) {
            self.passes.push(pass.kind);
            self.draws.clear();
        }

        fn is_aabb_in_frustum(&self, min: Vec3, _max: Vec3) -> bool {
            !self.culled.contains(&(min.x.to_bits(), min.z.to_bits()))
        }

        fn draw_mesh(&mut self, _pass: &PassUniforms, call: &DrawCall) {
            assert!(self.live.contains(&call.mesh.0), "drawing released mesh");
            self.draws.push(*call);
        }

        fn read_pixels(&mut self, _x: u32, _y: u32, w: u32, h: u32) -> Vec<u8> {
            assert_eq!((w, h), (1, 1));
            self.pixel.unwrap_or([255; 4]).to_vec()
        }
    }

    fn small_config(w: usize, d: usize) -> WorldConfig {
        WorldConfig {
            seed: 5,
            chunks_wide: w,
            chunks_deep: d,
            voxel_scale: 1.0,
            heightmap: HeightmapParams {
                feature_spread: 16,
                noise_scale: 8,
                ..HeightmapParams::default()
            },
            ..WorldConfig::default()
        }
    }

    fn meshed_world(w: usize, d: usize) -> (World, RecordingBackend) {
        let mut world = World::new(small_config(w, d)).expect("world");
        let mut backend = RecordingBackend::default();
        world.update_dirty_chunk_meshes(&mut backend).expect("mesh");
        (world, backend)
    }

    #[test]
    fn test_new_rejects_bad_grids() {
        assert!(matches!(World::new(small_config(0, 4)), Err(WorldError::EmptyGrid)));
        assert!(matches!(
            World::new(small_config(17, 16)),
            Err(WorldError::TooManyChunks { requested: 272, max: 256 })
        ));
        let mut c = small_config(2, 2);
        c.voxel_scale = 0.0;
        assert!(matches!(World::new(c), Err(WorldError::Config(_))));
    }

    #[test]
    fn test_world_generation_deterministic() {
        let a = World::new(small_config(2, 2)).expect("world");
        let b = World::new(small_config(2, 2)).expect("world");
        for id in 0..4 {
            assert_eq!(a.chunk(id), b.chunk(id));
        }
        assert_eq!(a.chunk_map().slot_counts(), (4, 0, 4));
    }

    #[test]
    fn test_adjacent_chunks_continue_terrain() {
        // Chunk 1 starts where chunk 0's heightmap window ends.
        let world = World::new(small_config(2, 1)).expect("world");
        let samples = world.terrain().samples(true);
        let expected = (samples[16] as i32 + 16).clamp(1, 255);
        let c1 = world.chunk(1).expect("resident");
        assert_eq!(c1.column_height(0, 0), Some(expected));
    }

    #[test]
    fn test_dirty_only_remesh() {
        let (mut world, mut backend) = meshed_world(3, 3);
        assert_eq!(backend.uploads, 9);
        assert_eq!(world.update_dirty_chunk_meshes(&mut backend).expect("mesh"), 0);

        assert!(world.set_block(4, 3, 200, 3, BlockType::Stone));
        assert!(!world.set_block(4, 3, 200, 3, BlockType::Stone));
        let gen_before = world.chunk_map().get(4).expect("slot").mesh_generation();
        assert_eq!(world.update_dirty_chunk_meshes(&mut backend).expect("mesh"), 1);
        assert_eq!(backend.uploads, 10);
        assert_eq!(backend.released.len(), 1, "old mesh released");
        assert_eq!(
            world.chunk_map().get(4).expect("slot").mesh_generation(),
            gen_before + 1
        );
    }

    #[test]
    fn test_create_block_on_face_within_chunk() {
        let (mut world, _) = meshed_world(3, 3);
        assert!(world.create_block_on_face(4, 5, 200, 5, Face::Up as u8, BlockType::Dirt));
        assert_eq!(world.get_block(4, 5, 201, 5), Some(BlockType::Dirt));
        assert!(world.chunk_map().get(4).expect("slot").is_dirty());
    }

    #[test]
    fn test_create_block_on_face_crosses_chunks() {
        let (mut world, _) = meshed_world(3, 3);
        let centre = 4;
        let y = 220;
        // (face, source local, target chunk, target local)
        let cases = [
            (Face::West, (0, 2), 3, (15, 2)),
            (Face::East, (15, 2), 5, (0, 2)),
            (Face::North, (2, 0), 1, (2, 15)),
            (Face::South, (2, 15), 7, (2, 0)),
        ];
        for (face, (sx, sz), target, (tx, tz)) in cases {
            assert!(
                world.create_block_on_face(centre, sx, y, sz, face as u8, BlockType::Stone),
                "{face:?} edit failed"
            );
            assert_eq!(world.get_block(target, tx, y, tz), Some(BlockType::Stone), "{face:?}");
            assert_eq!(world.get_block(centre, sx, y, sz), Some(BlockType::Air));
            assert!(world.chunk_map().get(target).expect("slot").is_dirty());
        }
        assert!(!world.chunk_map().get(centre).expect("slot").is_dirty());
    }

    #[test]
    fn test_create_block_on_face_rejects_off_grid() {
        let (mut world, _) = meshed_world(2, 2);
        assert!(!world.create_block_on_face(0, 0, 200, 3, Face::West as u8, BlockType::Stone));
        assert!(!world.create_block_on_face(0, 3, 200, 0, Face::North as u8, BlockType::Stone));
        assert!(!world.create_block_on_face(3, 15, 200, 3, Face::East as u8, BlockType::Stone));
        assert!(!world.create_block_on_face(3, 3, 200, 15, Face::South as u8, BlockType::Stone));
        assert!(!world.create_block_on_face(0, 3, 255, 3, Face::Up as u8, BlockType::Stone));
        assert!(!world.create_block_on_face(0, 3, 0, 3, Face::Down as u8, BlockType::Stone));
        assert!(!world.create_block_on_face(0, 3, 100, 3, 6, BlockType::Stone));
        assert!(!world.create_block_on_face(9, 3, 100, 3, 0, BlockType::Stone));
        assert_eq!(world.chunk_map().slot_counts().2, 0);
    }

    fn camera() -> (Mat4, Mat4) {
        // Straight down over the grid so the whole grid is in view.
        let view = Mat4::look_at_rh(Vec3::new(24.0, 600.0, 24.0), Vec3::new(24.0, 0.0, 24.0), Vec3::NEG_Z);
        let projection = Mat4::perspective_rh(1.5, 1.0, 0.1, 2000.0);
        (projection, view)
    }

    #[test]
    fn test_draw_nearest_first_and_counts() {
        let (mut world, mut backend) = meshed_world(3, 3);
        world.sort_draw_queue(Vec3::new(0.0, 10.0, 0.0));
        let (p, v) = camera();
        let drawn = world.draw(&mut backend, Vec3::NEG_Y, p, v);
        assert_eq!(drawn, 9);
        assert_eq!(world.chunks_drawn(), 9);
        assert_eq!(backend.drawn_ids()[0], 0, "nearest chunk first");
        let last = backend.draws.last().expect("draws");
        assert_eq!(last.chunk_id, 8);
        assert_eq!(last.model, world.model_matrix(8));
        assert_eq!(last.mesh_generation, 1);
    }

    #[test]
    fn test_draw_budget() {
        let mut config = small_config(4, 4);
        config.max_chunks_drawn = 5;
        let mut world = World::new(config).expect("world");
        let mut backend = RecordingBackend::default();
        world.update_dirty_chunk_meshes(&mut backend).expect("mesh");
        world.sort_draw_queue(Vec3::new(32.0, 0.0, 32.0));
        let (p, v) = camera();
        assert_eq!(world.draw(&mut backend, Vec3::NEG_Y, p, v), 5);
        assert_eq!(backend.draws.len(), 5);
    }

    #[test]
    fn test_draw_distance_early_exit() {
        let mut config = small_config(4, 1);
        // One chunk of reach: 16 world units.
        config.max_visible_chunk_distance = 1;
        let mut world = World::new(config).expect("world");
        let mut backend = RecordingBackend::default();
        world.update_dirty_chunk_meshes(&mut backend).expect("mesh");
        // Centres at x = 8, 24, 40, 56; camera at x = 8.
        world.sort_draw_queue(Vec3::new(8.0, 0.0, 8.0));
        let (p, v) = camera();
        assert_eq!(world.draw(&mut backend, Vec3::NEG_Y, p, v), 2);
        assert_eq!(backend.drawn_ids(), vec![0, 1]);
    }

    #[test]
    fn test_draw_frustum_skip_does_not_stop() {
        let (mut world, mut backend) = meshed_world(3, 1);
        let (min, _) = world.chunk_map().aabb(1);
        backend.culled.insert((min.x.to_bits(), min.z.to_bits()));
        world.sort_draw_queue(Vec3::new(0.0, 0.0, 8.0));
        let (p, v) = camera();
        assert_eq!(world.draw(&mut backend, Vec3::NEG_Y, p, v), 2);
        assert_eq!(backend.drawn_ids(), vec![0, 2]);
    }

    #[test]
    fn test_draw_without_sort_draws_nothing() {
        let (mut world, mut backend) = meshed_world(2, 2);
        let (p, v) = camera();
        assert_eq!(world.draw(&mut backend, Vec3::NEG_Y, p, v), 0);
    }

    #[test]
    fn test_picking_pass_uniforms() {
        let (mut world, mut backend) = meshed_world(2, 2);
        world.sort_draw_queue(Vec3::ZERO);
        let (p, v) = camera();
        assert_eq!(world.draw_colour_picking(&mut backend, p, v), 4);
        assert_eq!(backend.passes.last(), Some(&PassKind::Picking));
        for call in &backend.draws {
            assert_eq!(call.chunk_id_uniform, call.chunk_id as f32 / 255.0);
        }
    }

    #[test]
    fn test_pick_decodes_and_validates() {
        let (world, mut backend) = meshed_world(2, 2);
        assert_eq!(world.pick(&mut backend, 10, 10), None, "background");

        let c = strata_render::pick::encode(IVec3::new(3, 40, 7), Face::Up, 2).expect("encode");
        backend.pixel = Some([c.r, c.g, c.b, c.a]);
        let picked = world.pick(&mut backend, 10, 10).expect("hit");
        assert_eq!(picked.local, IVec3::new(3, 40, 7));
        assert_eq!(picked.face, Face::Up);
        assert_eq!(picked.chunk_id, 2);

        backend.pixel = Some([c.r, c.g, c.b, 9]);
        assert_eq!(world.pick(&mut backend, 10, 10), None, "chunk id beyond grid");
    }

    #[test]
    fn test_evict_and_insert() {
        let (mut world, mut backend) = meshed_world(2, 2);
        let chunk = world.evict_chunk(1, &mut backend).expect("evict");
        assert_eq!(world.residency(1), Some(Residency::Absent));
        assert_eq!(backend.released.len(), 1);
        assert!(!world.set_block(1, 0, 200, 0, BlockType::Stone));
        assert!(matches!(
            world.evict_chunk(1, &mut backend),
            Err(WorldError::ChunkNotResident(1))
        ));

        world.sort_draw_queue(Vec3::ZERO);
        let (p, v) = camera();
        assert_eq!(world.draw(&mut backend, Vec3::NEG_Y, p, v), 3);

        world.insert_chunk(1, chunk).expect("insert");
        assert!(matches!(
            world.insert_chunk(1, Chunk::flat().expect("alloc")),
            Err(WorldError::ChunkAlreadyResident(1))
        ));
        assert_eq!(world.update_dirty_chunk_meshes(&mut backend).expect("mesh"), 1);
        assert_eq!(world.draw(&mut backend, Vec3::NEG_Y, p, v), 4);
    }

    #[test]
    fn test_regenerate_discards_edits() {
        let (mut world, _) = meshed_world(2, 2);
        let pristine = world.chunk(3).cloned().expect("resident");
        world.set_block(3, 1, 250, 1, BlockType::Grass);
        world.regenerate_chunk(3).expect("regenerate");
        assert_eq!(world.chunk(3), Some(&pristine));
        assert!(matches!(
            world.regenerate_chunk(4),
            Err(WorldError::ChunkIdOutOfRange { id: 4, count: 4 })
        ));
    }

    #[test]
    fn test_update_absent_chunk_errors() {
        let mut world = World::without_chunks(small_config(2, 1)).expect("world");
        let mut backend = RecordingBackend::default();
        assert_eq!(world.update_dirty_chunk_meshes(&mut backend).expect("mesh"), 0);
        assert!(matches!(
            world.update_chunk_mesh(0, &mut backend),
            Err(WorldError::ChunkNotResident(0))
        ));
    }

    #[test]
    fn test_streaming_candidates() {
        let (mut world, mut backend) = meshed_world(4, 1);
        world.sort_draw_queue(Vec3::new(8.0, 0.0, 8.0));
        let policy = StreamingPolicy::new(1.5, 2.5);
        let evict = policy.eviction_candidates(world.chunk_map(), world.draw_queue(), 1.0);
        assert_eq!(evict, vec![3]);

        world.evict_chunk(1, &mut backend).expect("evict");
        let load = policy.load_candidates(world.chunk_map(), world.draw_queue(), 1.0);
        assert_eq!(load, vec![1]);
    }

    #[test]
    fn test_release_meshes() {
        let (mut world, mut backend) = meshed_world(2, 2);
        world.release_meshes(&mut backend);
        assert!(backend.live.is_empty());
        assert_eq!(world.chunk_map().slot_counts().2, 4, "all need remeshing");
    }
}
