use std::time::Instant;

use glam::{IVec3, Mat4, Vec3};
use strata_core::BlockType;
use strata_persist::{load_world, save_world, PersistError};
use strata_render::{pick, HeadlessBackend};
use strata_world::{World, WorldConfig, WorldError};

use crate::scenes::{edit_targets, SceneConfig};

const VIEWPORT_WIDTH: u32 = 640;
const VIEWPORT_HEIGHT: u32 = 480;

/// Timing data for a series of runs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub chunk_count: u32,
    pub solid_voxels: u64,
    pub vertices: u64,
    pub chunks_drawn: u32,
    pub frame_count: u32,
    pub edits_applied: u32,
    pub archive_bytes: u64,
    pub generate_ms: f64,
    pub mesh_ms: f64,
    pub save_ms: f64,
    pub load_ms: f64,
    /// Sort + colour pass + picking pass per frame.
    pub timings: TimingSeries,
    /// Pick + place + remesh per edit.
    pub edit_timings: TimingSeries,
}

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Runs scenes against the headless backend.
pub struct BenchmarkRunner {
    base: WorldConfig,
    frame_count: u32,
}

impl BenchmarkRunner {
    pub fn new(base: WorldConfig, frame_count: u32) -> Self {
        Self { base, frame_count }
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, scene: &SceneConfig) -> Result<BenchmarkResult, BenchError> {
        log::info!(
            "Running scene '{}' ({}x{} chunks)...",
            scene.name,
            scene.chunks_wide,
            scene.chunks_deep
        );
        let config = scene.world_config(&self.base);

        let start = Instant::now();
        let mut world = World::new(config.clone())?;
        let generate_ms = elapsed_ms(start);

        let mut backend = HeadlessBackend::new();
        let start = Instant::now();
        world.update_dirty_chunk_meshes(&mut backend)?;
        let mesh_ms = elapsed_ms(start);

        let (solid_voxels, vertices) = world_totals(&world);
        log::info!(
            "  Generated {} solid voxels, {} vertices ({} bytes uploaded)",
            solid_voxels,
            vertices,
            backend.uploaded_bytes()
        );

        let eye = scene.camera_position(config.voxel_scale);
        let target = scene.camera_target(config.voxel_scale);
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let projection = Mat4::perspective_rh(
            60f32.to_radians(),
            VIEWPORT_WIDTH as f32 / VIEWPORT_HEIGHT as f32,
            0.1,
            1000.0,
        );
        let forward = (target - eye).normalize_or_zero();

        let mut frame_times = Vec::with_capacity(self.frame_count as usize);
        for _ in 0..self.frame_count {
            let frame_start = Instant::now();
            world.sort_draw_queue(eye);
            world.draw(&mut backend, forward, projection, view);
            world.draw_colour_picking(&mut backend, projection, view);
            frame_times.push(elapsed_ms(frame_start));
        }
        let chunks_drawn = world.chunks_drawn() as u32;

        let mut edit_times = Vec::new();
        let mut edits_applied = 0;
        for edit in edit_targets(scene) {
            let Some(top) = world
                .chunk(edit.chunk_id)
                .and_then(|c| c.column_height(edit.column.x, edit.column.z))
                .filter(|&h| h >= 0)
            else {
                continue;
            };
            let local = IVec3::new(edit.column.x, top, edit.column.z);
            // Stand-in for the picking pass rasterizing this face under the cursor.
            backend.set_pick_pixel(pick::encode(local, edit.face, edit.chunk_id as u8));

            let edit_start = Instant::now();
            if let Some(hit) = world.pick(&mut backend, VIEWPORT_WIDTH / 2, VIEWPORT_HEIGHT / 2) {
                if world.create_block_on_face(
                    hit.chunk_id as usize,
                    hit.local.x,
                    hit.local.y,
                    hit.local.z,
                    hit.face.index(),
                    BlockType::Stone,
                ) {
                    edits_applied += 1;
                }
            }
            world.update_dirty_chunk_meshes(&mut backend)?;
            edit_times.push(elapsed_ms(edit_start));
        }
        backend.set_pick_pixel(None);

        let start = Instant::now();
        let archive = save_world(&world);
        let save_ms = elapsed_ms(start);

        let start = Instant::now();
        let (loaded, warnings) = load_world(&archive, config)?;
        let load_ms = elapsed_ms(start);
        if !warnings.is_empty() || loaded.chunk_count() != world.chunk_count() {
            log::warn!("  Reloaded world differs: {warnings:?}");
        }

        world.release_meshes(&mut backend);

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.2}ms, p95={:.2}ms, p99={:.2}ms, {} chunks drawn",
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms,
            chunks_drawn
        );

        Ok(BenchmarkResult {
            scene_name: scene.name.to_string(),
            chunk_count: world.chunk_count() as u32,
            solid_voxels,
            vertices,
            chunks_drawn,
            frame_count: self.frame_count,
            edits_applied,
            archive_bytes: archive.len() as u64,
            generate_ms,
            mesh_ms,
            save_ms,
            load_ms,
            timings,
            edit_timings: compute_timings(&edit_times),
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Solid voxels and mesh vertices over every resident chunk.
fn world_totals(world: &World) -> (u64, u64) {
    world
        .chunk_map()
        .iter()
        .fold((0, 0), |(solid, verts), (_, slot)| {
            let n = slot.chunk().map_or(0, |c| c.non_air_count() as u64);
            (solid + n, verts + slot.vertex_count() as u64)
        })
}

/// Compute timing statistics from a list of times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
