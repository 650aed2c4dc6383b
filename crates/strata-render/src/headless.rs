use std::collections::HashMap;

use glam::Vec3;

use crate::backend::{DrawCall, MeshHandle, PassKind, PassUniforms, RenderBackend};
use crate::frustum::Frustum;
use crate::mesh_data::ChunkMeshData;
use crate::pick::{PickColor, PICK_CHANNELS};

/// Counters for the last colour and picking passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub vertices: usize,
    pub picking_draw_calls: usize,
}

/// Backend with no GPU. Keeps uploaded vertex counts, culls against a
/// frustum built from each pass's matrices and counts draws. Read-back
/// returns the picking clear colour unless a pixel has been set.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    meshes: HashMap<u64, usize>,
    next_handle: u64,
    frustum: Option<Frustum>,
    stats: FrameStats,
    uploaded_bytes: usize,
    pick_pixel: Option<PickColor>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Total bytes uploaded since creation.
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    /// Colour every subsequent read-back returns.
    pub fn set_pick_pixel(&mut self, colour: Option<PickColor>) {
        self.pick_pixel = colour;
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload_mesh(&mut self, mesh: &ChunkMeshData) -> MeshHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.meshes.insert(handle, mesh.vertex_count);
        self.uploaded_bytes += mesh.byte_size();
        MeshHandle(handle)
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        if self.meshes.remove(&handle.0).is_none() {
            log::warn!("release of unknown mesh handle {}", handle.0);
        }
    }

    fn begin_pass(&mut self, pass: &PassUniforms) {
        self.frustum = Some(Frustum::from_projection_view(&pass.projection, &pass.view));
        match pass.kind {
            PassKind::Colour => {
                self.stats.draw_calls = 0;
                self.stats.vertices = 0;
            }
            PassKind::Picking => self.stats.picking_draw_calls = 0,
        }
    }

    fn is_aabb_in_frustum(&self, min: Vec3, max: Vec3) -> bool {
        self.frustum
            .map_or(true, |f| f.intersects_aabb(min, max))
    }

    fn draw_mesh(&mut self, pass: &PassUniforms, call: &DrawCall) {
        match pass.kind {
            PassKind::Colour => {
                self.stats.draw_calls += 1;
                self.stats.vertices += call.vertex_count;
            }
            PassKind::Picking => self.stats.picking_draw_calls += 1,
        }
    }

    fn read_pixels(&mut self, _x: u32, _y: u32, width: u32, height: u32) -> Vec<u8> {
        let c = self.pick_pixel.unwrap_or(PickColor::BACKGROUND);
        let pixels = width as usize * height as usize;
        let mut out = Vec::with_capacity(pixels * PICK_CHANNELS);
        for _ in 0..pixels {
            out.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        out
    }
}
