use glam::{Mat4, Vec3};

use crate::mesh_data::ChunkMeshData;

/// Opaque handle to a mesh living on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Textured, lit terrain.
    Colour,
    /// Flat picking colours, read back with `read_pixels`.
    Picking,
}

/// Uniforms shared by every draw in a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassUniforms {
    pub kind: PassKind,
    pub projection: Mat4,
    pub view: Mat4,
    pub camera_forward: Vec3,
}

/// One chunk draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub chunk_id: u8,
    pub mesh: MeshHandle,
    pub model: Mat4,
    pub vertex_count: usize,
    /// Bumped each time the chunk's mesh is replaced. A backend holding a
    /// different generation for `mesh` is drawing stale geometry.
    pub mesh_generation: u64,
    /// `chunk_id / 255`, written to the picking pass alpha channel.
    pub chunk_id_uniform: f32,
}

/// Rendering collaborator. Shader setup, texture loading and buffer
/// management live behind this trait.
pub trait RenderBackend {
    fn upload_mesh(&mut self, mesh: &ChunkMeshData) -> MeshHandle;

    fn release_mesh(&mut self, handle: MeshHandle);

    /// Called once before the draws of a pass.
    fn begin_pass(&mut self, _pass: &PassUniforms) {}

    fn is_aabb_in_frustum(&self, min: Vec3, max: Vec3) -> bool;

    fn draw_mesh(&mut self, pass: &PassUniforms, call: &DrawCall);

    /// Synchronous read-back of `width * height` RGBA8 pixels.
    fn read_pixels(&mut self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8>;
}
