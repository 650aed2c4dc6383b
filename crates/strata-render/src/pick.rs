//! Colour-picking codec.
//!
//! The picking pass renders every chunk with a flat colour that addresses
//! the voxel face under each pixel:
//!   R = local_z * CHUNK_X + local_x
//!   G = y
//!   B = face index (0..=5)
//!   A = chunk id
//! The clear colour is all ones, so B = 255 marks "nothing under cursor".

use glam::IVec3;
use strata_core::constants::{CHUNK_X, CHUNK_Y, CHUNK_Z};
use strata_core::math::in_chunk_bounds;
use strata_core::Face;

/// Bytes per pixel returned by a picking read-back.
pub const PICK_CHANNELS: usize = 4;

/// One RGBA8 pixel from the picking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Voxel face recovered from a picking pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickedVoxel {
    pub local: IVec3,
    pub face: Face,
    pub chunk_id: u8,
}

impl PickColor {
    /// Colour the picking pass writes when nothing is hit.
    pub const BACKGROUND: PickColor = PickColor {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// First pixel of a read-back buffer, or `None` if it is too short.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [r, g, b, a, ..] => Some(Self {
                r: *r,
                g: *g,
                b: *b,
                a: *a,
            }),
            _ => None,
        }
    }

    pub fn decode(self) -> Option<PickedVoxel> {
        decode(self.r, self.g, self.b, self.a)
    }
}

/// Pack a voxel face address into a picking colour. `None` if the position
/// is outside the chunk.
pub fn encode(local: IVec3, face: Face, chunk_id: u8) -> Option<PickColor> {
    if !in_chunk_bounds(local.x, local.y, local.z) {
        return None;
    }
    Some(PickColor {
        r: (local.z as usize * CHUNK_X + local.x as usize) as u8,
        g: local.y as u8,
        b: face.index(),
        a: chunk_id,
    })
}

/// Unpack a picking colour. `None` for the background or any pixel whose
/// face channel is not a face index.
pub fn decode(r: u8, g: u8, b: u8, a: u8) -> Option<PickedVoxel> {
    let face = Face::from_index(b)?;
    let packed = r as usize;
    let local = IVec3::new((packed % CHUNK_X) as i32, g as i32, (packed / CHUNK_X) as i32);
    // Only reachable when CHUNK_X * CHUNK_Z < 256.
    if local.z >= CHUNK_Z as i32 || local.y >= CHUNK_Y as i32 {
        return None;
    }
    Some(PickedVoxel {
        local,
        face,
        chunk_id: a,
    })
}

/// Per-vertex picking triple (R, G, B) normalized to [0, 1], as the mesher
/// writes it into `ChunkMeshData::picking`.
pub fn vertex_pick_triple(local: IVec3, face: Face) -> [f32; 3] {
    let packed = local.z * CHUNK_X as i32 + local.x;
    [
        packed as f32 / 255.0,
        local.y as f32 / 255.0,
        face.index() as f32 / 255.0,
    ]
}

/// Per-draw uniform carrying the chunk id in the alpha channel.
pub fn chunk_id_uniform(chunk_id: u8) -> f32 {
    chunk_id as f32 / 255.0
}

/// Convert a normalized channel value back to the byte the framebuffer
/// stores.
pub fn quantize_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
