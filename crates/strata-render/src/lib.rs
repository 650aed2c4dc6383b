pub mod backend;
pub mod frustum;
pub mod headless;
pub mod mesh_data;
pub mod pick;

pub use backend::{DrawCall, MeshHandle, PassKind, PassUniforms, RenderBackend};
pub use frustum::Frustum;
pub use headless::{FrameStats, HeadlessBackend};
pub use mesh_data::{ChunkMeshData, MeshVertex};
pub use pick::{PickColor, PickedVoxel};
