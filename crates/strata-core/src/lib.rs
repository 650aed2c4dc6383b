pub mod constants;
pub mod direction;
pub mod error;
pub mod math;
pub mod types;

pub use direction::{Face, ALL_FACES};
pub use error::CoreError;
pub use math::{ColumnIndex, VoxelIndex};
pub use types::{BlockType, ChunkCoord, Voxel};
