pub mod chunk_file;
pub mod compat;
pub mod compress;
pub mod error;
pub mod format;
pub mod load;
pub mod save;

pub use chunk_file::{decode_chunk, encode_chunk, load_chunk, save_chunk};
pub use error::PersistError;
pub use format::{ArchiveHeader, ChunkTableEntry};
pub use load::{decode_archive, load_world, load_world_from_file, WorldArchive};
pub use save::{encode_archive, save_world, save_world_to_file, ChunkRecord};
