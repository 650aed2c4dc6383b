use strata_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeightmapError {
    #[error("invalid heightmap dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("feature spread must be at least 1")]
    InvalidFeatureSpread,

    #[error(transparent)]
    Allocation(#[from] CoreError),
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("out of memory reserving {requested_vertices} mesh vertices")]
    OutOfMemory { requested_vertices: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse world config: {0}")]
    Parse(String),

    #[error("failed to read world config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid world config: {0}")]
    Invalid(String),
}

/// Errors surfaced by `World` construction and mesh updates.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world grid of {requested} chunks exceeds the limit of {max}")]
    TooManyChunks { requested: usize, max: usize },

    #[error("world grid must be at least 1x1 chunks")]
    EmptyGrid,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Heightmap(#[from] HeightmapError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Allocation(#[from] CoreError),

    #[error("chunk {0} is not resident")]
    ChunkNotResident(usize),

    #[error("chunk id {id} out of range (world holds {count} chunks)")]
    ChunkIdOutOfRange { id: usize, count: usize },

    #[error("chunk {0} is already resident")]
    ChunkAlreadyResident(usize),
}
