use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_core::constants::{CHUNK_X, CHUNK_Z, MAX_CHUNKS};

use crate::error::ConfigError;
use crate::heightmap::DiamondSquare;

/// Diamond-square inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapParams {
    pub default_height: u8,
    pub noise_scale: i32,
    pub feature_spread: usize,
    pub feature_max_height: u8,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            default_height: 63,
            noise_scale: 64,
            feature_spread: 64,
            feature_max_height: 64,
        }
    }
}

/// World generation and paging settings. Missing fields take their
/// defaults, so an empty `()` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    pub chunks_wide: usize,
    pub chunks_deep: usize,
    /// World units per voxel edge.
    pub voxel_scale: f32,
    /// Hard cap on chunks issued per pass.
    pub max_chunks_drawn: usize,
    /// Planar distance cutoff, in chunks.
    pub max_visible_chunk_distance: usize,
    pub use_filtered_heightmap: bool,
    pub heightmap: HeightmapParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            chunks_wide: 16,
            chunks_deep: 16,
            voxel_scale: 0.2,
            max_chunks_drawn: 128,
            max_visible_chunk_distance: 10,
            use_filtered_heightmap: true,
            heightmap: HeightmapParams::default(),
        }
    }
}

impl WorldConfig {
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: WorldConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunks_wide == 0 || self.chunks_deep == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} has no chunks",
                self.chunks_wide, self.chunks_deep
            )));
        }
        let count = self.chunk_count();
        if count > MAX_CHUNKS {
            return Err(ConfigError::Invalid(format!(
                "{count} chunks exceeds the picking limit of {MAX_CHUNKS}"
            )));
        }
        if !(self.voxel_scale > 0.0 && self.voxel_scale.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "voxel_scale must be positive, got {}",
                self.voxel_scale
            )));
        }
        if self.heightmap.feature_spread == 0 {
            return Err(ConfigError::Invalid("feature_spread must be at least 1".into()));
        }
        Ok(())
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks_wide.saturating_mul(self.chunks_deep)
    }

    /// Diamond-square run covering the whole grid, one sample per column.
    pub fn diamond_square(&self) -> DiamondSquare {
        DiamondSquare {
            width: self.chunks_wide * CHUNK_X,
            height: self.chunks_deep * CHUNK_Z,
            default_height: self.heightmap.default_height,
            feature_spread: self.heightmap.feature_spread,
            feature_max_height: self.heightmap.feature_max_height,
            noise_scale: self.heightmap.noise_scale,
        }
    }
}
