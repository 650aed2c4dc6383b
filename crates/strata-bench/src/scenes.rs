use glam::{IVec3, Vec3};
use strata_core::constants::{CHUNK_X, CHUNK_Z};
use strata_core::Face;
use strata_world::WorldConfig;

/// Configuration for a single benchmark scene.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub name: &'static str,
    pub chunks_wide: usize,
    pub chunks_deep: usize,
    /// Camera height above the grid centre, in voxels.
    pub camera_height: f32,
    /// Picks and block placements per scene.
    pub edit_count: u32,
}

/// Return the standard suite of benchmark scenes (16 to 256 chunks).
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "4x4",
            chunks_wide: 4,
            chunks_deep: 4,
            camera_height: 120.0,
            edit_count: 32,
        },
        SceneConfig {
            name: "8x8",
            chunks_wide: 8,
            chunks_deep: 8,
            camera_height: 140.0,
            edit_count: 64,
        },
        SceneConfig {
            name: "16x16",
            chunks_wide: 16,
            chunks_deep: 16,
            camera_height: 160.0,
            edit_count: 128,
        },
    ]
}

impl SceneConfig {
    /// `base` with this scene's grid size.
    pub fn world_config(&self, base: &WorldConfig) -> WorldConfig {
        WorldConfig {
            chunks_wide: self.chunks_wide,
            chunks_deep: self.chunks_deep,
            ..base.clone()
        }
    }

    /// Eye position above the grid's +z edge, in world units.
    pub fn camera_position(&self, voxel_scale: f32) -> Vec3 {
        let cx = (self.chunks_wide * CHUNK_X) as f32 / 2.0;
        let cz = (self.chunks_deep * CHUNK_Z) as f32;
        Vec3::new(cx, self.camera_height, cz) * voxel_scale
    }

    /// Point the camera looks at: the grid centre at ground level.
    pub fn camera_target(&self, voxel_scale: f32) -> Vec3 {
        let cx = (self.chunks_wide * CHUNK_X) as f32 / 2.0;
        let cz = (self.chunks_deep * CHUNK_Z) as f32 / 2.0;
        Vec3::new(cx, 64.0, cz) * voxel_scale
    }
}

/// One simulated cursor hit: chunk, voxel column and face to build on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditTarget {
    pub chunk_id: usize,
    pub column: IVec3,
    pub face: Face,
}

/// Deterministic spread of edit targets across the scene's chunks. `column`
/// has y = 0; the runner resolves it to the surface.
pub fn edit_targets(config: &SceneConfig) -> Vec<EditTarget> {
    let chunk_count = config.chunks_wide * config.chunks_deep;
    (0..config.edit_count as usize)
        .map(|i| {
            let hash = i.wrapping_mul(7919) ^ (i.wrapping_mul(31337) >> 3);
            let face = if hash % 4 == 0 {
                Face::from_index((hash % 6) as u8).unwrap_or(Face::Up)
            } else {
                Face::Up
            };
            EditTarget {
                chunk_id: hash % chunk_count,
                column: IVec3::new((hash % CHUNK_X) as i32, 0, ((hash / CHUNK_X) % CHUNK_Z) as i32),
                face,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenes_fit_picking_limit() {
        for scene in standard_scenes() {
            let config = scene.world_config(&WorldConfig::default());
            config.validate().expect("scene grid should be valid");
        }
    }

    #[test]
    fn test_default_world_file_parses() {
        let config = WorldConfig::from_ron_str(include_str!("../../../data/world.ron"))
            .expect("data/world.ron should parse");
        assert_eq!(config.seed, 1337);
        config.validate().expect("valid");
    }

    #[test]
    fn test_edit_targets_in_range() {
        let scene = &standard_scenes()[0];
        let targets = edit_targets(scene);
        assert_eq!(targets.len(), scene.edit_count as usize);
        for t in targets {
            assert!(t.chunk_id < 16);
            assert!((0..16).contains(&t.column.x));
            assert!((0..16).contains(&t.column.z));
        }
        assert_eq!(edit_targets(scene), edit_targets(scene));
    }
}
