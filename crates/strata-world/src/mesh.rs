use std::ops::Range;

use glam::IVec3;
use strata_core::constants::{
    CHUNK_X, CHUNK_Y, CHUNK_Z, FACE_VERTS, MAX_VERTS_PER_VOXEL, VEDGE_COMPS,
};
use strata_core::{BlockType, Face, ALL_FACES};
use strata_render::pick::vertex_pick_triple;
use strata_render::{ChunkMeshData, MeshVertex};

use crate::chunk::Chunk;
use crate::error::MeshError;

/// Unit-cube corners for each face, two counter-clockwise triangles,
/// indexed by `Face`.
const FACE_TEMPLATES: [[[f32; 3]; FACE_VERTS]; 6] = [
    // West (-x)
    [
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
    ],
    // East (+x)
    [
        [1.0, 1.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 0.0],
        [1.0, 1.0, 0.0],
        [1.0, 0.0, 1.0],
        [1.0, 0.0, 0.0],
    ],
    // Down (-y)
    [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
    ],
    // Up (+y)
    [
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 1.0],
        [1.0, 1.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
    ],
    // North (-z)
    [
        [1.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0],
    ],
    // South (+z)
    [
        [0.0, 1.0, 1.0],
        [0.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
    ],
];

const TEXCOORD_TEMPLATE: [[f32; 2]; FACE_VERTS] = [
    [0.0, 1.0],
    [0.0, 0.0],
    [1.0, 1.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [1.0, 0.0],
];

/// In-plane neighbour offsets per face, ordered left, right, top, bottom
/// to match the texture u and v axes.
const EDGE_NEIGHBOURS: [[[i32; 3]; VEDGE_COMPS]; 6] = [
    [[0, 0, -1], [0, 0, 1], [0, 1, 0], [0, -1, 0]],
    [[0, 0, 1], [0, 0, -1], [0, 1, 0], [0, -1, 0]],
    [[-1, 0, 0], [1, 0, 0], [0, 0, 1], [0, 0, -1]],
    [[-1, 0, 0], [1, 0, 0], [0, 0, -1], [0, 0, 1]],
    [[1, 0, 0], [-1, 0, 0], [0, 1, 0], [0, -1, 0]],
    [[-1, 0, 0], [1, 0, 0], [0, 1, 0], [0, -1, 0]],
];

/// Mesh every exposed face in the chunk.
pub fn generate_mesh(chunk: &Chunk) -> Result<ChunkMeshData, MeshError> {
    generate_mesh_range(chunk, 0..CHUNK_Y as i32)
}

/// Mesh exposed faces of voxels whose y lies in `y_range`. A face is
/// exposed when its neighbour is air or outside the chunk.
pub fn generate_mesh_range(chunk: &Chunk, y_range: Range<i32>) -> Result<ChunkMeshData, MeshError> {
    let requested_vertices = MAX_VERTS_PER_VOXEL * chunk.non_air_count() as usize;
    let mut mesh = ChunkMeshData::try_with_capacity(requested_vertices)
        .map_err(|_| MeshError::OutOfMemory { requested_vertices })?;

    let y_start = y_range.start.max(0);
    let y_end = y_range.end.min(CHUNK_Y as i32);
    for y in y_start..y_end {
        for z in 0..CHUNK_Z as i32 {
            for x in 0..CHUNK_X as i32 {
                let block = match chunk.get_block(x, y, z) {
                    Some(b) if b.is_solid() => b,
                    _ => continue,
                };
                for face in ALL_FACES {
                    let n = face.offset();
                    let exposed = chunk
                        .get_block(x + n.x, y + n.y, z + n.z)
                        .map_or(true, BlockType::is_air);
                    if exposed {
                        emit_face(&mut mesh, chunk, IVec3::new(x, y, z), face, block);
                    }
                }
            }
        }
    }

    mesh.shrink_to_fit();
    Ok(mesh)
}

fn emit_face(mesh: &mut ChunkMeshData, chunk: &Chunk, pos: IVec3, face: Face, block: BlockType) {
    let sunlit = chunk.is_face_exposed_to_sun(pos.x, pos.y, pos.z, face);
    let normal = face.normal();
    let normal = [normal.x, normal.y, normal.z, if sunlit { 1.0 } else { 0.0 }];
    let picking = vertex_pick_triple(pos, face);
    let palette = block.palette_index().unwrap_or(0);
    let origin = pos.as_vec3();
    let borders = face_borders(chunk, pos, face, block);

    let template = &FACE_TEMPLATES[face.index() as usize];
    for (corner, uv) in template.iter().zip(TEXCOORD_TEMPLATE) {
        mesh.push_vertex(MeshVertex {
            position: [
                corner[0] + origin.x,
                corner[1] + origin.y,
                corner[2] + origin.z,
            ],
            texcoord: uv,
            palette,
            normal,
            picking,
            edges: vertex_edges(borders, uv),
        });
    }
}

/// Which edges of `face` border something other than a continuation of
/// the same surface. An edge counts when the in-plane neighbour is outside
/// the chunk or a different block, or when the cell in front of that
/// neighbour is solid.
fn face_borders(chunk: &Chunk, pos: IVec3, face: Face, block: BlockType) -> [bool; VEDGE_COMPS] {
    let front = face.offset();
    EDGE_NEIGHBOURS[face.index() as usize].map(|offset| {
        let n = pos + IVec3::from(offset);
        let beside = chunk.get_block(n.x, n.y, n.z);
        let m = n + front;
        let covered = chunk.get_block(m.x, m.y, m.z).is_some_and(BlockType::is_solid);
        beside != Some(block) || covered
    })
}

/// Border flags for the corner at `uv`; only the two edges meeting at
/// that corner can be set.
fn vertex_edges(borders: [bool; VEDGE_COMPS], uv: [f32; 2]) -> [f32; VEDGE_COMPS] {
    let touches = [uv[0] == 0.0, uv[0] == 1.0, uv[1] == 1.0, uv[1] == 0.0];
    let mut edges = [0.0; VEDGE_COMPS];
    for ((edge, border), touch) in edges.iter_mut().zip(borders).zip(touches) {
        if border && touch {
            *edge = 1.0;
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use strata_core::constants::COLUMNS_PER_CHUNK;

    use crate::heightmap::HeightmapBuffer;

    fn single_voxel(x: i32, y: i32, z: i32, block: BlockType) -> Chunk {
        let mut chunk = Chunk::empty().expect("alloc");
        chunk.set_block(x, y, z, block);
        chunk
    }

    #[test]
    fn test_isolated_voxel_six_faces() {
        let chunk = single_voxel(8, 100, 8, BlockType::Stone);
        let mesh = generate_mesh(&chunk).expect("mesh");
        assert_eq!(mesh.vertex_count, 36);
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn test_adjacent_voxels_share_face() {
        let mut chunk = single_voxel(8, 100, 8, BlockType::Dirt);
        chunk.set_block(9, 100, 8, BlockType::Dirt);
        let mesh = generate_mesh(&chunk).expect("mesh");
        assert_eq!(mesh.face_count(), 10);
    }

    #[test]
    fn test_empty_chunk_empty_mesh() {
        let chunk = Chunk::empty().expect("alloc");
        let mesh = generate_mesh(&chunk).expect("mesh");
        assert!(mesh.is_empty());
        assert!(mesh.positions.is_empty());
    }

    #[test]
    fn test_chunk_edge_faces_emitted() {
        // Corner voxel: faces toward the outside are exposed too.
        let chunk = single_voxel(0, 0, 0, BlockType::Crust);
        let mesh = generate_mesh(&chunk).expect("mesh");
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn test_flat_chunk_faces() {
        // Top and bottom of every column plus the four outer walls.
        let chunk = Chunk::flat().expect("alloc");
        let mesh = generate_mesh(&chunk).expect("mesh");
        let expected = 2 * COLUMNS_PER_CHUNK + 2 * CHUNK_X + 2 * CHUNK_Z;
        assert_eq!(mesh.face_count(), expected);
    }

    #[test]
    fn test_vertex_attributes() {
        let chunk = single_voxel(2, 7, 3, BlockType::Grass);
        let mesh = generate_mesh(&chunk).expect("mesh");
        // Faces come out in West, East, Down, Up, North, South order.
        let up = mesh.vertex(Face::Up as usize * FACE_VERTS).expect("up face");
        assert_eq!(up.position, [2.0, 8.0, 3.0]);
        assert_eq!(up.texcoord, [0.0, 1.0]);
        assert_eq!(up.normal, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(up.palette, 0);
        assert_eq!(up.picking, vertex_pick_triple(IVec3::new(2, 7, 3), Face::Up));

        for i in 0..mesh.vertex_count {
            let v = mesh.vertex(i).expect("vertex");
            let p = Vec3::from(v.position);
            assert!(p.cmpge(Vec3::new(2.0, 7.0, 3.0)).all());
            assert!(p.cmple(Vec3::new(3.0, 8.0, 4.0)).all());
        }
    }

    #[test]
    fn test_sunlit_flag() {
        let mut chunk = single_voxel(5, 3, 5, BlockType::Stone);
        // Roof two cells above.
        chunk.set_block(5, 5, 5, BlockType::Stone);
        let mesh = generate_mesh_range(&chunk, 3..4).expect("mesh");
        assert_eq!(mesh.face_count(), 6);
        let up = mesh.vertex(Face::Up as usize * FACE_VERTS).expect("up");
        assert_eq!(up.normal[3], 0.0, "roofed top face is shaded");
        let west = mesh.vertex(Face::West as usize * FACE_VERTS).expect("west");
        assert_eq!(west.normal[3], 1.0, "open neighbour column is lit");
    }

    #[test]
    fn test_range_limits_rows() {
        let hm = HeightmapBuffer::filled(16, 16, 0).expect("heightmap");
        let chunk = Chunk::generate(&hm, false, 0, 0).expect("alloc");
        let full = generate_mesh(&chunk).expect("mesh");
        let top_only = generate_mesh_range(&chunk, 16..17).expect("mesh");
        // Grass layer: tops plus the outer walls of one row of voxels.
        assert_eq!(top_only.face_count(), COLUMNS_PER_CHUNK + 2 * CHUNK_X + 2 * CHUNK_Z);
        assert!(full.face_count() > top_only.face_count());
        assert!(generate_mesh_range(&chunk, 200..300).expect("mesh").is_empty());
    }

    #[test]
    fn test_palette_per_block() {
        let mesh = generate_mesh(&single_voxel(1, 1, 1, BlockType::Crust)).expect("mesh");
        assert!(mesh.palette.iter().all(|&p| p == 3));
        let mesh = generate_mesh(&single_voxel(1, 1, 1, BlockType::Stone)).expect("mesh");
        assert!(mesh.palette.iter().all(|&p| p == 1));
    }

    /// Vertex `i` of the face emitted for `face` of the voxel at `pos`.
    fn face_vertex(mesh: &ChunkMeshData, pos: IVec3, face: Face, i: usize) -> MeshVertex {
        let picking = vertex_pick_triple(pos, face);
        let start = (0..mesh.face_count())
            .map(|f| f * FACE_VERTS)
            .find(|&v| mesh.vertex(v).is_some_and(|v| v.picking == picking))
            .expect("face should be emitted");
        mesh.vertex(start + i).expect("vertex")
    }

    #[test]
    fn test_isolated_voxel_edges() {
        let chunk = single_voxel(8, 100, 8, BlockType::Stone);
        let mesh = generate_mesh(&chunk).expect("mesh");
        assert_eq!(mesh.edges.len(), mesh.vertex_count * VEDGE_COMPS);
        let expected = [
            [1.0, 0.0, 1.0, 0.0],
            [1.0, 0.0, 0.0, 1.0],
            [0.0, 1.0, 1.0, 0.0],
            [0.0, 1.0, 1.0, 0.0],
            [1.0, 0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 1.0],
        ];
        for face in 0..6 {
            for (i, edges) in expected.iter().enumerate() {
                let v = mesh.vertex(face * FACE_VERTS + i).expect("vertex");
                assert_eq!(&v.edges, edges, "face {face} vertex {i}");
            }
        }
    }

    #[test]
    fn test_same_block_neighbour_clears_edge() {
        let mut chunk = single_voxel(8, 100, 8, BlockType::Dirt);
        chunk.set_block(9, 100, 8, BlockType::Dirt);
        let mesh = generate_mesh(&chunk).expect("mesh");
        let first = IVec3::new(8, 100, 8);
        // The Up face continues into the second voxel on its right.
        assert_eq!(face_vertex(&mesh, first, Face::Up, 2).edges, [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(face_vertex(&mesh, first, Face::Up, 0).edges, [1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_different_block_neighbour_keeps_edge() {
        let mut chunk = single_voxel(8, 100, 8, BlockType::Dirt);
        chunk.set_block(9, 100, 8, BlockType::Stone);
        let mesh = generate_mesh(&chunk).expect("mesh");
        let v = face_vertex(&mesh, IVec3::new(8, 100, 8), Face::Up, 2);
        assert_eq!(v.edges, [0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_covered_neighbour_keeps_edge() {
        let mut chunk = single_voxel(8, 100, 8, BlockType::Dirt);
        chunk.set_block(9, 100, 8, BlockType::Dirt);
        chunk.set_block(9, 101, 8, BlockType::Stone);
        let mesh = generate_mesh(&chunk).expect("mesh");
        let v = face_vertex(&mesh, IVec3::new(8, 100, 8), Face::Up, 5);
        assert_eq!(v.edges, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_chunk_border_counts_as_edge() {
        let mut chunk = Chunk::empty().expect("alloc");
        for x in 0..CHUNK_X as i32 {
            for z in 0..CHUNK_Z as i32 {
                chunk.set_block(x, 0, z, BlockType::Crust);
            }
        }
        let mesh = generate_mesh_range(&chunk, 0..1).expect("mesh");
        // Nothing lies left of or above the corner voxel's Up face.
        let corner = IVec3::ZERO;
        assert_eq!(face_vertex(&mesh, corner, Face::Up, 0).edges, [1.0, 0.0, 1.0, 0.0]);
        assert_eq!(face_vertex(&mesh, corner, Face::Up, 5).edges, [0.0, 0.0, 0.0, 0.0]);
    }
}
