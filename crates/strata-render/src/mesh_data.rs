use std::collections::TryReserveError;

use strata_core::constants::{VEDGE_COMPS, VN_COMPS, VP_COMPS, VPICKING_COMPS, VT_COMPS};

/// Vertex arrays for one chunk, produced by the mesher and handed to the
/// render backend for upload. Unindexed triangle list; every array is
/// parallel and holds `vertex_count` entries of its component width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMeshData {
    /// xyz in chunk-local voxel units.
    pub positions: Vec<f32>,
    /// uv per vertex.
    pub texcoords: Vec<f32>,
    /// Texture array layer per vertex.
    pub palette: Vec<u32>,
    /// Face normal xyz, w = 1.0 when the face is sunlit.
    pub normals: Vec<f32>,
    /// Picking colour rgb, each channel normalized to [0, 1].
    pub picking: Vec<f32>,
    /// Face border flags (left, right, top, bottom). 1.0 where the vertex
    /// lies on an edge that borders a different block or open space.
    pub edges: Vec<f32>,
    pub vertex_count: usize,
}

/// Attributes of a single emitted vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; VP_COMPS],
    pub texcoord: [f32; VT_COMPS],
    pub palette: u32,
    pub normal: [f32; VN_COMPS],
    pub picking: [f32; VPICKING_COMPS],
    pub edges: [f32; VEDGE_COMPS],
}

impl ChunkMeshData {
    /// Empty mesh with room for `vertices` vertices in every array.
    pub fn try_with_capacity(vertices: usize) -> Result<Self, TryReserveError> {
        let mut mesh = Self::default();
        mesh.positions.try_reserve_exact(vertices * VP_COMPS)?;
        mesh.texcoords.try_reserve_exact(vertices * VT_COMPS)?;
        mesh.palette.try_reserve_exact(vertices)?;
        mesh.normals.try_reserve_exact(vertices * VN_COMPS)?;
        mesh.picking.try_reserve_exact(vertices * VPICKING_COMPS)?;
        mesh.edges.try_reserve_exact(vertices * VEDGE_COMPS)?;
        Ok(mesh)
    }

    pub fn push_vertex(&mut self, v: MeshVertex) {
        self.positions.extend_from_slice(&v.position);
        self.texcoords.extend_from_slice(&v.texcoord);
        self.palette.push(v.palette);
        self.normals.extend_from_slice(&v.normal);
        self.picking.extend_from_slice(&v.picking);
        self.edges.extend_from_slice(&v.edges);
        self.vertex_count += 1;
    }

    /// Release capacity reserved beyond the emitted vertices.
    pub fn shrink_to_fit(&mut self) {
        self.positions.shrink_to_fit();
        self.texcoords.shrink_to_fit();
        self.palette.shrink_to_fit();
        self.normals.shrink_to_fit();
        self.picking.shrink_to_fit();
        self.edges.shrink_to_fit();
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    pub fn face_count(&self) -> usize {
        self.vertex_count / strata_core::constants::FACE_VERTS
    }

    /// Read back one vertex. `None` past the end.
    pub fn vertex(&self, i: usize) -> Option<MeshVertex> {
        if i >= self.vertex_count {
            return None;
        }
        let mut v = MeshVertex {
            position: [0.0; VP_COMPS],
            texcoord: [0.0; VT_COMPS],
            palette: self.palette[i],
            normal: [0.0; VN_COMPS],
            picking: [0.0; VPICKING_COMPS],
            edges: [0.0; VEDGE_COMPS],
        };
        v.position
            .copy_from_slice(&self.positions[i * VP_COMPS..(i + 1) * VP_COMPS]);
        v.texcoord
            .copy_from_slice(&self.texcoords[i * VT_COMPS..(i + 1) * VT_COMPS]);
        v.normal
            .copy_from_slice(&self.normals[i * VN_COMPS..(i + 1) * VN_COMPS]);
        v.picking
            .copy_from_slice(&self.picking[i * VPICKING_COMPS..(i + 1) * VPICKING_COMPS]);
        v.edges
            .copy_from_slice(&self.edges[i * VEDGE_COMPS..(i + 1) * VEDGE_COMPS]);
        Some(v)
    }

    /// Raw bytes of each array for buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn texcoord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texcoords)
    }

    pub fn palette_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.palette)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn picking_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.picking)
    }

    pub fn edge_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.edges)
    }

    /// Total bytes across all arrays.
    pub fn byte_size(&self) -> usize {
        self.position_bytes().len()
            + self.texcoord_bytes().len()
            + self.palette_bytes().len()
            + self.normal_bytes().len()
            + self.picking_bytes().len()
            + self.edge_bytes().len()
    }
}
