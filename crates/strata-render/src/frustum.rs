use glam::{Mat4, Vec3, Vec4};

/// View frustum as six planes in Hessian normal form (ax + by + cz + d = 0)
/// with normals pointing inward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// left, right, bottom, top, near, far
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Gribb-Hartmann plane extraction from a view-projection matrix.
    /// Assumes glam's `[0, 1]` clip-space depth.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let row0 = vp.row(0);
        let row1 = vp.row(1);
        let row2 = vp.row(2);
        let row3 = vp.row(3);

        Self {
            planes: [
                normalize_plane(row3 + row0),
                normalize_plane(row3 - row0),
                normalize_plane(row3 + row1),
                normalize_plane(row3 - row1),
                normalize_plane(row2),
                normalize_plane(row3 - row2),
            ],
        }
    }

    pub fn from_projection_view(projection: &Mat4, view: &Mat4) -> Self {
        Self::from_view_projection(&(*projection * *view))
    }

    /// True if the box is at least partially inside.
    pub fn intersects_aabb(&self, min: Vec3, max: Vec3) -> bool {
        self.planes.iter().all(|plane| {
            // Corner furthest along the plane normal.
            let p = Vec3::new(
                if plane.x > 0.0 { max.x } else { min.x },
                if plane.y > 0.0 { max.y } else { min.y },
                if plane.z > 0.0 { max.z } else { min.z },
            );
            plane.truncate().dot(p) + plane.w >= 0.0
        })
    }
}

#[inline]
fn normalize_plane(plane: Vec4) -> Vec4 {
    let len = plane.truncate().length();
    if len > 0.0001 {
        plane / len
    } else {
        plane
    }
}
