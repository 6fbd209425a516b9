//! Chunk frustum culling: AABB tests against view-projection planes.
//!
//! The renderer consumes chunk bounding boxes; this module supplies the
//! plane extraction and the conservative visibility test. Pure geometry,
//! no GPU types.

use glam::{Mat4, Vec3, Vec4};

use quasar_voxel::ChunkCoord;

/// An axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a new AABB from min and max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

/// Returns the world-space bounding box of a chunk.
pub fn chunk_aabb(coord: ChunkCoord, chunk_size: u32) -> Aabb {
    let (x, y, z) = coord.world_min(chunk_size);
    let min = Vec3::new(x as f32, y as f32, z as f32);
    Aabb::new(min, min + Vec3::splat(chunk_size as f32))
}

/// A view frustum as six inward-pointing planes extracted from a
/// view-projection matrix.
///
/// Each plane is `Vec4(a, b, c, d)` with `(a, b, c)` the normalized inward
/// normal and `d` the signed distance term.
#[derive(Clone, Debug)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extracts the six planes (left, right, bottom, top, near, far) using
    /// the Gribb/Hartmann row method, then normalizes them.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        let mut planes = [
            rows[3] + rows[0],
            rows[3] - rows[0],
            rows[3] + rows[1],
            rows[3] - rows[1],
            rows[3] + rows[2],
            rows[3] - rows[2],
        ];
        for plane in &mut planes {
            let len = plane.truncate().length();
            if len > 0.0 {
                *plane /= len;
            }
        }

        Self { planes }
    }

    /// Tests whether an AABB is at least partially inside the frustum.
    ///
    /// Positive-vertex method: for each plane, take the corner furthest
    /// along the plane normal; if that corner is behind the plane, the box
    /// is fully outside. Conservative near frustum corners, never rejects
    /// a visible box.
    pub fn intersects(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            let normal = plane.truncate();
            let p = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            if normal.dot(p) + plane.w < 0.0 {
                return false;
            }
        }
        true
    }

    /// Convenience: visibility test for a whole chunk.
    pub fn chunk_visible(&self, coord: ChunkCoord, chunk_size: u32) -> bool {
        self.intersects(&chunk_aabb(coord, chunk_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn look_down_negative_z() -> Frustum {
        // Camera at origin looking toward -Z, 90 degree FOV.
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 1000.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn test_chunk_aabb_spans_chunk_size() {
        let aabb = chunk_aabb(ChunkCoord::new(1, -1, 0), 32);
        assert_eq!(aabb.min, Vec3::new(32.0, -32.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(64.0, 0.0, 32.0));
    }

    #[test]
    fn test_box_in_front_is_visible() {
        let frustum = look_down_negative_z();
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -10.0), Vec3::new(1.0, 1.0, -5.0));
        assert!(frustum.intersects(&aabb));
    }

    #[test]
    fn test_box_behind_camera_is_culled() {
        let frustum = look_down_negative_z();
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, 5.0), Vec3::new(1.0, 1.0, 10.0));
        assert!(!frustum.intersects(&aabb));
    }

    #[test]
    fn test_box_far_off_axis_is_culled() {
        let frustum = look_down_negative_z();
        // Far to the left of a 90 degree frustum at shallow depth.
        let aabb = Aabb::new(Vec3::new(-500.0, 0.0, -10.0), Vec3::new(-490.0, 1.0, -9.0));
        assert!(!frustum.intersects(&aabb));
    }

    #[test]
    fn test_chunk_straddling_a_plane_is_visible() {
        let frustum = look_down_negative_z();
        // Chunk (0,0,-1) spans z in [-32, 0): partially in front.
        assert!(frustum.chunk_visible(ChunkCoord::new(0, 0, -1), 32));
    }
}
