//! Integer chunk-grid coordinates.
//!
//! A [`ChunkCoord`] identifies a chunk by its position on the chunk grid
//! (world position divided by the chunk edge length), not in world units.

use glam::Vec3;

/// Identifies a chunk's position on the chunk grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Y coordinate.
    pub y: i32,
    /// Chunk-grid Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the coordinate of the neighboring chunk offset by `(dx, dy, dz)`.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Returns the world-space coordinate of this chunk's minimum corner.
    ///
    /// Widened to `i64` so that extreme chunk coordinates cannot overflow
    /// when multiplied by the chunk edge length.
    pub fn world_min(self, chunk_size: u32) -> (i64, i64, i64) {
        let s = i64::from(chunk_size);
        (
            i64::from(self.x) * s,
            i64::from(self.y) * s,
            i64::from(self.z) * s,
        )
    }

    /// Returns the chunk containing the given world-space position.
    ///
    /// Uses floor division per axis, so positions with negative components
    /// map to the correct chunk (e.g. x = -0.5 lands in chunk -1).
    pub fn from_world(position: Vec3, chunk_size: u32) -> Self {
        let s = chunk_size as f32;
        Self {
            x: (position.x / s).floor() as i32,
            y: (position.y / s).floor() as i32,
            z: (position.z / s).floor() as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_min_scales_by_chunk_size() {
        let coord = ChunkCoord::new(2, -1, 0);
        assert_eq!(coord.world_min(32), (64, -32, 0));
    }

    #[test]
    fn test_from_world_positive() {
        let coord = ChunkCoord::from_world(Vec3::new(31.9, 32.0, 63.5), 32);
        assert_eq!(coord, ChunkCoord::new(0, 1, 1));
    }

    #[test]
    fn test_from_world_negative_uses_floor() {
        let coord = ChunkCoord::from_world(Vec3::new(-0.5, -32.0, -32.5), 32);
        assert_eq!(coord, ChunkCoord::new(-1, -1, -2));
    }

    #[test]
    fn test_offset() {
        let coord = ChunkCoord::new(1, 2, 3).offset(0, -2, 1);
        assert_eq!(coord, ChunkCoord::new(1, 0, 4));
    }
}
