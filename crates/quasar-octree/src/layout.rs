//! Level layout of the flattened octree.
//!
//! The octree is not a pointer tree: it is one flat array divided into
//! contiguous per-level segments, coarsest level first. [`OctreeLayout`]
//! holds the per-level grid sizes and prefix-summed start offsets, computed
//! once per chunk size and passed by reference to the builder, the combiner,
//! and the world.

/// Per-level layout of a chunk's flattened octree.
///
/// Level 0 is the root (a single cell spanning the whole chunk); each
/// subsequent level doubles the grid resolution until it matches the voxel
/// resolution at the finest level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OctreeLayout {
    /// Chunk edge length in voxels.
    chunk_size: u32,
    /// Grid edge length (in cells) per level: 1, 2, 4, ... chunk_size.
    grid_sizes: Vec<u32>,
    /// Start offset of each level's segment in the flat node array.
    level_starts: Vec<u32>,
    /// Total node count across all levels.
    nodes_required: u32,
}

impl OctreeLayout {
    /// Builds the layout for a chunk of the given edge length.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is not a power of two, is smaller than 2, or
    /// needs more nodes than the `u32` offset space can address.
    pub fn new(chunk_size: u32) -> Self {
        assert!(
            chunk_size >= 2 && chunk_size.is_power_of_two(),
            "chunk size must be a power of two >= 2, got {chunk_size}"
        );

        let levels = chunk_size.ilog2() as usize + 1;
        let mut grid_sizes = Vec::with_capacity(levels);
        let mut level_starts = Vec::with_capacity(levels);
        // Node offsets are u32 on the GPU side, so the running count is
        // accumulated in u64 and checked level by level.
        let mut total = 0u64;
        let mut size = 1u32;
        for _ in 0..levels {
            grid_sizes.push(size);
            level_starts.push(total as u32);
            let cells = u64::from(size);
            total += cells * cells * cells;
            assert!(
                total <= u64::from(u32::MAX),
                "chunk size {chunk_size} needs {total} octree nodes, which exceeds u32 offsets"
            );
            size *= 2;
        }

        Self {
            chunk_size,
            grid_sizes,
            level_starts,
            nodes_required: total as u32,
        }
    }

    /// Chunk edge length in voxels.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Number of pyramid levels, root included.
    pub fn levels(&self) -> usize {
        self.grid_sizes.len()
    }

    /// Grid edge length (in cells) at `level`.
    pub fn grid_size(&self, level: usize) -> u32 {
        self.grid_sizes[level]
    }

    /// Start offset of `level`'s segment in the flat node array.
    pub fn level_start(&self, level: usize) -> u32 {
        self.level_starts[level]
    }

    /// Edge length, in voxels, covered by one cell at `level`.
    pub fn cell_size(&self, level: usize) -> u32 {
        self.chunk_size / self.grid_sizes[level]
    }

    /// Total number of nodes in one chunk's flattened octree.
    pub fn nodes_required(&self) -> u32 {
        self.nodes_required
    }

    /// Number of voxels in one chunk.
    pub fn chunk_volume(&self) -> usize {
        let s = self.chunk_size as usize;
        s * s * s
    }

    /// Linearizes a cell coordinate within a level's grid.
    pub fn cell_index(x: u32, y: u32, z: u32, grid_size: u32) -> usize {
        (x + y * grid_size + z * grid_size * grid_size) as usize
    }

    /// Inverse of [`cell_index`](Self::cell_index).
    pub fn cell_coords(index: usize, grid_size: u32) -> (u32, u32, u32) {
        let g = grid_size as usize;
        ((index % g) as u32, ((index / g) % g) as u32, (index / (g * g)) as u32)
    }
}
