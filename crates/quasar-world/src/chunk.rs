//! One live chunk: voxel occupancy, its flattened octree, and its place in
//! the combined buffer.

use quasar_octree::{GridNode, NodeMetadata, OctreeLayout, build_octree};
use quasar_voxel::{ChunkCoord, SolidSampler, VoxelBitset, generate_field};

/// Sentinel for "this chunk's octree is not in the combined buffer".
pub const OFFSET_NOT_PRESENT: u32 = u32::MAX;

/// A fixed-size cube of voxels at one chunk-grid coordinate.
///
/// The chunk owns its voxel bits for its whole lifetime, but only owns its
/// node array between octree construction and the next combine: combination
/// moves the nodes into the shared buffer and leaves `nodes` empty, with
/// `octree_offset` pointing at the segment. Rebuilt from `voxels` on demand.
pub struct Chunk {
    /// Chunk-grid position (identity).
    pub position: ChunkCoord,
    /// Bit-packed solid/empty state, one bit per voxel.
    pub voxels: VoxelBitset,
    /// This chunk's flattened octree; empty once combined.
    pub nodes: Vec<GridNode>,
    /// Start of this chunk's segment in the combined buffer, or
    /// [`OFFSET_NOT_PRESENT`].
    pub octree_offset: u32,
}

impl Chunk {
    /// Generates a chunk's voxel field and builds its octree, synchronously.
    ///
    /// `field_workers` sizes the fork-join pool used for the voxel fill
    /// (0 = default).
    pub fn build<S: SolidSampler, M: NodeMetadata>(
        position: ChunkCoord,
        layout: &OctreeLayout,
        sampler: &S,
        metadata: &M,
        field_workers: usize,
    ) -> Self {
        let voxels = generate_field(position, layout.chunk_size(), sampler, field_workers);
        let nodes = build_octree(layout, &voxels, metadata);
        Self {
            position,
            voxels,
            nodes,
            octree_offset: OFFSET_NOT_PRESENT,
        }
    }

    /// Rebuilds the node array from the stored voxels if a previous combine
    /// drained it.
    pub fn ensure_nodes<M: NodeMetadata>(&mut self, layout: &OctreeLayout, metadata: &M) {
        if self.nodes.is_empty() {
            self.nodes = build_octree(layout, &self.voxels, metadata);
        }
    }

    /// Returns `true` if this chunk currently has a combined-buffer segment.
    pub fn is_combined(&self) -> bool {
        self.octree_offset != OFFSET_NOT_PRESENT
    }
}
