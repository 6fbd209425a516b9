//! Top-level orchestrator: populate, combine, index, and the camera gate.

use glam::Vec3;
use tracing::{debug, info};

use quasar_index::{IndexError, SpatialIndex};
use quasar_octree::{GridNode, NodeMetadata, OctreeLayout, combine_octrees};
use quasar_voxel::{ChunkCoord, SolidSampler};

use crate::store::ChunkStore;

/// Edge length of one voxel in world units.
pub const VOXEL_SIZE: f32 = 1.0;

/// World lifecycle states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldState {
    /// No chunks have been generated.
    Empty,
    /// A populate call is in progress.
    Populating,
    /// Combined buffer and spatial index are consistent and queryable.
    Ready,
}

/// Errors surfaced by world orchestration.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// An update or query was issued before a successful populate.
    #[error("world has not been populated")]
    NotPopulated,

    /// Spatial index construction failed.
    #[error("spatial index build failed: {0}")]
    Index(#[from] IndexError),
}

/// The world: a cube of `render_distance³` chunks, their combined octree
/// buffer, and the spatial index over it.
///
/// The chunk set's composition is fixed after [`populate`](Self::populate);
/// updates recompute the combined buffer and index wholesale. Supporting
/// chunk add/remove on camera movement is an extension point, not
/// implemented here.
pub struct World<S, M> {
    layout: OctreeLayout,
    sampler: S,
    metadata: M,
    render_distance: u32,
    workers: usize,
    store: ChunkStore,
    combined: Vec<GridNode>,
    index: Option<SpatialIndex>,
    last_camera_chunk: Option<ChunkCoord>,
    state: WorldState,
    rebuilds: u64,
}

impl<S, M> World<S, M>
where
    S: SolidSampler,
    M: NodeMetadata + Sync,
{
    /// Creates an empty world. `workers` sizes the population pool
    /// (0 = default).
    pub fn new(
        layout: OctreeLayout,
        render_distance: u32,
        sampler: S,
        metadata: M,
        workers: usize,
    ) -> Self {
        Self {
            layout,
            sampler,
            metadata,
            render_distance,
            workers,
            store: ChunkStore::new(),
            combined: Vec::new(),
            index: None,
            last_camera_chunk: None,
            state: WorldState::Empty,
            rebuilds: 0,
        }
    }

    /// Generates every chunk in parallel, then combines and indexes them.
    ///
    /// The combine + index step runs synchronously after the generation
    /// barrier, so on return the buffer and index always describe the same
    /// chunk set (there is no window where a reader could pair a fresh
    /// buffer with a stale index, or vice versa).
    pub fn populate(&mut self) -> Result<(), WorldError> {
        self.state = WorldState::Populating;
        let started = std::time::Instant::now();

        self.store = ChunkStore::populate(
            self.render_distance,
            &self.layout,
            &self.sampler,
            &self.metadata,
            self.workers,
        );
        self.rebuild()?;

        self.state = WorldState::Ready;
        info!(
            chunks = self.store.len(),
            nodes = self.combined.len(),
            elapsed = ?started.elapsed(),
            "world populated"
        );
        Ok(())
    }

    /// Rebuilds the combined buffer and index if the camera crossed into a
    /// different chunk since the last call.
    ///
    /// Returns `Ok(false)` on the (dominant) fast path where the camera is
    /// still inside the same chunk, `Ok(true)` after a rebuild.
    pub fn update_if_needed(&mut self, camera: Vec3) -> Result<bool, WorldError> {
        if self.state != WorldState::Ready {
            return Err(WorldError::NotPopulated);
        }

        let camera_chunk = ChunkCoord::from_world(camera, self.layout.chunk_size());
        if self.last_camera_chunk == Some(camera_chunk) {
            return Ok(false);
        }

        debug!(?camera_chunk, "camera crossed a chunk boundary; rebuilding");
        self.last_camera_chunk = Some(camera_chunk);
        self.rebuild()?;
        Ok(true)
    }

    /// Combines every chunk's octree into one buffer and rebuilds the
    /// spatial index over the resulting offsets.
    ///
    /// Chunks whose node arrays were drained by a previous combine are
    /// rebuilt from their voxel bits first. The index is built strictly
    /// after every offset is final.
    fn rebuild(&mut self) -> Result<(), WorldError> {
        let chunks = self.store.chunks_mut();
        let mut segments: Vec<Vec<GridNode>> = chunks
            .iter_mut()
            .map(|chunk| {
                chunk.ensure_nodes(&self.layout, &self.metadata);
                std::mem::take(&mut chunk.nodes)
            })
            .collect();

        let (combined, offsets) = combine_octrees(&mut segments);
        for (chunk, &offset) in chunks.iter_mut().zip(&offsets) {
            chunk.octree_offset = offset;
        }

        let entries: Vec<(ChunkCoord, u32)> = chunks
            .iter()
            .map(|chunk| (chunk.position, chunk.octree_offset))
            .collect();
        let index = SpatialIndex::build(&entries)?;

        self.combined = combined;
        self.index = Some(index);
        self.rebuilds += 1;
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorldState {
        self.state
    }

    /// Number of combine + index rebuilds performed so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// The live chunk set.
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Number of live chunks.
    pub fn chunk_count(&self) -> usize {
        self.store.len()
    }

    /// Chunk edge length in voxels.
    pub fn chunk_size(&self) -> u32 {
        self.layout.chunk_size()
    }

    /// Chunk-to-world scale factor (voxel edge length in world units).
    pub fn voxel_size(&self) -> f32 {
        VOXEL_SIZE
    }

    /// The octree level layout shared by every chunk.
    pub fn layout(&self) -> &OctreeLayout {
        &self.layout
    }

    /// The combined octree buffer.
    pub fn combined_nodes(&self) -> &[GridNode] {
        &self.combined
    }

    /// The combined octree buffer as GPU-uploadable bytes.
    pub fn combined_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.combined)
    }

    /// The spatial index, once populated.
    pub fn spatial_index(&self) -> Option<&SpatialIndex> {
        self.index.as_ref()
    }

    /// Number of hash buckets in the spatial index (0 before populate).
    pub fn bucket_count(&self) -> usize {
        self.index.as_ref().map_or(0, SpatialIndex::bucket_count)
    }
}
