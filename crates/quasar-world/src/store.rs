//! Parallel population of the live chunk set.
//!
//! The chunk index space is partitioned into contiguous ranges, one per
//! worker; each worker builds its chunks (voxel field + octree) and sends
//! them back over a channel tagged with their index. The caller drains the
//! channel into pre-allocated slots, which is the join barrier: results land
//! by index, so the store's contents do not depend on arrival order.

use crossbeam_channel::unbounded;
use tracing::{debug, info};

use quasar_octree::{NodeMetadata, OctreeLayout};
use quasar_voxel::{ChunkCoord, SolidSampler, resolve_workers};

use crate::chunk::Chunk;

/// Fork-join pool size for the per-chunk voxel fill, nested inside the
/// per-world workers below.
pub const CHUNK_FIELD_WORKERS: usize = 8;

/// Owns the live chunk collection in population order.
pub struct ChunkStore {
    chunks: Vec<Chunk>,
}

impl ChunkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Builds the `render_distance³` chunk cube across a fixed worker pool.
    ///
    /// Chunk index `i` maps to grid coordinate
    /// `(i % R, (i / R) % R, i / R²)`. Blocks until every worker has
    /// delivered its range. Content is deterministic for a fixed sampler
    /// regardless of the worker count.
    pub fn populate<S, M>(
        render_distance: u32,
        layout: &OctreeLayout,
        sampler: &S,
        metadata: &M,
        workers: usize,
    ) -> Self
    where
        S: SolidSampler,
        M: NodeMetadata + Sync,
    {
        let r = render_distance as usize;
        let count = r * r * r;
        if count == 0 {
            return Self::new();
        }
        let workers = resolve_workers(workers).min(count);
        info!(chunks = count, workers, "populating chunk store");
        let started = std::time::Instant::now();

        let mut slots: Vec<Option<Chunk>> = (0..count).map(|_| None).collect();
        let (tx, rx) = unbounded::<(usize, Chunk)>();

        let batch = count / workers;
        std::thread::scope(|scope| {
            for worker in 0..workers {
                let start = worker * batch;
                // The final range absorbs the remainder.
                let end = if worker == workers - 1 {
                    count
                } else {
                    start + batch
                };
                let tx = tx.clone();
                scope.spawn(move || {
                    for i in start..end {
                        let position = ChunkCoord::new(
                            (i % r) as i32,
                            ((i / r) % r) as i32,
                            (i / (r * r)) as i32,
                        );
                        let chunk = Chunk::build(
                            position,
                            layout,
                            sampler,
                            metadata,
                            CHUNK_FIELD_WORKERS,
                        );
                        let _ = tx.send((i, chunk));
                    }
                });
            }
            drop(tx);

            for (i, chunk) in rx.iter() {
                slots[i] = Some(chunk);
            }
        });

        let chunks: Vec<Chunk> = slots
            .into_iter()
            .map(|slot| slot.expect("every chunk index is produced exactly once"))
            .collect();

        debug!(elapsed = ?started.elapsed(), "chunk store populated");
        Self { chunks }
    }

    /// Number of live chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The chunks, in population order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Mutable access, used by combine to assign offsets and drain nodes.
    pub fn chunks_mut(&mut self) -> &mut [Chunk] {
        &mut self.chunks
    }
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quasar_octree::HashedColors;

    #[test]
    fn test_populate_creates_the_full_cube() {
        let layout = OctreeLayout::new(8);
        let store = ChunkStore::populate(3, &layout, &|_, _, _| false, &HashedColors::default(), 4);
        assert_eq!(store.len(), 27);

        // Index i maps to (i % R, (i/R) % R, i / R²).
        let c = &store.chunks()[1 + 2 * 3 + 9];
        assert_eq!(c.position, ChunkCoord::new(1, 2, 1));
        // Every chunk carries a full octree before combination.
        assert!(
            store
                .chunks()
                .iter()
                .all(|c| c.nodes.len() == layout.nodes_required() as usize)
        );
    }

    #[test]
    fn test_populate_order_is_independent_of_worker_count() {
        let layout = OctreeLayout::new(4);
        let sampler = |x: i64, y: i64, z: i64| (x * 3 + y * 5 + z * 7).rem_euclid(4) == 0;
        let metadata = HashedColors::default();

        let one = ChunkStore::populate(2, &layout, &sampler, &metadata, 1);
        let many = ChunkStore::populate(2, &layout, &sampler, &metadata, 8);
        assert_eq!(one.len(), many.len());
        for (a, b) in one.chunks().iter().zip(many.chunks()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.voxels, b.voxels);
        }
    }

    #[test]
    fn test_populate_zero_distance_is_empty() {
        let layout = OctreeLayout::new(4);
        let store = ChunkStore::populate(0, &layout, &|_, _, _| true, &HashedColors::default(), 2);
        assert!(store.is_empty());
    }
}
