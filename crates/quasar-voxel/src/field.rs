//! Parallel voxel-field generation for one chunk.
//!
//! The chunk's linear voxel index space is partitioned into contiguous,
//! word-aligned ranges, one per worker. Each worker owns a disjoint slice of
//! the output bitset, so the fill needs no locking; the only synchronization
//! point is the join barrier before [`generate_field`] returns.

use tracing::trace;

use crate::bitset::VoxelBitset;
use crate::coord::ChunkCoord;

/// Decides whether the voxel at an absolute world coordinate is solid.
///
/// Implementations must be pure functions of the world coordinate: two calls
/// with the same arguments must agree, regardless of which chunk or worker
/// issued them. That is what makes chunk boundaries seamless and generation
/// reproducible for a fixed sampler.
pub trait SolidSampler: Sync {
    /// Returns `true` if the voxel at world position `(x, y, z)` is solid.
    fn is_solid(&self, x: i64, y: i64, z: i64) -> bool;
}

impl<F> SolidSampler for F
where
    F: Fn(i64, i64, i64) -> bool + Sync,
{
    fn is_solid(&self, x: i64, y: i64, z: i64) -> bool {
        self(x, y, z)
    }
}

/// Resolves a requested worker count, treating 0 as "use a default".
///
/// The default is the number of logical CPUs, clamped to at least 1.
pub fn resolve_workers(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get().max(1)
    } else {
        requested
    }
}

/// Generates the bit-packed occupancy field for one chunk.
///
/// Voxel linear index `i = x + y*S + z*S²` (with `S = chunk_size`) maps to
/// bit `i` of the result. The sampler is queried at absolute world
/// coordinates (`position * chunk_size + local`). Blocks until every worker
/// has finished its range.
pub fn generate_field<S: SolidSampler>(
    position: ChunkCoord,
    chunk_size: u32,
    sampler: &S,
    workers: usize,
) -> VoxelBitset {
    let size = chunk_size as usize;
    let volume = size * size * size;
    let mut bits = VoxelBitset::new(volume);
    let workers = resolve_workers(workers);
    let (base_x, base_y, base_z) = position.world_min(chunk_size);

    std::thread::scope(|scope| {
        for (start_word, words) in bits.partition_words_mut(workers) {
            scope.spawn(move || {
                for (offset, word) in words.iter_mut().enumerate() {
                    let base_bit = (start_word + offset) * 64;
                    let mut packed = 0u64;
                    for bit in 0..64 {
                        let i = base_bit + bit;
                        if i >= volume {
                            break;
                        }
                        let x = i % size;
                        let y = (i / size) % size;
                        let z = i / (size * size);
                        if sampler.is_solid(
                            base_x + x as i64,
                            base_y + y as i64,
                            base_z + z as i64,
                        ) {
                            packed |= 1u64 << bit;
                        }
                    }
                    *word = packed;
                }
            });
        }
    });

    trace!(
        chunk = ?position,
        solid = bits.count_ones(),
        volume,
        "voxel field generated"
    );
    bits
}
