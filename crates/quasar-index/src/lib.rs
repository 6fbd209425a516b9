//! Displacement-based perfect hash from chunk coordinates to buffer offsets.
//!
//! A CHD-style two-level scheme sized to the exact chunk count `N`: a primary
//! hash groups keys into buckets, and each bucket gets one displacement value
//! chosen so that every member lands on an unused slot of the entry table.
//! Lookup is O(1) and branch-light, which is what lets a ray-marching shader
//! (or incremental update logic) resolve a chunk coordinate to its segment of
//! the combined octree buffer without probing.
//!
//! The table is built once per full rebuild and is immutable until the next
//! one. It is collision-free for the exact build-time key set only; lookups
//! always confirm the stored coordinate.

pub mod error;

use bytemuck::{Pod, Zeroable};
use tracing::debug;

use quasar_voxel::ChunkCoord;

pub use error::IndexError;

/// Displacement values tried per bucket before giving up.
///
/// Spatial-grid keys mix well, so real searches terminate after a handful of
/// attempts; the bound exists to make pathological key sets fail loudly
/// instead of spinning.
pub const MAX_DISPLACEMENT: u32 = 1 << 16;

/// One slot of the entry table, in its GPU storage-buffer layout (16 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct IndexEntry {
    /// Chunk-grid X coordinate of the stored key.
    pub x: i32,
    /// Chunk-grid Y coordinate of the stored key.
    pub y: i32,
    /// Chunk-grid Z coordinate of the stored key.
    pub z: i32,
    /// Start offset of the chunk's segment in the combined octree buffer,
    /// or `u32::MAX` for an unused slot.
    pub root_offset: u32,
}

impl IndexEntry {
    /// The unused-slot sentinel.
    pub const EMPTY: Self = Self {
        x: i32::MAX,
        y: i32::MAX,
        z: i32::MAX,
        root_offset: u32::MAX,
    };

    fn new(coord: ChunkCoord, root_offset: u32) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
            z: coord.z,
            root_offset,
        }
    }

    fn matches(&self, coord: ChunkCoord) -> bool {
        self.x == coord.x && self.y == coord.y && self.z == coord.z
    }
}

/// Sign-biased avalanche mix of a chunk coordinate.
///
/// The constants are splitmix64-style multipliers; any pair of well-mixing,
/// cheap, deterministic integer hashes would do. `h1` and `h2` only need to
/// be independent of each other.
fn mix(coord: ChunkCoord, seed: u64) -> u64 {
    let mut v = seed
        ^ u64::from(coord.x as u32).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ u64::from(coord.y as u32).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ u64::from(coord.z as u32).wrapping_mul(0x1656_67B1_9E37_79F9);
    v ^= v >> 30;
    v = v.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    v ^= v >> 27;
    v = v.wrapping_mul(0x94D0_49BB_1331_11EB);
    v ^= v >> 31;
    v
}

fn h1(coord: ChunkCoord) -> u64 {
    mix(coord, 0x51AF_E54B_13C2_6D9A)
}

fn h2(coord: ChunkCoord) -> u64 {
    mix(coord, 0xA076_1D64_78BD_642F)
}

/// The built perfect hash table: per-bucket displacements plus the entry
/// table, both sized to the chunk count and directly GPU-uploadable.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    displacements: Vec<u32>,
    slots: Vec<IndexEntry>,
}

impl SpatialIndex {
    /// Builds the table over `(coordinate, root offset)` pairs.
    ///
    /// Larger buckets are placed first; they are the hardest to fit, so
    /// resolving them against a mostly-empty table keeps the displacement
    /// search short. Bucket order is tie-broken by bucket id, making the
    /// build deterministic for a given key set.
    pub fn build(entries: &[(ChunkCoord, u32)]) -> Result<Self, IndexError> {
        let n = entries.len();
        if n == 0 {
            return Err(IndexError::EmptyInput);
        }

        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, (coord, _)) in entries.iter().enumerate() {
            buckets[(h2(*coord) % n as u64) as usize].push(i);
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&b| (std::cmp::Reverse(buckets[b].len()), b));

        let mut displacements = vec![0u32; n];
        let mut slots = vec![IndexEntry::EMPTY; n];
        let mut used = vec![false; n];
        let mut worst_displacement = 0u32;

        let mut chosen = Vec::new();
        for &bucket in &order {
            let members = &buckets[bucket];
            if members.is_empty() {
                break; // sorted descending; only empty buckets remain
            }

            let mut placed = false;
            'search: for d in 0..MAX_DISPLACEMENT {
                chosen.clear();
                for &m in members {
                    let slot = ((h1(entries[m].0).wrapping_add(u64::from(d))) % n as u64) as usize;
                    if used[slot] || chosen.contains(&slot) {
                        continue 'search;
                    }
                    chosen.push(slot);
                }
                displacements[bucket] = d;
                for (&m, &slot) in members.iter().zip(&chosen) {
                    used[slot] = true;
                    slots[slot] = IndexEntry::new(entries[m].0, entries[m].1);
                }
                worst_displacement = worst_displacement.max(d);
                placed = true;
                break;
            }
            if !placed {
                return Err(IndexError::DisplacementExhausted {
                    bucket_len: members.len(),
                });
            }
        }

        debug!(keys = n, worst_displacement, "spatial index built");
        Ok(Self {
            displacements,
            slots,
        })
    }

    /// Resolves a chunk coordinate to its combined-buffer offset.
    ///
    /// Returns `None` for any coordinate that was not part of the build-time
    /// key set; the slot's stored coordinate is always compared, so stray
    /// hash coincidences cannot alias to a wrong chunk.
    pub fn lookup(&self, coord: ChunkCoord) -> Option<u32> {
        let n = self.slots.len() as u64;
        let bucket = (h2(coord) % n) as usize;
        let slot = ((h1(coord).wrapping_add(u64::from(self.displacements[bucket]))) % n) as usize;
        let entry = &self.slots[slot];
        if entry.root_offset != u32::MAX && entry.matches(coord) {
            Some(entry.root_offset)
        } else {
            None
        }
    }

    /// Number of slots (and buckets): the build-time chunk count.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the index holds no slots. Never true for a built
    /// index; present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of displacement buckets (equals [`len`](Self::len)).
    pub fn bucket_count(&self) -> usize {
        self.displacements.len()
    }

    /// The per-bucket displacement array.
    pub fn displacements(&self) -> &[u32] {
        &self.displacements
    }

    /// The entry table, sentinel slots included.
    pub fn slots(&self) -> &[IndexEntry] {
        &self.slots
    }

    /// Displacement array as GPU-uploadable bytes.
    pub fn displacement_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.displacements)
    }

    /// Entry table as GPU-uploadable bytes.
    pub fn slot_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.slots)
    }
}
