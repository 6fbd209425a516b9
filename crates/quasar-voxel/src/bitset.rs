//! Bit-packed occupancy storage: one bit per voxel in a compact `Vec<u64>`.
//!
//! Bits are packed little-endian within each word, so logical bit `i` lands
//! at byte `i / 8`, bit position `i % 8` of the backing storage. That byte
//! layout is what a renderer (or any consumer of [`as_bytes`]) observes.
//!
//! [`as_bytes`]: VoxelBitset::as_bytes

/// A fixed-length bitset backed by 64-bit words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelBitset {
    /// Raw storage. Bit `i` lives in word `i / 64` at position `i % 64`.
    words: Vec<u64>,
    /// Total number of logical bits.
    len: usize,
}

impl VoxelBitset {
    /// Creates a new bitset with `len` bits, all cleared.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    /// Returns the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len` in debug builds.
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.len, "bit index out of bounds");
        (self.words[index / 64] >> (index % 64)) & 1 != 0
    }

    /// Sets or clears the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len` in debug builds.
    pub fn set(&mut self, index: usize, value: bool) {
        debug_assert!(index < self.len, "bit index out of bounds");
        let mask = 1u64 << (index % 64);
        if value {
            self.words[index / 64] |= mask;
        } else {
            self.words[index / 64] &= !mask;
        }
    }

    /// Returns the number of logical bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitset has no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns a reference to the raw `u64` storage words.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Returns the storage as bytes, in the `i / 8` / `i % 8` bit layout.
    ///
    /// Assumes little-endian words, which holds on every supported target.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// Splits the word storage into at most `parts` disjoint mutable ranges.
    ///
    /// Ranges are near-equal; the final range absorbs the remainder. Each
    /// entry carries the index of its first word so a writer can recover the
    /// global bit index of everything it owns. Returns fewer than `parts`
    /// ranges when there are fewer words than requested partitions.
    pub fn partition_words_mut(&mut self, parts: usize) -> Vec<(usize, &mut [u64])> {
        let word_count = self.words.len();
        let parts = parts.clamp(1, word_count.max(1));
        let base = word_count / parts;

        let mut ranges = Vec::with_capacity(parts);
        let mut rest = self.words.as_mut_slice();
        let mut start = 0;
        for _ in 0..parts.saturating_sub(1) {
            let (head, tail) = rest.split_at_mut(base);
            ranges.push((start, head));
            start += base;
            rest = tail;
        }
        if !rest.is_empty() {
            ranges.push((start, rest));
        }
        ranges
    }
}
