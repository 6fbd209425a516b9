//! GPU-layout octree node record and the cosmetic metadata seam.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// Flag bit: the node, or at least one of its live children, is solid.
pub const FLAG_OCCUPIED: u32 = 1 << 0;
/// Flag bit: the node is at the finest (voxel) resolution level.
pub const FLAG_LEAF: u32 = 1 << 1;
/// Sentinel child index for an absent or out-of-range child.
pub const NO_CHILD: u32 = u32::MAX;

/// One cell of the flattened octree, in its GPU storage-buffer layout.
///
/// The record is 64 bytes, a multiple of the 16-byte alignment that storage
/// buffers require, and can be uploaded with a plain byte copy
/// ([`bytemuck::cast_slice`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct GridNode {
    /// Absolute indices of the 8 children in the flat node array
    /// ([`NO_CHILD`] where none exists). Corner order: bit 0 → +x,
    /// bit 1 → +y, bit 2 → +z.
    pub children: [u32; 8],
    /// Bit flags; see [`FLAG_OCCUPIED`] and [`FLAG_LEAF`].
    pub flags: u32,
    /// Edge length in voxels covered by this node.
    pub size: i32,
    /// Debug color payload (r, g, b), one channel per word.
    pub metadata: [u32; 3],
    /// Padding out to 64 bytes.
    pub _pad: [u32; 3],
}

const_assert_eq!(std::mem::size_of::<GridNode>(), 64);
const_assert_eq!(std::mem::size_of::<GridNode>() % 16, 0);

impl GridNode {
    /// Returns `true` if this node or any live descendant is solid.
    pub fn is_occupied(&self) -> bool {
        self.flags & FLAG_OCCUPIED != 0
    }

    /// Returns `true` if this node sits at the finest resolution level.
    pub fn is_leaf(&self) -> bool {
        self.flags & FLAG_LEAF != 0
    }
}

/// Produces the cosmetic per-cell color payload.
///
/// Anything deterministic-or-not is acceptable here; the renderer only uses
/// it for debug visualization.
pub trait NodeMetadata {
    /// Returns the (r, g, b) payload for the cell at `cell` within its level.
    fn color_for(&self, cell: u32) -> [u8; 3];
}

impl<F> NodeMetadata for F
where
    F: Fn(u32) -> [u8; 3],
{
    fn color_for(&self, cell: u32) -> [u8; 3] {
        self(cell)
    }
}

/// Default metadata source: deterministic hash-mixed colors per cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashedColors {
    /// Seed folded into the mix, so different chunks can get distinct palettes.
    pub seed: u64,
}

impl NodeMetadata for HashedColors {
    fn color_for(&self, cell: u32) -> [u8; 3] {
        // splitmix64 finalizer; good avalanche, cheap.
        let mut v = self.seed ^ (u64::from(cell).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        v ^= v >> 30;
        v = v.wrapping_mul(0xBF58_476D_1CE4_E5B9);
        v ^= v >> 27;
        v = v.wrapping_mul(0x94D0_49BB_1331_11EB);
        v ^= v >> 31;
        [v as u8, (v >> 8) as u8, (v >> 16) as u8]
    }
}
