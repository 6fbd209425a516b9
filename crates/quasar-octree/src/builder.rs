//! Bottom-up construction of one chunk's flattened octree.
//!
//! Levels are processed from the finest remaining detail toward the root:
//! a parent's occupancy is derived by OR-ing the already-written flags of
//! its eight children, so each level is complete before the next-coarser
//! level reads it. There is no pruning; the output is always the full
//! `nodes_required` array, which is what makes the buffer directly
//! GPU-uploadable.

use bytemuck::Zeroable;
use quasar_voxel::VoxelBitset;

use crate::layout::OctreeLayout;
use crate::node::{FLAG_LEAF, FLAG_OCCUPIED, GridNode, NO_CHILD, NodeMetadata};

/// Builds the flat node array for one chunk.
///
/// At the finest level, each cell maps one-to-one onto a voxel bit and gets
/// the leaf flag. At coarser levels, a cell's children live at the doubled
/// coordinate plus a unit-cube corner offset in the next level's grid;
/// children whose doubled coordinate falls outside that grid are skipped and
/// recorded as [`NO_CHILD`], without wraparound.
///
/// # Panics
///
/// Panics if the voxel field's length does not match the layout's chunk
/// volume; that mismatch is a programming defect, not a runtime condition.
pub fn build_octree<M: NodeMetadata>(
    layout: &OctreeLayout,
    voxels: &VoxelBitset,
    metadata: &M,
) -> Vec<GridNode> {
    assert_eq!(
        voxels.len(),
        layout.chunk_volume(),
        "voxel field length does not match layout"
    );

    let mut nodes = vec![GridNode::zeroed(); layout.nodes_required() as usize];
    let finest = layout.levels() - 1;

    for level in (0..layout.levels()).rev() {
        let grid = layout.grid_size(level);
        let start = layout.level_start(level) as usize;
        let cell_count = (grid * grid * grid) as usize;
        let size = layout.cell_size(level) as i32;

        for idx in 0..cell_count {
            let mut flags = 0u32;
            let mut children = [NO_CHILD; 8];

            if level == finest {
                flags |= FLAG_LEAF;
                if voxels.get(idx) {
                    flags |= FLAG_OCCUPIED;
                }
            } else {
                let child_grid = layout.grid_size(level + 1);
                let child_start = layout.level_start(level + 1) as usize;
                let (x, y, z) = OctreeLayout::cell_coords(idx, grid);

                for corner in 0..8u32 {
                    let cx = x * 2 + (corner & 1);
                    let cy = y * 2 + ((corner >> 1) & 1);
                    let cz = z * 2 + ((corner >> 2) & 1);
                    if cx >= child_grid || cy >= child_grid || cz >= child_grid {
                        // Asymmetric chunk edge: no wraparound, no child.
                        continue;
                    }
                    let child_idx =
                        child_start + OctreeLayout::cell_index(cx, cy, cz, child_grid);
                    children[corner as usize] = child_idx as u32;
                    if nodes[child_idx].is_occupied() {
                        flags |= FLAG_OCCUPIED;
                    }
                }
            }

            let [r, g, b] = metadata.color_for(idx as u32);
            nodes[start + idx] = GridNode {
                children,
                flags,
                size,
                metadata: [u32::from(r), u32::from(g), u32::from(b)],
                _pad: [0; 3],
            };
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::HashedColors;

    fn build(layout: &OctreeLayout, voxels: &VoxelBitset) -> Vec<GridNode> {
        build_octree(layout, voxels, &HashedColors::default())
    }

    #[test]
    fn test_empty_chunk_has_unoccupied_root() {
        let layout = OctreeLayout::new(32);
        let voxels = VoxelBitset::new(layout.chunk_volume());
        let nodes = build(&layout, &voxels);
        assert_eq!(nodes.len(), 37449);
        assert!(!nodes[0].is_occupied());
        assert!(!nodes[0].is_leaf());
        assert_eq!(nodes[0].size, 32);
    }

    #[test]
    fn test_single_voxel_at_origin_occupies_a_chain_of_six() {
        let layout = OctreeLayout::new(32);
        let mut voxels = VoxelBitset::new(layout.chunk_volume());
        voxels.set(0, true);
        let nodes = build(&layout, &voxels);

        // Cell (0,0,0) at every level must be occupied; that is the chain
        // from the root down to the voxel.
        for level in 0..layout.levels() {
            let node = &nodes[layout.level_start(level) as usize];
            assert!(node.is_occupied(), "level {level} lost the occupancy chain");
        }
        let finest_first = &nodes[layout.level_start(5) as usize];
        assert!(finest_first.is_leaf());
        assert!(finest_first.is_occupied());
        // Exactly one occupied node per level: 6 total.
        let occupied = nodes.iter().filter(|n| n.is_occupied()).count();
        assert_eq!(occupied, layout.levels());
    }

    #[test]
    fn test_leaf_flag_only_at_finest_level() {
        let layout = OctreeLayout::new(8);
        let mut voxels = VoxelBitset::new(layout.chunk_volume());
        for i in (0..voxels.len()).step_by(3) {
            voxels.set(i, true);
        }
        let nodes = build(&layout, &voxels);
        let finest_start = layout.level_start(layout.levels() - 1) as usize;
        for (i, node) in nodes.iter().enumerate() {
            assert_eq!(node.is_leaf(), i >= finest_start, "node {i}");
        }
    }

    #[test]
    fn test_occupancy_is_monotone_upward() {
        let layout = OctreeLayout::new(16);
        let mut voxels = VoxelBitset::new(layout.chunk_volume());
        // Pseudo-random but deterministic sparse pattern.
        for i in 0..voxels.len() {
            if (i.wrapping_mul(2654435761) >> 7) % 11 == 0 {
                voxels.set(i, true);
            }
        }
        let nodes = build(&layout, &voxels);

        for level in 0..layout.levels() - 1 {
            let grid = layout.grid_size(level);
            let start = layout.level_start(level) as usize;
            for idx in 0..(grid * grid * grid) as usize {
                let parent = &nodes[start + idx];
                let any_child_occupied = parent
                    .children
                    .iter()
                    .filter(|&&c| c != NO_CHILD)
                    .any(|&c| nodes[c as usize].is_occupied());
                assert_eq!(
                    parent.is_occupied(),
                    any_child_occupied,
                    "level {level} cell {idx}"
                );
            }
        }
    }

    #[test]
    fn test_children_point_at_the_doubled_coordinate() {
        let layout = OctreeLayout::new(4);
        let voxels = VoxelBitset::new(layout.chunk_volume());
        let nodes = build(&layout, &voxels);

        // Root (level 0) children must be the 8 cells of the 2x2x2 level.
        let expected: Vec<u32> = (0..8)
            .map(|corner: u32| {
                let cx = corner & 1;
                let cy = (corner >> 1) & 1;
                let cz = (corner >> 2) & 1;
                layout.level_start(1) + OctreeLayout::cell_index(cx, cy, cz, 2) as u32
            })
            .collect();
        assert_eq!(nodes[0].children.to_vec(), expected);

        // Leaves have no children at all.
        let finest_start = layout.level_start(2) as usize;
        assert!(nodes[finest_start].children.iter().all(|&c| c == NO_CHILD));
    }

    #[test]
    fn test_full_chunk_is_occupied_everywhere() {
        let layout = OctreeLayout::new(8);
        let mut voxels = VoxelBitset::new(layout.chunk_volume());
        for i in 0..voxels.len() {
            voxels.set(i, true);
        }
        let nodes = build(&layout, &voxels);
        assert!(nodes.iter().all(GridNode::is_occupied));
    }

    #[test]
    fn test_node_sizes_halve_per_level() {
        let layout = OctreeLayout::new(16);
        let voxels = VoxelBitset::new(layout.chunk_volume());
        let nodes = build(&layout, &voxels);
        for level in 0..layout.levels() {
            let node = &nodes[layout.level_start(level) as usize];
            assert_eq!(node.size, (16 >> level) as i32);
        }
    }
}
