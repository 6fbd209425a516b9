//! Concatenation of per-chunk octrees into one GPU-uploadable buffer.

use tracing::debug;

use crate::node::GridNode;

/// Combines per-chunk node segments into one contiguous buffer.
///
/// Segments are consumed in slice order; each segment's nodes are moved into
/// the combined buffer and the segment is left empty, so the combined buffer
/// becomes the only authoritative copy and per-chunk peak memory stays
/// bounded. Returns the buffer and each segment's start offset within it.
///
/// Offsets are internally consistent by construction: they partition the
/// buffer in order, with no gaps or overlaps.
pub fn combine_octrees(segments: &mut [Vec<GridNode>]) -> (Vec<GridNode>, Vec<u32>) {
    let total: usize = segments.iter().map(Vec::len).sum();
    let mut combined = Vec::with_capacity(total);
    let mut offsets = Vec::with_capacity(segments.len());

    for segment in segments.iter_mut() {
        offsets.push(combined.len() as u32);
        // Take the allocation so it is actually released, not just emptied.
        combined.extend(std::mem::take(segment));
    }

    debug!(
        segments = offsets.len(),
        nodes = combined.len(),
        "combined octree buffer rebuilt"
    );
    (combined, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;

    fn segment(len: usize, tag: u32) -> Vec<GridNode> {
        let mut node = GridNode::zeroed();
        node.metadata[0] = tag;
        vec![node; len]
    }

    #[test]
    fn test_offsets_partition_the_buffer() {
        let mut segments = vec![segment(3, 0), segment(5, 1), segment(2, 2)];
        let (combined, offsets) = combine_octrees(&mut segments);

        assert_eq!(combined.len(), 10);
        assert_eq!(offsets, vec![0, 3, 8]);
        // No gaps, no overlaps: each offset is the previous end.
        assert_eq!(offsets[1], offsets[0] + 3);
        assert_eq!(offsets[2], offsets[1] + 5);
        assert_eq!(offsets[2] + 2, combined.len() as u32);
    }

    #[test]
    fn test_segment_contents_land_at_their_offset() {
        let mut segments = vec![segment(4, 7), segment(1, 9)];
        let (combined, offsets) = combine_octrees(&mut segments);
        assert_eq!(combined[offsets[0] as usize].metadata[0], 7);
        assert_eq!(combined[offsets[1] as usize].metadata[0], 9);
    }

    #[test]
    fn test_segments_are_drained() {
        let mut segments = vec![segment(6, 0), segment(6, 1)];
        let _ = combine_octrees(&mut segments);
        assert!(segments.iter().all(Vec::is_empty));
        assert!(segments.iter().all(|s| s.capacity() == 0));
    }

    #[test]
    fn test_empty_input_yields_empty_buffer() {
        let (combined, offsets) = combine_octrees(&mut []);
        assert!(combined.is_empty());
        assert!(offsets.is_empty());
    }
}
