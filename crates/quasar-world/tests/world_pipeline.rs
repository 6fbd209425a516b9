//! End-to-end pipeline tests: populate, combine, index, and the camera gate.

use glam::Vec3;

use quasar_octree::{HashedColors, OctreeLayout};
use quasar_voxel::ChunkCoord;
use quasar_world::{World, WorldState};

const CHUNK_SIZE: u32 = 8;
const RENDER_DISTANCE: u32 = 2;

fn sparse_sampler(x: i64, y: i64, z: i64) -> bool {
    (x * 7 + y * 13 + z * 29).rem_euclid(11) == 0
}

fn populated_world() -> World<fn(i64, i64, i64) -> bool, HashedColors> {
    let mut world = World::new(
        OctreeLayout::new(CHUNK_SIZE),
        RENDER_DISTANCE,
        sparse_sampler as fn(i64, i64, i64) -> bool,
        HashedColors { seed: 9 },
        4,
    );
    world.populate().expect("populate");
    world
}

#[test]
fn test_populate_reaches_ready_with_full_buffer() {
    let world = populated_world();
    let n = (RENDER_DISTANCE * RENDER_DISTANCE * RENDER_DISTANCE) as usize;

    assert_eq!(world.state(), WorldState::Ready);
    assert_eq!(world.chunk_count(), n);
    assert_eq!(
        world.combined_nodes().len(),
        n * world.layout().nodes_required() as usize
    );
    assert_eq!(world.combined_bytes().len(), world.combined_nodes().len() * 64);
    assert_eq!(world.bucket_count(), n);
}

#[test]
fn test_offsets_partition_the_combined_buffer() {
    let world = populated_world();
    let nodes_per_chunk = world.layout().nodes_required();

    let mut offsets: Vec<u32> = world
        .store()
        .chunks()
        .iter()
        .map(|c| c.octree_offset)
        .collect();
    offsets.sort_unstable();
    for (i, offset) in offsets.iter().enumerate() {
        assert_eq!(*offset, i as u32 * nodes_per_chunk, "gap or overlap at {i}");
    }
    let last = *offsets.last().unwrap();
    assert_eq!(
        (last + nodes_per_chunk) as usize,
        world.combined_nodes().len()
    );
}

#[test]
fn test_chunk_nodes_are_drained_into_the_combined_buffer() {
    let world = populated_world();
    // After combination the shared buffer is authoritative; per-chunk
    // arrays are released.
    assert!(world.store().chunks().iter().all(|c| c.nodes.is_empty()));
    assert!(world.store().chunks().iter().all(|c| c.is_combined()));
}

#[test]
fn test_index_round_trips_every_chunk() {
    let world = populated_world();
    let index = world.spatial_index().expect("index after populate");

    for chunk in world.store().chunks() {
        assert_eq!(
            index.lookup(chunk.position),
            Some(chunk.octree_offset),
            "chunk {:?}",
            chunk.position
        );
    }
    assert_eq!(index.lookup(ChunkCoord::new(50, 0, 0)), None);
}

#[test]
fn test_index_offsets_agree_with_buffer_segments() {
    let world = populated_world();
    let index = world.spatial_index().unwrap();
    let nodes_per_chunk = world.layout().nodes_required();

    for chunk in world.store().chunks() {
        let offset = index.lookup(chunk.position).unwrap();
        assert!(
            (offset + nodes_per_chunk) as usize <= world.combined_nodes().len(),
            "segment for {:?} exceeds the buffer",
            chunk.position
        );
    }
}

#[test]
fn test_update_in_same_chunk_rebuilds_once() {
    let mut world = populated_world();
    let after_populate = world.rebuild_count();

    // Both positions live in chunk (0,0,0): one rebuild, then the fast path.
    assert!(world.update_if_needed(Vec3::new(1.0, 1.0, 1.0)).unwrap());
    assert!(!world.update_if_needed(Vec3::new(6.5, 2.0, 3.0)).unwrap());
    assert_eq!(world.rebuild_count(), after_populate + 1);
}

#[test]
fn test_update_across_chunk_boundary_rebuilds_again() {
    let mut world = populated_world();

    assert!(world.update_if_needed(Vec3::new(1.0, 1.0, 1.0)).unwrap());
    let before = world.rebuild_count();
    // Crossing into chunk (1,0,0).
    assert!(world.update_if_needed(Vec3::new(9.0, 1.0, 1.0)).unwrap());
    assert_eq!(world.rebuild_count(), before + 1);

    // Offsets and index stay consistent after the rebuild.
    let index = world.spatial_index().unwrap();
    for chunk in world.store().chunks() {
        assert_eq!(index.lookup(chunk.position), Some(chunk.octree_offset));
    }
}

#[test]
fn test_update_before_populate_is_rejected() {
    let mut world = World::new(
        OctreeLayout::new(CHUNK_SIZE),
        RENDER_DISTANCE,
        sparse_sampler as fn(i64, i64, i64) -> bool,
        HashedColors::default(),
        1,
    );
    assert!(world.update_if_needed(Vec3::ZERO).is_err());
}

#[test]
fn test_rebuild_preserves_buffer_contents() {
    let mut world = populated_world();
    let before = world.combined_nodes().to_vec();

    world.update_if_needed(Vec3::new(100.0, 0.0, 0.0)).unwrap();
    // The chunk set is fixed after populate, and octree rebuilds are
    // deterministic, so a rebuild reproduces the same buffer.
    assert_eq!(world.combined_nodes(), before.as_slice());
}
