//! Flattened sparse-octree construction and combination for GPU ray marching.

pub mod builder;
pub mod combine;
pub mod layout;
pub mod node;

pub use builder::build_octree;
pub use combine::combine_octrees;
pub use layout::OctreeLayout;
pub use node::{FLAG_LEAF, FLAG_OCCUPIED, GridNode, HashedColors, NO_CHILD, NodeMetadata};
