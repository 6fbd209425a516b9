//! World orchestration: chunk lifecycle, combined-buffer rebuilds, and the
//! camera-gated incremental update path.

pub mod chunk;
pub mod frustum;
pub mod store;
pub mod world;

pub use chunk::{Chunk, OFFSET_NOT_PRESENT};
pub use frustum::{Aabb, Frustum, chunk_aabb};
pub use store::ChunkStore;
pub use world::{VOXEL_SIZE, World, WorldError, WorldState};
