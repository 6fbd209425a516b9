//! Chunk coordinates, bit-packed voxel occupancy, and parallel field generation.

pub mod bitset;
pub mod coord;
pub mod field;
pub mod sampler;

pub use bitset::VoxelBitset;
pub use coord::ChunkCoord;
pub use field::{SolidSampler, generate_field, resolve_workers};
pub use sampler::{NoiseParams, NoiseSampler};
