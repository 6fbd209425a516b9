//! Noise-backed density sampler for world generation.
//!
//! Thresholded 3-D Perlin noise: a voxel is solid where the noise value at
//! its (scaled) world coordinate exceeds the configured threshold. The
//! sampler is deterministic per seed, which keeps generation reproducible
//! and chunk boundaries seamless.

use noise::{NoiseFn, Perlin};

use crate::field::SolidSampler;

/// Configuration for the thresholded Perlin density field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseParams {
    /// World seed for deterministic generation.
    pub seed: u32,
    /// Spatial frequency applied to world coordinates before sampling.
    /// Smaller values produce broader features. Default: 0.05.
    pub frequency: f64,
    /// Noise values above this threshold are solid. Perlin output is in
    /// [-1, 1], so 0.0 yields roughly half-solid space. Default: 0.0.
    pub threshold: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            frequency: 0.05,
            threshold: 0.0,
        }
    }
}

/// A [`SolidSampler`] backed by seeded 3-D Perlin noise.
pub struct NoiseSampler {
    noise: Perlin,
    params: NoiseParams,
}

impl NoiseSampler {
    /// Creates a sampler from the given parameters.
    pub fn new(params: NoiseParams) -> Self {
        Self {
            noise: Perlin::new(params.seed),
            params,
        }
    }

    /// Returns the parameters this sampler was built with.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }
}

impl Default for NoiseSampler {
    fn default() -> Self {
        Self::new(NoiseParams::default())
    }
}

impl SolidSampler for NoiseSampler {
    fn is_solid(&self, x: i64, y: i64, z: i64) -> bool {
        let f = self.params.frequency;
        let sample = self
            .noise
            .get([x as f64 * f, y as f64 * f, z as f64 * f]);
        sample > self.params.threshold
    }
}
