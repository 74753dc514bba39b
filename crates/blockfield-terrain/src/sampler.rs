//! Seeded fractal coherent noise used as the terrain height source.
//!
//! Composites several octaves of Perlin noise (fractal Brownian motion) and
//! normalizes the result into `[-1, 1]`. Two interchangeable backends sit
//! behind [`NoiseSampler`]: the `noise` crate and a FastNoiseLite port.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Which noise primitive to build the fBm from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseBackend {
    /// Perlin from the `noise` crate, octaves accumulated in `f64`.
    #[default]
    Perlin,
    /// FastNoiseLite Perlin with its built-in FBm fractal, evaluated in `f32`.
    FastNoiseLite,
}

/// Configuration for the fractal noise that drives column heights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// World seed. Same seed and coordinates always give the same sample.
    pub seed: i32,
    /// Frequency of the first octave. Lower values give broader features.
    pub frequency: f64,
    /// Number of octaves to composite.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub gain: f64,
    pub backend: NoiseBackend,
}

impl NoiseParams {
    /// Base frequency producing hills a few dozen blocks across.
    pub const DETAILED_FREQUENCY: f64 = 0.01;
    /// Base frequency producing broad, gently rolling terrain.
    pub const SMOOTH_FREQUENCY: f64 = 0.001;
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            frequency: Self::DETAILED_FREQUENCY,
            octaves: 5,
            lacunarity: 2.0,
            gain: 0.5,
            backend: NoiseBackend::Perlin,
        }
    }
}

/// A pure, deterministic 2D height source with output in `[-1, 1]`.
pub trait NoiseSampler: Send + Sync {
    /// Sample the field at grid coordinate `(x, z)`.
    fn sample(&self, x: f64, z: f64) -> f64;
}

/// Fractal Brownian motion over `noise::Perlin`.
pub struct PerlinFbm {
    perlin: Perlin,
    params: NoiseParams,
    max_amplitude: f64,
}

impl PerlinFbm {
    pub fn new(params: NoiseParams) -> Self {
        let perlin = Perlin::new(params.seed as u32);
        let max_amplitude = max_amplitude(params.octaves, params.gain);
        Self {
            perlin,
            params,
            max_amplitude,
        }
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }
}

impl NoiseSampler for PerlinFbm {
    fn sample(&self, x: f64, z: f64) -> f64 {
        if self.max_amplitude == 0.0 {
            return 0.0;
        }

        let mut total = 0.0;
        let mut frequency = self.params.frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.params.octaves {
            total += self.perlin.get([x * frequency, z * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.gain;
        }

        (total / self.max_amplitude).clamp(-1.0, 1.0)
    }
}

/// FastNoiseLite Perlin with FBm fractal.
///
/// With `octaves == 1` the FBm reduces to plain Perlin scaled by 1.0.
pub struct FastNoiseFbm {
    noise: FastNoiseLite,
}

impl FastNoiseFbm {
    pub fn new(params: &NoiseParams) -> Self {
        let mut noise = FastNoiseLite::with_seed(params.seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(params.frequency as f32));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(params.octaves.min(i32::MAX as u32) as i32));
        noise.set_fractal_lacunarity(Some(params.lacunarity as f32));
        noise.set_fractal_gain(Some(params.gain as f32));
        Self { noise }
    }
}

impl NoiseSampler for FastNoiseFbm {
    fn sample(&self, x: f64, z: f64) -> f64 {
        f64::from(self.noise.get_noise_2d(x as f32, z as f32)).clamp(-1.0, 1.0)
    }
}

/// Build the sampler selected by `params.backend`.
pub fn build_sampler(params: &NoiseParams) -> Box<dyn NoiseSampler> {
    match params.backend {
        NoiseBackend::Perlin => Box::new(PerlinFbm::new(params.clone())),
        NoiseBackend::FastNoiseLite => Box::new(FastNoiseFbm::new(params)),
    }
}

/// Geometric sum of octave amplitudes starting at 1.0.
pub fn max_amplitude(octaves: u32, gain: f64) -> f64 {
    let mut sum = 0.0;
    let mut amp = 1.0;
    for _ in 0..octaves {
        sum += amp;
        amp *= gain;
    }
    sum
}
