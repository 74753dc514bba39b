//! Procedural block terrain: seeded fractal noise, height quantization,
//! column classification and per-type instance batches for instanced rendering.

mod aggregate;
mod column;
mod error;
mod field;
mod heightfield;
mod instance;
mod partition;
mod quantize;
mod sampler;

pub mod block;

pub use aggregate::{BlockCounts, SizingPlan, fill_pass, size_pass};
pub use block::{BlockType, PerBlock};
pub use column::{
    ColumnCell, ColumnCounts, ColumnFill, DIRT_DEPTH, classify_cell, column_cells, column_fill,
    count_column,
};
pub use error::TerrainError;
pub use field::{TerrainField, TerrainParams};
pub use heightfield::{Extent, HeightField};
pub use instance::{BLOCK_SCALE, InstanceBatch, InstanceRaw, PlacementTransform};
pub use quantize::{FloorPolicy, NOISE_MAX, NOISE_MIN, map_value, quantize_height};
pub use sampler::{
    FastNoiseFbm, NoiseBackend, NoiseParams, NoiseSampler, PerlinFbm, build_sampler,
    max_amplitude,
};
