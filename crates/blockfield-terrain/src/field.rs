//! The generate-once, read-many terrain field.
//!
//! Sequences the pipeline noise -> quantize -> size -> fill and owns the
//! resulting height grid and per-type instance batches.

use std::hash::Hasher;
use std::time::Instant;

use rustc_hash::FxHasher;
use tracing::{debug, info, info_span};

use crate::aggregate::{BlockCounts, fill_pass, size_pass};
use crate::block::{BlockType, PerBlock};
use crate::error::TerrainError;
use crate::heightfield::{Extent, HeightField};
use crate::instance::{InstanceBatch, PlacementTransform};
use crate::partition::worker_count;
use crate::quantize::FloorPolicy;
use crate::sampler::{NoiseParams, NoiseSampler, build_sampler};

/// Everything needed to generate a field.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParams {
    /// Width of the field in columns.
    pub x_max: i32,
    /// Depth of the field in columns.
    pub z_max: i32,
    /// Maximum column height.
    pub y_max: i32,
    /// Noise configuration, including the seed.
    pub noise: NoiseParams,
    /// Lowest surface height a column may take.
    pub floor: FloorPolicy,
    /// Worker threads for sampling and aggregation; `0` uses every CPU.
    pub workers: usize,
}

impl TerrainParams {
    /// Parameters with default noise and the bedrock-guaranteed floor.
    pub fn new(seed: i32, x_max: i32, z_max: i32, y_max: i32) -> Self {
        Self {
            x_max,
            z_max,
            y_max,
            noise: NoiseParams {
                seed,
                ..Default::default()
            },
            floor: FloorPolicy::BedrockGuaranteed,
            workers: 1,
        }
    }
}

/// A procedurally generated block field and its instance batches.
///
/// There is no mutation API; regenerate to change anything.
#[derive(Clone, Debug)]
pub struct TerrainField {
    params: TerrainParams,
    heights: HeightField,
    batches: PerBlock<InstanceBatch>,
}

impl TerrainField {
    /// Run the whole generation pipeline.
    ///
    /// # Errors
    ///
    /// - [`TerrainError::InvalidExtent`] if any dimension is `<= 0`; raised
    ///   before any noise is sampled.
    /// - [`TerrainError::OutOfMemory`] if the grid or a batch cannot be allocated.
    pub fn generate(params: TerrainParams) -> Result<Self, TerrainError> {
        Extent::new(params.x_max, params.z_max, params.y_max)?;
        let sampler = build_sampler(&params.noise);
        Self::generate_with_sampler(params, sampler.as_ref())
    }

    /// Run the pipeline with a caller-supplied height source instead of the
    /// one described by `params.noise`.
    ///
    /// # Errors
    ///
    /// Same as [`generate`](Self::generate).
    pub fn generate_with_sampler(
        params: TerrainParams,
        sampler: &dyn NoiseSampler,
    ) -> Result<Self, TerrainError> {
        let extent = Extent::new(params.x_max, params.z_max, params.y_max)?;
        let workers = worker_count(params.workers);

        let _span = info_span!(
            "generate_terrain",
            seed = params.noise.seed,
            x_max = extent.x_max(),
            z_max = extent.z_max(),
            y_max = extent.y_max()
        )
        .entered();
        let start = Instant::now();

        let heights = HeightField::generate(extent, sampler, params.floor, workers)?;
        debug!(
            "Sampled {} columns ({:?}, {:?} noise, {} workers)",
            extent.column_count(),
            params.floor,
            params.noise.backend,
            workers
        );

        let plan = size_pass(&heights, workers)?;
        let totals = plan.totals();
        debug!(
            "Sized batches: grass={} bedrock={} dirt={} stone={}",
            totals.grass, totals.bedrock, totals.dirt, totals.stone
        );

        let batches = fill_pass(&heights, &plan, workers)?;

        let field = Self {
            params,
            heights,
            batches,
        };
        info!(
            "Generated {} block instances ({} dirt, {} stone) in {:.1} ms",
            field.total_instances(),
            totals.dirt,
            totals.stone,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(field)
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn seed(&self) -> i32 {
        self.params.noise.seed
    }

    pub fn extent(&self) -> Extent {
        self.heights.extent()
    }

    pub fn floor_policy(&self) -> FloorPolicy {
        self.heights.floor_policy()
    }

    pub fn heights(&self) -> &HeightField {
        &self.heights
    }

    /// Surface height of column `(x, z)`, or `None` outside the extent.
    pub fn height(&self, x: i32, z: i32) -> Option<i32> {
        self.heights.get(x, z)
    }

    /// Number of instances of `block`.
    pub fn instance_count(&self, block: BlockType) -> usize {
        self.batches.get(block).len()
    }

    /// Ordered placements of `block`, ready for upload.
    pub fn instance_transforms(&self, block: BlockType) -> &[PlacementTransform] {
        self.batches.get(block).as_slice()
    }

    pub fn batch(&self, block: BlockType) -> &InstanceBatch {
        self.batches.get(block)
    }

    /// Batches in draw order.
    pub fn batches(&self) -> impl Iterator<Item = (BlockType, &InstanceBatch)> + '_ {
        BlockType::DRAW_ORDER
            .into_iter()
            .map(move |block| (block, self.batches.get(block)))
    }

    pub fn counts(&self) -> BlockCounts {
        self.batches.as_ref().map(|_, batch| batch.len())
    }

    /// Every block instance across all types.
    pub fn total_instances(&self) -> usize {
        BlockType::ALL
            .into_iter()
            .map(|block| self.instance_count(block))
            .sum()
    }

    /// Digest of heights and all placements, for comparing generations.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for &h in self.heights.as_slice() {
            hasher.write_i32(h);
        }
        for block in BlockType::ALL {
            let batch = self.batches.get(block);
            hasher.write_usize(batch.len());
            for t in batch {
                hasher.write_i32(t.position.x);
                hasher.write_i32(t.position.y);
                hasher.write_i32(t.position.z);
                hasher.write_u32(t.scale.to_bits());
            }
        }
        hasher.finish()
    }
}
