//! The rectangular grid of quantized column heights.

use crate::error::TerrainError;
use crate::partition::{row_ranges, run_jobs, split_spans, try_filled_vec};
use crate::quantize::{FloorPolicy, quantize_height};
use crate::sampler::NoiseSampler;

const HEIGHT_FIELD: &str = "height field";

/// Validated field dimensions: width `x_max`, depth `z_max`, max column height `y_max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    x_max: i32,
    z_max: i32,
    y_max: i32,
}

impl Extent {
    /// Validate and build an extent.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidExtent`] if any dimension is `<= 0`.
    pub fn new(x_max: i32, z_max: i32, y_max: i32) -> Result<Self, TerrainError> {
        if x_max <= 0 || z_max <= 0 || y_max <= 0 {
            return Err(TerrainError::InvalidExtent {
                x_max,
                z_max,
                y_max,
            });
        }
        Ok(Self {
            x_max,
            z_max,
            y_max,
        })
    }

    pub fn x_max(&self) -> i32 {
        self.x_max
    }

    pub fn z_max(&self) -> i32 {
        self.z_max
    }

    pub fn y_max(&self) -> i32 {
        self.y_max
    }

    /// Number of columns, `x_max * z_max`.
    pub fn column_count(&self) -> u64 {
        self.x_max as u64 * self.z_max as u64
    }

    /// Upper bound on fill cells, reached when every column is at `y_max`.
    pub fn max_fill_cells(&self) -> u128 {
        u128::from(self.column_count()) * self.y_max as u128
    }
}

/// Column heights indexed `[x][z]`, stored x-major in one contiguous buffer.
///
/// Immutable once generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightField {
    extent: Extent,
    floor: FloorPolicy,
    heights: Vec<i32>,
}

impl HeightField {
    /// Sample and quantize every column of `extent`.
    ///
    /// Rows of constant `x` are distributed over up to `workers` threads; the
    /// result is identical for any worker count.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::OutOfMemory`] if the grid cannot be allocated.
    pub fn generate(
        extent: Extent,
        sampler: &dyn NoiseSampler,
        floor: FloorPolicy,
        workers: usize,
    ) -> Result<Self, TerrainError> {
        let rows = extent.x_max as usize;
        let row_len = extent.z_max as usize;
        let columns = extent.column_count();

        let len = usize::try_from(columns).map_err(|_| TerrainError::OutOfMemory {
            what: HEIGHT_FIELD,
            requested: u128::from(columns),
        })?;
        let mut heights = try_filled_vec(HEIGHT_FIELD, len, 0)?;

        let ranges = row_ranges(rows, workers);
        let parts = split_spans(&mut heights, ranges.iter().map(|r| r.len() * row_len));
        let jobs: Vec<_> = ranges.into_iter().zip(parts).collect();

        run_jobs(jobs, |(rows, out)| {
            for (x, row) in rows.zip(out.chunks_mut(row_len)) {
                for (z, cell) in row.iter_mut().enumerate() {
                    let sample = sampler.sample(x as f64, z as f64);
                    *cell = quantize_height(sample, floor, extent.y_max);
                }
            }
        });

        Ok(Self {
            extent,
            floor,
            heights,
        })
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn floor_policy(&self) -> FloorPolicy {
        self.floor
    }

    /// Surface height of column `(x, z)`, or `None` outside the extent.
    pub fn get(&self, x: i32, z: i32) -> Option<i32> {
        if !(0..self.extent.x_max).contains(&x) || !(0..self.extent.z_max).contains(&z) {
            return None;
        }
        let row_len = self.extent.z_max as usize;
        Some(self.heights[x as usize * row_len + z as usize])
    }

    /// The heights of row `x` (all `z`), or `None` outside the extent.
    pub fn row(&self, x: i32) -> Option<&[i32]> {
        if !(0..self.extent.x_max).contains(&x) {
            return None;
        }
        let row_len = self.extent.z_max as usize;
        let start = x as usize * row_len;
        Some(&self.heights[start..start + row_len])
    }

    /// All heights, x-major.
    pub fn as_slice(&self) -> &[i32] {
        &self.heights
    }

    /// Iterate `(x, z, height)` in generation order.
    pub fn columns(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        let row_len = self.extent.z_max as usize;
        self.heights.iter().enumerate().map(move |(i, &h)| {
            ((i / row_len) as i32, (i % row_len) as i32, h)
        })
    }

    /// Sum of all column heights, which equals the total dirt + stone count.
    pub fn total_height(&self) -> u64 {
        self.heights.iter().map(|&h| h.max(0) as u64).sum()
    }
}
