//! Two-pass aggregation of column cells into per-type instance batches.
//!
//! The sizing pass counts cells per x-row and turns the counts into write
//! offsets with an exclusive prefix sum. The fill pass allocates each batch
//! exactly once, hands every worker the disjoint sub-slices for its rows, and
//! writes placements in column-major order. No batch grows during the fill.

use std::ops::Range;

use crate::block::{BlockType, PerBlock};
use crate::column::{column_cells, count_column};
use crate::error::TerrainError;
use crate::heightfield::HeightField;
use crate::instance::{BLOCK_SCALE, InstanceBatch, PlacementTransform};
use crate::partition::{row_ranges, run_jobs, split_spans, try_filled_vec};

/// Instance count for each block type.
pub type BlockCounts = PerBlock<usize>;

const ROW_COUNTS: &str = "row counts";

/// Slot contents before the fill pass overwrites them.
const PLACEHOLDER: PlacementTransform = PlacementTransform {
    position: glam::IVec3::ZERO,
    scale: BLOCK_SCALE,
};

/// Result of the sizing pass: per-type write offsets for every x-row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizingPlan {
    /// `offsets.get(b)[x]` is where row `x` starts writing in batch `b`;
    /// the final entry is the batch length.
    offsets: PerBlock<Vec<usize>>,
}

impl SizingPlan {
    /// Exact instance count per block type.
    pub fn totals(&self) -> BlockCounts {
        self.offsets
            .as_ref()
            .map(|_, o| o.last().copied().unwrap_or(0))
    }

    /// First slot of row `x` in the batch for `block`.
    pub fn row_offset(&self, block: BlockType, x: usize) -> Option<usize> {
        self.offsets.get(block).get(x).copied()
    }

    /// Number of x-rows the plan was sized for.
    pub fn rows(&self) -> usize {
        self.offsets.grass.len().saturating_sub(1)
    }

    /// Number of slots rows `rows` occupy in the batch for `block`.
    fn span(&self, block: BlockType, rows: &Range<usize>) -> usize {
        let offsets = self.offsets.get(block);
        offsets[rows.end] - offsets[rows.start]
    }
}

/// Count cells per type without writing any placements.
///
/// # Errors
///
/// Returns [`TerrainError::OutOfMemory`] if the per-row tables cannot be
/// allocated or a running count overflows `usize`.
pub fn size_pass(field: &HeightField, workers: usize) -> Result<SizingPlan, TerrainError> {
    let extent = field.extent();
    let rows = extent.x_max() as usize;
    let row_len = extent.z_max() as usize;

    let mut row_counts = try_filled_vec(ROW_COUNTS, rows, BlockCounts::default())?;
    let ranges = row_ranges(rows, workers);
    let parts = split_spans(&mut row_counts, ranges.iter().map(Range::len));
    let jobs: Vec<_> = ranges.into_iter().zip(parts).collect();

    run_jobs(jobs, |(rows, out)| {
        for (x, counts) in rows.zip(out.iter_mut()) {
            let heights = field.row(x as i32).unwrap_or_default();
            for &h in heights {
                let column = count_column(h);
                counts.dirt += column.dirt;
                counts.stone += column.stone;
            }
            counts.grass = row_len;
            counts.bedrock = row_len;
        }
    });

    let offsets = PerBlock::try_from_fn(|block| -> Result<Vec<usize>, TerrainError> {
        let mut offsets = try_filled_vec(ROW_COUNTS, rows + 1, 0_usize)?;
        for (x, counts) in row_counts.iter().enumerate() {
            offsets[x + 1] = offsets[x]
                .checked_add(*counts.get(block))
                .ok_or(TerrainError::OutOfMemory {
                    what: block.name(),
                    requested: extent.max_fill_cells(),
                })?;
        }
        Ok(offsets)
    })?;

    Ok(SizingPlan { offsets })
}

/// Disjoint output slices for one contiguous range of rows.
struct FillJob<'a> {
    rows: Range<usize>,
    slots: PerBlock<&'a mut [PlacementTransform]>,
}

/// Allocate every batch at its exact size and write all placements.
///
/// # Errors
///
/// - [`TerrainError::OutOfMemory`] if any batch cannot be allocated.
/// - [`TerrainError::SizingMismatch`] if `plan` was not sized from `field`.
///
/// Nothing is returned partially populated.
pub fn fill_pass(
    field: &HeightField,
    plan: &SizingPlan,
    workers: usize,
) -> Result<PerBlock<InstanceBatch>, TerrainError> {
    let rows = field.extent().x_max() as usize;
    if plan.rows() != rows {
        return Err(TerrainError::SizingMismatch { what: ROW_COUNTS });
    }

    let totals = plan.totals();
    let mut buffers = PerBlock::try_from_fn(|block| {
        try_filled_vec(block.name(), *totals.get(block), PLACEHOLDER)
    })?;

    let ranges = row_ranges(rows, workers);
    let mut parts = buffers.as_mut().map(|block, buffer| {
        split_spans(buffer, ranges.iter().map(|rows| plan.span(block, rows))).into_iter()
    });
    let jobs: Vec<FillJob<'_>> = ranges
        .iter()
        .map(|rows| FillJob {
            rows: rows.clone(),
            slots: PerBlock::from_fn(|block| {
                parts.get_mut(block).next().unwrap_or_default()
            }),
        })
        .collect();

    let filled = run_jobs(jobs, |job| fill_rows(field, job));
    drop(parts);
    filled.into_iter().collect::<Result<(), _>>()?;

    Ok(buffers.map(InstanceBatch::new))
}

/// Write every placement of `job.rows` into its slots.
///
/// Each slot must be written exactly once; running out of slots or leaving
/// any unwritten means the plan does not describe this field.
fn fill_rows(field: &HeightField, job: FillJob<'_>) -> Result<(), TerrainError> {
    let FillJob { rows, slots } = job;
    let mut cursors = slots.map(|_, s| s.into_iter());

    for x in rows {
        let heights = field.row(x as i32).unwrap_or_default();
        for (z, &surface) in heights.iter().enumerate() {
            for cell in column_cells(x as i32, z as i32, surface) {
                let slot = cursors
                    .get_mut(cell.block)
                    .next()
                    .ok_or(TerrainError::SizingMismatch {
                        what: cell.block.name(),
                    })?;
                *slot = PlacementTransform::at(cell.position);
            }
        }
    }

    for block in BlockType::ALL {
        if cursors.get_mut(block).next().is_some() {
            return Err(TerrainError::SizingMismatch { what: block.name() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::Extent;
    use crate::quantize::FloorPolicy;
    use crate::sampler::{NoiseParams, NoiseSampler, build_sampler};
    use glam::IVec3;

    /// Every column sits at the same height.
    struct Flat(f64);

    impl NoiseSampler for Flat {
        fn sample(&self, _x: f64, _z: f64) -> f64 {
            self.0
        }
    }

    fn flat_field(x: i32, z: i32, y_max: i32, sample: f64) -> HeightField {
        let extent = Extent::new(x, z, y_max).unwrap();
        HeightField::generate(extent, &Flat(sample), FloorPolicy::ZeroFloor, 1).unwrap()
    }

    #[test]
    fn test_sizing_counts_flat_field() {
        // Sample 1.0 puts every column at y_max = 12: 9 dirt + 3 stone each.
        let field = flat_field(4, 3, 12, 1.0);
        let plan = size_pass(&field, 1).unwrap();
        let totals = plan.totals();
        assert_eq!(totals.grass, 12);
        assert_eq!(totals.bedrock, 12);
        assert_eq!(totals.dirt, 12 * 9);
        assert_eq!(totals.stone, 12 * 3);
        assert_eq!(plan.row_offset(BlockType::Dirt, 2), Some(2 * 3 * 9));
        assert_eq!(plan.row_offset(BlockType::Dirt, 5), None);
    }

    #[test]
    fn test_sizing_is_side_effect_free() {
        let field = flat_field(2, 2, 5, 0.0);
        let before = field.clone();
        let a = size_pass(&field, 1).unwrap();
        let b = size_pass(&field, 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(field, before);
    }

    #[test]
    fn test_fill_matches_totals() {
        let extent = Extent::new(20, 13, 30).unwrap();
        let sampler = build_sampler(&NoiseParams {
            seed: 9,
            ..Default::default()
        });
        let field =
            HeightField::generate(extent, sampler.as_ref(), FloorPolicy::BedrockGuaranteed, 1)
                .unwrap();
        let plan = size_pass(&field, 1).unwrap();
        let batches = fill_pass(&field, &plan, 1).unwrap();

        for block in BlockType::ALL {
            assert_eq!(batches.get(block).len(), *plan.totals().get(block));
            assert_eq!(batches.get(block).block(), block);
        }
        assert_eq!(
            (batches.dirt.len() + batches.stone.len()) as u64,
            field.total_height()
        );
    }

    #[test]
    fn test_fill_order_is_x_then_z_then_descending_height() {
        // Two columns of height 3 along z, one row.
        let field = flat_field(1, 2, 6, 0.0);
        assert_eq!(field.as_slice(), &[3, 3]);
        let plan = size_pass(&field, 1).unwrap();
        let batches = fill_pass(&field, &plan, 1).unwrap();

        let dirt: Vec<IVec3> = batches.dirt.iter().map(|t| t.position).collect();
        assert_eq!(
            dirt,
            vec![
                IVec3::new(0, 3, 0),
                IVec3::new(0, 2, 0),
                IVec3::new(0, 1, 0),
                IVec3::new(0, 3, 1),
                IVec3::new(0, 2, 1),
                IVec3::new(0, 1, 1),
            ]
        );
        let grass: Vec<IVec3> = batches.grass.iter().map(|t| t.position).collect();
        assert_eq!(grass, vec![IVec3::new(0, 3, 0), IVec3::new(0, 3, 1)]);
        let bedrock: Vec<IVec3> = batches.bedrock.iter().map(|t| t.position).collect();
        assert_eq!(bedrock, vec![IVec3::new(0, 0, 0), IVec3::new(0, 0, 1)]);
        assert!(batches.stone.is_empty());
    }

    #[test]
    fn test_parallel_fill_identical_to_single_threaded() {
        let extent = Extent::new(29, 17, 40).unwrap();
        let sampler = build_sampler(&NoiseParams {
            seed: 1234,
            ..Default::default()
        });
        let field =
            HeightField::generate(extent, sampler.as_ref(), FloorPolicy::ZeroFloor, 1).unwrap();
        let plan = size_pass(&field, 1).unwrap();
        let reference = fill_pass(&field, &plan, 1).unwrap();

        for workers in [2, 5, 29, 100] {
            let plan = size_pass(&field, workers).unwrap();
            let batches = fill_pass(&field, &plan, workers).unwrap();
            assert_eq!(batches, reference, "workers = {workers}");
        }
    }

    #[test]
    fn test_fill_rejects_plan_with_too_few_slots() {
        let short = flat_field(2, 2, 6, 0.0);
        let tall = flat_field(2, 2, 10, 0.0);
        let plan = size_pass(&short, 1).unwrap();
        for workers in [1, 2] {
            let result = fill_pass(&tall, &plan, workers);
            assert!(
                matches!(result, Err(TerrainError::SizingMismatch { what: "dirt" })),
                "workers = {workers}"
            );
        }
    }

    #[test]
    fn test_fill_rejects_plan_with_unused_slots() {
        let tall = flat_field(2, 2, 10, 0.0);
        let short = flat_field(2, 2, 6, 0.0);
        let plan = size_pass(&tall, 1).unwrap();
        let result = fill_pass(&short, &plan, 1);
        assert!(matches!(
            result,
            Err(TerrainError::SizingMismatch { what: "dirt" })
        ));
    }

    #[test]
    fn test_fill_rejects_plan_for_other_row_count() {
        let plan = size_pass(&flat_field(3, 2, 6, 0.0), 1).unwrap();
        assert_eq!(plan.rows(), 3);
        let result = fill_pass(&flat_field(4, 2, 6, 0.0), &plan, 1);
        assert!(matches!(
            result,
            Err(TerrainError::SizingMismatch { what: "row counts" })
        ));
    }

    #[test]
    fn test_zero_height_columns_only_cap_and_floor() {
        let field = flat_field(3, 3, 10, -1.0);
        let plan = size_pass(&field, 1).unwrap();
        let batches = fill_pass(&field, &plan, 2).unwrap();
        assert!(batches.dirt.is_empty());
        assert!(batches.stone.is_empty());
        assert_eq!(batches.grass.len(), 9);
        assert_eq!(batches.bedrock.len(), 9);
        assert!(batches.grass.iter().all(|t| t.position.y == 0));
    }
}
