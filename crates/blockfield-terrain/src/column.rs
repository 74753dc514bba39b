//! Decomposition of one terrain column into typed cells.
//!
//! A column with surface height `y` holds `y` fill cells at heights `y..=1`
//! (top first). The top [`DIRT_DEPTH`] + 1 of them are dirt, the rest stone.
//! Every column additionally gets one grass cap at `y` and one bedrock block
//! at 0, accounted separately from the fill.

use glam::IVec3;

use crate::block::BlockType;

/// Deepest `surface - h` that is still dirt. Depth 8 is dirt, depth 9 is stone.
pub const DIRT_DEPTH: i32 = 8;

/// Block type of the fill cell at height `h` in a column whose surface is `surface`.
///
/// Only meaningful for `1 <= h <= surface`.
#[inline]
pub fn classify_cell(surface: i32, h: i32) -> BlockType {
    if surface - h <= DIRT_DEPTH {
        BlockType::Dirt
    } else {
        BlockType::Stone
    }
}

/// Number of fill cells of each type in one column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnCounts {
    pub dirt: usize,
    pub stone: usize,
}

impl ColumnCounts {
    pub fn total(&self) -> usize {
        self.dirt + self.stone
    }
}

/// Count fill cells without walking the column.
pub fn count_column(surface: i32) -> ColumnCounts {
    let fill = surface.max(0) as usize;
    let dirt = fill.min(DIRT_DEPTH as usize + 1);
    ColumnCounts {
        dirt,
        stone: fill - dirt,
    }
}

/// One occupied cell of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnCell {
    pub position: IVec3,
    pub block: BlockType,
}

/// Iterator over the dirt/stone fill of a column, from the surface down to height 1.
#[derive(Clone, Debug)]
pub struct ColumnFill {
    x: i32,
    z: i32,
    surface: i32,
    h: i32,
}

impl Iterator for ColumnFill {
    type Item = ColumnCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.h <= 0 {
            return None;
        }
        let cell = ColumnCell {
            position: IVec3::new(self.x, self.h, self.z),
            block: classify_cell(self.surface, self.h),
        };
        self.h -= 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.h.max(0) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ColumnFill {}

/// Walk the fill cells of column `(x, z)` in descending height.
pub fn column_fill(x: i32, z: i32, surface: i32) -> ColumnFill {
    ColumnFill {
        x,
        z,
        surface,
        h: surface,
    }
}

/// Every cell a column contributes: grass cap, bedrock floor, then the fill.
pub fn column_cells(x: i32, z: i32, surface: i32) -> impl Iterator<Item = ColumnCell> {
    let grass = ColumnCell {
        position: IVec3::new(x, surface, z),
        block: BlockType::Grass,
    };
    let bedrock = ColumnCell {
        position: IVec3::new(x, 0, z),
        block: BlockType::Bedrock,
    };
    [grass, bedrock]
        .into_iter()
        .chain(column_fill(x, z, surface))
}
