//! Block types and a per-type storage map keyed by them.
//!
//! The set of block types is closed. Layering from the floor upward is
//! Bedrock, Stone, Dirt, Grass.

use serde::{Deserialize, Serialize};

/// The four block types a terrain column is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockType {
    /// Indestructible floor at height 0.
    Bedrock,
    /// Deep fill below the dirt layer.
    Stone,
    /// The top layers of every column.
    Dirt,
    /// Surface cap at the column height.
    Grass,
}

impl BlockType {
    /// All block types in layering order, floor first.
    pub const ALL: [BlockType; 4] = [
        BlockType::Bedrock,
        BlockType::Stone,
        BlockType::Dirt,
        BlockType::Grass,
    ];

    /// The order in which batches are handed to the renderer.
    pub const DRAW_ORDER: [BlockType; 4] = [
        BlockType::Grass,
        BlockType::Bedrock,
        BlockType::Dirt,
        BlockType::Stone,
    ];

    /// Lowercase name, used in logs and asset lookups.
    pub fn name(self) -> &'static str {
        match self {
            BlockType::Bedrock => "bedrock",
            BlockType::Stone => "stone",
            BlockType::Dirt => "dirt",
            BlockType::Grass => "grass",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// One value per [`BlockType`], stored as named fields.
///
/// Lookups go through a `match`, so there is no index that can fall out of range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PerBlock<T> {
    pub bedrock: T,
    pub stone: T,
    pub dirt: T,
    pub grass: T,
}

impl<T> PerBlock<T> {
    /// Build a map by evaluating `f` once per block type, in layering order.
    pub fn from_fn(mut f: impl FnMut(BlockType) -> T) -> Self {
        Self {
            bedrock: f(BlockType::Bedrock),
            stone: f(BlockType::Stone),
            dirt: f(BlockType::Dirt),
            grass: f(BlockType::Grass),
        }
    }

    pub fn get(&self, block: BlockType) -> &T {
        match block {
            BlockType::Bedrock => &self.bedrock,
            BlockType::Stone => &self.stone,
            BlockType::Dirt => &self.dirt,
            BlockType::Grass => &self.grass,
        }
    }

    pub fn get_mut(&mut self, block: BlockType) -> &mut T {
        match block {
            BlockType::Bedrock => &mut self.bedrock,
            BlockType::Stone => &mut self.stone,
            BlockType::Dirt => &mut self.dirt,
            BlockType::Grass => &mut self.grass,
        }
    }

    pub fn as_ref(&self) -> PerBlock<&T> {
        PerBlock {
            bedrock: &self.bedrock,
            stone: &self.stone,
            dirt: &self.dirt,
            grass: &self.grass,
        }
    }

    /// Borrow all four entries mutably at once.
    pub fn as_mut(&mut self) -> PerBlock<&mut T> {
        PerBlock {
            bedrock: &mut self.bedrock,
            stone: &mut self.stone,
            dirt: &mut self.dirt,
            grass: &mut self.grass,
        }
    }

    /// Transform every entry, keeping the block association.
    pub fn map<U>(self, mut f: impl FnMut(BlockType, T) -> U) -> PerBlock<U> {
        PerBlock {
            bedrock: f(BlockType::Bedrock, self.bedrock),
            stone: f(BlockType::Stone, self.stone),
            dirt: f(BlockType::Dirt, self.dirt),
            grass: f(BlockType::Grass, self.grass),
        }
    }

    /// Fallible variant of [`from_fn`](Self::from_fn); stops at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(BlockType) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            bedrock: f(BlockType::Bedrock)?,
            stone: f(BlockType::Stone)?,
            dirt: f(BlockType::Dirt)?,
            grass: f(BlockType::Grass)?,
        })
    }
}
