//! Per-instance placement data handed to the renderer.

use bytemuck::{Pod, Zeroable};
use glam::{IVec3, Mat4, Vec3};

use crate::block::BlockType;

/// Uniform scale applied to every block mesh.
pub const BLOCK_SCALE: f32 = 0.5;

/// Where one block instance sits: integer translation plus uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementTransform {
    pub position: IVec3,
    pub scale: f32,
}

impl PlacementTransform {
    /// A block at `position` with the standard [`BLOCK_SCALE`].
    pub fn at(position: IVec3) -> Self {
        Self {
            position,
            scale: BLOCK_SCALE,
        }
    }

    /// Model matrix: translate to `position`, then scale uniformly.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position.as_vec3()) * Mat4::from_scale(Vec3::splat(self.scale))
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.to_matrix().to_cols_array_2d(),
        }
    }
}

/// GPU layout of one instance: a column-major 4x4 model matrix.
///
/// Occupies four consecutive `vec4` vertex attributes with per-instance step.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

/// Ordered placements of a single block type, frozen after generation.
///
/// Order is generation order: x-major, then z, then descending height.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceBatch {
    block: BlockType,
    transforms: Vec<PlacementTransform>,
}

impl InstanceBatch {
    pub(crate) fn new(block: BlockType, transforms: Vec<PlacementTransform>) -> Self {
        Self { block, transforms }
    }

    pub fn block(&self) -> BlockType {
        self.block
    }

    /// Number of instances to draw.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn as_slice(&self) -> &[PlacementTransform] {
        &self.transforms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacementTransform> {
        self.transforms.iter()
    }

    /// Convert the batch into its upload layout.
    pub fn to_raw(&self) -> Vec<InstanceRaw> {
        self.transforms
            .iter()
            .map(PlacementTransform::to_raw)
            .collect()
    }

    /// The instance buffer contents, ready to copy into a vertex buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_raw()).to_vec()
    }

    /// Size in bytes of the instance buffer this batch needs.
    pub fn byte_len(&self) -> usize {
        self.transforms.len() * std::mem::size_of::<InstanceRaw>()
    }
}

impl<'a> IntoIterator for &'a InstanceBatch {
    type Item = &'a PlacementTransform;
    type IntoIter = std::slice::Iter<'a, PlacementTransform>;

    fn into_iter(self) -> Self::IntoIter {
        self.transforms.iter()
    }
}
