//! Terrain generation error types.

/// Errors that can occur when generating a terrain field.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// One of the extent dimensions is zero or negative.
    #[error("invalid extent {x_max}x{z_max}x{y_max}: every dimension must be positive")]
    InvalidExtent { x_max: i32, z_max: i32, y_max: i32 },

    /// A buffer for the field could not be allocated.
    #[error("out of memory allocating {requested} {what} entries")]
    OutOfMemory {
        /// Which buffer failed (`"height field"` or a block type name).
        what: &'static str,
        /// Number of elements that were requested.
        requested: u128,
    },

    /// The fill pass disagreed with the sizing plan it was given.
    #[error("sizing plan does not match the field: {what} slot count is wrong")]
    SizingMismatch {
        /// Block type whose batch was over- or under-filled.
        what: &'static str,
    },
}
