//! Mapping of noise samples in `[-1, 1]` onto integer column heights.

use serde::{Deserialize, Serialize};

/// Input range of every [`NoiseSampler`](crate::NoiseSampler).
pub const NOISE_MIN: f64 = -1.0;
pub const NOISE_MAX: f64 = 1.0;

/// Lowest height a column surface may take.
///
/// Bedrock is always placed at height 0. The policy decides whether a
/// column's surface may also sit there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloorPolicy {
    /// Heights map onto `[1, y_max]`, so every column has at least one cell
    /// above its bedrock.
    #[default]
    BedrockGuaranteed,
    /// Heights map onto `[0, y_max]`; a height-0 column is bedrock plus grass.
    ZeroFloor,
}

impl FloorPolicy {
    /// The minimum surface height this policy produces.
    pub fn floor(self) -> i32 {
        match self {
            FloorPolicy::BedrockGuaranteed => 1,
            FloorPolicy::ZeroFloor => 0,
        }
    }
}

/// Linearly remap `x` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// `in_min != in_max` is a precondition; callers pass the fixed noise range.
#[inline]
pub fn map_value(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Quantize one noise sample into a column height under `policy`.
///
/// Rounds half away from zero, then clamps into `[policy.floor(), y_max]`.
pub fn quantize_height(sample: f64, policy: FloorPolicy, y_max: i32) -> i32 {
    let floor = policy.floor();
    let mapped = map_value(
        sample,
        NOISE_MIN,
        NOISE_MAX,
        f64::from(floor),
        f64::from(y_max),
    );
    (mapped.round() as i32).clamp(floor, y_max.max(floor))
}
