use serde::{Deserialize, Serialize};

/// Progress curve of an eased camera move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    Linear,
    EaseOutQuad,
    /// Fast start, gentle landing; used by the smoothed resets
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
}

impl EasingFunction {
    /// Eased progress for `t` in [0, 1]. Out-of-range input is clamped, and
    /// both endpoints map to themselves exactly.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let rest = 1.0 - t;
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseOutQuad => 1.0 - rest * rest,
            EasingFunction::EaseOutCubic => 1.0 - rest * rest * rest,
            EasingFunction::EaseInOutCubic if t < 0.5 => 4.0 * t * t * t,
            EasingFunction::EaseInOutCubic => 1.0 - (2.0 * rest).powi(3) / 2.0,
        }
    }
}
