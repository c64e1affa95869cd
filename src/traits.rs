//! Traits shared across modules

use crate::core::geo::Point;

/// Values a timed task can move between. `t` is eased progress in [0, 1];
/// implementations must return `to` exactly at `t == 1.0`.
pub trait Lerp {
    fn lerp(&self, to: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        if t >= 1.0 {
            *to
        } else {
            self + (to - self) * t
        }
    }
}

impl Lerp for Point {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        Point::new(self.x.lerp(&to.x, t), self.y.lerp(&to.y, t))
    }
}
