pub mod interpolation;
pub mod sprite;
pub mod tweening;

// Re-export commonly used types and functions for convenience
pub use interpolation::EasingFunction;
pub use sprite::{
    AnimationClock, AnimationSpec, AnimationState, FrameLayout, GridOrder, LoopMode, SpriteSheet,
};
pub use tweening::{CancellationToken, TaskStep, TimedTask};
