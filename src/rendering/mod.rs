pub mod context;
pub mod pipeline;

// Re-export main types
pub use context::{DrawCommand, OutlineStyle, RecordingSurface, Surface};
pub use pipeline::{sprite_world_rect, FrameRenderer, FrameScene, FrameStats};
