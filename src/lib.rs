//! # isomap
//!
//! The coordinate-transform and interaction engine behind an isometric
//! tile-map renderer/editor.
//!
//! The crate converts between world, screen and tile-grid space, drives a
//! pan/zoom camera with momentum and eased animation, resolves pointer and
//! touch input into picked tiles, rasterizes multi-tile paint strokes and
//! selects sprite frames for animated entities. Rendering backends, asset
//! loading and persistence plug in at the edges through [`rendering::Surface`]
//! and plain data types.

pub mod animation;
pub mod camera;
pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{CameraConfig, EngineConfig, EngineProfile, InputConfig, RenderConfig},
    geo::{Point, Rect, Size, TileCoord},
    map::IsoMap,
    metrics::{GridMetrics, MapBounds},
    viewport::ViewTransform,
};

pub use camera::{Camera, CameraChange, CameraEvent, CameraState, Direction};

pub use input::{
    events::InputEvent,
    gestures::{AppMode, InteractionController, InteractionEvent},
    picker::TilePicker,
    stroke::{PaintConstraint, PaintStroke, StrokeRasterizer},
};

pub use animation::sprite::{AnimationClock, LoopMode, SpriteSheet};

pub use rendering::{context::Surface, pipeline::FrameRenderer};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
///
/// Only construction and loading paths fail; interaction-time conditions
/// (out-of-range picks, degenerate zoom, unknown animations) are recovered
/// locally and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid grid metrics: {0}")]
    InvalidMetrics(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid sprite sheet: {0}")]
    InvalidSpriteSheet(String),
}

/// Error type alias for convenience
pub type Error = MapError;
