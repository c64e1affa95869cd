//! Prelude module for common isomap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use isomap::prelude::*;`

pub use crate::core::{
    config::{CameraConfig, EngineConfig, EngineProfile, InputConfig, RenderConfig},
    geo::{Point, Rect, Size, TileCoord},
    history::History,
    map::IsoMap,
    metrics::{measure_bounds, GridMetrics, MapBounds},
    viewport::{tile_center_world, tile_top_left_world, ViewTransform},
};

pub use crate::camera::{Camera, CameraChange, CameraEvent, CameraState, Direction};

pub use crate::input::{
    events::{InputEvent, Key, MouseButton, TouchPhase, TouchPoint},
    gestures::{AppMode, InteractionController, InteractionEvent},
    handler::{KeyAction, KeyBindings},
    picker::TilePicker,
    stroke::{PaintConstraint, PaintStroke, StrokeRasterizer},
};

pub use crate::animation::{
    interpolation::EasingFunction,
    sprite::{AnimationClock, AnimationSpec, FrameLayout, LoopMode, SpriteSheet},
};

pub use crate::layers::{
    entity::{Entity, EntityLayer},
    ground::GroundLayer,
};

pub use crate::rendering::{
    context::{RecordingSurface, Surface},
    pipeline::FrameRenderer,
};

pub use crate::{MapError, Result};
