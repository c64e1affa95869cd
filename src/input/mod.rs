pub mod events;
pub mod gestures;
pub mod handler;
pub mod picker;
pub mod stroke;

// Re-export the essential types
pub use events::{InputEvent, Key, MouseButton, TouchPhase, TouchPoint};
pub use gestures::{
    AppMode, GestureArbiter, GestureOwner, GestureSession, InteractionContext,
    InteractionController, InteractionEvent,
};
pub use handler::{KeyAction, KeyBindings};
pub use picker::{pick_tile, TilePicker};
pub use stroke::{rasterize, Axis, PaintConstraint, PaintStroke, StrokeRasterizer};
