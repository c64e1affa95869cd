//! Engine-wide defaults for the isometric camera and input handling.
//! Keeping them in a single place makes it easier to tweak magic numbers.

/// Multiplicative step used by `zoom_in` / `zoom_out`.
pub const ZOOM_STEP: f64 = 1.1;

/// Default zoom level restored by the reset operations.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Horizontal pixels applied per directional-pan tick.
pub const PAN_SPEED: f64 = 10.0;

/// Vertical pan speed relative to horizontal (2:1 diamond aspect).
pub const VERTICAL_PAN_RATIO: f64 = 0.5;

/// Fixed interval of the directional-pan ticker (~60 Hz).
pub const PAN_TICK_MS: u64 = 16;

/// Upper bound on ticks replayed by a single late frame.
pub const MAX_CATCH_UP_TICKS: u32 = 4;

/// Per-frame decay of drag-release momentum.
pub const MOMENTUM_FRICTION: f64 = 0.95;

/// Momentum stops once both velocity components fall to this value.
pub const MOMENTUM_MIN_VELOCITY: f64 = 0.5;

/// Drag distance (pixels) beyond which the trailing click is suppressed.
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Distance (pixels) from a canvas edge that triggers edge scrolling.
pub const EDGE_THRESHOLD: f64 = 10.0;

/// Duration of the smoothed recenter / zoom reset.
pub const SMOOTHING_DURATION_MS: u64 = 300;

/// Bias subtracted before half-rounding lattice coordinates so seams
/// resolve consistently towards the lower index.
pub const PICK_EPSILON: f64 = 1e-6;
