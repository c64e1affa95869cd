//! Configuration system for camera, input and rendering behaviour
//!
//! Settings can be picked from a preset [`EngineProfile`] or loaded from JSON.
//! Every section uses `#[serde(default)]`, so a partial document only
//! overrides the fields it names.

use crate::animation::interpolation::EasingFunction;
use crate::core::constants::*;
use crate::input::stroke::PaintConstraint;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineProfile {
    /// Mouse + keyboard editing
    Desktop,
    /// Touch-first devices: no mouse drag panning, no edge scrolling
    Touch,
    Custom(EngineConfig),
}

impl EngineProfile {
    pub fn resolve(&self) -> EngineConfig {
        match self {
            Self::Desktop => EngineConfig::default(),
            Self::Touch => EngineConfig {
                input: InputConfig {
                    mouse_panning: false,
                    scroll_at_edges: false,
                    ..InputConfig::default()
                },
                ..EngineConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self::Desktop
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub camera: CameraConfig,
    pub input: InputConfig,
    pub render: RenderConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.camera.validate()?;
        self.input.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    /// Factor applied by zoom in / zoom out
    pub zoom_step: f64,
    /// Horizontal pixels per directional-pan tick
    pub pan_speed: f64,
    pub pan_tick_ms: u64,
    pub momentum_friction: f64,
    pub momentum_min_velocity: f64,
    pub max_catch_up_ticks: u32,
    /// Curve of the smoothed zoom and recenter moves
    pub easing: EasingFunction,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: None,
            max_zoom: None,
            zoom_step: ZOOM_STEP,
            pan_speed: PAN_SPEED,
            pan_tick_ms: PAN_TICK_MS,
            momentum_friction: MOMENTUM_FRICTION,
            momentum_min_velocity: MOMENTUM_MIN_VELOCITY,
            max_catch_up_ticks: MAX_CATCH_UP_TICKS,
            easing: EasingFunction::default(),
        }
    }
}

impl CameraConfig {
    pub fn pan_tick(&self) -> Duration {
        Duration::from_millis(self.pan_tick_ms)
    }

    /// Clamp `zoom` into the configured range
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let mut zoom = zoom;
        if let Some(min) = self.min_zoom {
            zoom = zoom.max(min);
        }
        if let Some(max) = self.max_zoom {
            zoom = zoom.min(max);
        }
        zoom
    }

    pub fn validate(&self) -> Result<()> {
        for (name, bound) in [("min_zoom", self.min_zoom), ("max_zoom", self.max_zoom)] {
            if let Some(value) = bound {
                if !(value.is_finite() && value > 0.0) {
                    return Err(MapError::InvalidConfig(format!(
                        "{name} must be finite and positive, got {value}"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_zoom, self.max_zoom) {
            if min > max {
                return Err(MapError::InvalidConfig(format!(
                    "min_zoom {min} exceeds max_zoom {max}"
                )));
            }
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(MapError::InvalidConfig(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if self.pan_tick_ms == 0 {
            return Err(MapError::InvalidConfig("pan_tick_ms must be non-zero".to_string()));
        }
        if !(0.0..1.0).contains(&self.momentum_friction) {
            return Err(MapError::InvalidConfig(format!(
                "momentum_friction must be in [0, 1), got {}",
                self.momentum_friction
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Left-drag pans the camera when not painting
    pub mouse_panning: bool,
    /// Keep gliding after a drag is released
    pub momentum: bool,
    pub scroll_at_edges: bool,
    pub edge_threshold: f64,
    pub drag_threshold: f64,
    pub default_constraint: PaintConstraint,
    pub recenter_duration_ms: u64,
    pub zoom_reset_duration_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_panning: true,
            momentum: true,
            scroll_at_edges: false,
            edge_threshold: EDGE_THRESHOLD,
            drag_threshold: DRAG_THRESHOLD,
            default_constraint: PaintConstraint::Diagonal,
            recenter_duration_ms: SMOOTHING_DURATION_MS,
            zoom_reset_duration_ms: SMOOTHING_DURATION_MS,
        }
    }
}

impl InputConfig {
    pub fn recenter_duration(&self) -> Duration {
        Duration::from_millis(self.recenter_duration_ms)
    }

    pub fn zoom_reset_duration(&self) -> Duration {
        Duration::from_millis(self.zoom_reset_duration_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.edge_threshold.is_finite() && self.edge_threshold >= 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "edge_threshold must be non-negative, got {}",
                self.edge_threshold
            )));
        }
        if !(self.drag_threshold.is_finite() && self.drag_threshold >= 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "drag_threshold must be non-negative, got {}",
                self.drag_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Round the translation before drawing (never applied to picking)
    pub pixel_snap: bool,
    /// Outline the hovered / selected tile
    pub show_cursor: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pixel_snap: true,
            show_cursor: true,
        }
    }
}
