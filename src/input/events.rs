use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Raw platform input, in canvas pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown {
        position: Point,
        button: MouseButton,
    },
    PointerMove {
        position: Point,
    },
    PointerUp {
        position: Point,
        button: MouseButton,
    },
    /// Pointer left the canvas
    PointerLeave,
    /// Single click, delivered after the matching `PointerUp`
    Click {
        position: Point,
        button: MouseButton,
    },
    /// Scroll wheel; only the sign of `delta_y` matters
    Wheel { delta_y: f64, position: Point },
    /// Multi-touch update. `touches` lists every finger still down,
    /// `changed` the fingers this event is about.
    Touch {
        phase: TouchPhase,
        touches: Vec<TouchPoint>,
        changed: Vec<TouchPoint>,
    },
    KeyDown {
        key: Key,
    },
    KeyUp {
        key: Key,
    },
    /// Window lost focus; held keys and buttons are gone
    Blur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Touch lifecycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Individual touch point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Point::new(x, y),
        }
    }
}

/// Keys the default bindings care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Equal,
    Minus,
    Digit0,
    Escape,
    Char(char),
}

impl Key {
    /// Map a DOM-style `KeyboardEvent.key` string
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "=" | "+" => Key::Equal,
            "-" => Key::Minus,
            "0" => Key::Digit0,
            "Escape" => Key::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}
