//! Keyboard bindings.

use crate::camera::Direction;
use crate::input::events::Key;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    StartPan(Direction),
    StopPan(Direction),
    ZoomIn,
    ZoomOut,
    /// Eased return to the default zoom
    ResetZoom,
    /// Eased return to the default pan
    Recenter,
}

/// Separate lookup tables for key press and key release
#[derive(Debug, Clone)]
pub struct KeyBindings {
    keydown: FxHashMap<Key, KeyAction>,
    keyup: FxHashMap<Key, KeyAction>,
    paused: bool,
}

impl KeyBindings {
    /// No bindings at all
    pub fn empty() -> Self {
        Self {
            keydown: FxHashMap::default(),
            keyup: FxHashMap::default(),
            paused: false,
        }
    }

    pub fn bind_down(&mut self, key: Key, action: KeyAction) -> Option<KeyAction> {
        self.keydown.insert(key, action)
    }

    pub fn bind_up(&mut self, key: Key, action: KeyAction) -> Option<KeyAction> {
        self.keyup.insert(key, action)
    }

    /// Remove both bindings of `key`
    pub fn unbind(&mut self, key: Key) {
        self.keydown.remove(&key);
        self.keyup.remove(&key);
    }

    pub fn on_key_down(&self, key: Key) -> Option<KeyAction> {
        if self.paused {
            return None;
        }
        self.keydown.get(&key).copied()
    }

    pub fn on_key_up(&self, key: Key) -> Option<KeyAction> {
        if self.paused {
            return None;
        }
        self.keyup.get(&key).copied()
    }

    /// Stop reacting to keys, e.g. while a text field has focus
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        for (key, direction) in [
            (Key::ArrowUp, Direction::Up),
            (Key::ArrowDown, Direction::Down),
            (Key::ArrowLeft, Direction::Left),
            (Key::ArrowRight, Direction::Right),
        ] {
            bindings.bind_down(key, KeyAction::StartPan(direction));
            bindings.bind_up(key, KeyAction::StopPan(direction));
        }
        bindings.bind_down(Key::Equal, KeyAction::ZoomIn);
        bindings.bind_down(Key::Minus, KeyAction::ZoomOut);
        bindings.bind_down(Key::Digit0, KeyAction::ResetZoom);
        bindings.bind_down(Key::Char('c'), KeyAction::Recenter);
        bindings
    }
}
