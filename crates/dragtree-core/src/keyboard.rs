//! Keyboard codes understood by the keyboard drag sensor.

use serde::{Deserialize, Serialize};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Physical key codes relevant to keyboard dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyboardCode {
    Space,
    Down,
    Right,
    Left,
    Up,
    Esc,
    Enter,
    /// Any key the sensor does not react to.
    Other,
}

/// Direction of a keyboard move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Left/Right change depth, Up/Down change position.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl KeyboardCode {
    /// Parse a DOM-style `KeyboardEvent.code` string (e.g. `"ArrowDown"`).
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => KeyboardCode::Space,
            "ArrowDown" => KeyboardCode::Down,
            "ArrowRight" => KeyboardCode::Right,
            "ArrowLeft" => KeyboardCode::Left,
            "ArrowUp" => KeyboardCode::Up,
            "Escape" => KeyboardCode::Esc,
            "Enter" | "NumpadEnter" => KeyboardCode::Enter,
            _ => KeyboardCode::Other,
        }
    }

    /// The move direction for arrow keys.
    pub fn direction(self) -> Option<Direction> {
        match self {
            KeyboardCode::Down => Some(Direction::Down),
            KeyboardCode::Right => Some(Direction::Right),
            KeyboardCode::Up => Some(Direction::Up),
            KeyboardCode::Left => Some(Direction::Left),
            _ => None,
        }
    }
}

impl From<KeyCode> for KeyboardCode {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Space => KeyboardCode::Space,
            KeyCode::ArrowDown => KeyboardCode::Down,
            KeyCode::ArrowRight => KeyboardCode::Right,
            KeyCode::ArrowLeft => KeyboardCode::Left,
            KeyCode::ArrowUp => KeyboardCode::Up,
            KeyCode::Escape => KeyboardCode::Esc,
            KeyCode::Enter | KeyCode::NumpadEnter => KeyboardCode::Enter,
            _ => KeyboardCode::Other,
        }
    }
}

impl From<PhysicalKey> for KeyboardCode {
    fn from(key: PhysicalKey) -> Self {
        match key {
            PhysicalKey::Code(code) => code.into(),
            PhysicalKey::Unidentified(_) => KeyboardCode::Other,
        }
    }
}

/// Key codes that start, end and cancel a keyboard drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardCodes {
    pub start: Vec<KeyboardCode>,
    pub cancel: Vec<KeyboardCode>,
    pub end: Vec<KeyboardCode>,
}

impl Default for KeyboardCodes {
    fn default() -> Self {
        Self {
            start: vec![KeyboardCode::Space, KeyboardCode::Enter],
            cancel: vec![KeyboardCode::Esc],
            end: vec![KeyboardCode::Space, KeyboardCode::Enter],
        }
    }
}

/// A key press delivered by the host.
pub trait KeyboardEvent {
    fn code(&self) -> KeyboardCode;

    /// Stop the host from applying the key's default action (e.g. scrolling).
    fn prevent_default(&mut self);
}

/// Plain key press that records whether its default was prevented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyboardCode,
    pub default_prevented: bool,
}

impl KeyPress {
    pub fn new(code: KeyboardCode) -> Self {
        Self {
            code,
            default_prevented: false,
        }
    }
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self::new(code.into())
    }
}

impl KeyboardEvent for KeyPress {
    fn code(&self) -> KeyboardCode {
        self.code
    }

    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
