//! Keyboard key identifiers and their Linux evdev codes.
//!
//! Hotkeys are configured by name (`KEY_Z`, `z`, `delete`, ...) and matched
//! against raw evdev codes read from the keyboard device.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Keys that can be bound as hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,

    // Numbers (top row)
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Modifiers
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    MetaLeft,
    MetaRight,

    // Navigation and editing
    Escape,
    Tab,
    CapsLock,
    Space,
    Enter,
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Lock and system keys
    NumLock,
    ScrollLock,
    PrintScreen,
    Pause,

    // Punctuation
    Grave,
    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,

    /// Any other evdev key code.
    Other(u16),
}

/// `(key, evdev code, evdev name without the KEY_ prefix)`.
const KEYS: &[(Key, u16, &str)] = &[
    (Key::Escape, 1, "ESC"),
    (Key::Num1, 2, "1"),
    (Key::Num2, 3, "2"),
    (Key::Num3, 4, "3"),
    (Key::Num4, 5, "4"),
    (Key::Num5, 6, "5"),
    (Key::Num6, 7, "6"),
    (Key::Num7, 8, "7"),
    (Key::Num8, 9, "8"),
    (Key::Num9, 10, "9"),
    (Key::Num0, 11, "0"),
    (Key::Minus, 12, "MINUS"),
    (Key::Equal, 13, "EQUAL"),
    (Key::Backspace, 14, "BACKSPACE"),
    (Key::Tab, 15, "TAB"),
    (Key::KeyQ, 16, "Q"),
    (Key::KeyW, 17, "W"),
    (Key::KeyE, 18, "E"),
    (Key::KeyR, 19, "R"),
    (Key::KeyT, 20, "T"),
    (Key::KeyY, 21, "Y"),
    (Key::KeyU, 22, "U"),
    (Key::KeyI, 23, "I"),
    (Key::KeyO, 24, "O"),
    (Key::KeyP, 25, "P"),
    (Key::BracketLeft, 26, "LEFTBRACE"),
    (Key::BracketRight, 27, "RIGHTBRACE"),
    (Key::Enter, 28, "ENTER"),
    (Key::ControlLeft, 29, "LEFTCTRL"),
    (Key::KeyA, 30, "A"),
    (Key::KeyS, 31, "S"),
    (Key::KeyD, 32, "D"),
    (Key::KeyF, 33, "F"),
    (Key::KeyG, 34, "G"),
    (Key::KeyH, 35, "H"),
    (Key::KeyJ, 36, "J"),
    (Key::KeyK, 37, "K"),
    (Key::KeyL, 38, "L"),
    (Key::Semicolon, 39, "SEMICOLON"),
    (Key::Quote, 40, "APOSTROPHE"),
    (Key::Grave, 41, "GRAVE"),
    (Key::ShiftLeft, 42, "LEFTSHIFT"),
    (Key::Backslash, 43, "BACKSLASH"),
    (Key::KeyZ, 44, "Z"),
    (Key::KeyX, 45, "X"),
    (Key::KeyC, 46, "C"),
    (Key::KeyV, 47, "V"),
    (Key::KeyB, 48, "B"),
    (Key::KeyN, 49, "N"),
    (Key::KeyM, 50, "M"),
    (Key::Comma, 51, "COMMA"),
    (Key::Period, 52, "DOT"),
    (Key::Slash, 53, "SLASH"),
    (Key::ShiftRight, 54, "RIGHTSHIFT"),
    (Key::AltLeft, 56, "LEFTALT"),
    (Key::Space, 57, "SPACE"),
    (Key::CapsLock, 58, "CAPSLOCK"),
    (Key::F1, 59, "F1"),
    (Key::F2, 60, "F2"),
    (Key::F3, 61, "F3"),
    (Key::F4, 62, "F4"),
    (Key::F5, 63, "F5"),
    (Key::F6, 64, "F6"),
    (Key::F7, 65, "F7"),
    (Key::F8, 66, "F8"),
    (Key::F9, 67, "F9"),
    (Key::F10, 68, "F10"),
    (Key::NumLock, 69, "NUMLOCK"),
    (Key::ScrollLock, 70, "SCROLLLOCK"),
    (Key::F11, 87, "F11"),
    (Key::F12, 88, "F12"),
    (Key::ControlRight, 97, "RIGHTCTRL"),
    (Key::PrintScreen, 99, "SYSRQ"),
    (Key::AltRight, 100, "RIGHTALT"),
    (Key::Home, 102, "HOME"),
    (Key::ArrowUp, 103, "UP"),
    (Key::PageUp, 104, "PAGEUP"),
    (Key::ArrowLeft, 105, "LEFT"),
    (Key::ArrowRight, 106, "RIGHT"),
    (Key::End, 107, "END"),
    (Key::ArrowDown, 108, "DOWN"),
    (Key::PageDown, 109, "PAGEDOWN"),
    (Key::Insert, 110, "INSERT"),
    (Key::Delete, 111, "DELETE"),
    (Key::Pause, 119, "PAUSE"),
    (Key::MetaLeft, 125, "LEFTMETA"),
    (Key::MetaRight, 126, "RIGHTMETA"),
];

/// Friendlier spellings accepted on the command line.
const ALIASES: &[(&str, Key)] = &[
    ("ESCAPE", Key::Escape),
    ("RETURN", Key::Enter),
    ("DEL", Key::Delete),
    ("PRINTSCREEN", Key::PrintScreen),
    ("PERIOD", Key::Period),
    ("QUOTE", Key::Quote),
];

impl Key {
    /// The Linux evdev key code.
    pub fn code(&self) -> u16 {
        if let Key::Other(code) = self {
            return *code;
        }
        KEYS.iter()
            .find(|(key, _, _)| key == self)
            .map(|(_, code, _)| *code)
            .unwrap_or(0)
    }

    /// Resolve an evdev key code. Codes without a named variant become `Other`.
    pub fn from_code(code: u16) -> Self {
        KEYS.iter()
            .find(|(_, c, _)| *c == code)
            .map(|(key, _, _)| *key)
            .unwrap_or(Key::Other(code))
    }

    fn evdev_name(&self) -> Option<&'static str> {
        KEYS.iter()
            .find(|(key, _, _)| key == self)
            .map(|(_, _, name)| *name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.evdev_name() {
            Some(name) => write!(f, "KEY_{name}"),
            None => write!(f, "KEY_{:#x}", self.code()),
        }
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parse `KEY_Z`, `z`, `Delete`, or a raw hex code such as `0x2c`.
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_prefix("KEY_").unwrap_or(&upper);

        if let Some(hex) = name.strip_prefix("0X") {
            return u16::from_str_radix(hex, 16)
                .map(Key::from_code)
                .map_err(|_| Error::InvalidKey(s.to_string()));
        }

        KEYS.iter()
            .find(|(_, _, n)| *n == name)
            .map(|(key, _, _)| *key)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|(_, key)| *key)
            })
            .ok_or_else(|| Error::InvalidKey(s.to_string()))
    }
}
