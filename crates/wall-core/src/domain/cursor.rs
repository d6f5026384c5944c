//! Cursor keys relayed to the appliance's on-screen interface.
//!
//! A remote control or keypad emits one of nine symbolic keys.  Five move or
//! confirm the OSD cursor, three type single characters into text fields, and
//! one dismisses the OSD.
//!
//! # Numeric codes
//!
//! Host integrations that speak in raw integers use the codes below.  Any
//! value outside `1..=9` is treated as [`CursorKey::Exit`], so every possible
//! input maps to exactly one key.
//!
//! | Key          | Code |
//! |--------------|------|
//! | `Up`         | 1    |
//! | `Down`       | 2    |
//! | `Left`       | 3    |
//! | `Right`      | 4    |
//! | `Select`     | 5    |
//! | `TextLeft`   | 6    |
//! | `TextRight`  | 7    |
//! | `TextSelect` | 8    |
//! | `Exit`       | 9    |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A key event with no payload of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum CursorKey {
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
    Select = 5,
    TextLeft = 6,
    TextRight = 7,
    TextSelect = 8,
    Exit = 9,
}

/// Returned when a key name typed by an operator is not recognised.
#[derive(Debug, Error, PartialEq)]
#[error("unknown cursor key: {0}")]
pub struct UnknownKeyName(pub String);

impl CursorKey {
    /// Every key, in code order.
    pub const ALL: [CursorKey; 9] = [
        CursorKey::Up,
        CursorKey::Down,
        CursorKey::Left,
        CursorKey::Right,
        CursorKey::Select,
        CursorKey::TextLeft,
        CursorKey::TextRight,
        CursorKey::TextSelect,
        CursorKey::Exit,
    ];

    /// Maps a raw numeric code to a key.  Unrecognised codes become `Exit`.
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => CursorKey::Up,
            2 => CursorKey::Down,
            3 => CursorKey::Left,
            4 => CursorKey::Right,
            5 => CursorKey::Select,
            6 => CursorKey::TextLeft,
            7 => CursorKey::TextRight,
            8 => CursorKey::TextSelect,
            _ => CursorKey::Exit,
        }
    }

    /// The numeric code of this key.
    pub fn code(self) -> i16 {
        self as i16
    }

    /// Lower-case kebab name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            CursorKey::Up => "up",
            CursorKey::Down => "down",
            CursorKey::Left => "left",
            CursorKey::Right => "right",
            CursorKey::Select => "select",
            CursorKey::TextLeft => "text-left",
            CursorKey::TextRight => "text-right",
            CursorKey::TextSelect => "text-select",
            CursorKey::Exit => "exit",
        }
    }
}

impl fmt::Display for CursorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CursorKey {
    type Err = UnknownKeyName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace('_', "-");
        CursorKey::ALL
            .into_iter()
            .find(|key| key.name() == normalised)
            .ok_or_else(|| UnknownKeyName(s.to_string()))
    }
}
