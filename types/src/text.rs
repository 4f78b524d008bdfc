//! In-game text formatting markers.
//!
//! Formatting is expressed inline as an escape character followed by a
//! single code character (`§a`, `§r`, ...). Lore lines carry these markers,
//! so anything matching on lore text must [`clean`] it first.

use serde::{Deserialize, Serialize};

/// Escape character that starts every formatting marker
pub const ESCAPE: char = '§';

/// Marker that resets color and style to the default
pub const RESET: &str = "§r";

/// Returns true for characters that form a marker when following [`ESCAPE`]
#[inline]
fn is_format_code(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='v')
}

/// Strip all formatting markers from a string.
///
/// A stray escape character not followed by a format code is dropped too,
/// matching how the game strips formatting.
///
/// # Examples
/// ```
/// use enchants_types::text::clean;
/// assert_eq!(clean("§r§eHaste II"), "Haste II");
/// assert_eq!(clean("plain"), "plain");
/// ```
pub fn clean(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            result.push(c);
            continue;
        }
        if chars.peek().copied().is_some_and(is_format_code) {
            chars.next();
        }
    }
    result
}

/// Display color for lore lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    #[default]
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl TextColor {
    /// Code character following [`ESCAPE`]
    pub fn code(&self) -> char {
        match self {
            Self::Black => '0',
            Self::DarkBlue => '1',
            Self::DarkGreen => '2',
            Self::DarkAqua => '3',
            Self::DarkRed => '4',
            Self::DarkPurple => '5',
            Self::Gold => '6',
            Self::Gray => '7',
            Self::DarkGray => '8',
            Self::Blue => '9',
            Self::Green => 'a',
            Self::Aqua => 'b',
            Self::Red => 'c',
            Self::LightPurple => 'd',
            Self::Yellow => 'e',
            Self::White => 'f',
        }
    }

    /// Full marker string, e.g. `§e` for yellow
    pub fn marker(&self) -> String {
        let mut s = String::with_capacity(3);
        s.push(ESCAPE);
        s.push(self.code());
        s
    }

    /// Look up a color by its code character
    pub fn from_code(code: char) -> Option<Self> {
        Some(match code {
            '0' => Self::Black,
            '1' => Self::DarkBlue,
            '2' => Self::DarkGreen,
            '3' => Self::DarkAqua,
            '4' => Self::DarkRed,
            '5' => Self::DarkPurple,
            '6' => Self::Gold,
            '7' => Self::Gray,
            '8' => Self::DarkGray,
            '9' => Self::Blue,
            'a' => Self::Green,
            'b' => Self::Aqua,
            'c' => Self::Red,
            'd' => Self::LightPurple,
            'e' => Self::Yellow,
            'f' => Self::White,
            _ => return None,
        })
    }

    /// ANSI SGR foreground sequence for terminal previews
    pub fn ansi(&self) -> &'static str {
        match self {
            Self::Black => "\x1b[30m",
            Self::DarkBlue => "\x1b[34m",
            Self::DarkGreen => "\x1b[32m",
            Self::DarkAqua => "\x1b[36m",
            Self::DarkRed => "\x1b[31m",
            Self::DarkPurple => "\x1b[35m",
            Self::Gold => "\x1b[33m",
            Self::Gray => "\x1b[37m",
            Self::DarkGray => "\x1b[90m",
            Self::Blue => "\x1b[94m",
            Self::Green => "\x1b[92m",
            Self::Aqua => "\x1b[96m",
            Self::Red => "\x1b[91m",
            Self::LightPurple => "\x1b[95m",
            Self::Yellow => "\x1b[93m",
            Self::White => "\x1b[97m",
        }
    }
}

/// Render formatting markers as ANSI escapes for a terminal.
///
/// Color markers map to [`TextColor::ansi`], the reset marker to an SGR
/// reset, and every other marker or stray escape is dropped.
pub fn to_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            result.push(c);
            continue;
        }
        let Some(next) = chars.next_if(|&next| is_format_code(next)) else {
            continue;
        };
        if let Some(color) = TextColor::from_code(next) {
            result.push_str(color.ansi());
        } else if next == 'r' {
            result.push_str("\x1b[0m");
        }
    }
    result.push_str("\x1b[0m");
    result
}
