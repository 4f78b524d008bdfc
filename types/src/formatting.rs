//! Roman numeral formatting for enchantment levels.
//!
//! Levels are rendered into lore as Roman numerals and parsed back when an
//! item is inspected, so both directions live here and must agree for every
//! level in `1..=3999`.

/// Subtractive notation table, largest value first.
const ROMAN_TABLE: [(&str, i64); 13] = [
    ("M", 1000),
    ("CM", 900),
    ("D", 500),
    ("CD", 400),
    ("C", 100),
    ("XC", 90),
    ("L", 50),
    ("XL", 40),
    ("X", 10),
    ("IX", 9),
    ("V", 5),
    ("IV", 4),
    ("I", 1),
];

/// Value of a single Roman symbol, or `None` for anything else.
#[inline]
fn symbol_value(c: char) -> Option<u32> {
    match c {
        'M' => Some(1000),
        'D' => Some(500),
        'C' => Some(100),
        'L' => Some(50),
        'X' => Some(10),
        'V' => Some(5),
        'I' => Some(1),
        _ => None,
    }
}

/// Format a level as a Roman numeral.
///
/// Returns an empty string for zero and negative input; callers treat that
/// as "no encoding".
///
/// # Examples
/// ```
/// use enchants_types::formatting::to_roman;
/// assert_eq!(to_roman(1), "I");
/// assert_eq!(to_roman(4), "IV");
/// assert_eq!(to_roman(1994), "MCMXCIV");
/// assert_eq!(to_roman(0), "");
/// ```
pub fn to_roman(level: i64) -> String {
    let mut remaining = level;
    let mut result = String::new();
    while remaining > 0 {
        // Table ends in ("I", 1) so a match always exists
        for (symbol, value) in ROMAN_TABLE {
            if remaining >= value {
                remaining -= value;
                result.push_str(symbol);
                break;
            }
        }
    }
    result
}

/// Parse a Roman numeral, case-insensitively.
///
/// Scans right to left, subtracting a symbol when it is strictly smaller
/// than the one before it. Returns 0 when any character is not a Roman
/// symbol or the accumulated value is not positive; 0 is never a valid
/// level, so it doubles as the "invalid" marker.
///
/// Non-canonical numerals are accumulated best-effort (`IIII` parses as 4).
///
/// # Examples
/// ```
/// use enchants_types::formatting::from_roman;
/// assert_eq!(from_roman("iii"), 3);
/// assert_eq!(from_roman("XIV"), 14);
/// assert_eq!(from_roman("X1"), 0);
/// ```
pub fn from_roman(text: &str) -> u32 {
    let mut result: i64 = 0;
    let mut prev = 0;
    for c in text.chars().rev() {
        let Some(value) = symbol_value(c.to_ascii_uppercase()) else {
            return 0;
        };
        if value < prev {
            result -= i64::from(value);
        } else {
            result += i64::from(value);
        }
        prev = value;
    }
    u32::try_from(result).unwrap_or(0)
}
