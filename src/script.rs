//! Script detection and digit transliteration
//!
//! Direction and typography are decided per block from the text itself, not
//! from the active UI language, so a mixed-script body renders each block in
//! its own direction.
//!
//! # Examples
//!
//! ```rust
//! use lonko_content::script::{Direction, Script, detect_script, digits_to_local_script};
//!
//! assert_eq!(detect_script("Le système solaire"), Script::Latin);
//! assert_eq!(detect_script("ߕߋ߬ߟߋ ߘߎ߰ߞߊ߲"), Script::Nko);
//! assert_eq!(Script::Nko.direction(), Direction::Rtl);
//! assert_eq!(digits_to_local_script("2026"), "߂߀߂߆");
//! ```

use serde::Serialize;
use std::fmt;

/// First code point of the N'Ko Unicode block
const NKO_BLOCK_START: char = '\u{07C0}';
/// Last code point of the N'Ko Unicode block
const NKO_BLOCK_END: char = '\u{07FF}';

/// N'Ko digits zero through nine (U+07C0..U+07C9)
pub const NKO_DIGITS: [char; 10] = ['߀', '߁', '߂', '߃', '߄', '߅', '߆', '߇', '߈', '߉'];

/// Writing system of a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    /// Anything without N'Ko code points
    Latin,
    Nko,
}

impl Script {
    pub fn direction(self) -> Direction {
        match self {
            Script::Latin => Direction::Ltr,
            Script::Nko => Direction::Rtl,
        }
    }

    /// Typographic class for blocks in this script
    pub fn font_class(self) -> Option<&'static str> {
        match self {
            Script::Latin => None,
            Script::Nko => Some("font-kigelia"),
        }
    }
}

/// Reading direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// Value of the HTML `dir` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if `c` lies in the N'Ko Unicode block
pub fn is_nko_char(c: char) -> bool {
    (NKO_BLOCK_START..=NKO_BLOCK_END).contains(&c)
}

/// Classify text as N'Ko if it contains any N'Ko code point
pub fn detect_script(text: &str) -> Script {
    if text.chars().any(is_nko_char) {
        Script::Nko
    } else {
        Script::Latin
    }
}

/// Replace every ASCII digit with the matching N'Ko digit
///
/// Other characters pass through unchanged.
pub fn digits_to_local_script(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => NKO_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}

/// Inverse of [`digits_to_local_script`]
pub fn local_digits_to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| {
            NKO_DIGITS
                .iter()
                .position(|&digit| digit == c)
                .and_then(|d| char::from_digit(d as u32, 10))
                .unwrap_or(c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_detect_script() {
        assert_eq!(detect_script(""), Script::Latin);
        assert_eq!(detect_script("Astronomie 2026"), Script::Latin);
        assert_eq!(detect_script("Mars ߞߊ߲"), Script::Nko);
        assert_eq!(detect_script("߀"), Script::Nko);
        assert_eq!(detect_script("\u{07FF}"), Script::Nko);
        assert_eq!(detect_script("\u{0800}"), Script::Latin);
    }

    #[test]
    fn test_direction_strings() {
        assert_eq!(Direction::Rtl.to_string(), "rtl");
        assert_eq!(Script::Latin.direction().as_str(), "ltr");
        assert_eq!(Script::Nko.font_class(), Some("font-kigelia"));
    }

    #[test]
    fn test_digits_mixed_text() {
        assert_eq!(digits_to_local_script("12 min"), "߁߂ min");
        assert_eq!(digits_to_local_script("abc"), "abc");
        assert_eq!(local_digits_to_ascii("߁߂ min"), "12 min");
    }

    #[test]
    fn test_non_ascii_digits_untouched() {
        // Arabic-Indic digits are not ASCII digits
        assert_eq!(digits_to_local_script("٣"), "٣");
    }

    proptest! {
        #[test]
        fn prop_digit_mapping_is_bijective(digits in "[0-9]{0,32}") {
            let local = digits_to_local_script(&digits);
            prop_assert_eq!(local.chars().count(), digits.len());
            prop_assert!(local.chars().all(|c| NKO_DIGITS.contains(&c)));
            prop_assert_eq!(local_digits_to_ascii(&local), digits);
        }

        #[test]
        fn prop_local_digits_are_nko(digits in "[0-9]{1,16}") {
            prop_assert_eq!(detect_script(&digits_to_local_script(&digits)), Script::Nko);
        }
    }
}
