//! Character classes and their alphabet sizes.
//!
//! Passwords are handled as UTF-16 code units: a character outside the Basic
//! Multilingual Plane counts as two units, each classified on its own.

use serde::{Deserialize, Serialize};

/// Splits `password` into the UTF-16 code units every scanner works on.
pub fn code_units(password: &str) -> Vec<u16> {
    password.encode_utf16().collect()
}

const LOWER_ALPHA: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER_ALPHA: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SPECIAL: &str = " !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Exclusive class of a single password code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharClass {
    LowerAlpha,
    UpperAlpha,
    Digit,
    Special,
    HighUnicode,
    Other,
}

impl CharClass {
    /// Classifies a UTF-16 code unit by alphabet membership, then by value.
    pub fn of(unit: u16) -> Self {
        let in_alphabet = |alphabet: &str| {
            u8::try_from(unit).is_ok_and(|b| alphabet.contains(char::from(b)))
        };

        if in_alphabet(LOWER_ALPHA) {
            CharClass::LowerAlpha
        } else if in_alphabet(UPPER_ALPHA) {
            CharClass::UpperAlpha
        } else if in_alphabet(DIGITS) {
            CharClass::Digit
        } else if in_alphabet(SPECIAL) {
            CharClass::Special
        } else if unit >= 127 {
            CharClass::HighUnicode
        } else {
            CharClass::Other
        }
    }

    pub fn alphabet_size(self) -> u32 {
        match self {
            CharClass::LowerAlpha | CharClass::UpperAlpha => 26,
            CharClass::Digit => 10,
            CharClass::Special => 33,
            CharClass::HighUnicode => 65536 - 127,
            CharClass::Other => 127 - 33,
        }
    }

    /// Cost in bits of guessing one unit of this class.
    pub fn bits_per_char(self) -> f64 {
        f64::from(self.alphabet_size()).log2()
    }
}
