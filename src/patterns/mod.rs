//! Pattern scanners
//!
//! Each scanner explains substrings of the password as instances of one
//! pattern kind. Instances overlap freely; the segmenter picks the cheapest
//! consistent combination.

mod dictionary;
mod repetition;
mod runs;
mod sequence;

use serde::{Deserialize, Serialize};

use crate::char_class::CharClass;
use crate::dictionary::PopularPasswords;

pub use dictionary::find_dictionary_patterns;
pub use repetition::find_repetition_patterns;
pub use runs::find_char_class_runs;
pub use sequence::{find_sequence_patterns, has_sequence, sequence_len};

/// How a substring could have been produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "class")]
pub enum PatternKind {
    CharClassRun(CharClass),
    DictionaryMatch,
    Repetition,
    ArithmeticSequence,
}

/// One candidate explanation of `password[position..position + length]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternInstance {
    pub position: usize,
    pub length: usize,
    pub kind: PatternKind,
    /// Bits needed to encode the substring under this pattern.
    pub cost: f64,
}

impl PatternInstance {
    pub fn end(&self) -> usize {
        self.position + self.length
    }

    /// Single-unit instance priced by the unit's class.
    pub fn single_unit(position: usize, unit: u16) -> Self {
        let class = CharClass::of(unit);
        Self {
            position,
            length: 1,
            kind: PatternKind::CharClassRun(class),
            cost: class.bits_per_char(),
        }
    }
}

/// Pools the output of every scanner.
///
/// The order (dictionary, repetition, sequence, character class) is the
/// tie-break order used by the segmenter.
pub fn find_all_patterns(units: &[u16], dict: &PopularPasswords) -> Vec<PatternInstance> {
    let mut patterns = find_dictionary_patterns(units, dict);
    patterns.extend(find_repetition_patterns(units));
    patterns.extend(find_sequence_patterns(units));
    patterns.extend(find_char_class_runs(units));
    patterns
}
