//! Character-class runs.

use super::{PatternInstance, PatternKind};
use crate::char_class::CharClass;

/// Splits the password into maximal runs of one character class.
///
/// The runs tile the whole password on their own.
pub fn find_char_class_runs(units: &[u16]) -> Vec<PatternInstance> {
    let mut patterns = Vec::new();
    let mut i = 0;

    while i < units.len() {
        let class = CharClass::of(units[i]);
        let length = 1 + units[i + 1..]
            .iter()
            .take_while(|&&u| CharClass::of(u) == class)
            .count();

        patterns.push(PatternInstance {
            position: i,
            length,
            kind: PatternKind::CharClassRun(class),
            cost: length as f64 * class.bits_per_char(),
        });
        i += length;
    }

    patterns
}
