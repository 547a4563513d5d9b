//! Arithmetic character sequences such as `abc`, `987` or `XYZ`.

use super::{PatternInstance, PatternKind};
use crate::char_class::CharClass;

const MIN_SEQUENCE_LEN: usize = 3;

/// Length of the ±1 run starting at `start`.
///
/// The direction is fixed by the first step and may not reverse. A lone
/// code unit is a run of length 1.
pub fn sequence_len(units: &[u16], start: usize) -> usize {
    let mut length = 1;
    let mut direction = 0i32;

    for w in units[start..].windows(2) {
        let diff = i32::from(w[1]) - i32::from(w[0]);
        if diff.abs() != 1 {
            break;
        }
        if direction == 0 {
            direction = diff;
        } else if diff != direction {
            break;
        }
        length += 1;
    }

    length
}

/// Returns `true` if any ±1 run of at least `min_len` code units exists.
pub fn has_sequence(units: &[u16], min_len: usize) -> bool {
    (0..units.len()).any(|i| sequence_len(units, i) >= min_len)
}

/// Emits a sequence instance for every start whose run reaches three.
pub fn find_sequence_patterns(units: &[u16]) -> Vec<PatternInstance> {
    (0..units.len())
        .filter_map(|i| {
            let length = sequence_len(units, i);
            (length >= MIN_SEQUENCE_LEN).then(|| PatternInstance {
                position: i,
                length,
                kind: PatternKind::ArithmeticSequence,
                cost: CharClass::of(units[i]).bits_per_char() + (length as f64).log2(),
            })
        })
        .collect()
}
