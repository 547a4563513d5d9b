//! Repeated units such as `aaaa` or `abab`.

use super::{PatternInstance, PatternKind};

/// For every start and unit length, emits the greedy maximal repetition of
/// that unit when it repeats at least twice.
///
/// Several unit lengths may produce overlapping instances at one start.
pub fn find_repetition_patterns(units: &[u16]) -> Vec<PatternInstance> {
    let mut patterns = Vec::new();
    let n = units.len();

    for i in 0..n {
        for unit_len in 1..=(n - i) / 2 {
            let unit = &units[i..i + unit_len];
            let repetitions = units[i..]
                .chunks_exact(unit_len)
                .take_while(|chunk| *chunk == unit)
                .count();

            if repetitions > 1 {
                patterns.push(PatternInstance {
                    position: i,
                    length: repetitions * unit_len,
                    kind: PatternKind::Repetition,
                    cost: (unit_len as f64).log2() + (repetitions as f64).log2(),
                });
            }
        }
    }

    patterns
}
