//! Dictionary matches against popular passwords.

use super::{PatternInstance, PatternKind};
use crate::dictionary::PopularPasswords;

/// Emits one instance per substring found in the dictionary.
///
/// A match costs `log2(bucket size)`: picking one entry uniformly out of
/// every popular password of that length.
pub fn find_dictionary_patterns(units: &[u16], dict: &PopularPasswords) -> Vec<PatternInstance> {
    let mut patterns = Vec::new();
    let max_len = dict.max_length();

    for i in 0..units.len() {
        let end = units.len().min(i + max_len);
        for j in i + 1..=end {
            let length = j - i;
            if !dict.contains_length(length) {
                continue;
            }
            if dict.is_popular_units(&units[i..j]) {
                patterns.push(PatternInstance {
                    position: i,
                    length,
                    kind: PatternKind::DictionaryMatch,
                    cost: (dict.bucket_size(length) as f64).log2(),
                });
            }
        }
    }

    patterns
}
