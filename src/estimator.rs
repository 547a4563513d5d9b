//! Entropy estimation: pattern scan followed by optimal segmentation.

use crate::char_class::code_units;
use crate::dictionary::PopularPasswords;
use crate::patterns::find_all_patterns;
use crate::segmenter::{Segmentation, segment};

/// Estimates the entropy of `password` and returns the chosen tiling.
///
/// Segment positions and lengths count UTF-16 code units.
pub fn estimate(password: &str, dict: &PopularPasswords) -> Segmentation {
    let units = code_units(password);
    let patterns = find_all_patterns(&units, dict);
    segment(&units, &patterns)
}

/// Entropy in bits of `password`.
pub fn calculate_entropy(password: &str, dict: &PopularPasswords) -> f64 {
    estimate(password, dict).entropy
}
