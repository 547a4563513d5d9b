//! Maps entropy to a strength bucket.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::QualityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strength {
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
}

impl Strength {
    /// Score in `0..=4`.
    pub fn score(self) -> u8 {
        match self {
            Strength::VeryWeak => 0,
            Strength::Weak => 1,
            Strength::Fair => 2,
            Strength::Good => 3,
            Strength::Strong => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strength::VeryWeak => "very-weak",
            Strength::Weak => "weak",
            Strength::Fair => "fair",
            Strength::Good => "good",
            Strength::Strong => "strong",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buckets `entropy` with strict `<` comparisons, checked from weakest up.
///
/// Thresholds are not required to ascend; the first one that `entropy` falls
/// below decides.
pub fn classify(entropy: f64, config: &QualityConfig) -> (u8, Strength) {
    let strength = if entropy < config.weak_threshold {
        Strength::VeryWeak
    } else if entropy < config.fair_threshold {
        Strength::Weak
    } else if entropy < config.good_threshold {
        Strength::Fair
    } else if entropy < config.strong_threshold {
        Strength::Good
    } else {
        Strength::Strong
    };
    (strength.score(), strength)
}
