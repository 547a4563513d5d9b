//! Password quality estimation library
//!
//! Estimates the entropy of a password by explaining it as the cheapest
//! sequence of patterns: character-class runs, popular-password dictionary
//! matches, repetitions and arithmetic sequences. The entropy is then
//! bucketed into a 0-4 strength score with human-readable feedback.
//!
//! # Features
//!
//! - `async` (default): Enables async dictionary loading and debounced,
//!   cancellable evaluation
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_QUALITY_DICTIONARY_PATH`: Custom path to the popular password list
//!   (default: `./assets/popular-passwords.txt`)
//! - `PWD_QUALITY_MIN_ENTROPY`, `PWD_QUALITY_WEAK_THRESHOLD`,
//!   `PWD_QUALITY_FAIR_THRESHOLD`, `PWD_QUALITY_GOOD_THRESHOLD`,
//!   `PWD_QUALITY_STRONG_THRESHOLD`: threshold overrides in bits
//!
//! The variable names are exported as constants:
//!
//! ```rust
//! use pwd_quality::{
//!     DICTIONARY_PATH_ENV, FAIR_THRESHOLD_ENV, GOOD_THRESHOLD_ENV, MIN_ENTROPY_ENV,
//!     STRONG_THRESHOLD_ENV, WEAK_THRESHOLD_ENV,
//! };
//!
//! assert_eq!(DICTIONARY_PATH_ENV, "PWD_QUALITY_DICTIONARY_PATH");
//! assert_eq!(MIN_ENTROPY_ENV, "PWD_QUALITY_MIN_ENTROPY");
//! assert_eq!(WEAK_THRESHOLD_ENV, "PWD_QUALITY_WEAK_THRESHOLD");
//! assert_eq!(FAIR_THRESHOLD_ENV, "PWD_QUALITY_FAIR_THRESHOLD");
//! assert_eq!(GOOD_THRESHOLD_ENV, "PWD_QUALITY_GOOD_THRESHOLD");
//! assert_eq!(STRONG_THRESHOLD_ENV, "PWD_QUALITY_STRONG_THRESHOLD");
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_quality::QualityCalculator;
//! use secrecy::SecretString;
//!
//! // Load the dictionary and thresholds (call once at startup)
//! let calculator = QualityCalculator::new();
//! calculator.initialize();
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! let quality = calculator.calculate_quality(&password).expect("initialized");
//!
//! println!("Entropy: {:.1} bits", quality.entropy);
//! println!("Strength: {}", quality.strength);
//! ```

mod calculator;
mod char_class;
mod classifier;
mod config;
mod dictionary;
mod error;
mod estimator;
mod feedback;
pub mod patterns;
mod segmenter;

pub use calculator::{Lifecycle, PasswordValidation, QualityCalculator, QualityResult};
pub use char_class::CharClass;
pub use classifier::{Strength, classify};
pub use config::{
    FAIR_THRESHOLD_ENV, GOOD_THRESHOLD_ENV, MIN_ENTROPY_ENV, QualityConfig, QualityConfigUpdate,
    STRONG_THRESHOLD_ENV, WEAK_THRESHOLD_ENV,
};
pub use dictionary::{
    DICTIONARY_PATH_ENV, FALLBACK_PASSWORDS, PopularPasswords, get_dictionary_path,
    parse_word_list,
};
pub use error::{DictionaryError, QualityError};
pub use estimator::{calculate_entropy, estimate};
pub use feedback::feedback;
pub use patterns::{PatternInstance, PatternKind};
pub use segmenter::{Segmentation, segment};

#[cfg(feature = "async")]
pub use calculator::calculate_quality_tx;
