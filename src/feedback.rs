//! Human-readable feedback on a password.
//!
//! Every check runs; each one that fails appends its message.

use crate::char_class::code_units;
use crate::config::QualityConfig;
use crate::patterns::has_sequence;

const MIN_LENGTH: usize = 8;
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const EMPTY_PASSWORD: &str = "Password cannot be empty";
pub const EXCELLENT_PASSWORD: &str = "Excellent password!";

/// Input shared by all checks. Lengths count UTF-16 code units.
struct Subject<'a> {
    units: &'a [u16],
    entropy: f64,
    config: &'a QualityConfig,
}

/// `Some(message)` when the check fails.
type Check = fn(&Subject<'_>) -> Option<String>;

fn length_check(s: &Subject<'_>) -> Option<String> {
    (s.units.len() < MIN_LENGTH).then(|| format!("Use at least {MIN_LENGTH} characters"))
}

fn entropy_check(s: &Subject<'_>) -> Option<String> {
    (s.entropy < s.config.min_entropy).then(|| {
        format!(
            "Insufficient entropy ({:.1} bits, {} required)",
            s.entropy, s.config.min_entropy
        )
    })
}

fn lowercase_check(s: &Subject<'_>) -> Option<String> {
    missing(s, |b| b.is_ascii_lowercase(), "Add lowercase letters")
}

fn uppercase_check(s: &Subject<'_>) -> Option<String> {
    missing(s, |b| b.is_ascii_uppercase(), "Add uppercase letters")
}

fn digit_check(s: &Subject<'_>) -> Option<String> {
    missing(s, |b| b.is_ascii_digit(), "Add digits")
}

fn special_check(s: &Subject<'_>) -> Option<String> {
    missing(s, |b| SPECIAL_CHARS.contains(char::from(b)), "Add special characters")
}

fn repeat_check(s: &Subject<'_>) -> Option<String> {
    s.units
        .windows(3)
        .any(|w| w[0] == w[1] && w[1] == w[2])
        .then(|| "Avoid repeated characters".to_string())
}

fn sequence_check(s: &Subject<'_>) -> Option<String> {
    has_sequence(s.units, 3).then(|| "Avoid sequences (123, abc, etc.)".to_string())
}

/// Fails when no unit is an ASCII byte accepted by `pred`.
fn missing(s: &Subject<'_>, pred: impl Fn(u8) -> bool, message: &str) -> Option<String> {
    let found = s
        .units
        .iter()
        .any(|&u| u8::try_from(u).is_ok_and(|b| pred(b)));
    (!found).then(|| message.to_string())
}

/// Runs every check in order and collects the messages.
///
/// Returns a single positive message when nothing failed.
pub fn feedback(password: &str, entropy: f64, config: &QualityConfig) -> Vec<String> {
    let units = code_units(password);
    let subject = Subject {
        units: &units,
        entropy,
        config,
    };

    let checks: [(&str, Check); 8] = [
        ("length", length_check),
        ("entropy", entropy_check),
        ("lowercase", lowercase_check),
        ("uppercase", uppercase_check),
        ("digit", digit_check),
        ("special", special_check),
        ("repeat", repeat_check),
        ("sequence", sequence_check),
    ];

    let mut messages = Vec::new();
    for (_name, check) in checks {
        if let Some(message) = check(&subject) {
            #[cfg(feature = "tracing")]
            tracing::trace!("feedback check failed: {}", _name);
            messages.push(message);
        }
    }

    if messages.is_empty() {
        messages.push(EXCELLENT_PASSWORD.to_string());
    }
    messages
}
