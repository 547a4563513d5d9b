//! Quality thresholds and their environment overrides.

use serde::{Deserialize, Serialize};

use crate::error::QualityError;

pub const MIN_ENTROPY_ENV: &str = "PWD_QUALITY_MIN_ENTROPY";
pub const WEAK_THRESHOLD_ENV: &str = "PWD_QUALITY_WEAK_THRESHOLD";
pub const FAIR_THRESHOLD_ENV: &str = "PWD_QUALITY_FAIR_THRESHOLD";
pub const GOOD_THRESHOLD_ENV: &str = "PWD_QUALITY_GOOD_THRESHOLD";
pub const STRONG_THRESHOLD_ENV: &str = "PWD_QUALITY_STRONG_THRESHOLD";

/// Bucket boundaries, all in bits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityConfig {
    pub min_entropy: f64,
    pub weak_threshold: f64,
    pub fair_threshold: f64,
    pub good_threshold: f64,
    pub strong_threshold: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_entropy: 40.0,
            weak_threshold: 25.0,
            fair_threshold: 35.0,
            good_threshold: 50.0,
            strong_threshold: 70.0,
        }
    }
}

impl QualityConfig {
    /// Defaults overridden by the `PWD_QUALITY_*` environment variables.
    ///
    /// A variable that is unset, unparsable, negative or not finite leaves
    /// the default in place.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_entropy: env_threshold(MIN_ENTROPY_ENV).unwrap_or(defaults.min_entropy),
            weak_threshold: env_threshold(WEAK_THRESHOLD_ENV).unwrap_or(defaults.weak_threshold),
            fair_threshold: env_threshold(FAIR_THRESHOLD_ENV).unwrap_or(defaults.fair_threshold),
            good_threshold: env_threshold(GOOD_THRESHOLD_ENV).unwrap_or(defaults.good_threshold),
            strong_threshold: env_threshold(STRONG_THRESHOLD_ENV)
                .unwrap_or(defaults.strong_threshold),
        }
    }

    /// Shallow merge of `update` over `self`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if a supplied value is negative or not finite; the
    /// configuration is left untouched in that case.
    pub fn merged(&self, update: &QualityConfigUpdate) -> Result<Self, QualityError> {
        let pick = |name: &str, new: Option<f64>, current: f64| match new {
            Some(v) if !is_valid_threshold(v) => Err(QualityError::InvalidArgument(format!(
                "{name} must be a finite, non-negative number of bits (got {v})"
            ))),
            Some(v) => Ok(v),
            None => Ok(current),
        };

        Ok(Self {
            min_entropy: pick("minEntropy", update.min_entropy, self.min_entropy)?,
            weak_threshold: pick("weakThreshold", update.weak_threshold, self.weak_threshold)?,
            fair_threshold: pick("fairThreshold", update.fair_threshold, self.fair_threshold)?,
            good_threshold: pick("goodThreshold", update.good_threshold, self.good_threshold)?,
            strong_threshold: pick(
                "strongThreshold",
                update.strong_threshold,
                self.strong_threshold,
            )?,
        })
    }

    /// `true` when `weak <= fair <= good <= strong`.
    pub fn is_ascending(&self) -> bool {
        self.weak_threshold <= self.fair_threshold
            && self.fair_threshold <= self.good_threshold
            && self.good_threshold <= self.strong_threshold
    }
}

/// Partial configuration; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityConfigUpdate {
    pub min_entropy: Option<f64>,
    pub weak_threshold: Option<f64>,
    pub fair_threshold: Option<f64>,
    pub good_threshold: Option<f64>,
    pub strong_threshold: Option<f64>,
}

fn is_valid_threshold(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn env_threshold(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|v| is_valid_threshold(*v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_env(key: &str, value: &str) {
        // SAFETY: only used from #[serial] tests
        unsafe { std::env::set_var(key, value); }
    }

    fn remove_env(key: &str) {
        // SAFETY: only used from #[serial] tests
        unsafe { std::env::remove_var(key); }
    }

    const ALL_ENV: [&str; 5] = [
        MIN_ENTROPY_ENV,
        WEAK_THRESHOLD_ENV,
        FAIR_THRESHOLD_ENV,
        GOOD_THRESHOLD_ENV,
        STRONG_THRESHOLD_ENV,
    ];

    #[test]
    fn test_defaults() {
        let config = QualityConfig::default();
        assert_eq!(config.min_entropy, 40.0);
        assert_eq!(config.weak_threshold, 25.0);
        assert_eq!(config.fair_threshold, 35.0);
        assert_eq!(config.good_threshold, 50.0);
        assert_eq!(config.strong_threshold, 70.0);
        assert!(config.is_ascending());
    }

    #[test]
    #[serial]
    fn test_from_env_without_overrides() {
        ALL_ENV.iter().for_each(|k| remove_env(k));
        assert_eq!(QualityConfig::from_env(), QualityConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        set_env(MIN_ENTROPY_ENV, "60");
        set_env(STRONG_THRESHOLD_ENV, " 90.5 ");

        let config = QualityConfig::from_env();
        assert_eq!(config.min_entropy, 60.0);
        assert_eq!(config.strong_threshold, 90.5);
        assert_eq!(config.weak_threshold, 25.0);

        ALL_ENV.iter().for_each(|k| remove_env(k));
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_invalid_values() {
        set_env(WEAK_THRESHOLD_ENV, "not-a-number");
        set_env(FAIR_THRESHOLD_ENV, "-3");
        set_env(GOOD_THRESHOLD_ENV, "inf");

        let config = QualityConfig::from_env();
        assert_eq!(config, QualityConfig::default());

        ALL_ENV.iter().for_each(|k| remove_env(k));
    }

    #[test]
    fn test_merged_is_shallow() {
        let update = QualityConfigUpdate {
            weak_threshold: Some(20.0),
            ..Default::default()
        };
        let merged = QualityConfig::default().merged(&update).expect("valid update");

        assert_eq!(merged.weak_threshold, 20.0);
        assert_eq!(merged.fair_threshold, 35.0);
        assert_eq!(merged.min_entropy, 40.0);
    }

    #[test]
    fn test_merged_rejects_invalid_values() {
        let update = QualityConfigUpdate {
            good_threshold: Some(f64::NAN),
            ..Default::default()
        };
        let result = QualityConfig::default().merged(&update);
        assert!(matches!(result, Err(QualityError::InvalidArgument(msg)) if msg.contains("goodThreshold")));

        let update = QualityConfigUpdate {
            min_entropy: Some(-1.0),
            ..Default::default()
        };
        assert!(QualityConfig::default().merged(&update).is_err());
    }

    #[test]
    fn test_non_ascending_is_detected() {
        let update = QualityConfigUpdate {
            fair_threshold: Some(10.0),
            ..Default::default()
        };
        let merged = QualityConfig::default().merged(&update).expect("valid update");
        assert!(!merged.is_ascending());
    }

    #[test]
    fn test_update_deserializes_partial_json() {
        let update: QualityConfigUpdate =
            serde_json::from_str(r#"{"strongThreshold": 80}"#).expect("valid json");
        assert_eq!(update.strong_threshold, Some(80.0));
        assert_eq!(update.min_entropy, None);
    }
}
