//! Password quality calculator - dictionary lifecycle, configuration and
//! evaluation entry points.

use std::path::Path;
use std::sync::{Condvar, Mutex, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::classifier::{Strength, classify};
use crate::config::{QualityConfig, QualityConfigUpdate};
use crate::dictionary::{PopularPasswords, get_dictionary_path};
use crate::error::QualityError;
use crate::estimator::calculate_entropy;
use crate::feedback::{EMPTY_PASSWORD, feedback};

const MIN_VALID_LENGTH: usize = 8;

/// Outcome of one quality calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult {
    pub entropy: f64,
    pub score: u8,
    pub strength: Strength,
    pub feedback: Vec<String>,
}

impl QualityResult {
    fn empty() -> Self {
        Self {
            entropy: 0.0,
            score: 0,
            strength: Strength::VeryWeak,
            feedback: vec![EMPTY_PASSWORD.to_string()],
        }
    }
}

/// Quality result plus the accept/reject verdict used by sign-up forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordValidation {
    pub is_valid: bool,
    pub score: u8,
    pub feedback: Vec<String>,
    pub entropy: f64,
    pub strength: Strength,
}

/// Where the calculator is in its one-time setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Loading,
    Ready,
}

#[derive(Debug)]
enum State {
    Uninitialized,
    Loading,
    Ready(PopularPasswords),
}

/// Estimates password quality against a popular-password dictionary.
///
/// The dictionary is read-only once loaded. The configuration can be
/// replaced at any time; a calculation uses whatever configuration is current
/// when it reads it.
///
/// At most one initialization loads at a time. Other callers wait for it and
/// return its entry count.
#[derive(Debug)]
pub struct QualityCalculator {
    state: RwLock<State>,
    config: RwLock<QualityConfig>,
    /// `true` while some caller holds the load claim.
    loading: Mutex<bool>,
    load_done: Condvar,
    #[cfg(feature = "async")]
    load_notify: tokio::sync::Notify,
}

/// Result of trying to become the loader.
enum Begin<'a> {
    Ready(usize),
    Load(LoadClaim<'a>),
}

enum Attempt {
    Ready(usize),
    Claimed,
    Busy,
}

/// Exclusive right to install the dictionary.
///
/// Dropping it without [`finish`](Self::finish) returns the calculator to
/// `Uninitialized` and wakes the waiters so one of them can load instead.
struct LoadClaim<'a> {
    calculator: &'a QualityCalculator,
}

impl LoadClaim<'_> {
    fn finish(self, dictionary: PopularPasswords, config: QualityConfig) -> usize {
        self.calculator.install(dictionary, config)
    }
}

impl Drop for LoadClaim<'_> {
    fn drop(&mut self) {
        self.calculator.release_claim();
    }
}

impl Default for QualityCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityCalculator {
    /// Creates an uninitialized calculator.
    pub fn new() -> Self {
        Self::with_state(State::Uninitialized, QualityConfig::default())
    }

    /// Creates a ready calculator around an injected dictionary.
    pub fn with_dictionary(dictionary: PopularPasswords, config: QualityConfig) -> Self {
        Self::with_state(State::Ready(dictionary), config)
    }

    fn with_state(state: State, config: QualityConfig) -> Self {
        Self {
            state: RwLock::new(state),
            config: RwLock::new(config),
            loading: Mutex::new(false),
            load_done: Condvar::new(),
            #[cfg(feature = "async")]
            load_notify: tokio::sync::Notify::new(),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match *self.state.read().unwrap_or_else(PoisonError::into_inner) {
            State::Uninitialized => Lifecycle::Uninitialized,
            State::Loading => Lifecycle::Loading,
            State::Ready(_) => Lifecycle::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle() == Lifecycle::Ready
    }

    /// One-time setup from the word list at `PWD_QUALITY_DICTIONARY_PATH`
    /// (default `./assets/popular-passwords.txt`) and the `PWD_QUALITY_*`
    /// threshold overrides.
    ///
    /// A word list that cannot be loaded is replaced by the built-in fallback
    /// list. Returns the number of dictionary entries. A call made while
    /// another initialization is loading blocks until that one finishes.
    pub fn initialize(&self) -> usize {
        self.initialize_from_path(get_dictionary_path())
    }

    /// Same as [`initialize`](Self::initialize) with an explicit word list
    /// path.
    pub fn initialize_from_path<P: AsRef<Path>>(&self, path: P) -> usize {
        let claim = match self.begin_loading() {
            Begin::Ready(count) => return count,
            Begin::Load(claim) => claim,
        };

        let path = path.as_ref();
        let dictionary = match PopularPasswords::from_path(path) {
            Ok(dict) => {
                #[cfg(feature = "tracing")]
                tracing::info!("Popular passwords loaded: {} entries from {:?}", dict.len(), path);
                dict
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Could not load popular passwords from {:?}: {}; using fallback list", path, _e);
                PopularPasswords::fallback()
            }
        };

        claim.finish(dictionary, QualityConfig::from_env())
    }

    /// Loads `path` strictly, replacing the current dictionary.
    ///
    /// Unlike [`initialize_from_path`](Self::initialize_from_path) this does
    /// not fall back; on error the calculator keeps its previous state.
    pub fn load_dictionary<P: AsRef<Path>>(&self, path: P) -> Result<usize, QualityError> {
        let dictionary = PopularPasswords::from_path(path)?;
        let count = dictionary.len();
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = State::Ready(dictionary);
        Ok(count)
    }

    /// Takes the load claim, or blocks while another caller holds it.
    fn begin_loading(&self) -> Begin<'_> {
        let mut loading = self.loading.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            match self.try_claim(&mut loading) {
                Attempt::Ready(count) => return Begin::Ready(count),
                Attempt::Claimed => return Begin::Load(LoadClaim { calculator: self }),
                Attempt::Busy => {
                    loading = self.load_done.wait(loading).unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    /// Moves to `Loading` if nobody is loading and no dictionary is installed.
    fn try_claim(&self, loading: &mut bool) -> Attempt {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let State::Ready(dict) = &*state {
            return Attempt::Ready(dict.len());
        }
        if *loading {
            return Attempt::Busy;
        }
        *loading = true;
        *state = State::Loading;
        Attempt::Claimed
    }

    /// Installs a loaded dictionary unless one was put in place meanwhile by
    /// [`load_dictionary`](Self::load_dictionary), which then wins.
    fn install(&self, dictionary: PopularPasswords, config: QualityConfig) -> usize {
        #[cfg(feature = "tracing")]
        {
            if !config.is_ascending() {
                tracing::warn!("Quality thresholds are not in ascending order: {:?}", config);
            }
        }

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let State::Ready(current) = &*state {
            #[cfg(feature = "tracing")]
            tracing::debug!("Dictionary already installed; discarding concurrent load");
            return current.len();
        }
        let count = dictionary.len();
        *state = State::Ready(dictionary);
        count
    }

    fn release_claim(&self) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if matches!(*state, State::Loading) {
                *state = State::Uninitialized;
            }
        }

        *self.loading.lock().unwrap_or_else(PoisonError::into_inner) = false;
        self.load_done.notify_all();
        #[cfg(feature = "async")]
        self.load_notify.notify_waiters();
    }

    /// Estimates entropy, strength and feedback for `password`.
    ///
    /// # Errors
    ///
    /// `Uninitialized` until the calculator is ready.
    pub fn calculate_quality(&self, password: &SecretString) -> Result<QualityResult, QualityError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let State::Ready(dictionary) = &*state else {
            return Err(QualityError::Uninitialized);
        };

        let pwd = password.expose_secret();
        if pwd.is_empty() {
            return Ok(QualityResult::empty());
        }

        let config = self.get_config();
        let entropy = calculate_entropy(pwd, dictionary);
        let (score, strength) = classify(entropy, &config);

        #[cfg(feature = "tracing")]
        tracing::debug!("Password quality: {:.1} bits, score {} ({})", entropy, score, strength);

        Ok(QualityResult {
            entropy,
            score,
            strength,
            feedback: feedback(pwd, entropy, &config),
        })
    }

    /// Calculates quality and decides whether the password is acceptable:
    /// at least 8 characters and `minEntropy` bits.
    pub fn validate(&self, password: &SecretString) -> Result<PasswordValidation, QualityError> {
        let result = self.calculate_quality(password)?;
        let length = password.expose_secret().encode_utf16().count();
        let is_valid = length >= MIN_VALID_LENGTH && result.entropy >= self.get_config().min_entropy;

        Ok(PasswordValidation {
            is_valid,
            score: result.score,
            feedback: result.feedback,
            entropy: result.entropy,
            strength: result.strength,
        })
    }

    /// Copy of the active configuration.
    pub fn get_config(&self) -> QualityConfig {
        *self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shallow-merges `update` into the active configuration.
    ///
    /// Takes effect for subsequent calculations only.
    pub fn update_config(&self, update: QualityConfigUpdate) -> Result<QualityConfig, QualityError> {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let merged = config.merged(&update)?;

        #[cfg(feature = "tracing")]
        {
            if !merged.is_ascending() {
                tracing::warn!("Quality thresholds are not in ascending order: {:?}", merged);
            }
        }

        *config = merged;
        Ok(merged)
    }
}

#[cfg(feature = "async")]
const DICTIONARY_LOAD_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

#[cfg(feature = "async")]
const DEBOUNCE: std::time::Duration = std::time::Duration::from_millis(300);

#[cfg(feature = "async")]
impl QualityCalculator {
    /// Async counterpart of [`initialize`](Self::initialize).
    ///
    /// The word list read is bounded by a timeout; a timeout or read error
    /// falls back to the built-in list.
    pub async fn initialize_async(&self) -> usize {
        self.initialize_from_path_async(get_dictionary_path()).await
    }

    pub async fn initialize_from_path_async<P: AsRef<Path>>(&self, path: P) -> usize {
        let claim = match self.begin_loading_async().await {
            Begin::Ready(count) => return count,
            Begin::Load(claim) => claim,
        };

        let path = path.as_ref();
        let dictionary = match load_with_timeout(path, DICTIONARY_LOAD_TIMEOUT).await {
            Ok(dict) => {
                #[cfg(feature = "tracing")]
                tracing::info!("Popular passwords loaded: {} entries from {:?}", dict.len(), path);
                dict
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Could not load popular passwords from {:?}: {}; using fallback list", path, _e);
                PopularPasswords::fallback()
            }
        };

        claim.finish(dictionary, QualityConfig::from_env())
    }

    /// Non-blocking counterpart of `begin_loading`; waits on a `Notify`
    /// instead of the condition variable.
    async fn begin_loading_async(&self) -> Begin<'_> {
        loop {
            let notified = self.load_notify.notified();
            let mut notified = std::pin::pin!(notified);
            // registered before the check so a release in between is not missed
            notified.as_mut().enable();

            let attempt = {
                let mut loading = self.loading.lock().unwrap_or_else(PoisonError::into_inner);
                self.try_claim(&mut loading)
            };
            match attempt {
                Attempt::Ready(count) => return Begin::Ready(count),
                Attempt::Claimed => return Begin::Load(LoadClaim { calculator: self }),
                Attempt::Busy => notified.await,
            }
        }
    }
}

#[cfg(feature = "async")]
async fn load_with_timeout(
    path: &Path,
    timeout: std::time::Duration,
) -> Result<PopularPasswords, crate::error::DictionaryError> {
    use crate::error::DictionaryError;

    let read = tokio::time::timeout(timeout, tokio::fs::read_to_string(path))
        .await
        .map_err(|_| DictionaryError::Timeout(timeout))?;

    let content = match read {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DictionaryError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    PopularPasswords::from_word_list(&content)
}

/// Debounced evaluation that sends the result via channel.
///
/// Nothing is sent if `token` was cancelled by the end of the debounce, so a
/// newer keystroke can supersede this one.
#[cfg(feature = "async")]
pub async fn calculate_quality_tx(
    calculator: &QualityCalculator,
    password: &SecretString,
    token: CancellationToken,
    tx: mpsc::Sender<Result<QualityResult, QualityError>>,
) {
    tokio::time::sleep(DEBOUNCE).await;
    if token.is_cancelled() {
        #[cfg(feature = "tracing")]
        tracing::debug!("Quality evaluation cancelled");
        return;
    }

    let result = calculator.calculate_quality(password);

    if let Err(_e) = tx.send(result).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send password quality result: {}", _e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_ENTROPY_ENV;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn secret(pwd: &str) -> SecretString {
        SecretString::new(pwd.to_string().into())
    }

    fn setup_with_tempfile(passwords: &[&str]) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        for pwd in passwords {
            writeln!(temp_file, "{}", pwd).expect("Failed to write");
        }
        temp_file
    }

    fn set_env(key: &str, value: &str) {
        // SAFETY: only used from #[serial] tests
        unsafe { std::env::set_var(key, value); }
    }

    fn remove_env(key: &str) {
        // SAFETY: only used from #[serial] tests
        unsafe { std::env::remove_var(key); }
    }

    fn dictionary_of(words: &[&str]) -> PopularPasswords {
        let mut dict = PopularPasswords::new();
        dict.load(words.iter().copied());
        dict
    }

    fn ready_with(words: &[&str]) -> QualityCalculator {
        let mut dict = PopularPasswords::new();
        dict.load(words.iter().copied());
        QualityCalculator::with_dictionary(dict, QualityConfig::default())
    }

    #[test]
    fn test_uninitialized_rejects_calculation() {
        let calc = QualityCalculator::new();
        assert_eq!(calc.lifecycle(), Lifecycle::Uninitialized);

        let result = calc.calculate_quality(&secret("anything"));
        assert!(matches!(result, Err(QualityError::Uninitialized)));
    }

    #[test]
    #[serial]
    fn test_initialize_from_file() {
        let temp_file = setup_with_tempfile(&["password", "123456", "qwerty", "admin"]);
        let calc = QualityCalculator::new();

        let count = calc.initialize_from_path(temp_file.path());
        assert_eq!(count, 4);
        assert!(calc.is_ready());
    }

    #[test]
    #[serial]
    fn test_initialize_falls_back_on_missing_file() {
        let calc = QualityCalculator::new();
        let count = calc.initialize_from_path("/nonexistent/path/popular.txt");

        assert_eq!(count, crate::dictionary::FALLBACK_PASSWORDS.len());
        let result = calc.calculate_quality(&secret("letmein")).expect("ready");
        assert!(result.entropy < 5.0);
    }

    #[test]
    #[serial]
    fn test_initialize_is_idempotent() {
        let first = setup_with_tempfile(&["password", "qwerty"]);
        let second = setup_with_tempfile(&["a", "b", "c"]);
        let calc = QualityCalculator::new();

        assert_eq!(calc.initialize_from_path(first.path()), 2);
        assert_eq!(calc.initialize_from_path(second.path()), 2);
    }

    #[test]
    #[serial]
    fn test_initialize_reads_env() {
        let temp_file = setup_with_tempfile(&["hunter2"]);
        set_env(crate::dictionary::DICTIONARY_PATH_ENV, temp_file.path().to_str().unwrap());
        set_env(MIN_ENTROPY_ENV, "55");

        let calc = QualityCalculator::new();
        assert_eq!(calc.initialize(), 1);
        assert_eq!(calc.get_config().min_entropy, 55.0);

        remove_env(crate::dictionary::DICTIONARY_PATH_ENV);
        remove_env(MIN_ENTROPY_ENV);
    }

    #[test]
    #[serial]
    fn test_initialize_waits_for_running_load() {
        let other = setup_with_tempfile(&["x", "y"]);
        let calc = QualityCalculator::new();
        let Begin::Load(claim) = calc.begin_loading() else {
            panic!("fresh calculator should hand out the load claim");
        };

        std::thread::scope(|s| {
            let waiter = s.spawn(|| calc.initialize_from_path(other.path()));
            std::thread::sleep(std::time::Duration::from_millis(50));
            assert_eq!(calc.lifecycle(), Lifecycle::Loading);

            let installed = claim.finish(dictionary_of(&["a", "b", "c"]), QualityConfig::default());
            assert_eq!(installed, 3);
            assert_eq!(waiter.join().expect("waiter thread"), 3);
        });
        assert!(calc.is_ready());
    }

    #[test]
    fn test_load_dictionary_during_loading_is_kept() {
        let strict = setup_with_tempfile(&["alpha", "bravo", "delta", "gamma"]);
        let calc = QualityCalculator::new();
        let Begin::Load(claim) = calc.begin_loading() else {
            panic!("fresh calculator should hand out the load claim");
        };

        assert_eq!(calc.load_dictionary(strict.path()).expect("loads"), 4);
        assert_eq!(claim.finish(PopularPasswords::fallback(), QualityConfig::default()), 4);

        let result = calc.calculate_quality(&secret("gamma")).expect("ready");
        assert_eq!(result.entropy, 2.0);
        let result = calc.calculate_quality(&secret("qwerty")).expect("ready");
        assert!(result.entropy > 20.0);
    }

    #[test]
    #[serial]
    fn test_abandoned_claim_allows_new_load() {
        let temp_file = setup_with_tempfile(&["password", "qwerty"]);
        let calc = QualityCalculator::new();
        let Begin::Load(claim) = calc.begin_loading() else {
            panic!("fresh calculator should hand out the load claim");
        };

        drop(claim);
        assert_eq!(calc.lifecycle(), Lifecycle::Uninitialized);
        assert_eq!(calc.initialize_from_path(temp_file.path()), 2);
    }

    #[test]
    fn test_load_dictionary_is_strict() {
        let calc = QualityCalculator::new();
        let result = calc.load_dictionary("/nonexistent/path/popular.txt");

        assert!(matches!(result, Err(QualityError::DictionaryLoad(_))));
        assert_eq!(calc.lifecycle(), Lifecycle::Uninitialized);
    }

    #[test]
    fn test_empty_password() {
        let calc = ready_with(&[]);
        let result = calc.calculate_quality(&secret("")).expect("ready");

        assert_eq!(
            result,
            QualityResult {
                entropy: 0.0,
                score: 0,
                strength: Strength::VeryWeak,
                feedback: vec!["Password cannot be empty".to_string()],
            }
        );
    }

    #[test]
    fn test_dictionary_password() {
        let calc = ready_with(&["password"]);
        let result = calc.calculate_quality(&secret("password")).expect("ready");

        assert_eq!(result.entropy, 0.0);
        assert_eq!(result.score, 0);
        assert_eq!(result.strength, Strength::VeryWeak);
    }

    #[test]
    fn test_abcxyqr_is_weak() {
        let calc = ready_with(&[]);
        let result = calc.calculate_quality(&secret("abcxyqr")).expect("ready");

        assert_eq!(result.score, 1);
        assert_eq!(result.strength, Strength::Weak);
    }

    #[test]
    fn test_strong_password() {
        let calc = ready_with(&["password"]);
        let result = calc
            .calculate_quality(&secret("Gq7#mZ!p2Lw-Vt9@kR"))
            .expect("ready");

        assert_eq!(result.strength, Strength::Strong);
        assert_eq!(result.feedback, vec!["Excellent password!"]);
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let calc = ready_with(&["dragon", "monkey"]);
        let a = calc.calculate_quality(&secret("dragonMonkey99!")).expect("ready");
        let b = calc.calculate_quality(&secret("dragonMonkey99!")).expect("ready");
        assert_eq!(a, b);
    }

    #[test]
    fn test_update_config_applies_to_later_calls() {
        let calc = ready_with(&[]);
        let before = calc.calculate_quality(&secret("qmzkbwt")).expect("ready");
        assert_eq!(before.strength, Strength::Weak);

        let config = calc
            .update_config(QualityConfigUpdate {
                fair_threshold: Some(30.0),
                ..Default::default()
            })
            .expect("valid update");
        assert_eq!(config.fair_threshold, 30.0);
        assert_eq!(config.weak_threshold, 25.0);

        let after = calc.calculate_quality(&secret("qmzkbwt")).expect("ready");
        assert_eq!(after.strength, Strength::Fair);
        assert_eq!(before.entropy, after.entropy);
    }

    #[test]
    fn test_update_config_rejects_invalid_value() {
        let calc = ready_with(&[]);
        let result = calc.update_config(QualityConfigUpdate {
            min_entropy: Some(f64::INFINITY),
            ..Default::default()
        });

        assert!(matches!(result, Err(QualityError::InvalidArgument(_))));
        assert_eq!(calc.get_config(), QualityConfig::default());
    }

    #[test]
    fn test_validate() {
        let calc = ready_with(&["password"]);

        let weak = calc.validate(&secret("password")).expect("ready");
        assert!(!weak.is_valid);

        let short = calc.validate(&secret("Gq7#mZ!")).expect("ready");
        assert!(!short.is_valid);

        let good = calc.validate(&secret("Gq7#mZ!p2Lw-Vt9@kR")).expect("ready");
        assert!(good.is_valid);
        assert_eq!(good.strength, Strength::Strong);

        let empty = calc.validate(&secret("")).expect("ready");
        assert!(!empty.is_valid);
    }

    #[test]
    fn test_result_json_shape() {
        let calc = ready_with(&[]);
        let result = calc.calculate_quality(&secret("")).expect("ready");
        let json = serde_json::to_value(&result).expect("serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "entropy": 0.0,
                "score": 0,
                "strength": "very-weak",
                "feedback": ["Password cannot be empty"],
            })
        );
    }
}
