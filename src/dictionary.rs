//! Popular password dictionary.
//!
//! Known weak passwords are bucketed by length in UTF-16 code units so that a
//! lookup only scans the candidates that could possibly match.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::char_class::code_units;
use crate::error::DictionaryError;

/// Environment variable overriding the word list location.
pub const DICTIONARY_PATH_ENV: &str = "PWD_QUALITY_DICTIONARY_PATH";

const DEFAULT_DICTIONARY_PATH: &str = "./assets/popular-passwords.txt";

/// Used when the word list cannot be loaded.
pub const FALLBACK_PASSWORDS: &[&str] = &[
    "password",
    "123456",
    "123456789",
    "qwerty",
    "abc123",
    "password1",
    "admin",
    "letmein",
    "welcome",
    "monkey",
    "1234567890",
    "dragon",
    "master",
    "shadow",
    "azerty",
];

/// In-memory index of popular passwords grouped by length.
#[derive(Debug, Clone, Default)]
pub struct PopularPasswords {
    buckets: HashMap<usize, Vec<Vec<u16>>>,
}

impl PopularPasswords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dictionary holding only the built-in fallback list.
    pub fn fallback() -> Self {
        let mut dict = Self::new();
        dict.load(FALLBACK_PASSWORDS.iter().copied());
        dict
    }

    /// Reads a newline-delimited word list from `path`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File has no non-blank line
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DictionaryError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_word_list(&content)
    }

    /// Parses an already fetched word list.
    pub fn from_word_list(content: &str) -> Result<Self, DictionaryError> {
        let words = parse_word_list(content);
        if words.is_empty() {
            return Err(DictionaryError::EmptyFile);
        }

        let mut dict = Self::new();
        dict.load(words);
        Ok(dict)
    }

    /// Appends every password to the bucket matching its length.
    ///
    /// Repeated loads accumulate; duplicates are kept.
    pub fn load<I, S>(&mut self, passwords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pw in passwords {
            let pw: String = pw.into();
            let units = code_units(&pw);
            self.buckets.entry(units.len()).or_default().push(units);
        }
    }

    /// Returns `true` when `candidate` is an entry of its length bucket.
    pub fn is_popular(&self, candidate: &str) -> bool {
        self.is_popular_units(&code_units(candidate))
    }

    /// Same as [`is_popular`](Self::is_popular) on UTF-16 code units.
    pub fn is_popular_units(&self, candidate: &[u16]) -> bool {
        if candidate.is_empty() {
            return false;
        }
        self.buckets
            .get(&candidate.len())
            .is_some_and(|bucket| bucket.iter().any(|pw| pw.as_slice() == candidate))
    }

    /// Number of entries of exactly `length` code units.
    pub fn bucket_size(&self, length: usize) -> usize {
        self.buckets.get(&length).map_or(0, Vec::len)
    }

    pub fn contains_length(&self, length: usize) -> bool {
        self.buckets.contains_key(&length)
    }

    /// Longest entry length, `0` when empty.
    pub fn max_length(&self) -> usize {
        self.buckets.keys().copied().max().unwrap_or(0)
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn reset(&mut self) {
        self.buckets.clear();
    }
}

/// Splits a word list on newlines, trimming and dropping blank lines.
pub fn parse_word_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns the word list path.
///
/// Priority:
/// 1. Environment variable `PWD_QUALITY_DICTIONARY_PATH`
/// 2. Default path `./assets/popular-passwords.txt`
pub fn get_dictionary_path() -> PathBuf {
    std::env::var(DICTIONARY_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DICTIONARY_PATH))
}
